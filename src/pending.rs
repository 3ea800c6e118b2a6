//! 送信待ちファイル集合
//!
//! 単一モードでは常に0〜1件、トレンドモードでは受理順に追加していく。

use crate::candidate::CandidateFile;
use crate::mode::OperatingMode;
use crate::validator::{self, FileRejection};

#[derive(Debug, Clone, Default)]
pub struct PendingFileSet {
    files: Vec<CandidateFile>,
}

impl PendingFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 検証して追加し、却下分を返す
    ///
    /// - Single: 受理された先頭1件で置き換える（受理が無ければ現状維持）
    /// - Trend: 受理分を末尾に追加
    pub fn add(&mut self, mode: OperatingMode, files: Vec<CandidateFile>) -> Vec<FileRejection> {
        let outcome = validator::validate_batch(files);

        match mode {
            OperatingMode::Single => {
                if let Some(first) = outcome.accepted.into_iter().next() {
                    self.files.clear();
                    self.files.push(first);
                }
            }
            OperatingMode::Trend => self.files.extend(outcome.accepted),
        }

        outcome.rejections
    }

    /// 範囲外は何もしない
    pub fn remove(&mut self, index: usize) -> Option<CandidateFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn list(&self) -> &[CandidateFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// 合計バイト数
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
