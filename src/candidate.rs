//! 送信候補ファイル
//!
//! 内容は不透明なハンドルとして扱う。パス指定の場合は送信時まで読み込まない。

use std::path::PathBuf;
use std::sync::Arc;

/// ファイル内容のハンドル
#[derive(Debug, Clone)]
pub enum FileContent {
    /// 送信時に読み込む
    Path(PathBuf),
    /// メモリ上のバイト列
    Memory(Arc<[u8]>),
}

impl FileContent {
    /// 内容を読み込む
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileContent::Path(path) => tokio::fs::read(path).await,
            FileContent::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
    /// 申告されたMIMEタイプ（未検証）
    pub media_type: String,
    pub content: FileContent,
}

impl CandidateFile {
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            media_type: media_type.into(),
            content: FileContent::Memory(bytes),
        }
    }

    /// サイズだけ申告された候補（テスト・検証用）
    pub fn declared(name: impl Into<String>, media_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            media_type: media_type.into(),
            content: FileContent::Memory(Arc::from(Vec::new())),
        }
    }
}
