//! オーケストレータへの入力イベント

use crate::candidate::CandidateFile;
use crate::mode::OperatingMode;
use crate::submission::SubmissionOutcome;

#[derive(Debug, Clone)]
pub enum Message {
    /// モード切替（待ちファイルとエラーをクリア）
    SetMode(OperatingMode),

    /// ファイル選択（検証してから待ち集合へ）
    AddFiles(Vec<CandidateFile>),

    /// 待ち集合から1件削除
    RemoveFile(usize),

    /// 待ち集合を空にする
    ClearFiles,

    /// 送信要求
    Submit,

    /// 送信完了（成功/失敗）
    SubmissionFinished {
        mode: OperatingMode,
        outcome: SubmissionOutcome,
    },

    /// 初期状態へ戻る
    Reset,
}

/// update の後にイベントループが実行する処理
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// 解析サービスへ送信し、結果を `SubmissionFinished` として戻す
    Submit {
        mode: OperatingMode,
        files: Vec<CandidateFile>,
    },
}
