use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediTrendError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("対応ドキュメントが見つかりません: {0}")]
    NoDocumentsFound(String),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    /// 解析サービス側の失敗（ViewState::Failed のメッセージ）
    #[error("解析に失敗しました: {0}")]
    Analysis(String),

    /// 送信前の検証・前提条件エラー
    #[error("送信できません: {0}")]
    NotSubmitted(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] meditrend_common::Error),
}

pub type Result<T> = std::result::Result<T, MediTrendError>;
