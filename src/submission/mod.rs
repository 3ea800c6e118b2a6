//! 解析サービスへの送信
//!
//! 単一/トレンドの両経路は `Route` の違いだけで、前提条件チェック・
//! multipart 構築・レスポンス判定は共通。結果は値として返し、
//! 状態遷移は呼び出し側（update）が行う。

mod http;

pub use http::HttpAnalysisClient;

use crate::candidate::CandidateFile;
use crate::mode::OperatingMode;
use meditrend_common::SubmissionResult;

/// 通信自体が失敗した場合の汎用メッセージ
pub const UNREACHABLE_MESSAGE: &str = "service unreachable or request failed";

/// `success: false` で detail が無い場合のメッセージ
pub const REJECTED_MESSAGE: &str = "analysis failed, please try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 送信前に弾いた（通信なし）
    Precondition,
    /// ファイル内容を読めなかった（通信なし）
    Unreadable,
    /// 接続できない・通信エラー
    Unreachable,
    /// タイムアウト
    Timeout,
    /// サービスが失敗を返した
    Rejected,
    /// 成功応答だが本文が不正
    Malformed,
}

/// 送信失敗（人が読めるメッセージ付き）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmissionFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

pub type SubmissionOutcome = std::result::Result<SubmissionResult, SubmissionFailure>;

/// ファイル数の前提条件違反
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionViolation {
    NoFiles,
    TooFewForTrend { count: usize },
    TooManyForSingle { count: usize },
}

impl std::fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreconditionViolation::NoFiles => f.write_str("no file selected"),
            PreconditionViolation::TooFewForTrend { count } => write!(
                f,
                "need at least 2 files for trend comparison ({} selected)",
                count
            ),
            PreconditionViolation::TooManyForSingle { count } => write!(
                f,
                "single report analysis takes exactly 1 file ({} selected)",
                count
            ),
        }
    }
}

impl From<PreconditionViolation> for SubmissionFailure {
    fn from(violation: PreconditionViolation) -> Self {
        SubmissionFailure::new(FailureKind::Precondition, violation.to_string())
    }
}

/// 送信前のファイル数チェック
pub fn check_preconditions(
    mode: OperatingMode,
    count: usize,
) -> std::result::Result<(), PreconditionViolation> {
    if count == 0 {
        return Err(PreconditionViolation::NoFiles);
    }
    if count < mode.min_files() {
        return Err(PreconditionViolation::TooFewForTrend { count });
    }
    if let Some(max) = mode.max_files() {
        if count > max {
            return Err(PreconditionViolation::TooManyForSingle { count });
        }
    }
    Ok(())
}

/// 解析サービスとの送受信
#[trait_variant::make(AnalysisBackend: Send)]
pub trait LocalAnalysisBackend {
    /// 1回だけ送信して結果を返す（リトライなし）
    async fn submit(&self, mode: OperatingMode, files: &[CandidateFile]) -> SubmissionOutcome;
}
