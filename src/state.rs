//! 表示状態とセッション状態
//!
//! 表示に関わる状態は `ViewState` 1つに集約する。
//! 結果は単一かトレンドのどちらか一方しか保持しない。

use crate::mode::OperatingMode;
use crate::pending::PendingFileSet;
use meditrend_common::SubmissionResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    /// 入力受付中（検証・前提条件エラーがあれば保持）
    Idle {
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// 送信中（入力はロック）
    Submitting {
        mode: OperatingMode,
        file_count: usize,
    },

    /// 解析結果確定
    Committed { result: SubmissionResult },

    /// 送信失敗
    Failed { message: String },
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Idle { error: None }
    }
}

impl ViewState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn idle_with_error(message: impl Into<String>) -> Self {
        ViewState::Idle {
            error: Some(message.into()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle { .. } => "idle",
            ViewState::Submitting { .. } => "submitting",
            ViewState::Committed { .. } => "committed",
            ViewState::Failed { .. } => "failed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, ViewState::Submitting { .. })
    }

    /// ファイル追加・モード切替を受け付けるか
    pub fn accepts_input(&self) -> bool {
        matches!(self, ViewState::Idle { .. } | ViewState::Failed { .. })
    }

    /// エラー表示欄の内容
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Idle { error } => error.as_deref(),
            ViewState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn committed(&self) -> Option<&SubmissionResult> {
        match self {
            ViewState::Committed { result } => Some(result),
            _ => None,
        }
    }
}

/// オーケストレータが所有する状態一式
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(crate) mode: OperatingMode,
    pub(crate) pending: PendingFileSet,
    pub(crate) view: ViewState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn pending(&self) -> &PendingFileSet {
        &self.pending
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// 送信ボタンを有効にできるか
    pub fn can_submit(&self) -> bool {
        self.view.accepts_input()
            && crate::submission::check_preconditions(self.mode, self.pending.len()).is_ok()
    }
}
