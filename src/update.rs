//! 状態遷移（純粋関数）
//!
//! 通信は行わない。送信が必要な場合は `UpdateAction::Submit` を返し、
//! 結果は `Message::SubmissionFinished` として再度ここに流れてくる。

use crate::message::{Message, UpdateAction};
use crate::mode::OperatingMode;
use crate::state::{Session, ViewState};
use crate::submission::{check_preconditions, FailureKind, SubmissionOutcome};
use crate::validator::rejection_message;
use meditrend_common::SubmissionResult;

pub fn update(session: &mut Session, message: Message) -> Option<UpdateAction> {
    match message {
        Message::SetMode(mode) => {
            handle_set_mode(session, mode);
            None
        }
        Message::AddFiles(files) => {
            if !session.view.accepts_input() {
                tracing::debug!(state = session.view.name(), "file selection ignored");
                return None;
            }
            if files.is_empty() {
                return None;
            }
            let rejections = session.pending.add(session.mode, files);
            session.view = ViewState::Idle {
                error: rejection_message(&rejections),
            };
            tracing::debug!(
                pending = session.pending.len(),
                rejected = rejections.len(),
                "files staged"
            );
            None
        }
        Message::RemoveFile(index) => {
            if session.view.accepts_input() && session.pending.remove(index).is_none() {
                tracing::debug!(index, "remove ignored: index out of range");
            }
            None
        }
        Message::ClearFiles => {
            if session.view.accepts_input() {
                session.pending.clear();
                session.view = ViewState::idle();
            }
            None
        }
        Message::Submit => handle_submit(session),
        Message::SubmissionFinished { mode, outcome } => {
            handle_submission_finished(session, mode, outcome);
            None
        }
        Message::Reset => {
            if session.view.is_submitting() {
                // 送信中のキャンセルは提供しない
                tracing::debug!("reset ignored while submitting");
                return None;
            }
            session.pending.clear();
            session.view = ViewState::idle();
            None
        }
    }
}

fn handle_set_mode(session: &mut Session, mode: OperatingMode) {
    if !session.view.accepts_input() {
        tracing::debug!(state = session.view.name(), %mode, "mode change ignored");
        return;
    }
    if session.mode == mode {
        return;
    }

    tracing::info!(from = %session.mode, to = %mode, "mode changed");
    session.mode = mode;
    session.pending.clear();
    session.view = ViewState::idle();
}

fn handle_submit(session: &mut Session) -> Option<UpdateAction> {
    match &session.view {
        ViewState::Submitting { .. } => {
            tracing::warn!("submission already in flight, ignoring submit");
            return None;
        }
        ViewState::Committed { .. } => {
            tracing::debug!("submit ignored: reset required first");
            return None;
        }
        ViewState::Idle { .. } | ViewState::Failed { .. } => {}
    }

    if let Err(violation) = check_preconditions(session.mode, session.pending.len()) {
        tracing::info!(mode = %session.mode, %violation, "submit blocked");
        session.view = ViewState::idle_with_error(violation.to_string());
        return None;
    }

    let files = session.pending.list().to_vec();
    session.view = ViewState::Submitting {
        mode: session.mode,
        file_count: files.len(),
    };

    Some(UpdateAction::Submit {
        mode: session.mode,
        files,
    })
}

fn handle_submission_finished(
    session: &mut Session,
    mode: OperatingMode,
    outcome: SubmissionOutcome,
) {
    match &session.view {
        ViewState::Submitting { mode: in_flight, .. } if *in_flight == mode => {}
        other => {
            tracing::warn!(state = other.name(), %mode, "stale submission result dropped");
            return;
        }
    }

    session.view = match outcome {
        // 送信前に弾かれた場合は待ちファイルを残す
        Err(failure) if failure.kind == FailureKind::Precondition => {
            ViewState::idle_with_error(failure.message)
        }
        Ok(result) if result_matches_mode(&result, mode) => {
            tracing::info!(%mode, "analysis committed");
            session.pending.clear();
            ViewState::Committed { result }
        }
        Ok(_) => {
            tracing::warn!(%mode, "result shape does not match submission mode");
            session.pending.clear();
            ViewState::Failed {
                message: "malformed response from analysis service: unexpected result type"
                    .into(),
            }
        }
        Err(failure) => {
            tracing::info!(%mode, kind = ?failure.kind, "analysis failed");
            session.pending.clear();
            ViewState::Failed {
                message: failure.message,
            }
        }
    };
}

fn result_matches_mode(result: &SubmissionResult, mode: OperatingMode) -> bool {
    matches!(
        (result, mode),
        (SubmissionResult::SingleReport(_), OperatingMode::Single)
            | (SubmissionResult::Trend(_), OperatingMode::Trend)
    )
}
