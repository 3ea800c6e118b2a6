//! レポート送信オーケストレータ
//!
//! `update` で状態を進め、返ってきた `UpdateAction` をバックエンドで実行して
//! その結果を再び `update` に流す。状態を変更するのはこのモジュールだけ。

use crate::message::{Message, UpdateAction};
use crate::state::{Session, ViewState};
use crate::submission::LocalAnalysisBackend;
use crate::update::update;

/// アクションを実行し、結果メッセージを返す
///
/// イベントループ側で別タスクとして実行する場合にも使う。
pub async fn perform<B: LocalAnalysisBackend>(backend: &B, action: UpdateAction) -> Message {
    match action {
        UpdateAction::Submit { mode, files } => {
            let outcome = backend.submit(mode, &files).await;
            Message::SubmissionFinished { mode, outcome }
        }
    }
}

pub struct Orchestrator<B> {
    session: Session,
    backend: B,
}

impl<B: LocalAnalysisBackend> Orchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            session: Session::new(),
            backend,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        self.session.view()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 状態遷移のみ（通信はしない）
    pub fn dispatch(&mut self, message: Message) -> Option<UpdateAction> {
        update(&mut self.session, message)
    }

    /// 状態遷移し、必要なら送信完了まで待って結果を反映する
    pub async fn run(&mut self, message: Message) -> &ViewState {
        let mut next = Some(message);

        while let Some(message) = next.take() {
            if let Some(action) = update(&mut self.session, message) {
                next = Some(perform(&self.backend, action).await);
            }
        }

        self.session.view()
    }

    pub async fn submit(&mut self) -> &ViewState {
        self.run(Message::Submit).await
    }
}
