//! MediTrend: 医療検査レポートの解析クライアント
//!
//! ファイル検証・待ち集合・モード・送信・表示状態を `update` 中心に組み立てる。

pub mod candidate;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod mode;
pub mod orchestrator;
pub mod pending;
pub mod render;
pub mod scanner;
pub mod state;
pub mod submission;
pub mod update;
pub mod validator;

pub use candidate::{CandidateFile, FileContent};
pub use error::{MediTrendError, Result};
pub use message::{Message, UpdateAction};
pub use mode::OperatingMode;
pub use orchestrator::Orchestrator;
pub use state::{Session, ViewState};
pub use submission::{AnalysisBackend, HttpAnalysisClient, LocalAnalysisBackend};
