//! MediTrend Common Library
//!
//! 解析サービスとのやり取りで共有される型とパーサー

pub mod error;
pub mod media;
pub mod parser;
pub mod types;

pub use error::{Error, Result};
pub use media::MediaType;
pub use parser::{extract_detail, parse_single_reply, parse_trend_reply, Reply};
pub use types::{
    MetricValue, ParameterFinding, ParameterStatus, ReportSummary, ScoreBand,
    SingleReportResult, SubmissionResult, TrendDirection, TrendEntry, TrendPoint, TrendResult,
};
