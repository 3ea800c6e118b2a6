//! HTTP（multipart）による解析サービス呼び出し

use super::{
    check_preconditions, FailureKind, LocalAnalysisBackend, SubmissionFailure, SubmissionOutcome,
    REJECTED_MESSAGE, UNREACHABLE_MESSAGE,
};
use crate::candidate::CandidateFile;
use crate::config::Config;
use crate::error::Result;
use crate::mode::{OperatingMode, ResponseShape, Route};
use meditrend_common::{
    extract_detail, parse_single_reply, parse_trend_reply, MediaType, Reply, SubmissionResult,
};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Duration;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.effective_api_url(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `GET /api/health` で到達確認（送信用タイムアウトとは別に短く打ち切る）
    pub async fn health(&self) -> bool {
        let request = self
            .client
            .get(self.url("/api/health"))
            .timeout(self.timeout.min(HEALTH_TIMEOUT));
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                false
            }
        }
    }

    /// multipart フォームを構築（ペンディング順を保持）
    async fn build_form(
        route: Route,
        files: &[CandidateFile],
    ) -> std::result::Result<Form, SubmissionFailure> {
        let mut form = Form::new();

        for file in files {
            let bytes = file.content.read().await.map_err(|e| {
                SubmissionFailure::new(
                    FailureKind::Unreadable,
                    format!("could not read {}: {}", file.name, e),
                )
            })?;

            // image/jpg などの別名は正規名で送る
            let mime = MediaType::from_mime(&file.media_type)
                .map(|m| m.as_mime())
                .unwrap_or(file.media_type.as_str());

            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str(mime)
                .map_err(|e| {
                    SubmissionFailure::new(
                        FailureKind::Unreadable,
                        format!("invalid media type for {}: {}", file.name, e),
                    )
                })?;

            form = form.part(route.field, part);
        }

        Ok(form)
    }

    fn transport_failure(&self, error: &reqwest::Error) -> SubmissionFailure {
        tracing::warn!(error = %error, "analysis request failed");
        if error.is_timeout() {
            SubmissionFailure::new(
                FailureKind::Timeout,
                format!(
                    "analysis service did not respond within {} seconds",
                    self.timeout.as_secs()
                ),
            )
        } else {
            SubmissionFailure::new(FailureKind::Unreachable, UNREACHABLE_MESSAGE)
        }
    }
}

impl LocalAnalysisBackend for HttpAnalysisClient {
    async fn submit(&self, mode: OperatingMode, files: &[CandidateFile]) -> SubmissionOutcome {
        // 通信前に弾く
        check_preconditions(mode, files.len())?;

        let route = mode.route();
        let form = Self::build_form(route, files).await?;
        let url = self.url(route.endpoint);

        tracing::info!(%mode, files = files.len(), url = %url, "submitting reports");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_failure(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_failure(&e))?;

        tracing::debug!(%status, bytes = body.len(), "analysis response received");

        interpret_response(route.shape, status, &body)
    }
}

/// ステータスと本文を成功/失敗に振り分ける
pub(crate) fn interpret_response(
    shape: ResponseShape,
    status: StatusCode,
    body: &str,
) -> SubmissionOutcome {
    if !status.is_success() {
        let message = extract_detail(body)
            .unwrap_or_else(|| format!("{} (HTTP {})", UNREACHABLE_MESSAGE, status.as_u16()));
        return Err(SubmissionFailure::new(FailureKind::Rejected, message));
    }

    let parsed = match shape {
        ResponseShape::SingleReport => {
            parse_single_reply(body).map(|r| map_reply(r, SubmissionResult::SingleReport))
        }
        ResponseShape::TrendAnalysis => {
            parse_trend_reply(body).map(|r| map_reply(r, SubmissionResult::Trend))
        }
    };

    match parsed {
        Ok(Reply::Success(result)) => Ok(result),
        Ok(Reply::Failure { detail }) => Err(SubmissionFailure::new(
            FailureKind::Rejected,
            detail.unwrap_or_else(|| REJECTED_MESSAGE.to_string()),
        )),
        Err(e) => Err(SubmissionFailure::new(
            FailureKind::Malformed,
            format!("malformed response from analysis service: {}", e),
        )),
    }
}

fn map_reply<T>(reply: Reply<T>, wrap: fn(T) -> SubmissionResult) -> Reply<SubmissionResult> {
    match reply {
        Reply::Success(payload) => Reply::Success(wrap(payload)),
        Reply::Failure { detail } => Reply::Failure { detail },
    }
}
