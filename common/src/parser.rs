//! 解析サービスのレスポンスパーサー
//!
//! レスポンス本文（JSON）を成功/失敗に振り分け、
//! 成功時はモードに応じたペイロードを取り出す。

use crate::error::{Error, Result};
use crate::types::{SingleReportResult, TrendResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// サービス応答の振り分け結果
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// `success: true` とペイロード
    Success(T),
    /// `success: false`（detail があれば保持）
    Failure { detail: Option<String> },
}

/// 本文から `detail` を取り出す
///
/// FastAPI のバリデーションエラーのように配列で返る場合は
/// 各要素の `msg` を "; " で連結する。
///
/// # Examples
/// ```
/// use meditrend_common::extract_detail;
///
/// assert_eq!(extract_detail(r#"{"detail": "Could not extract text from file."}"#).as_deref(),
///            Some("Could not extract text from file."));
/// assert_eq!(extract_detail("<html>502</html>"), None);
/// ```
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    detail_of(&value)
}

fn detail_of(value: &Value) -> Option<String> {
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// 共通処理: JSON化 → success判定 → ペイロード抽出
fn parse_reply<T, F>(body: &str, payload: F) -> Result<Reply<T>>
where
    F: FnOnce(Value) -> Result<T>,
{
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| Error::Parse(format!("response is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(Error::Parse("response is not a JSON object".into()));
    }

    // success が無い/false の場合は失敗扱い
    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        return Ok(Reply::Failure {
            detail: detail_of(&value),
        });
    }

    payload(value).map(Reply::Success)
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Parse(format!("invalid {}: {}", what, e)))
}

/// 単一レポート解析（/api/upload）のレスポンスをパース
pub fn parse_single_reply(body: &str) -> Result<Reply<SingleReportResult>> {
    parse_reply(body, |value| decode(value, "single report payload"))
}

/// トレンド比較（/api/analyze-trends）のレスポンスをパース
///
/// ペイロードは `analysis` の中にある。`analysis.trends` が無い場合はエラー。
pub fn parse_trend_reply(body: &str) -> Result<Reply<TrendResult>> {
    parse_reply(body, |mut value| {
        let analysis = value
            .get_mut("analysis")
            .map(Value::take)
            .ok_or_else(|| Error::Parse("missing field `analysis`".into()))?;
        decode(analysis, "trend analysis payload")
    })
}
