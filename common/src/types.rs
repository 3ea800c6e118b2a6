//! 解析結果の型定義
//!
//! 解析サービスのレスポンスに対応する型:
//! - SingleReportResult: 単一レポート解析（/api/upload）
//! - TrendResult: 複数レポートのトレンド比較（/api/analyze-trends）
//! - SubmissionResult: 上記いずれか一方（同時に両方は持たない）

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// 検査値（数値または文字列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Text(String::new())
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// 検査項目の判定
///
/// 表示上の分類にのみ使う。未知の値・null は Unknown 扱い。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum ParameterStatus {
    Normal,
    High,
    Low,
    Optimal,
    #[default]
    Unknown,
}

impl From<Option<String>> for ParameterStatus {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("normal") => ParameterStatus::Normal,
            Some("high") => ParameterStatus::High,
            Some("low") => ParameterStatus::Low,
            Some("optimal") => ParameterStatus::Optimal,
            _ => ParameterStatus::Unknown,
        }
    }
}

impl ParameterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterStatus::Normal => "normal",
            ParameterStatus::High => "high",
            ParameterStatus::Low => "low",
            ParameterStatus::Optimal => "optimal",
            ParameterStatus::Unknown => "unknown",
        }
    }

    /// 要注意（正常・最適以外）
    pub fn needs_attention(&self) -> bool {
        !matches!(self, ParameterStatus::Normal | ParameterStatus::Optimal)
    }
}

/// 検査項目1件分の所見
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterFinding {
    #[serde(rename = "parameter")]
    pub name: String,

    pub value: MetricValue,

    pub unit: String,

    pub status: ParameterStatus,

    /// 表示用の基準範囲（例: "70 - 100 mg/dL"）
    #[serde(rename = "reference_range_display")]
    pub reference_range: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<[f64; 2]>,

    pub explanation: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ParameterFinding {
    /// カテゴリ未設定時は "General"
    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("General")
    }
}

/// 検査件数サマリ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(deserialize_with = "rounded_count")]
    pub total_tests: u32,
    #[serde(deserialize_with = "rounded_count")]
    pub normal: u32,
    #[serde(deserialize_with = "rounded_count")]
    pub abnormal: u32,
}

/// 整数・小数・数値文字列のいずれも受け付け、四捨五入して返す
fn rounded_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = MetricValue::deserialize(deserializer)?;
    let number = value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| D::Error::custom(format!("expected a non-negative number, got {}", value)))?;
    Ok(number.round().min(u32::MAX as f64) as u32)
}

/// 単一レポートの解析結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleReportResult {
    #[serde(deserialize_with = "rounded_count")]
    pub health_score: u32,
    pub summary: ReportSummary,
    pub parameters: Vec<ParameterFinding>,
    pub recommendations: String,
    pub filename: String,
}

impl SingleReportResult {
    /// カテゴリ別にグループ化（初出順を保持）
    pub fn parameters_by_category(&self) -> Vec<(&str, Vec<&ParameterFinding>)> {
        let mut groups: Vec<(&str, Vec<&ParameterFinding>)> = Vec::new();
        for param in &self.parameters {
            let label = param.category_label();
            match groups.iter_mut().find(|(name, _)| *name == label) {
                Some((_, items)) => items.push(param),
                None => groups.push((label, vec![param])),
            }
        }
        groups
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.health_score)
    }
}

/// ヘルススコアの区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 80以上
    Good,
    /// 60以上
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Good
        } else if score >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        }
    }
}

/// 直近2点の比較による変化の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "↑",
            TrendDirection::Decreasing => "↓",
            TrendDirection::Stable => "→",
        }
    }
}

/// 時系列の1点
///
/// `date` はレポート日付、無ければファイル名が入る。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: MetricValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ParameterStatus>,
}

/// 検査項目1件分のトレンド
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub latest_value: MetricValue,

    #[serde(default)]
    pub unit: String,

    #[serde(default)]
    pub direction: TrendDirection,

    #[serde(default)]
    pub series: Vec<TrendPoint>,
}

/// トレンド比較結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trends: BTreeMap<String, TrendEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_count: Option<usize>,
}

impl TrendResult {
    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}

/// 確定した解析結果（単一かトレンドのどちらか一方）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionResult {
    SingleReport(SingleReportResult),
    Trend(TrendResult),
}
