//! 確定結果のテキスト表示
//!
//! 表示は `ViewState` の網羅的な match のみで分岐する。

use crate::state::ViewState;
use meditrend_common::{ScoreBand, SingleReportResult, SubmissionResult, TrendResult};
use std::fmt::Write;

pub const NO_TRENDS_MESSAGE: &str =
    "Not enough matching data points found across reports to generate trends.";

pub fn render_view(view: &ViewState) -> String {
    match view {
        ViewState::Idle { error: None } => "Ready: select a report to analyze.".to_string(),
        ViewState::Idle { error: Some(error) } => format!("⚠ {}", error),
        ViewState::Submitting { mode, file_count } => {
            format!("Analyzing {} report(s) ({} mode)...", file_count, mode)
        }
        ViewState::Committed { result } => render_result(result),
        ViewState::Failed { message } => format!("✖ {}", message),
    }
}

pub fn render_result(result: &SubmissionResult) -> String {
    match result {
        SubmissionResult::SingleReport(report) => render_single(report),
        SubmissionResult::Trend(trend) => render_trends(trend),
    }
}

fn band_marker(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Good => "●",
        ScoreBand::Fair => "◐",
        ScoreBand::Poor => "○",
    }
}

pub fn render_single(report: &SingleReportResult) -> String {
    let mut out = String::new();
    let band = report.score_band();

    let _ = writeln!(out, "📄 {}", report.filename);
    let _ = writeln!(
        out,
        "Health score: {} {}/100 ({})",
        band_marker(band),
        report.health_score,
        band.label()
    );
    let _ = writeln!(
        out,
        "Tests: {} total, {} normal, {} need attention",
        report.summary.total_tests, report.summary.normal, report.summary.abnormal
    );

    if !report.recommendations.trim().is_empty() {
        let _ = writeln!(out, "\nRecommendations:");
        for line in report.recommendations.lines().filter(|l| !l.trim().is_empty()) {
            let _ = writeln!(out, "  {}", line.trim_end());
        }
    }

    for (category, params) in report.parameters_by_category() {
        let _ = writeln!(out, "\n[{}]", category);
        for param in params {
            let flag = if param.status.needs_attention() { "!" } else { " " };
            let _ = write!(
                out,
                "{} {:<24} {} {} ({})",
                flag,
                param.name,
                param.value,
                param.unit,
                param.status.as_str()
            );
            if !param.reference_range.is_empty() {
                let _ = write!(out, "  ref: {}", param.reference_range);
            }
            let _ = writeln!(out);
            if !param.explanation.trim().is_empty() {
                let _ = writeln!(out, "    {}", param.explanation.trim());
            }
        }
    }

    out
}

pub fn render_trends(trend: &TrendResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "📈 Health trends");
    if let Some(count) = trend.report_count {
        let _ = writeln!(out, "Reports compared: {}", count);
    }

    if trend.is_empty() {
        let _ = writeln!(out, "{}", NO_TRENDS_MESSAGE);
        return out;
    }

    for (name, entry) in &trend.trends {
        let _ = writeln!(
            out,
            "\n{} {}  latest: {} {}  ({})",
            entry.direction.arrow(),
            name,
            entry.latest_value,
            entry.unit,
            entry.direction.as_str()
        );
        for point in &entry.series {
            let _ = writeln!(out, "    {:<28} {}", point.date, point.value);
        }
    }

    out
}
