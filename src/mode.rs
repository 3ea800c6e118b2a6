//! 動作モード（単一レポート解析 / トレンド比較）
//!
//! 送信経路の違いは `Route` に集約し、送信処理本体は共通にする。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    Single,
    Trend,
}

/// 期待するレスポンスの形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// トップレベルに SingleReportResult
    SingleReport,
    /// `analysis.trends`
    TrendAnalysis,
}

/// モードごとの送信設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub endpoint: &'static str,
    /// multipart フィールド名
    pub field: &'static str,
    pub shape: ResponseShape,
}

const SINGLE_ROUTE: Route = Route {
    endpoint: "/api/upload",
    field: "file",
    shape: ResponseShape::SingleReport,
};

const TREND_ROUTE: Route = Route {
    endpoint: "/api/analyze-trends",
    field: "files",
    shape: ResponseShape::TrendAnalysis,
};

impl OperatingMode {
    pub fn route(&self) -> Route {
        match self {
            OperatingMode::Single => SINGLE_ROUTE,
            OperatingMode::Trend => TREND_ROUTE,
        }
    }

    /// 送信に必要な最小ファイル数
    pub fn min_files(&self) -> usize {
        match self {
            OperatingMode::Single => 1,
            OperatingMode::Trend => 2,
        }
    }

    /// 送信可能な最大ファイル数（None は上限なし）
    pub fn max_files(&self) -> Option<usize> {
        match self {
            OperatingMode::Single => Some(1),
            OperatingMode::Trend => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Single => "single",
            OperatingMode::Trend => "trend",
        }
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        let single = OperatingMode::Single.route();
        assert_eq!(single.endpoint, "/api/upload");
        assert_eq!(single.field, "file");
        assert_eq!(single.shape, ResponseShape::SingleReport);

        let trend = OperatingMode::Trend.route();
        assert_eq!(trend.endpoint, "/api/analyze-trends");
        assert_eq!(trend.field, "files");
        assert_eq!(trend.shape, ResponseShape::TrendAnalysis);
    }

    #[test]
    fn test_file_count_bounds() {
        assert_eq!(OperatingMode::Single.min_files(), 1);
        assert_eq!(OperatingMode::Single.max_files(), Some(1));
        assert_eq!(OperatingMode::Trend.min_files(), 2);
        assert_eq!(OperatingMode::Trend.max_files(), None);
    }
}
