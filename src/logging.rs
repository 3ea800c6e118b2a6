//! tracing によるログ設定
//!
//! 出力先は stderr（stdout は `--json` 出力用に空けておく）。
//! レベルは `MEDITREND_LOG` で上書きできる。
//!
//! ```bash
//! MEDITREND_LOG=debug meditrend analyze report.pdf
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "MEDITREND_LOG";

/// 既定のフィルタ（`--verbose` で debug）
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "meditrend=debug,meditrend_common=debug,warn"
    } else {
        "meditrend=info,warn"
    }
}

pub fn init(verbose: bool) {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // 二重初期化（テスト等）は無視
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time(),
        )
        .try_init();
}
