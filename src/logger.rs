// src/logger.rs

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATE_TARGET: &str = "skyux_route_compiler";

/// tracing のサブスクライバを初期化する。プログラムの開始時に 1 度だけ呼ぶ
///
/// 優先順位: `--verbose` (debug) → `--quiet` (error のみ) → `RUST_LOG` → info
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new(format!("{}=debug", CRATE_TARGET))
    } else if quiet {
        EnvFilter::new(format!("{}=error", CRATE_TARGET))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", CRATE_TARGET)))
    };

    // 標準出力は生成したコードのために空けておき、ログは標準エラーへ出す
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
