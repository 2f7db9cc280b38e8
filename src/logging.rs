//! 日志初始化（tracing-subscriber）
//!
//! `RUST_LOG` 优先；未设置时默认 `info`，`--verbose` 时为 `debug`。
//! 日志输出到 stderr，进度提示由 main 输出到 stdout。

use crate::error::{CleanerError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| CleanerError::Config(format!("日志初始化失败: {}", e)))
}
