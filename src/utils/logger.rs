//! # 日志初始化
//!
//! `tracing` + `tracing-subscriber`，输出到 stderr。`RUST_LOG` 优先，
//! 否则默认 `warn`，`--verbose` 时为 `debug`。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    // 重复初始化（例如测试中）时忽略
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
