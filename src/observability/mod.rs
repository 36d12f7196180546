//! 可观测性：tracing 日志初始化
//!
//! 日志写到 stderr，默认只输出 warn 及以上，避免干扰交互输出；`RUST_LOG` 可覆盖（如 `RUST_LOG=skill_router=debug`）。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
