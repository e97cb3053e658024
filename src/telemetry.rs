//! 日志与追踪系统
//! 供宿主程序初始化结构化日志

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 初始化日志与追踪系统
///
/// 已有全局 subscriber 时不做任何事并返回 false。
pub fn init_telemetry(config: &LoggingConfig) -> bool {
    // 从环境变量构建过滤器
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let log_layer = match config.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .boxed(),
        "pretty" => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .boxed(),
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            level = %config.level,
            format = %config.format,
            "Telemetry initialized"
        );
    }

    installed
}
