//! 日志初始化
//!
//! 诊断信息一律写入 stderr，过滤规则可由 `SILK_DECODER_LOG` 覆盖。

use super::constants::defaults;
use tracing_subscriber::EnvFilter;

/// 安装全局 fmt 订阅器；重复调用时保持已有订阅器
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(defaults::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
