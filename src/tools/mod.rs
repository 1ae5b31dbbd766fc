//! 工具模块集合
//!
//! 包含CLI、批量处理、报告和日志等工具模块，支持main.rs的流程控制。

pub mod batch;
pub mod cli;
pub mod constants;
pub mod logging;
pub mod processor;
pub mod report;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, parse_args_from, show_startup_info};
pub use logging::init_logging;
pub use processor::run_decode;
