//! 常量和默认配置集中管理
//!
//! 协议相关的上限定义在 `container`/`decoder` 模块，这里只放工具层默认值。

/// 默认配置值
pub mod defaults {
    /// 默认多文件并行并发度
    ///
    /// 每个文件独占一个解码会话，4并发在多数机器上足够
    pub const PARALLEL_FILES_DEGREE: usize = 4;

    /// 日志过滤环境变量名
    pub const LOG_ENV: &str = "SILK_DECODER_LOG";
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    pub const MIN_PARALLEL_DEGREE: usize = 1;

    /// 最大并发度
    pub const MAX_PARALLEL_DEGREE: usize = 16;
}

/// 批量模式识别的扩展名（小写）
pub const SILK_EXTENSIONS: &[&str] = &["silk", "slk"];
