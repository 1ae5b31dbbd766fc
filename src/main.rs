//! SILK v3 Decoder - 主程序入口
//!
//! 纯流程控制器，负责解析参数、选择解码后端并映射退出码。

use silk_v3_decoder::{
    error::{ErrorCategory, SilkError},
    tools::{self, AppConfig},
};
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 文件头/参数错误
    pub const FORMAT_ERROR: i32 = 2;
    /// 解码失败
    pub const DECODING_ERROR: i32 = 3;
    /// 批量模式部分失败
    pub const BATCH_ERROR: i32 = 4;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &SilkError) -> &'static str {
    match error {
        SilkError::InvalidInput(_) => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check command-line arguments, use --help for usage"
        }
        SilkError::BackendUnavailable => {
            "使用 --features silk-sdk 重新构建并设置 SILK_SDK_LIB_DIR / Rebuild with --features silk-sdk and set SILK_SDK_LIB_DIR"
        }
        SilkError::BatchFailed { .. } => {
            "查看上方表格中失败的文件 / See the failed files in the table above"
        }
        _ => match ErrorCategory::from_error(error) {
            ErrorCategory::Io => {
                "检查文件路径是否正确，文件是否存在且可读写 / Check that paths exist and are readable/writable"
            }
            ErrorCategory::Format => {
                "确保输入文件为SILK v3格式（如微信/QQ语音） / Ensure the input is a SILK v3 file"
            }
            ErrorCategory::Decoding => {
                "文件可能损坏，输出文件不完整应丢弃 / File may be corrupted; discard the incomplete output"
            }
            ErrorCategory::Other => "请检查输入文件和参数设置 / Please check input file and parameters",
        },
    }
}

/// 错误处理和建议
fn handle_error(error: SilkError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");
    if let Some(source) = std::error::Error::source(&error) {
        eprintln!("      原因 / Cause: {source}");
    }
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match &error {
        SilkError::InvalidInput(_) => exit_codes::FORMAT_ERROR,
        SilkError::BatchFailed { .. } => exit_codes::BATCH_ERROR,
        _ => match ErrorCategory::from_error(&error) {
            ErrorCategory::Format => exit_codes::FORMAT_ERROR,
            ErrorCategory::Decoding => exit_codes::DECODING_ERROR,
            ErrorCategory::Io | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
        },
    };

    process::exit(exit_code);
}

#[cfg(feature = "silk-sdk")]
fn decode_with_backend(config: &AppConfig) -> Result<(), SilkError> {
    tools::run_decode(&silk_v3_decoder::decoder::SdkPrimitive, config)
}

#[cfg(not(feature = "silk-sdk"))]
fn decode_with_backend(_config: &AppConfig) -> Result<(), SilkError> {
    Err(SilkError::BackendUnavailable)
}

/// 应用程序主逻辑
fn run() -> Result<(), SilkError> {
    let config = tools::parse_args();
    tools::init_logging(config.verbose);
    tools::show_startup_info(&config);

    config.decode_options().validate()?;
    decode_with_backend(&config)
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
