//! C ABI 导出
//!
//! 供宿主程序以插件形式调用：`decode_silk_file(input, output, sample_rate)`，
//! 成功返回 0，任何失败返回 -1，错误细节通过 `tracing` 输出。

use crate::decoder::SilkPrimitive;
use crate::output::OutputFormat;
use crate::pipeline::{DecodeOptions, decode_file};
use std::ffi::{CStr, c_int};
use std::path::Path;
use tracing::error;

/// 成功
pub const DECODE_OK: c_int = 0;
/// 失败
pub const DECODE_FAILED: c_int = -1;

/// 以C风格状态码解码文件到原始PCM
///
/// 路径必须是UTF-8；采样率为负或不受支持时返回 [`DECODE_FAILED`]，不触碰任何文件。
pub fn decode_file_status<P: SilkPrimitive>(
    primitive: P,
    input_path: &CStr,
    output_path: &CStr,
    sample_rate: c_int,
) -> c_int {
    let (Ok(input), Ok(output)) = (input_path.to_str(), output_path.to_str()) else {
        error!("路径不是有效的UTF-8 / path is not valid UTF-8");
        return DECODE_FAILED;
    };
    let Ok(sample_rate) = u32::try_from(sample_rate) else {
        error!(sample_rate, "采样率无效 / invalid sample rate");
        return DECODE_FAILED;
    };

    let options = DecodeOptions::with_sample_rate(sample_rate);
    match decode_file(
        primitive,
        Path::new(input),
        Path::new(output),
        OutputFormat::RawPcm,
        &options,
    ) {
        Ok(_) => DECODE_OK,
        Err(e) => {
            error!(input, output, error = %e, "decode_silk_file failed");
            DECODE_FAILED
        }
    }
}

/// 解码 SILK v3 文件为 16-bit 小端单声道 PCM
///
/// 返回 0 表示成功，-1 表示失败。
///
/// # Safety
///
/// 调用者必须确保：
/// - `input_path` 与 `output_path` 为空指针，或指向以NUL结尾的有效C字符串
/// - 两个字符串在调用期间保持有效
#[cfg(feature = "silk-sdk")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn decode_silk_file(
    input_path: *const std::ffi::c_char,
    output_path: *const std::ffi::c_char,
    sample_rate: c_int,
) -> c_int {
    if input_path.is_null() || output_path.is_null() {
        error!("decode_silk_file: 路径为空指针 / null path pointer");
        return DECODE_FAILED;
    }
    // SAFETY: 非空且以NUL结尾由调用者保证
    let (input, output) = unsafe { (CStr::from_ptr(input_path), CStr::from_ptr(output_path)) };
    decode_file_status(crate::decoder::SdkPrimitive, input, output, sample_rate)
}
