//! SILK v3 Container Decoder
//!
//! 将 SILK v3 比特流容器（`#!SILK_V3` / `!SILK_V3` 文件头 + 长度前缀帧）
//! 解码为 16-bit 小端单声道 PCM。
//!
//! ## 核心特性
//! - 四种文件头变体检测（允许一个前导字节）
//! - 有界负载/输出缓冲区，越界时返回错误而非溢出
//! - 多子帧包解码循环，单个子帧失败不中断整个文件
//! - 解码原语通过 [`decoder::SilkPrimitive`] 接入，原生 SDK 绑定见 `silk-sdk` 特性
//! - 原始PCM或WAV输出，批量模式下每个文件独立会话并行解码
//! - C ABI 导出 `decode_silk_file`（`silk-sdk` 特性，成功 0 / 失败 -1）

pub mod container;
pub mod decoder;
pub mod error;
pub mod ffi;
pub mod output;
pub mod pipeline;
pub mod tools;

// 重新导出核心类型
pub use container::{ContainerHeader, FrameReader, HeaderVariant, detect_header, read_header};
pub use decoder::{DecodeControl, DecoderSession, PacketBuffer, SilkPrimitive, SubFrame, decode_packet};
pub use error::{ErrorCategory, SilkError, SilkResult};
pub use output::{OutputFormat, PcmSink, RawPcmWriter, WavPcmWriter};
pub use pipeline::{CancelToken, DecodeOptions, DecodeSummary, decode_file, decode_stream};
