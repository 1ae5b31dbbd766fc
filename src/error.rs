//! 统一错误处理框架
//!
//! 容器解析、解码会话和输出写入共用的错误类型定义。
//! 流结束（EndOfStream）不是错误，由 `Ok(None)` 表达；
//! 单个子帧解码失败（DecodeWarning）只记录日志，不进入此枚举。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// SILK 解码相关的统一错误类型
#[derive(Debug, Error)]
pub enum SilkError {
    /// 输入或输出路径无法打开
    #[error("无法打开文件 / Cannot open file {}: {source}", path.display())]
    IoOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 文件太短，不足以容纳最短的文件头
    #[error("文件太小，无法包含有效的文件头 / File too small for a SILK header ({read} bytes)")]
    TruncatedHeader { read: usize },

    /// 前10字节内找不到任何已知的文件头
    #[error("找不到有效的SILK V3文件头 / No valid SILK V3 header, file starts with: {}", printable_prefix(prefix))]
    InvalidHeader { prefix: Vec<u8> },

    /// 解码器尺寸查询或初始化失败
    #[error("SILK SDK {stage} 返回 / returned {code}")]
    Sdk { stage: &'static str, code: i32 },

    /// 帧声明长度超出负载缓冲区容量
    #[error("帧长度 {declared} 超出缓冲区容量 {capacity} / Frame length exceeds payload capacity")]
    FrameTooLarge { declared: usize, capacity: usize },

    /// 单个包的累计样本数将超出输出缓冲区容量
    #[error("包输出 {requested} 样本超出缓冲区容量 {capacity} / Packet output exceeds buffer capacity")]
    PacketOverflow { requested: usize, capacity: usize },

    /// 解码器在单个包内的子帧调用次数超出上限
    #[error("单包子帧解码次数超过 {limit} / Decoder loop exceeded {limit} sub-frame calls")]
    DecoderLoopOverrun { limit: usize },

    /// 严格模式下遇到负帧长度
    #[error("帧长度字段损坏 / Corrupt frame length field: {length}")]
    CorruptStream { length: i16 },

    /// 写入PCM输出失败
    #[error("输出写入失败 / Output write failed: {0}")]
    OutputWrite(#[source] io::Error),

    /// 读取输入流时的I/O错误
    #[error("文件I/O错误 / I/O error: {0}")]
    Io(#[from] io::Error),

    /// 解码被调用方取消
    #[error("解码已取消 / Decoding cancelled")]
    Cancelled,

    /// 参数验证失败
    #[error("输入验证失败 / Invalid input: {0}")]
    InvalidInput(String),

    /// 批量模式中有文件解码失败
    #[error("批量解码 {failed}/{total} 个文件失败 / {failed} of {total} files failed")]
    BatchFailed { failed: usize, total: usize },

    /// 未编译原生解码后端
    #[error("未启用SILK SDK解码后端 / SILK SDK backend not compiled in (enable feature `silk-sdk`)")]
    BackendUnavailable,
}

/// SILK 解码操作的标准Result类型
pub type SilkResult<T> = Result<T, SilkError>;

/// 文件头诊断输出：不可打印字节替换为 `.`
fn printable_prefix(prefix: &[u8]) -> String {
    prefix
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的错误统计和退出码映射

/// 错误类别枚举（用于批量处理统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 文件头缺失或损坏
    Format,
    /// 解码器初始化、循环超限或容量越界
    Decoding,
    /// 文件打开、读取或写入失败
    Io,
    /// 参数错误、取消或后端缺失
    Other,
}

impl ErrorCategory {
    /// 从SilkError提取错误类别
    pub fn from_error(e: &SilkError) -> Self {
        match e {
            SilkError::TruncatedHeader { .. }
            | SilkError::InvalidHeader { .. }
            | SilkError::CorruptStream { .. } => Self::Format,
            SilkError::Sdk { .. }
            | SilkError::FrameTooLarge { .. }
            | SilkError::PacketOverflow { .. }
            | SilkError::DecoderLoopOverrun { .. } => Self::Decoding,
            SilkError::IoOpen { .. } | SilkError::OutputWrite(_) | SilkError::Io(_) => Self::Io,
            SilkError::Cancelled
            | SilkError::InvalidInput(_)
            | SilkError::BatchFailed { .. }
            | SilkError::BackendUnavailable => Self::Other,
        }
    }

    /// 报告中使用的机器可读名称
    pub fn key(&self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Decoding => "decoding",
            Self::Io => "io",
            Self::Other => "other",
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Format => "格式错误",
            Self::Decoding => "解码错误",
            Self::Io => "I/O错误",
            Self::Other => "其他错误",
        }
    }
}
