//! 文件头检测模块
//!
//! 接受两种规范前缀，各自允许前置一个任意字节（部分导出工具会写入 0x02 前导字节）。

use crate::error::{SilkError, SilkResult};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// 带 `#` 的完整前缀
pub const AMR_STYLE_MAGIC: &[u8] = b"#!SILK_V3";

/// 标准前缀（`AMR_STYLE_MAGIC` 的真后缀）
pub const SILK_MAGIC: &[u8] = b"!SILK_V3";

/// 检测时读取的字节数
pub const HEADER_PROBE_LEN: usize = 10;

/// 匹配到的文件头变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderVariant {
    /// `#!SILK_V3` 位于偏移0
    AmrStyle,
    /// `!SILK_V3` 位于偏移0
    Plain,
    /// 一个前导字节 + `#!SILK_V3`
    PrefixedAmrStyle,
    /// 一个前导字节 + `!SILK_V3`
    PrefixedPlain,
}

impl HeaderVariant {
    fn magic(self) -> &'static [u8] {
        match self {
            Self::AmrStyle | Self::PrefixedAmrStyle => AMR_STYLE_MAGIC,
            Self::Plain | Self::PrefixedPlain => SILK_MAGIC,
        }
    }

    fn leading_bytes(self) -> usize {
        match self {
            Self::AmrStyle | Self::Plain => 0,
            Self::PrefixedAmrStyle | Self::PrefixedPlain => 1,
        }
    }
}

/// 验证通过的文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerHeader {
    pub variant: HeaderVariant,
    /// 第一帧开始的字节偏移
    pub payload_offset: u64,
}

/// 按固定顺序匹配四种文件头，先匹配者胜出
///
/// `prefix` 为流开头最多10个字节。不足最短前缀长度时返回
/// [`SilkError::TruncatedHeader`]，否则无匹配时返回 [`SilkError::InvalidHeader`]。
pub fn detect_header(prefix: &[u8]) -> SilkResult<ContainerHeader> {
    let prefix = &prefix[..prefix.len().min(HEADER_PROBE_LEN)];

    if prefix.len() < SILK_MAGIC.len() {
        return Err(SilkError::TruncatedHeader { read: prefix.len() });
    }

    let candidates = [
        HeaderVariant::AmrStyle,
        HeaderVariant::Plain,
        HeaderVariant::PrefixedAmrStyle,
        HeaderVariant::PrefixedPlain,
    ];

    candidates
        .into_iter()
        .find(|variant| {
            let skip = variant.leading_bytes();
            prefix.len() >= skip && prefix[skip..].starts_with(variant.magic())
        })
        .map(|variant| ContainerHeader {
            variant,
            payload_offset: (variant.leading_bytes() + variant.magic().len()) as u64,
        })
        .ok_or_else(|| SilkError::InvalidHeader {
            prefix: prefix.to_vec(),
        })
}

/// 从流开头读取并验证文件头，成功后将游标定位到 `payload_offset`
pub fn read_header<R: Read + Seek>(reader: &mut R) -> SilkResult<ContainerHeader> {
    reader.seek(SeekFrom::Start(0))?;

    let mut buf = [0u8; HEADER_PROBE_LEN];
    let read = read_up_to(reader, &mut buf)?;
    let header = detect_header(&buf[..read])?;

    reader.seek(SeekFrom::Start(header.payload_offset))?;
    debug!(
        variant = ?header.variant,
        offset = header.payload_offset,
        "SILK header detected"
    );
    Ok(header)
}

/// 尽量填满缓冲区，遇到EOF提前返回已读字节数
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
