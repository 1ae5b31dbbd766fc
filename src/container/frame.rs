//! 帧读取模块
//!
//! 每次读取一个长度前缀帧到有界负载缓冲区。

use super::MAX_PAYLOAD_BYTES;
use super::endian::read_length_field;
use super::header::read_up_to;
use crate::error::{SilkError, SilkResult};
use std::io::Read;
use tracing::debug;

/// 长度前缀帧读取器
///
/// 负载缓冲区只分配一次，返回的切片在下一次调用前有效。
pub struct FrameReader<R> {
    reader: R,
    payload: Vec<u8>,
    strict: bool,
    frames_read: u64,
}

impl<R: Read> FrameReader<R> {
    /// 创建读取器，缓冲区容量为 [`MAX_PAYLOAD_BYTES`]
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, MAX_PAYLOAD_BYTES)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            payload: vec![0u8; capacity],
            strict: false,
            frames_read: 0,
        }
    }

    /// 严格模式：负长度字段报告为 [`SilkError::CorruptStream`] 而非静默结束
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn capacity(&self) -> usize {
        self.payload.len()
    }

    /// 已完整读取的帧数
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// 读取下一帧
    ///
    /// - `Ok(Some(payload))` - 完整读取一帧（长度可以为0）
    /// - `Ok(None)` - 流结束：EOF、长度字段不完整、负长度（非严格模式）或尾帧被截断
    /// - `Err(_)` - 长度超出容量、I/O错误，或严格模式下的负长度
    pub fn next_frame(&mut self) -> SilkResult<Option<&[u8]>> {
        let mut length_bytes = [0u8; 2];
        if read_up_to(&mut self.reader, &mut length_bytes)? < length_bytes.len() {
            return Ok(None);
        }

        let n_bytes = read_length_field(length_bytes);
        if n_bytes < 0 {
            if self.strict {
                return Err(SilkError::CorruptStream { length: n_bytes });
            }
            debug!(length = n_bytes, "negative frame length, stopping");
            return Ok(None);
        }

        let n_bytes = n_bytes as usize;
        if n_bytes > self.payload.len() {
            return Err(SilkError::FrameTooLarge {
                declared: n_bytes,
                capacity: self.payload.len(),
            });
        }

        let read = read_up_to(&mut self.reader, &mut self.payload[..n_bytes])?;
        if read < n_bytes {
            debug!(declared = n_bytes, available = read, "truncated trailing frame discarded");
            return Ok(None);
        }

        self.frames_read += 1;
        Ok(Some(&self.payload[..n_bytes]))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
