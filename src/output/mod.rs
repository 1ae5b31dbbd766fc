//! PCM 输出模块
//!
//! 样本一律以小端字节序写出，与主机字节序无关。

mod raw;
mod wav;

pub use raw::RawPcmWriter;
pub use wav::WavPcmWriter;

use crate::error::SilkResult;
use serde::Serialize;

/// 输出容器格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OutputFormat {
    /// 无文件头的 16-bit 小端单声道 PCM
    #[default]
    RawPcm,
    /// 16-bit 单声道 RIFF/WAV
    Wav,
}

impl OutputFormat {
    /// 默认输出扩展名
    pub fn extension(self) -> &'static str {
        match self {
            Self::RawPcm => "pcm",
            Self::Wav => "wav",
        }
    }
}

/// PCM 样本接收端
///
/// 写入失败对整个解码是致命的，调用方应立即传播错误。
pub trait PcmSink {
    /// 追加一个包的样本（主机字节序）
    ///
    /// 实现可以原地改写 `samples` 的字节序，但返回前必须恢复。
    fn write_packet(&mut self, samples: &mut [i16]) -> SilkResult<()>;

    /// 已写出的样本总数
    fn samples_written(&self) -> u64;

    /// 刷新缓冲并完成容器收尾
    fn finish(&mut self) -> SilkResult<()>;
}
