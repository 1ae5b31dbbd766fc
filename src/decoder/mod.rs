//! 解码会话与包解码循环
//!
//! SILK 解码原语本身通过 [`SilkPrimitive`] 接入，本模块只负责
//! 实例生命周期、多子帧循环和缓冲区边界。

pub mod packet;
pub mod primitive;
pub mod session;
pub mod stats;

#[cfg(feature = "silk-sdk")]
pub mod sdk;

pub use packet::{PacketBuffer, PacketOutcome, decode_packet};
pub use primitive::{DecodeControl, SilkPrimitive, SubFrame};
pub use session::{DecoderSession, SessionState};
pub use stats::PacketStats;

#[cfg(feature = "silk-sdk")]
pub use sdk::SdkPrimitive;

/// 单个子帧的时长（毫秒）
pub const FRAME_LENGTH_MS: usize = 20;

/// API 支持的最高输出采样率（kHz）
pub const MAX_API_FS_KHZ: usize = 48;

/// 单次解码调用可能产生的最大样本数
pub const MAX_SUBFRAME_SAMPLES: usize = FRAME_LENGTH_MS * MAX_API_FS_KHZ;

/// 单个包的输出缓冲区容量（样本数）
pub const PACKET_BUFFER_SAMPLES: usize = (MAX_SUBFRAME_SAMPLES << 1) * crate::container::MAX_INPUT_FRAMES;

/// 单个包内子帧解码调用次数上限
pub const MAX_SUBFRAME_CALLS: usize =
    crate::container::MAX_INPUT_FRAMES * (crate::container::MAX_LBRR_DELAY + 1);

/// SILK API 接受的输出采样率
pub const SUPPORTED_SAMPLE_RATES: &[u32] = &[8000, 12000, 16000, 24000, 32000, 44100, 48000];
