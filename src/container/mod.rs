//! SILK v3 容器解析模块
//!
//! 比特流布局：`[文件头][帧]*`，每帧为 `[i16 小端长度][负载字节]`。

pub mod endian;
pub mod frame;
pub mod header;

pub use frame::FrameReader;
pub use header::{ContainerHeader, HeaderVariant, detect_header, read_header};

/// 单个基本帧的最大字节数
pub const MAX_BYTES_PER_FRAME: usize = 1024;

/// 单个包内的最大帧数
pub const MAX_INPUT_FRAMES: usize = 5;

/// LBRR 冗余帧的最大延迟
pub const MAX_LBRR_DELAY: usize = 2;

/// 负载缓冲区容量：含 LBRR 冗余时单帧可能携带的最大字节数
pub const MAX_PAYLOAD_BYTES: usize = MAX_BYTES_PER_FRAME * MAX_INPUT_FRAMES * (MAX_LBRR_DELAY + 1);
