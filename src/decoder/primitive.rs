//! 解码原语接口
//!
//! 将压缩负载转换为PCM的算法本身不在本crate内实现，
//! 这里只定义会话层依赖的最小契约。

/// 解码控制参数
///
/// `sample_rate` 与 `frames_per_packet` 由会话设置；
/// `more_internal_frames` 由原语在每次调用后更新。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeControl {
    pub sample_rate: u32,
    pub frames_per_packet: u32,
    pub more_internal_frames: bool,
}

impl DecodeControl {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            frames_per_packet: 1,
            more_internal_frames: false,
        }
    }
}

/// 单次解码调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubFrame {
    /// 原语返回的状态码，非0仅作告警
    pub status: i32,
    /// 写入输出切片开头的样本数
    pub len: usize,
}

/// SILK 解码原语
///
/// # 契约
///
/// - 同一负载可被连续调用多次，原语内部记录多帧包的消费进度
/// - 每次调用将样本写入 `out` 开头，并设置 `control.more_internal_frames`
/// - 状态不可重入：一个 `State` 只能被一个会话顺序使用
pub trait SilkPrimitive {
    /// 不透明的解码器实例状态
    type State;

    /// 查询解码器实例所需字节数，失败时返回SDK错误码
    fn instance_size(&self) -> Result<usize, i32>;

    /// 按指定字节数分配未初始化的实例
    fn allocate(&self, size: usize) -> Self::State;

    /// 初始化（或重置）实例
    fn initialize(&self, state: &mut Self::State) -> Result<(), i32>;

    /// 解码一个子帧
    fn decode(
        &self,
        state: &mut Self::State,
        control: &mut DecodeControl,
        payload: &[u8],
        out: &mut [i16],
    ) -> SubFrame;
}

impl<P: SilkPrimitive + ?Sized> SilkPrimitive for &P {
    type State = P::State;

    fn instance_size(&self) -> Result<usize, i32> {
        (**self).instance_size()
    }

    fn allocate(&self, size: usize) -> Self::State {
        (**self).allocate(size)
    }

    fn initialize(&self, state: &mut Self::State) -> Result<(), i32> {
        (**self).initialize(state)
    }

    fn decode(
        &self,
        state: &mut Self::State,
        control: &mut DecodeControl,
        payload: &[u8],
        out: &mut [i16],
    ) -> SubFrame {
        (**self).decode(state, control, payload, out)
    }
}
