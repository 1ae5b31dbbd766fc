//! 解码会话
//!
//! 会话独占一个解码器实例，跨整个流复用，在 `Drop` 时释放。

use super::primitive::{DecodeControl, SilkPrimitive, SubFrame};
use crate::error::{SilkError, SilkResult};
use std::fmt;
use tracing::{debug, trace};

/// 会话控制器状态
///
/// `Unopened → HeaderValidated → Ready → Decoding → Closed`，
/// 任一阶段失败直接进入 `Closed`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    HeaderValidated,
    Ready,
    Decoding,
    Closed,
}

impl SessionState {
    /// 是否允许从当前状态迁移到 `next`
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Unopened, HeaderValidated)
                | (HeaderValidated, Ready)
                | (Ready, Decoding)
                | (Decoding, Decoding)
                | (Unopened | HeaderValidated | Ready | Decoding, Closed)
        )
    }

    /// 执行迁移，非法迁移只在调试构建中断言
    pub fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.can_transition_to(next),
            "illegal session transition {self:?} -> {next:?}"
        );
        trace!(from = ?*self, to = ?next, "session state");
        *self = next;
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unopened => "unopened",
            Self::HeaderValidated => "header-validated",
            Self::Ready => "ready",
            Self::Decoding => "decoding",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// 持有一个已初始化解码器实例的会话
///
/// 不实现 `Clone`；并发解码多个文件时每个文件各自创建会话。
pub struct DecoderSession<P: SilkPrimitive> {
    primitive: P,
    state: P::State,
    control: DecodeControl,
    instance_bytes: usize,
}

impl<P: SilkPrimitive> DecoderSession<P> {
    /// 查询实例尺寸、分配并初始化
    ///
    /// 初始化失败时已分配的实例随错误返回一并释放。
    pub fn open(primitive: P, sample_rate: u32) -> SilkResult<Self> {
        let instance_bytes = primitive
            .instance_size()
            .map_err(|code| SilkError::Sdk {
                stage: "Get_Decoder_Size",
                code,
            })?;

        let mut state = primitive.allocate(instance_bytes);
        primitive
            .initialize(&mut state)
            .map_err(|code| SilkError::Sdk {
                stage: "InitDecoder",
                code,
            })?;

        debug!(instance_bytes, sample_rate, "decoder session ready");
        Ok(Self {
            primitive,
            state,
            control: DecodeControl::new(sample_rate),
            instance_bytes,
        })
    }

    /// 对同一负载执行一次子帧解码
    pub fn decode_sub_frame(&mut self, payload: &[u8], out: &mut [i16]) -> SubFrame {
        self.primitive
            .decode(&mut self.state, &mut self.control, payload, out)
    }

    /// 上一次解码后原语报告的控制参数
    pub fn control(&self) -> &DecodeControl {
        &self.control
    }

    pub fn sample_rate(&self) -> u32 {
        self.control.sample_rate
    }

    pub fn instance_bytes(&self) -> usize {
        self.instance_bytes
    }
}

impl<P: SilkPrimitive> Drop for DecoderSession<P> {
    fn drop(&mut self) {
        debug!(instance_bytes = self.instance_bytes, "decoder session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 记录实例释放次数的原语
    struct CountingPrimitive {
        init_code: i32,
        size: Result<usize, i32>,
        drops: Rc<Cell<usize>>,
    }

    struct CountedState {
        drops: Rc<Cell<usize>>,
    }

    impl Drop for CountedState {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    impl SilkPrimitive for CountingPrimitive {
        type State = CountedState;

        fn instance_size(&self) -> Result<usize, i32> {
            self.size
        }

        fn allocate(&self, _size: usize) -> CountedState {
            CountedState {
                drops: Rc::clone(&self.drops),
            }
        }

        fn initialize(&self, _state: &mut CountedState) -> Result<(), i32> {
            if self.init_code == 0 {
                Ok(())
            } else {
                Err(self.init_code)
            }
        }

        fn decode(
            &self,
            _state: &mut CountedState,
            control: &mut DecodeControl,
            _payload: &[u8],
            _out: &mut [i16],
        ) -> SubFrame {
            control.more_internal_frames = false;
            SubFrame::default()
        }
    }

    fn primitive(size: Result<usize, i32>, init_code: i32) -> (CountingPrimitive, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        (
            CountingPrimitive {
                init_code,
                size,
                drops: Rc::clone(&drops),
            },
            drops,
        )
    }

    #[test]
    fn session_releases_instance_exactly_once() {
        let (p, drops) = primitive(Ok(64), 0);
        let session = DecoderSession::open(p, 16000).unwrap();
        assert_eq!(session.instance_bytes(), 64);
        assert_eq!(session.control().frames_per_packet, 1);
        drop(session);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn init_failure_releases_allocation() {
        let (p, drops) = primitive(Ok(64), -3);
        let err = DecoderSession::open(p, 16000).err().unwrap();
        assert!(matches!(err, SilkError::Sdk { stage: "InitDecoder", code: -3 }));
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn size_failure_never_allocates() {
        let (p, drops) = primitive(Err(-1), 0);
        let err = DecoderSession::open(p, 16000).err().unwrap();
        assert!(matches!(err, SilkError::Sdk { stage: "Get_Decoder_Size", code: -1 }));
        assert_eq!(drops.get(), 0);
    }

    #[test]
    fn state_machine_transitions() {
        let mut state = SessionState::Unopened;
        assert!(!state.can_transition_to(SessionState::Decoding));
        state.transition(SessionState::HeaderValidated);
        state.transition(SessionState::Ready);
        state.transition(SessionState::Decoding);
        assert!(state.can_transition_to(SessionState::Decoding));
        state.transition(SessionState::Closed);
        assert!(!state.can_transition_to(SessionState::Decoding));
        assert_eq!(state.to_string(), "closed");
    }
}
