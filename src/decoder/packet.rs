//! 包解码循环
//!
//! 同一负载反复交给原语解码，直到原语报告包内没有剩余帧。
//! LBRR 冗余包的子帧数可能多于 `frames_per_packet`。

use super::primitive::SilkPrimitive;
use super::session::DecoderSession;
use super::{MAX_SUBFRAME_CALLS, MAX_SUBFRAME_SAMPLES, PACKET_BUFFER_SAMPLES};
use crate::error::{SilkError, SilkResult};
use serde::Serialize;
use tracing::{trace, warn};

/// 单个包的有界输出缓冲区
pub struct PacketBuffer {
    samples: Vec<i16>,
    len: usize,
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self::with_capacity(PACKET_BUFFER_SAMPLES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: vec![0; capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        self.samples.len() - self.len
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// 已累积的样本
    pub fn samples(&self) -> &[i16] {
        &self.samples[..self.len]
    }

    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples[..self.len]
    }

    fn spare_mut(&mut self) -> &mut [i16] {
        &mut self.samples[self.len..]
    }
}

/// 单个包的解码结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PacketOutcome {
    /// 包内累计样本数（tot_len）
    pub samples: usize,
    /// 子帧解码调用次数
    pub sub_frames: usize,
    /// 返回非0状态的子帧数
    pub warnings: usize,
}

/// 解码一个包，样本累积到 `out`
///
/// 子帧返回非0状态时记录告警并继续，保留该子帧产生的样本（可能为0个）。
/// 调用前剩余容量不足一个最大子帧时返回 [`SilkError::PacketOverflow`]，
/// 调用次数超过 [`MAX_SUBFRAME_CALLS`] 时返回 [`SilkError::DecoderLoopOverrun`]。
pub fn decode_packet<P: SilkPrimitive>(
    session: &mut DecoderSession<P>,
    payload: &[u8],
    out: &mut PacketBuffer,
) -> SilkResult<PacketOutcome> {
    out.clear();
    let mut outcome = PacketOutcome::default();

    loop {
        if outcome.sub_frames >= MAX_SUBFRAME_CALLS {
            return Err(SilkError::DecoderLoopOverrun {
                limit: MAX_SUBFRAME_CALLS,
            });
        }

        let remaining = out.remaining();
        if remaining < MAX_SUBFRAME_SAMPLES {
            return Err(SilkError::PacketOverflow {
                requested: out.len() + MAX_SUBFRAME_SAMPLES,
                capacity: out.capacity(),
            });
        }

        let sub_frame = session.decode_sub_frame(payload, out.spare_mut());
        outcome.sub_frames += 1;

        if sub_frame.status != 0 {
            outcome.warnings += 1;
            warn!(
                status = sub_frame.status,
                sub_frame = outcome.sub_frames,
                payload_bytes = payload.len(),
                "SKP_Silk_SDK_Decode returned non-zero status"
            );
        }

        if sub_frame.len > remaining {
            return Err(SilkError::PacketOverflow {
                requested: out.len() + sub_frame.len,
                capacity: out.capacity(),
            });
        }
        out.len += sub_frame.len;

        if !session.control().more_internal_frames {
            break;
        }
    }

    outcome.samples = out.len();
    trace!(
        samples = outcome.samples,
        sub_frames = outcome.sub_frames,
        "packet decoded"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::primitive::{DecodeControl, SubFrame};

    /// 按脚本逐次返回 (status, len, more) 的原语；脚本耗尽后重复最后一项
    struct Scripted(Vec<(i32, usize, bool)>);

    impl SilkPrimitive for Scripted {
        type State = usize;

        fn instance_size(&self) -> Result<usize, i32> {
            Ok(0)
        }

        fn allocate(&self, _size: usize) -> usize {
            0
        }

        fn initialize(&self, state: &mut usize) -> Result<(), i32> {
            *state = 0;
            Ok(())
        }

        fn decode(
            &self,
            calls: &mut usize,
            control: &mut DecodeControl,
            _payload: &[u8],
            out: &mut [i16],
        ) -> SubFrame {
            let (status, len, more) = self.0[(*calls).min(self.0.len() - 1)];
            *calls += 1;
            for (i, sample) in out.iter_mut().take(len).enumerate() {
                *sample = (*calls * 1000 + i) as i16;
            }
            control.more_internal_frames = more;
            SubFrame { status, len }
        }
    }

    fn session(script: Vec<(i32, usize, bool)>) -> DecoderSession<Scripted> {
        DecoderSession::open(Scripted(script), 16000).unwrap()
    }

    #[test]
    fn single_call_packet() {
        let mut s = session(vec![(0, 160, false)]);
        let mut buf = PacketBuffer::new();
        let outcome = decode_packet(&mut s, &[1, 2, 3, 4], &mut buf).unwrap();
        assert_eq!(outcome, PacketOutcome { samples: 160, sub_frames: 1, warnings: 0 });
        assert_eq!(buf.samples()[0], 1000);
        assert_eq!(buf.samples()[159], 1159);
    }

    #[test]
    fn multi_frame_packet_appends_in_order() {
        let mut s = session(vec![(0, 320, true), (0, 320, true), (0, 320, false)]);
        let mut buf = PacketBuffer::new();
        let outcome = decode_packet(&mut s, &[0xaa], &mut buf).unwrap();
        assert_eq!(outcome.sub_frames, 3);
        assert_eq!(outcome.samples, 960);
        assert_eq!(buf.samples()[0], 1000);
        assert_eq!(buf.samples()[320], 2000);
        assert_eq!(buf.samples()[640], 3000);
        assert_eq!(buf.samples()[959], 3319);
    }

    #[test]
    fn non_zero_status_is_not_fatal() {
        let mut s = session(vec![(-11, 0, true), (0, 160, false)]);
        let mut buf = PacketBuffer::new();
        let outcome = decode_packet(&mut s, &[], &mut buf).unwrap();
        assert_eq!(outcome.warnings, 1);
        assert_eq!(outcome.samples, 160);
    }

    #[test]
    fn endless_empty_frames_overrun() {
        let mut s = session(vec![(0, 0, true)]);
        let mut buf = PacketBuffer::new();
        assert!(matches!(
            decode_packet(&mut s, &[], &mut buf),
            Err(SilkError::DecoderLoopOverrun { limit: MAX_SUBFRAME_CALLS })
        ));
    }

    #[test]
    fn output_capacity_is_enforced() {
        let mut s = session(vec![(0, MAX_SUBFRAME_SAMPLES, true)]);
        let mut buf = PacketBuffer::new();
        assert!(matches!(
            decode_packet(&mut s, &[], &mut buf),
            Err(SilkError::PacketOverflow { capacity: PACKET_BUFFER_SAMPLES, .. })
        ));
    }

    #[test]
    fn buffer_is_reset_between_packets() {
        let mut s = session(vec![(0, 100, false)]);
        let mut buf = PacketBuffer::new();
        decode_packet(&mut s, &[], &mut buf).unwrap();
        decode_packet(&mut s, &[], &mut buf).unwrap();
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.samples()[0], 2000);
    }
}
