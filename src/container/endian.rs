//! 字节序转换
//!
//! 流内所有16位字段（帧长度、PCM样本）均为小端序。
//! 小端主机上转换为空操作，大端主机上逐个交换字节。

/// 当前主机是否为小端序
const HOST_IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// 在流字节序与主机字节序之间原地转换（转换是对称的）
#[inline]
pub fn to_stream_order(samples: &mut [i16]) {
    if HOST_IS_LITTLE_ENDIAN {
        return;
    }
    for sample in samples.iter_mut() {
        *sample = sample.swap_bytes();
    }
}

/// 解析2字节小端帧长度字段
#[inline]
pub fn read_length_field(bytes: [u8; 2]) -> i16 {
    i16::from_le_bytes(bytes)
}

/// 将样本追加为流字节序的原始字节
///
/// 样本先经 [`to_stream_order`] 规整，再按内存布局输出，
/// 因此结果在任意主机上都与 `i16::to_le_bytes` 逐字节一致。
pub fn samples_to_stream_bytes(samples: &mut [i16], out: &mut Vec<u8>) {
    to_stream_order(samples);
    out.reserve(samples.len() * 2);
    for &sample in samples.iter() {
        out.extend_from_slice(&sample.to_ne_bytes());
    }
    // 还原为主机序，调用方的缓冲区保持可用
    to_stream_order(samples);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_field_is_little_endian() {
        assert_eq!(read_length_field([0x04, 0x00]), 4);
        assert_eq!(read_length_field([0x00, 0x01]), 256);
        assert_eq!(read_length_field([0xff, 0xff]), -1);
    }

    #[test]
    fn stream_bytes_match_le_layout() {
        let mut samples = vec![0x0102i16, -2, i16::MAX];
        let mut out = Vec::new();
        samples_to_stream_bytes(&mut samples, &mut out);
        assert_eq!(out, vec![0x02, 0x01, 0xfe, 0xff, 0xff, 0x7f]);
        assert_eq!(samples, vec![0x0102, -2, i16::MAX]);
    }

    #[test]
    fn conversion_is_involution() {
        let mut samples = vec![1i16, 256, -300];
        to_stream_order(&mut samples);
        to_stream_order(&mut samples);
        assert_eq!(samples, vec![1, 256, -300]);
    }
}
