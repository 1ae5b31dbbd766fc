//! 原生 SILK SDK 绑定
//!
//! 通过 FFI 调用 `SKP_SILK_SDK` 静态库，库目录由构建时环境变量
//! `SILK_SDK_LIB_DIR` 提供（见 build.rs）。

use super::primitive::{DecodeControl, SilkPrimitive, SubFrame};
use super::MAX_SUBFRAME_SAMPLES;
use libc::{c_int, c_void};

/// SDK 解码控制结构，字段布局与 `SKP_SILK_SDK_DecControlStruct` 一致
#[repr(C)]
#[derive(Debug, Default)]
struct SdkDecControl {
    api_sample_rate: i32,
    frame_size: i32,
    frames_per_packet: i32,
    more_internal_decoder_frames: i32,
    in_band_fec_offset: i32,
}

#[link(name = "SKP_SILK_SDK")]
unsafe extern "C" {
    fn SKP_Silk_SDK_Get_Decoder_Size(dec_size_bytes: *mut i32) -> c_int;

    fn SKP_Silk_SDK_InitDecoder(dec_state: *mut c_void) -> c_int;

    fn SKP_Silk_SDK_Decode(
        dec_state: *mut c_void,
        dec_control: *mut SdkDecControl,
        lost_flag: c_int,
        in_data: *const u8,
        n_bytes_in: c_int,
        samples_out: *mut i16,
        n_samples_out: *mut i16,
    ) -> c_int;
}

/// SDK 实例内存，按8字节对齐
pub struct SdkState {
    buf: Vec<u64>,
}

impl SdkState {
    fn as_mut_ptr(&mut self) -> *mut c_void {
        self.buf.as_mut_ptr().cast()
    }
}

/// 基于原生 SILK SDK 的解码原语
#[derive(Debug, Clone, Copy, Default)]
pub struct SdkPrimitive;

impl SilkPrimitive for SdkPrimitive {
    type State = SdkState;

    fn instance_size(&self) -> Result<usize, i32> {
        let mut size: i32 = 0;
        // SAFETY: SDK 只写入传入的 i32
        let ret = unsafe { SKP_Silk_SDK_Get_Decoder_Size(&mut size) };
        if ret != 0 {
            return Err(ret);
        }
        usize::try_from(size).map_err(|_| -1)
    }

    fn allocate(&self, size: usize) -> SdkState {
        SdkState {
            buf: vec![0u64; size.div_ceil(8)],
        }
    }

    fn initialize(&self, state: &mut SdkState) -> Result<(), i32> {
        // SAFETY: 缓冲区大小来自 Get_Decoder_Size
        let ret = unsafe { SKP_Silk_SDK_InitDecoder(state.as_mut_ptr()) };
        if ret == 0 { Ok(()) } else { Err(ret) }
    }

    fn decode(
        &self,
        state: &mut SdkState,
        control: &mut DecodeControl,
        payload: &[u8],
        out: &mut [i16],
    ) -> SubFrame {
        // SDK 不接收输出长度，调用前必须保证能容纳一个最大子帧
        if out.len() < MAX_SUBFRAME_SAMPLES {
            control.more_internal_frames = false;
            return SubFrame { status: -1, len: 0 };
        }
        let Ok(n_bytes) = c_int::try_from(payload.len()) else {
            control.more_internal_frames = false;
            return SubFrame { status: -1, len: 0 };
        };

        let mut sdk_control = SdkDecControl {
            api_sample_rate: control.sample_rate as i32,
            frames_per_packet: control.frames_per_packet as i32,
            ..SdkDecControl::default()
        };
        let mut len: i16 = 0;

        // SAFETY: 实例已初始化；负载与输出指针在调用期间有效，输出容量已在上方检查
        let status = unsafe {
            SKP_Silk_SDK_Decode(
                state.as_mut_ptr(),
                &mut sdk_control,
                0,
                payload.as_ptr(),
                n_bytes,
                out.as_mut_ptr(),
                &mut len,
            )
        };

        control.more_internal_frames = sdk_control.more_internal_decoder_frames != 0;
        SubFrame {
            status,
            len: usize::try_from(len).unwrap_or(0),
        }
    }
}
