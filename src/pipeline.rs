//! 解码流程控制
//!
//! 文件头验证 → 会话建立 → {读帧 → 包解码 → 写出} 循环 → 收尾。
//! 解码器实例、输入与输出句柄都在作用域结束时释放，覆盖所有退出路径。

use crate::container::{ContainerHeader, FrameReader, read_header};
use crate::decoder::{
    DecoderSession, PacketBuffer, PacketStats, SUPPORTED_SAMPLE_RATES, SessionState, SilkPrimitive,
    decode_packet,
};
use crate::error::{SilkError, SilkResult};
use crate::output::{OutputFormat, PcmSink, RawPcmWriter, WavPcmWriter};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// 默认输出采样率（Hz）
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// 协作式取消标志，每帧检查一次
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 单次解码的配置
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// 输出采样率（Hz）
    pub sample_rate: u32,
    /// 负帧长度视为 [`SilkError::CorruptStream`]
    pub strict: bool,
    pub cancel: Option<CancelToken>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            strict: false,
            cancel: None,
        }
    }
}

impl DecodeOptions {
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// 采样率必须是 SILK API 支持的值之一
    pub fn validate(&self) -> SilkResult<()> {
        if SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            Ok(())
        } else {
            Err(SilkError::InvalidInput(format!(
                "不支持的采样率 / Unsupported sample rate {} Hz (supported: {:?})",
                self.sample_rate, SUPPORTED_SAMPLE_RATES
            )))
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// 解码摘要
#[derive(Debug, Clone, Serialize)]
pub struct DecodeSummary {
    pub header: ContainerHeader,
    pub sample_rate: u32,
    pub frames: u64,
    pub samples: u64,
    pub stats: PacketStats,
    pub duration_secs: f64,
}

impl DecodeSummary {
    /// 输出音频时长（秒）
    pub fn audio_secs(&self) -> f64 {
        self.samples as f64 / self.sample_rate as f64
    }
}

/// 解码一个已打开的比特流到 `sink`
///
/// 文件头验证失败时不会分配解码器，也不会向 `sink` 写入任何字节。
/// 成功结束时已调用 `sink.finish()`。
pub fn decode_stream<P, R, S>(
    primitive: P,
    input: R,
    sink: &mut S,
    options: &DecodeOptions,
) -> SilkResult<DecodeSummary>
where
    P: SilkPrimitive,
    R: Read + Seek,
    S: PcmSink + ?Sized,
{
    let mut state = SessionState::Unopened;
    decode_tracked(primitive, input, sink, options, &mut state)
}

/// 任一退出路径都以 `Closed` 结束，此时解码器实例已释放
fn decode_tracked<P, R, S>(
    primitive: P,
    input: R,
    sink: &mut S,
    options: &DecodeOptions,
    state: &mut SessionState,
) -> SilkResult<DecodeSummary>
where
    P: SilkPrimitive,
    R: Read + Seek,
    S: PcmSink + ?Sized,
{
    let result = run_session(primitive, input, sink, options, state);
    if let Err(e) = &result {
        debug!(state = %state, error = %e, "session aborted");
    }
    state.transition(SessionState::Closed);
    result
}

fn run_session<P, R, S>(
    primitive: P,
    mut input: R,
    sink: &mut S,
    options: &DecodeOptions,
    state: &mut SessionState,
) -> SilkResult<DecodeSummary>
where
    P: SilkPrimitive,
    R: Read + Seek,
    S: PcmSink + ?Sized,
{
    let started = Instant::now();

    let header = read_header(&mut input)?;
    state.transition(SessionState::HeaderValidated);

    let mut session = DecoderSession::open(primitive, options.sample_rate)?;
    state.transition(SessionState::Ready);

    let mut frames = FrameReader::new(input).strict(options.strict);
    let mut packet = PacketBuffer::new();
    let mut stats = PacketStats::new();
    state.transition(SessionState::Decoding);

    loop {
        if options.is_cancelled() {
            return Err(SilkError::Cancelled);
        }
        let Some(payload) = frames.next_frame()? else {
            break;
        };
        let outcome = decode_packet(&mut session, payload, &mut packet)?;
        sink.write_packet(packet.samples_mut())?;
        stats.add_packet(&outcome);
        state.transition(SessionState::Decoding);
    }

    sink.finish()?;
    drop(session);

    stats.finalize();
    let summary = DecodeSummary {
        header,
        sample_rate: options.sample_rate,
        frames: frames.frames_read(),
        samples: sink.samples_written(),
        stats,
        duration_secs: started.elapsed().as_secs_f64(),
    };
    info!(
        frames = summary.frames,
        samples = summary.samples,
        warnings = summary.stats.total_warnings,
        "decode finished"
    );
    Ok(summary)
}

/// 输出与输入指向同一文件时拒绝解码，否则创建输出会截断输入
///
/// 输出已存在时比较规范化路径，覆盖相对路径、`..` 和符号链接的写法。
fn ensure_distinct_paths(input_path: &Path, output_path: &Path) -> SilkResult<()> {
    let same = input_path == output_path
        || match (input_path.canonicalize(), output_path.canonicalize()) {
            (Ok(input), Ok(output)) => input == output,
            _ => false,
        };
    if same {
        return Err(SilkError::InvalidInput(format!(
            "输出路径与输入相同 / Output path is the input file: {}",
            output_path.display()
        )));
    }
    Ok(())
}

/// 解码文件到文件
///
/// 先打开输入再创建输出，任一失败返回 [`SilkError::IoOpen`]；
/// 输出与输入是同一文件时返回 [`SilkError::InvalidInput`]，输入保持原样。
/// 解码中途失败时输出文件可能不完整，调用方应视其为无效。
pub fn decode_file<P: SilkPrimitive>(
    primitive: P,
    input_path: &Path,
    output_path: &Path,
    format: OutputFormat,
    options: &DecodeOptions,
) -> SilkResult<DecodeSummary> {
    options.validate()?;

    let input = File::open(input_path).map_err(|source| SilkError::IoOpen {
        path: input_path.to_path_buf(),
        source,
    })?;
    ensure_distinct_paths(input_path, output_path)?;
    let output = File::create(output_path).map_err(|source| SilkError::IoOpen {
        path: output_path.to_path_buf(),
        source,
    })?;
    debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        ?format,
        "files opened"
    );

    let input = BufReader::new(input);
    let output = BufWriter::new(output);
    match format {
        OutputFormat::RawPcm => {
            let mut sink = RawPcmWriter::new(output);
            decode_stream(primitive, input, &mut sink, options)
        }
        OutputFormat::Wav => {
            let mut sink = WavPcmWriter::new(output, options.sample_rate);
            decode_stream(primitive, input, &mut sink, options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{DecodeControl, SubFrame};
    use crate::output::RawPcmWriter;
    use std::io::Cursor;

    /// 每个包输出80个静音样本，`init_code` 非0时初始化失败
    struct Silence {
        init_code: i32,
    }

    impl SilkPrimitive for Silence {
        type State = ();

        fn instance_size(&self) -> Result<usize, i32> {
            Ok(64)
        }

        fn allocate(&self, _size: usize) {}

        fn initialize(&self, _state: &mut ()) -> Result<(), i32> {
            if self.init_code == 0 { Ok(()) } else { Err(self.init_code) }
        }

        fn decode(
            &self,
            _state: &mut (),
            control: &mut DecodeControl,
            _payload: &[u8],
            out: &mut [i16],
        ) -> SubFrame {
            control.more_internal_frames = false;
            out[..80].fill(0);
            SubFrame { status: 0, len: 80 }
        }
    }

    fn run_tracked(init_code: i32, bytes: &[u8]) -> (SilkResult<DecodeSummary>, SessionState) {
        let mut state = SessionState::Unopened;
        let mut sink = RawPcmWriter::new(Vec::new());
        let result = decode_tracked(
            Silence { init_code },
            Cursor::new(bytes.to_vec()),
            &mut sink,
            &DecodeOptions::default(),
            &mut state,
        );
        (result, state)
    }

    #[test]
    fn session_closes_after_success() {
        let (result, state) = run_tracked(0, b"#!SILK_V3\x01\x00\x07");
        assert_eq!(result.unwrap().samples, 80);
        assert_eq!(state, SessionState::Closed);
    }

    #[test]
    fn session_closes_after_header_failure() {
        let (result, state) = run_tracked(0, b"#!SILK_V2\x01\x00\x07");
        assert!(matches!(result, Err(SilkError::InvalidHeader { .. })));
        assert_eq!(state, SessionState::Closed);
    }

    #[test]
    fn session_closes_after_init_failure() {
        let (result, state) = run_tracked(-3, b"!SILK_V3\x01\x00\x07");
        assert!(matches!(result, Err(SilkError::Sdk { code: -3, .. })));
        assert_eq!(state, SessionState::Closed);
    }

    #[test]
    fn session_closes_after_oversized_frame() {
        let mut bytes = b"!SILK_V3".to_vec();
        bytes.extend_from_slice(&16_000i16.to_le_bytes());
        let (result, state) = run_tracked(0, &bytes);
        assert!(matches!(result, Err(SilkError::FrameTooLarge { .. })));
        assert_eq!(state, SessionState::Closed);
    }

    #[test]
    fn same_input_and_output_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("voice.pcm");
        std::fs::write(&input, b"#!SILK_V3").unwrap();

        assert!(matches!(
            ensure_distinct_paths(&input, &input),
            Err(SilkError::InvalidInput(_))
        ));
        // 不同写法指向同一文件
        let dotted = dir.path().join(".").join("voice.pcm");
        assert!(matches!(
            ensure_distinct_paths(&input, &dotted),
            Err(SilkError::InvalidInput(_))
        ));
        assert!(ensure_distinct_paths(&input, &dir.path().join("voice.wav")).is_ok());
    }

    #[test]
    fn default_rate_is_supported() {
        assert!(DecodeOptions::default().validate().is_ok());
    }

    #[test]
    fn unsupported_rate_is_invalid_input() {
        let options = DecodeOptions::with_sample_rate(22_050);
        assert!(matches!(options.validate(), Err(SilkError::InvalidInput(_))));
    }

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let options = DecodeOptions {
            cancel: Some(token.clone()),
            ..DecodeOptions::default()
        };
        assert!(!options.is_cancelled());
        token.cancel();
        assert!(options.is_cancelled());
    }
}
