use super::PcmSink;
use crate::error::{SilkError, SilkResult};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{self, Seek, Write};

/// WAV 写入器
///
/// 文件头延迟到第一次写入或收尾时才生成，文件头验证失败时输出保持为空。
pub struct WavPcmWriter<W: Write + Seek> {
    state: WavState<W>,
    spec: WavSpec,
    samples: u64,
}

enum WavState<W: Write + Seek> {
    Pending(W),
    Active(WavWriter<W>),
    Finished,
}

fn wav_error(err: hound::Error) -> SilkError {
    match err {
        hound::Error::IoError(e) => SilkError::OutputWrite(e),
        other => SilkError::OutputWrite(io::Error::other(other)),
    }
}

impl<W: Write + Seek> WavPcmWriter<W> {
    pub fn new(writer: W, sample_rate: u32) -> Self {
        Self {
            state: WavState::Pending(writer),
            spec: WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            },
            samples: 0,
        }
    }

    fn active(&mut self) -> SilkResult<&mut WavWriter<W>> {
        if matches!(self.state, WavState::Pending(_))
            && let WavState::Pending(writer) =
                std::mem::replace(&mut self.state, WavState::Finished)
        {
            self.state = WavState::Active(WavWriter::new(writer, self.spec).map_err(wav_error)?);
        }
        match &mut self.state {
            WavState::Active(writer) => Ok(writer),
            _ => Err(SilkError::OutputWrite(io::Error::other(
                "WAV writer already finalized",
            ))),
        }
    }
}

impl<W: Write + Seek> PcmSink for WavPcmWriter<W> {
    fn write_packet(&mut self, samples: &mut [i16]) -> SilkResult<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let writer = self.active()?;
        for &sample in samples.iter() {
            writer.write_sample(sample).map_err(wav_error)?;
        }
        self.samples += samples.len() as u64;
        Ok(())
    }

    fn samples_written(&self) -> u64 {
        self.samples
    }

    fn finish(&mut self) -> SilkResult<()> {
        self.active()?;
        if let WavState::Active(writer) = std::mem::replace(&mut self.state, WavState::Finished) {
            writer.finalize().map_err(wav_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn writes_readable_mono_wav() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut sink = WavPcmWriter::new(file.reopen().unwrap(), 16000);
        sink.write_packet(&mut [0, 100, -100]).unwrap();
        sink.write_packet(&mut [i16::MIN]).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.samples_written(), 4);

        let mut reader = hound::WavReader::open(file.path()).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0, 100, -100, i16::MIN]);
    }

    #[test]
    fn no_bytes_before_first_write() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let _sink = WavPcmWriter::new(&mut cursor, 8000);
        }
        assert!(cursor.get_ref().is_empty());
    }
}
