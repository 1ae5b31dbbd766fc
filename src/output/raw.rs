use super::PcmSink;
use crate::container::endian::samples_to_stream_bytes;
use crate::error::{SilkError, SilkResult};
use std::io::Write;

/// 原始 PCM 写入器
pub struct RawPcmWriter<W: Write> {
    writer: W,
    scratch: Vec<u8>,
    samples: u64,
}

impl<W: Write> RawPcmWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            scratch: Vec::new(),
            samples: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PcmSink for RawPcmWriter<W> {
    fn write_packet(&mut self, samples: &mut [i16]) -> SilkResult<()> {
        if samples.is_empty() {
            return Ok(());
        }
        self.scratch.clear();
        samples_to_stream_bytes(samples, &mut self.scratch);
        self.writer
            .write_all(&self.scratch)
            .map_err(SilkError::OutputWrite)?;
        self.samples += samples.len() as u64;
        Ok(())
    }

    fn samples_written(&self) -> u64 {
        self.samples
    }

    fn finish(&mut self) -> SilkResult<()> {
        self.writer.flush().map_err(SilkError::OutputWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_little_endian_samples() {
        let mut sink = RawPcmWriter::new(Vec::new());
        sink.write_packet(&mut [1, -1]).unwrap();
        sink.write_packet(&mut []).unwrap();
        sink.write_packet(&mut [0x1234]).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.samples_written(), 3);
        assert_eq!(sink.into_inner(), vec![0x01, 0x00, 0xff, 0xff, 0x34, 0x12]);
    }

    #[test]
    fn write_failure_is_output_error() {
        let mut sink = RawPcmWriter::new(FailingWriter);
        assert!(matches!(
            sink.write_packet(&mut [7]),
            Err(SilkError::OutputWrite(_))
        ));
    }
}
