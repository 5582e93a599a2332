use super::{MeasureError, VolumeMeter};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

const READ_CHUNK: usize = 64 * 1024;

/// Measures peak volume by decoding the first audio stream with an `ffmpeg` binary.
///
/// Audio is decoded to interleaved signed 16-bit little-endian PCM on stdout, so the peak is
/// on a 0..=32768 scale.
pub struct FfmpegMeter {
    binary: PathBuf,
}

impl FfmpegMeter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegMeter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_FFMPEG_PATH)
    }
}

impl VolumeMeter for FfmpegMeter {
    fn measure(&self, path: &Path) -> Result<i64, MeasureError> {
        let mut child = Command::new(&self.binary)
            .arg("-nostdin")
            .args(["-loglevel", "error"])
            .arg("-i")
            .arg(path)
            .args(["-vn", "-map", "0:a:0"])
            .args(["-f", "s16le", "-acodec", "pcm_s16le", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(MeasureError::Spawn)?;

        // Drained on its own thread so a chatty decoder cannot block on a full stderr pipe.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        let peak = match child.stdout.take() {
            Some(stdout) => peak_amplitude(stdout),
            None => Ok(None),
        };

        let status = child.wait().map_err(MeasureError::Read)?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            return Err(MeasureError::Decoder {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let peak = peak.map_err(MeasureError::Read)?;
        debug!("ffmpeg peak for {}: {:?}", path.display(), peak);
        peak.ok_or(MeasureError::NoAudio)
    }
}

/// Largest absolute sample in a stream of s16le PCM. `None` if the stream holds no
/// complete sample.
pub fn peak_amplitude<R: Read>(mut reader: R) -> io::Result<Option<i64>> {
    let mut buf = vec![0u8; READ_CHUNK];
    let mut carry: Option<u8> = None;
    let mut peak: Option<i64> = None;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        let mut bytes = &buf[..n];
        if let Some(low) = carry.take() {
            let sample = i16::from_le_bytes([low, bytes[0]]);
            peak = Some(peak.unwrap_or(0).max(i64::from(sample).abs()));
            bytes = &bytes[1..];
        }

        let mut pairs = bytes.chunks_exact(2);
        for pair in &mut pairs {
            let sample = i16::from_le_bytes([pair[0], pair[1]]);
            peak = Some(peak.unwrap_or(0).max(i64::from(sample).abs()));
        }
        carry = pairs.remainder().first().copied();
    }

    Ok(peak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pcm(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// Hands out at most `step` bytes per read to exercise odd chunk boundaries.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = (self.pos + self.step).min(self.data.len());
            let n = (end - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_peak_of_mixed_signs() {
        let data = pcm(&[3, -250, 99, 17]);
        assert_eq!(peak_amplitude(Cursor::new(data)).unwrap(), Some(250));
    }

    #[test]
    fn test_peak_of_extremes() {
        let data = pcm(&[0, i16::MIN, i16::MAX]);
        assert_eq!(peak_amplitude(Cursor::new(data)).unwrap(), Some(32768));
    }

    #[test]
    fn test_digital_silence_is_zero_not_missing() {
        let data = pcm(&[0, 0, 0, 0]);
        assert_eq!(peak_amplitude(Cursor::new(data)).unwrap(), Some(0));
    }

    #[test]
    fn test_empty_stream_has_no_peak() {
        assert_eq!(peak_amplitude(Cursor::new(Vec::new())).unwrap(), None);
        assert_eq!(peak_amplitude(Cursor::new(vec![7u8])).unwrap(), None);
    }

    #[test]
    fn test_samples_split_across_reads() {
        let reader = Trickle {
            data: pcm(&[10, -4000, 20, 300]),
            pos: 0,
            step: 3,
        };
        assert_eq!(peak_amplitude(reader).unwrap(), Some(4000));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let meter = FfmpegMeter::new("/nonexistent/bin/ffmpeg-for-tests");
        let err = meter.measure(Path::new("clip.mp4")).unwrap_err();
        assert!(matches!(err, MeasureError::Spawn(_)));
    }
}
