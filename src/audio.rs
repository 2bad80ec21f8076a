//! Audio source interface
//!
//! Out of scope for the core per the specification: live capture devices
//! and the WAV container format are external collaborators. Only the
//! interface the orchestrator drives is specified here, plus the
//! non-streaming `load_wav` path (backed by `hound`) that the CLI and the
//! golden-vector test both need.

use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum AudioError {
    #[snafu(display("failed to open audio device {device}"))]
    DeviceOpen { device: String },
    #[snafu(display("failed to read WAV file {path}: {source}"))]
    WavRead { path: String, source: hound::Error },
    #[snafu(display("unsupported WAV format: {details}"))]
    UnsupportedFormat { details: String },
    #[snafu(display("audio stream ended unexpectedly"))]
    EndOfStream,
}

/// Mono float audio source, consumed block-by-block by the slot orchestrator.
///
/// Samples are in `[-1.0, 1.0]`. `read` blocks until `dst.len()` samples are
/// delivered or the stream ends, in which case it returns the short count
/// actually written (spec §6: "blocks until n samples are delivered or
/// returns short on end-of-stream").
pub trait AudioSource {
    fn init(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn open(&mut self, device_name: &str) -> Result<(), AudioError>;

    /// Fill `dst` with up to `dst.len()` samples; returns the number written.
    fn read(&mut self, dst: &mut [f32]) -> Result<usize, AudioError>;

    fn close(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Load an entire WAV file as mono f32 samples in `[-1, 1]`, downmixing
/// multi-channel input by averaging channels. Used for the non-streaming
/// `decode WAVPATH` CLI path and for the golden-vector integration test.
pub fn load_wav(path: &str) -> Result<(Vec<f32>, u32), AudioError> {
    let mut reader = hound::WavReader::open(path).map_err(|source| AudioError::WavRead {
        path: path.to_string(),
        source,
    })?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let sample_rate = spec.sample_rate;

    let mono: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => {
            let samples: Result<Vec<f32>, hound::Error> = reader.samples::<f32>().collect();
            let samples = samples.map_err(|source| AudioError::WavRead {
                path: path.to_string(),
                source,
            })?;
            downmix(&samples, channels)
        }
        hound::SampleFormat::Int => {
            let max_amplitude = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            let samples: Result<Vec<i32>, hound::Error> = reader.samples::<i32>().collect();
            let samples = samples.map_err(|source| AudioError::WavRead {
                path: path.to_string(),
                source,
            })?;
            let floats: Vec<f32> = samples.iter().map(|&s| s as f32 / max_amplitude).collect();
            downmix(&floats, channels)
        }
    };

    Ok((mono, sample_rate))
}

fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// A pre-loaded in-memory `AudioSource`, used to drive the orchestrator
/// from a WAV file as if it were a live device: `read` hands back
/// `dst.len()` samples per call and reports end-of-stream with a short
/// count once the buffer is exhausted.
pub struct BufferedAudioSource {
    samples: Vec<f32>,
    cursor: usize,
}

impl BufferedAudioSource {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, cursor: 0 }
    }

    pub fn from_wav(path: &str) -> Result<Self, AudioError> {
        let (samples, _sample_rate) = load_wav(path)?;
        Ok(Self::new(samples))
    }
}

impl AudioSource for BufferedAudioSource {
    fn open(&mut self, _device_name: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn read(&mut self, dst: &mut [f32]) -> Result<usize, AudioError> {
        let remaining = self.samples.len() - self.cursor;
        let n = dst.len().min(remaining);
        dst[..n].copy_from_slice(&self.samples[self.cursor..self.cursor + n]);
        for sample in &mut dst[n..] {
            *sample = 0.0;
        }
        self.cursor += n;
        Ok(n)
    }
}
