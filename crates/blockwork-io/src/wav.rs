//! Mono WAV file reading and writing.
//!
//! Block systems run one sample per tick on a single stream, so files are
//! loaded as one channel (averaging when the file has more) and written by
//! copying the mono signal to every channel the [`WavSpec`] asks for.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Float => Self::IeeeFloat,
            SampleFormat::Int => Self::Pcm,
        }
    }
}

impl From<WavFormat> for SampleFormat {
    fn from(format: WavFormat) -> Self {
        match format {
            WavFormat::IeeeFloat => Self::Float,
            WavFormat::Pcm => Self::Int,
        }
    }
}

/// WAV file metadata read from the header only.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Layout of the samples.
    pub spec: WavSpec,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

/// WAV file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Sample encoding.
    pub format: WavFormat,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            format: WavFormat::IeeeFloat,
        }
    }
}

impl WavSpec {
    /// Mono 32-bit float at `sample_rate`.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    fn validate(self) -> Result<Self> {
        let supported = match self.format {
            WavFormat::IeeeFloat => self.bits_per_sample == 32,
            WavFormat::Pcm => matches!(self.bits_per_sample, 8 | 16 | 24 | 32),
        };
        if !supported || self.channels == 0 {
            return Err(Error::UnsupportedFormat(format!(
                "{} channel(s), {}-bit {:?}",
                self.channels, self.bits_per_sample, self.format
            )));
        }
        Ok(self)
    }

    /// Full-scale value of an integer sample at this bit depth.
    fn pcm_scale(self) -> f32 {
        (1i64 << (self.bits_per_sample - 1)) as f32
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            format: spec.sample_format.into(),
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: spec.format.into(),
        }
    }
}

/// Reads the header of a WAV file without decoding any samples.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let num_frames = u64::from(reader.duration());
    Ok(WavInfo {
        spec,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
    })
}

/// Reads a WAV file as mono f32 samples in `[-1, 1)`.
///
/// Multi-channel files are mixed down by averaging each frame.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("input.wav")?;
/// println!("{} samples at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec()).validate()?;

    let interleaved: Vec<f32> = match spec.format {
        WavFormat::IeeeFloat => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        WavFormat::Pcm => {
            let scale = spec.pcm_scale();
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels);
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    tracing::debug!(
        frames = samples.len(),
        sample_rate = spec.sample_rate,
        "read_wav"
    );
    Ok((samples, spec))
}

/// Writes mono samples to a WAV file, duplicating them across `spec.channels`.
///
/// Integer formats clamp to the representable range.
///
/// # Example
/// ```ignore
/// let silence = vec![0.0f32; 48000];
/// write_wav("output.wav", &silence, WavSpec::mono(48000))?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let spec = spec.validate()?;
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    match spec.format {
        WavFormat::IeeeFloat => {
            for &sample in samples {
                for _ in 0..spec.channels {
                    writer.write_sample(sample)?;
                }
            }
        }
        WavFormat::Pcm => {
            let scale = spec.pcm_scale();
            for &sample in samples {
                let value = (sample * scale).clamp(-scale, scale - 1.0) as i32;
                for _ in 0..spec.channels {
                    writer.write_sample(value)?;
                }
            }
        }
    }

    writer.finalize()?;
    tracing::debug!(frames = samples.len(), channels = spec.channels, "write_wav");
    Ok(())
}
