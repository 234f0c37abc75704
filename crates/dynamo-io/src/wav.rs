//! WAV file reading and writing.

use crate::{Result, WavError};
use dynamo_core::Stereo;
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

/// Output sample encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 16-bit integer PCM.
    Int16,
    /// 24-bit integer PCM.
    Int24,
    /// 32-bit IEEE float.
    #[default]
    Float32,
}

impl BitDepth {
    /// Parse a bit count: 16, 24 or 32.
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            16 => Ok(BitDepth::Int16),
            24 => Ok(BitDepth::Int24),
            32 => Ok(BitDepth::Float32),
            other => Err(WavError::UnsupportedBitDepth(other)),
        }
    }

    /// Bits per sample.
    pub const fn bits(self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }

    /// Encoding of this depth.
    pub const fn format(self) -> WavFormat {
        match self {
            BitDepth::Float32 => WavFormat::IeeeFloat,
            _ => WavFormat::Pcm,
        }
    }
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let path = path.as_ref();
    let reader = WavReader::open(path).map_err(|e| WavError::read(path, e))?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format: match spec.sample_format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        },
    })
}

/// Format of a file that was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of channels in the file (the samples are always stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

/// Read a WAV file as stereo frames along with its spec.
///
/// Mono files are duplicated to both channels. Files with more than 2
/// channels use only the first two. Integer PCM is scaled to [-1, 1).
///
/// # Example
/// ```ignore
/// let (frames, spec) = read_wav_stereo("input.wav")?;
/// println!("Loaded {} frames at {} Hz", frames.len(), spec.sample_rate);
/// ```
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(Vec<Stereo<f32>>, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path).map_err(|e| WavError::read(path, e))?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(WavError::NoChannels(path.to_path_buf()));
    }

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| WavError::read(path, e))?,
        SampleFormat::Int => {
            let scale = int_full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| WavError::read(path, e))?
        }
    };

    let frames = interleaved
        .chunks_exact(channels)
        .map(|frame| match frame {
            [mono] => Stereo::splat(*mono),
            [l, r, ..] => Stereo::new(*l, *r),
            [] => Stereo::ZERO,
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        path = %path.display(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = frames.len(),
        "read wav"
    );
    Ok((frames, spec))
}

/// Write stereo frames to a WAV file.
///
/// Integer depths are rounded and clipped to full scale; float output is
/// written unchanged.
///
/// # Example
/// ```ignore
/// let frames = vec![Stereo::ZERO; 48000];
/// write_wav_stereo("output.wav", &frames, 48000, BitDepth::Int24)?;
/// ```
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    frames: &[Stereo<f32>],
    sample_rate: u32,
    depth: BitDepth,
) -> Result<()> {
    let path = path.as_ref();
    let hound_spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: depth.bits(),
        sample_format: match depth.format() {
            WavFormat::IeeeFloat => SampleFormat::Float,
            WavFormat::Pcm => SampleFormat::Int,
        },
    };
    let mut writer = WavWriter::create(path, hound_spec).map_err(|e| WavError::write(path, e))?;

    match depth {
        BitDepth::Float32 => {
            for frame in frames {
                writer.write_sample(frame.l).map_err(|e| WavError::write(path, e))?;
                writer.write_sample(frame.r).map_err(|e| WavError::write(path, e))?;
            }
        }
        BitDepth::Int16 | BitDepth::Int24 => {
            let scale = int_full_scale(depth.bits());
            for frame in frames {
                for v in [frame.l, frame.r] {
                    let int = (v * scale).round().clamp(-scale, scale - 1.0) as i32;
                    writer.write_sample(int).map_err(|e| WavError::write(path, e))?;
                }
            }
        }
    }

    writer.finalize().map_err(|e| WavError::write(path, e))?;
    tracing::debug!(path = %path.display(), frames = frames.len(), bits = depth.bits(), "wrote wav");
    Ok(())
}

fn int_full_scale(bits: u16) -> f32 {
    (1i64 << (bits.clamp(1, 32) - 1)) as f32
}
