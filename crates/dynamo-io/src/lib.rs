//! Audio file I/O for dynamo.
//!
//! Reads any PCM or float WAV file as [`Stereo`](dynamo_core::Stereo)
//! frames and writes stereo WAV at 16-bit, 24-bit or 32-bit float.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dynamo_core::StereoProcessor;
//! use dynamo_effects::Compressor;
//! use dynamo_io::{BitDepth, read_wav_stereo, write_wav_stereo};
//!
//! let (mut frames, spec) = read_wav_stereo("input.wav")?;
//! let mut comp = Compressor::new(spec.sample_rate as f32);
//! comp.process_block(&mut frames);
//! write_wav_stereo("output.wav", &frames, spec.sample_rate, BitDepth::Int24)?;
//! ```

use std::path::{Path, PathBuf};

mod wav;

pub use wav::{BitDepth, WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// Opening or decoding a file failed.
    #[error("failed to read WAV file '{path}': {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: hound::Error,
    },

    /// Creating or encoding a file failed.
    #[error("failed to write WAV file '{path}': {source}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// Encoder error.
        #[source]
        source: hound::Error,
    },

    /// The file header declares zero channels.
    #[error("WAV file '{0}' has no channels")]
    NoChannels(PathBuf),

    /// Requested output bit depth is not 16, 24 or 32.
    #[error("unsupported bit depth {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),
}

impl WavError {
    fn read(path: &Path, source: hound::Error) -> Self {
        WavError::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write(path: &Path, source: hound::Error) -> Self {
        WavError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, WavError>;
