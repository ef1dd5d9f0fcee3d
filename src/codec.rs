//! Codec and tag providers used by the conversion engine.
//!
//! The engine only sees the [`CodecProvider`] and [`MetadataProvider`]
//! traits. [`RodioCodec`] and [`LoftyMetadata`] are the implementations the
//! binary wires in.

mod aiff;
mod metadata;
mod pcm;

use std::io;
use std::path::Path;

use crate::format::TargetSpec;

pub use aiff::AiffWriter;
pub use metadata::{LoftyMetadata, MetadataError, MetadataProvider};
pub use pcm::RodioCodec;

/// What a codec did with a transcode request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// `output` now holds the re-encoded audio.
    Encoded,
    /// The codec cannot produce this spec from this input. Nothing was written.
    Unsupported,
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("wav encoder: {0}")]
    Wav(#[from] hound::Error),
}

pub trait CodecProvider: Send + Sync {
    /// Re-encode `input` into `output` according to `spec`.
    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        spec: &TargetSpec,
    ) -> Result<TranscodeOutcome, CodecError>;
}

/// Scale a float sample in `[-1, 1]` to a signed integer of `bits` width.
pub(crate) fn quantize(sample: f32, bits: u16) -> i32 {
    let max = ((1i64 << (bits - 1)) - 1) as f32;
    (sample.clamp(-1.0, 1.0) * max).round() as i32
}
