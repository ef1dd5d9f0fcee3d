//! Audio format classification.
//!
//! Source formats the playback engine only partially supports are
//! "convertible"; the formats it fully supports are "compatible". The two
//! sets are disjoint and anything else is neither.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

const CONVERTIBLE_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "oga", "opus", "m4a", "aac", "alac", "wma", "ape", "wv",
];

const COMPATIBLE_EXTENSIONS: &[&str] = &["wav", "aiff", "aif"];

fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

pub fn is_convertible(ext: &str) -> bool {
    CONVERTIBLE_EXTENSIONS.contains(&normalize_ext(ext).as_str())
}

pub fn is_compatible(ext: &str) -> bool {
    COMPATIBLE_EXTENSIONS.contains(&normalize_ext(ext).as_str())
}

/// Lowercased extension of `path`, if it has a UTF-8 one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_convertible_path(path: &Path) -> bool {
    extension_of(path).map(|e| is_convertible(&e)).unwrap_or(false)
}

pub fn is_compatible_path(path: &Path) -> bool {
    extension_of(path).map(|e| is_compatible(&e)).unwrap_or(false)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFormat {
    #[serde(alias = "WAV", alias = "wave")]
    Wav,
    #[serde(alias = "AIFF", alias = "aif")]
    Aiff,
}

impl Default for TargetFormat {
    fn default() -> Self {
        Self::Wav
    }
}

impl TargetFormat {
    /// File extension written for this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Aiff => "aiff",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wav => "WAV",
            Self::Aiff => "AIFF",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a target container can hold.
///
/// Kept apart from `TargetFormat` so codec details never leak into the
/// domain enum.
#[derive(Debug, Clone)]
pub struct Capability {
    pub bit_depths: &'static [u16],
    pub channels: RangeInclusive<u16>,
    pub sample_rates: RangeInclusive<u32>,
}

impl Capability {
    pub fn supports(&self, spec: &TargetSpec) -> bool {
        self.bit_depths.contains(&spec.bit_depth)
            && self.channels.contains(&spec.channels)
            && self.sample_rates.contains(&spec.sample_rate)
    }
}

pub fn capability(format: TargetFormat) -> Capability {
    match format {
        TargetFormat::Wav => Capability {
            bit_depths: &[8, 16, 24, 32],
            channels: 1..=8,
            sample_rates: 8_000..=192_000,
        },
        TargetFormat::Aiff => Capability {
            bit_depths: &[8, 16, 24, 32],
            channels: 1..=8,
            sample_rates: 8_000..=192_000,
        },
    }
}

/// Bit depth of the PCM bridge tried when the requested spec is unsupported.
pub const BRIDGE_BIT_DEPTH: u16 = 16;

/// Full description of the audio a codec should produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub format: TargetFormat,
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: u16,
}

impl TargetSpec {
    /// The same spec re-expressed as 16-bit PCM.
    pub fn bridge(&self) -> Self {
        Self {
            bit_depth: BRIDGE_BIT_DEPTH,
            ..*self
        }
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} Hz {}-bit {}ch",
            self.format, self.sample_rate, self.bit_depth, self.channels
        )
    }
}
