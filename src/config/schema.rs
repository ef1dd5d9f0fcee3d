use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::{TargetFormat, TargetSpec};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/recast/config.toml` or `~/.config/recast/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RECAST__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub conversion: ConversionSettings,
    pub tracker: TrackerSettings,
}

/// Snapshot of everything a conversion run needs.
///
/// Cloned into each submitted task so a run never observes later edits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Format written for converted files.
    pub target_format: TargetFormat,
    /// Keep the source file after a successful conversion.
    pub preserve_originals: bool,
    /// Convert new songs as soon as they are imported.
    pub auto_convert_on_import: bool,
    /// Write converted files here instead of next to the source.
    /// Created on demand.
    pub output_directory: Option<PathBuf>,
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channel_count: u16,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            target_format: TargetFormat::Wav,
            preserve_originals: true,
            auto_convert_on_import: false,
            output_directory: None,
            sample_rate: 44_100,
            bit_depth: 16,
            channel_count: 2,
        }
    }
}

impl ConversionSettings {
    pub fn target_spec(&self) -> TargetSpec {
        TargetSpec {
            format: self.target_format,
            sample_rate: self.sample_rate,
            bit_depth: self.bit_depth,
            channels: self.channel_count,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Where the conversion history is stored.
    /// Defaults to `$XDG_DATA_HOME/recast/conversion-history.json`.
    pub history_path: Option<PathBuf>,
}
