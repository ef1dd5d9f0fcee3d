//! Music library access: the song model, directory scanning and analysis.

mod analysis;
mod model;
mod scan;

pub use analysis::{ConversionAnalysis, analyze_directory};
pub use model::{Song, display_name};
pub use scan::{
    CONVERTED_DIR_SUFFIX, find_audio_files, find_convertible_files, read_song, scan_songs,
};

#[cfg(test)]
mod tests;
