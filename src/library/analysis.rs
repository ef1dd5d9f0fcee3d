use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::format::{extension_of, is_compatible, is_convertible};

use super::scan::find_audio_files;

/// Summary of what a directory tree would need converted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionAnalysis {
    pub total_audio_files: usize,
    pub convertible_files: usize,
    pub compatible_files: usize,
    /// Convertible files in path order.
    pub files_to_convert: Vec<PathBuf>,
    /// Convertible files grouped by their containing directory.
    pub per_directory: BTreeMap<PathBuf, Vec<PathBuf>>,
}

impl ConversionAnalysis {
    pub fn needs_conversion(&self) -> bool {
        self.convertible_files > 0
    }

    pub fn directory_counts(&self) -> BTreeMap<&Path, usize> {
        self.per_directory
            .iter()
            .map(|(dir, files)| (dir.as_path(), files.len()))
            .collect()
    }
}

/// Scan `root` and summarize it. A missing or non-directory root yields an
/// empty analysis.
pub fn analyze_directory(root: &Path) -> ConversionAnalysis {
    if !root.is_dir() {
        debug!(root = %root.display(), "not a directory, nothing to analyze");
        return ConversionAnalysis::default();
    }

    let mut analysis = ConversionAnalysis::default();
    for path in find_audio_files(root) {
        analysis.total_audio_files += 1;

        let ext = extension_of(&path).unwrap_or_default();
        if is_compatible(&ext) {
            analysis.compatible_files += 1;
        } else if is_convertible(&ext) {
            analysis.convertible_files += 1;
            let parent = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            analysis
                .per_directory
                .entry(parent)
                .or_default()
                .push(path.clone());
            analysis.files_to_convert.push(path);
        }
    }
    analysis
}
