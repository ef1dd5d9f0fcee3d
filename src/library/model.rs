use std::path::{Path, PathBuf};

/// A library entry: one audio file plus the tags we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl Song {
    /// A song with no tags; the title falls back to the file stem.
    pub fn untagged(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = file_stem(&path);
        Self {
            path,
            title,
            artist: None,
            album: None,
        }
    }

    pub fn with_tags(
        path: impl Into<PathBuf>,
        artist: Option<&str>,
        album: Option<&str>,
    ) -> Self {
        let mut song = Self::untagged(path);
        song.artist = non_blank(artist);
        song.album = non_blank(album);
        song
    }

    /// Name shown in progress output.
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

pub(crate) fn non_blank(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

/// File name for user-facing messages, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
