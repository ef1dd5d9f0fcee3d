use std::path::{Path, PathBuf};

use lofty::prelude::*;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::format::{is_compatible_path, is_convertible_path};

use super::model::{Song, file_stem, non_blank};

/// Suffix of directories that hold conversion output. Never scanned.
pub const CONVERTED_DIR_SUFFIX: &str = "-converted";

fn is_converted_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(CONVERTED_DIR_SUFFIX))
            .unwrap_or(false)
}

/// Walk `root` and collect files accepted by `keep`, sorted by path.
///
/// Unreadable directories are treated as empty. Subdirectories ending in
/// `-converted` are not descended into.
fn collect_files(root: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_converted_dir(e))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && keep(e.path()))
        .map(DirEntry::into_path)
        .collect();

    files.sort();
    files
}

/// Every file under `root` whose extension is convertible.
pub fn find_convertible_files(root: &Path) -> Vec<PathBuf> {
    collect_files(root, is_convertible_path)
}

/// Every file under `root` that is either convertible or already compatible.
pub fn find_audio_files(root: &Path) -> Vec<PathBuf> {
    collect_files(root, |p| is_convertible_path(p) || is_compatible_path(p))
}

/// Read the tags of a single file. Files without readable tags still
/// produce a song, titled after the file stem.
pub fn read_song(path: &Path) -> Song {
    let mut song = Song::untagged(path);

    if let Ok(tagged) = lofty::read_from_path(path) {
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = non_blank(tag.title().as_deref()) {
                song.title = v;
            }
            song.artist = non_blank(tag.artist().as_deref());
            song.album = non_blank(tag.album().as_deref());
        }
    }

    if song.title.is_empty() {
        song.title = file_stem(path);
    }
    song
}

/// Songs for every audio file under `root`, in path order.
pub fn scan_songs(root: &Path) -> Vec<Song> {
    find_audio_files(root).iter().map(|p| read_song(p)).collect()
}
