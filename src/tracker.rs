//! Album-level memo of finished conversions.
//!
//! The tracker owns its history map and mirrors it to a JSON file on every
//! mutation. Lookups are side-effecting: a record whose converted file has
//! disappeared is purged the moment it is looked at.
//!
//! There is no internal locking. Mutating methods take `&mut self`, so the
//! owner (usually the thread driving the UI or CLI) is the single writer.

mod key;
mod record;
mod store;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::format::{TargetFormat, extension_of};
use crate::library::{Song, read_song};

pub use key::AlbumKey;
pub use record::{ConversionRecord, DATE_FORMAT};
pub use store::StoreError;

use store::RecordMap;

pub struct ConversionTracker {
    path: Option<PathBuf>,
    records: RecordMap,
}

impl ConversionTracker {
    /// Open the history stored at `path`.
    ///
    /// A missing file starts an empty history. A corrupt or unreadable file
    /// is logged and also starts empty; it is overwritten on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match store::load(&path) {
            Ok(records) => {
                debug!(path = %path.display(), count = records.len(), "loaded conversion history");
                records
            }
            Err(e) => {
                warn!(error = %e, "could not load conversion history, starting empty");
                RecordMap::new()
            }
        };
        Self {
            path: Some(path),
            records,
        }
    }

    /// A tracker that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: RecordMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ordered by album key. Stale records are not purged here.
    pub fn records(&self) -> impl Iterator<Item = &ConversionRecord> {
        self.records.values()
    }

    pub fn is_album_converted(&mut self, song: &Song) -> bool {
        self.lookup(&AlbumKey::for_song(song)).is_some()
    }

    /// Same as [`is_album_converted`](Self::is_album_converted) for a file on
    /// disk; its tags are read to build the key.
    pub fn is_file_converted(&mut self, path: &Path) -> bool {
        self.is_album_converted(&read_song(path))
    }

    pub fn conversion_record(&mut self, song: &Song) -> Option<ConversionRecord> {
        self.lookup(&AlbumKey::for_song(song)).cloned()
    }

    /// Remember that `song`'s album was converted into `converted_path`.
    /// Replaces any earlier record for the same album.
    pub fn record_conversion(
        &mut self,
        song: &Song,
        converted_path: &Path,
        converted_format: TargetFormat,
    ) {
        let key = AlbumKey::for_song(song);
        let original_format = extension_of(&song.path)
            .map(|e| e.to_ascii_uppercase())
            .unwrap_or_default();

        let record = ConversionRecord::new(
            key.as_str().to_string(),
            original_format,
            converted_format.label().to_string(),
            song.path.clone(),
            converted_path.to_path_buf(),
        );
        info!(album = %key, output = %converted_path.display(), "recorded conversion");
        self.records.insert(key.as_str().to_string(), record);
        self.persist();
    }

    pub fn record_file_conversion(
        &mut self,
        source: &Path,
        converted_path: &Path,
        converted_format: TargetFormat,
    ) {
        self.record_conversion(&read_song(source), converted_path, converted_format);
    }

    /// Forget `song`'s album. Returns whether a record existed.
    pub fn remove_conversion_record(&mut self, song: &Song) -> bool {
        let key = AlbumKey::for_song(song);
        let removed = self.records.remove(key.as_str()).is_some();
        if removed {
            info!(album = %key, "removed conversion record");
            self.persist();
        }
        removed
    }

    pub fn clear_history(&mut self) {
        info!(count = self.records.len(), "clearing conversion history");
        self.records.clear();
        self.persist();
    }

    /// The files whose album has not been converted, in input order.
    pub fn filter_unconverted_files(&mut self, files: &[PathBuf]) -> Vec<PathBuf> {
        files
            .iter()
            .filter(|p| !self.is_file_converted(p))
            .cloned()
            .collect()
    }

    /// The songs whose album has not been converted, in input order.
    pub fn filter_unconverted_songs(&mut self, songs: &[Song]) -> Vec<Song> {
        songs
            .iter()
            .filter(|s| !self.is_album_converted(s))
            .cloned()
            .collect()
    }

    fn lookup(&mut self, key: &AlbumKey) -> Option<&ConversionRecord> {
        let stale = self.records.get(key.as_str())?.is_stale();
        if stale {
            info!(album = %key, "converted file is gone, purging stale record");
            self.records.remove(key.as_str());
            self.persist();
            return None;
        }
        self.records.get(key.as_str())
    }

    /// Best-effort: a failed save is logged and the in-memory state kept.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = store::save(path, &self.records) {
            warn!(error = %e, "could not save conversion history");
        }
    }
}
