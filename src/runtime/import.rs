//! Glue between conversion batches and the tracker.
//!
//! The tracker is only ever touched here, on the caller's thread: filtering
//! before a batch is submitted and recording after it completes.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use tracing::info;

use crate::config::ConversionSettings;
use crate::convert::{BatchOutcome, ConversionEngine, ConversionEvent, JobHandle, PoolError};
use crate::format::{TargetFormat, is_convertible_path};
use crate::library::Song;
use crate::tracker::ConversionTracker;

/// Submit newly imported songs for conversion when auto-convert is on.
///
/// Songs whose album is already converted, and songs that are not
/// convertible, are left alone. Returns `None` when nothing was submitted.
pub fn submit_import(
    engine: &ConversionEngine,
    tracker: &mut ConversionTracker,
    songs: &[Song],
    settings: &ConversionSettings,
    events: Option<Sender<ConversionEvent>>,
) -> Result<Option<JobHandle<BatchOutcome>>, PoolError> {
    if !settings.auto_convert_on_import {
        info!("auto-convert on import is disabled");
        return Ok(None);
    }

    let pending: Vec<PathBuf> = tracker
        .filter_unconverted_songs(songs)
        .into_iter()
        .filter(|s| is_convertible_path(&s.path))
        .map(|s| s.path)
        .collect();

    if pending.is_empty() {
        return Ok(None);
    }
    info!(count = pending.len(), "submitting imported songs for conversion");
    engine.convert_files(pending, settings, events).map(Some)
}

/// Record every newly written file of `outcome`, returning how many.
///
/// Tags come from `songs` when the source is listed there, since the source
/// may already be gone when originals are not preserved.
pub fn record_outcome(
    tracker: &mut ConversionTracker,
    outcome: &BatchOutcome,
    songs: &[Song],
    format: TargetFormat,
) -> usize {
    let mut recorded = 0;
    for file in outcome.converted.iter().filter(|f| f.is_new()) {
        match songs.iter().find(|s| s.path == file.source) {
            Some(song) => tracker.record_conversion(song, &file.output, format),
            None => tracker.record_file_conversion(&file.source, &file.output, format),
        }
        recorded += 1;
    }
    recorded
}
