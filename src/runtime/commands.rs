use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use crate::codec::{LoftyMetadata, RodioCodec};
use crate::config::Settings;
use crate::convert::{BatchOutcome, ConversionEngine, ConversionEvent, JobHandle};
use crate::library::{Song, analyze_directory, find_convertible_files, read_song, scan_songs};
use crate::tracker::ConversionTracker;

use super::cli::Command;
use super::import::{record_outcome, submit_import};

pub fn execute(command: Command, settings: &Settings) -> Result<(), Box<dyn Error>> {
    match command {
        Command::ShowConfig => {
            print!("{}", toml::to_string_pretty(settings)?);
            Ok(())
        }
        Command::Analyze { dir } => {
            analyze(&dir);
            Ok(())
        }
        Command::History => {
            let tracker = ConversionTracker::open(settings.history_path());
            for r in tracker.records() {
                let date = r
                    .converted_at()
                    .map(|d| d.format("%a %d %b %Y %H:%M").to_string())
                    .unwrap_or_else(|| format!("{} (unparsed)", r.conversion_date));
                println!(
                    "{}  {}  {} -> {}  {}",
                    date,
                    r.album_key,
                    r.original_format,
                    r.converted_format,
                    r.converted_file_path.display()
                );
            }
            println!("{} album(s) converted", tracker.len());
            Ok(())
        }
        Command::Forget { file } => {
            let mut tracker = ConversionTracker::open(settings.history_path());
            if tracker.remove_conversion_record(&read_song(&file)) {
                println!("forgot album of {}", file.display());
            } else {
                println!("no record for {}", file.display());
            }
            Ok(())
        }
        Command::ClearHistory => {
            let mut tracker = ConversionTracker::open(settings.history_path());
            tracker.clear_history();
            println!("conversion history cleared");
            Ok(())
        }
        Command::Convert { files } => {
            let songs: Vec<Song> = files.iter().map(|p| read_song(p)).collect();
            convert(settings, songs, false)
        }
        Command::ConvertDir { dir } => {
            let mut tracker = ConversionTracker::open(settings.history_path());
            let files = tracker.filter_unconverted_files(&find_convertible_files(&dir));
            if files.is_empty() {
                println!("nothing to convert in {}", dir.display());
                return Ok(());
            }
            let songs: Vec<Song> = files.iter().map(|p| read_song(p)).collect();
            drop(tracker);
            convert(settings, songs, true)
        }
        Command::Import { dir } => import(settings, &dir),
    }
}

fn analyze(dir: &Path) {
    let analysis = analyze_directory(dir);
    println!("audio files:       {}", analysis.total_audio_files);
    println!("already compatible: {}", analysis.compatible_files);
    println!("to convert:        {}", analysis.convertible_files);
    for (dir, count) in analysis.directory_counts() {
        println!("  {count:>4}  {}", dir.display());
    }
}

fn engine() -> ConversionEngine {
    ConversionEngine::new(Arc::new(RodioCodec), Arc::new(LoftyMetadata))
}

fn convert(settings: &Settings, songs: Vec<Song>, auto_directory: bool) -> Result<(), Box<dyn Error>> {
    let engine = engine();
    let (tx, rx) = mpsc::channel();
    let inputs: Vec<PathBuf> = songs.iter().map(|s| s.path.clone()).collect();

    let handle = if auto_directory {
        engine.convert_files_with_auto_directory(inputs, &settings.conversion, Some(tx))?
    } else {
        engine.convert_files(inputs, &settings.conversion, Some(tx))?
    };
    let outcome = follow(handle, rx)?;

    let mut tracker = ConversionTracker::open(settings.history_path());
    let recorded = record_outcome(&mut tracker, &outcome, &songs, settings.conversion.target_format);
    summarize(&outcome, recorded);
    engine.shutdown();
    Ok(())
}

fn import(settings: &Settings, dir: &Path) -> Result<(), Box<dyn Error>> {
    let songs = scan_songs(dir);
    let mut tracker = ConversionTracker::open(settings.history_path());
    let engine = engine();
    let (tx, rx) = mpsc::channel();

    let Some(handle) = submit_import(&engine, &mut tracker, &songs, &settings.conversion, Some(tx))?
    else {
        println!("nothing to convert for {}", dir.display());
        return Ok(());
    };
    let outcome = follow(handle, rx)?;

    let recorded = record_outcome(&mut tracker, &outcome, &songs, settings.conversion.target_format);
    summarize(&outcome, recorded);
    engine.shutdown();
    Ok(())
}

/// Print events as they arrive on this thread, then collect the result.
fn follow(
    handle: JobHandle<BatchOutcome>,
    rx: mpsc::Receiver<ConversionEvent>,
) -> Result<BatchOutcome, Box<dyn Error>> {
    for event in rx {
        match event {
            ConversionEvent::Progress {
                file_name,
                index,
                total,
                percent,
            } => println!("[{:>3}%] ({}/{}) {}", percent, index + 1, total, file_name),
            ConversionEvent::Error { file_name, message } => {
                eprintln!("  failed: {file_name}: {message}")
            }
            ConversionEvent::Complete(_) => break,
        }
    }
    Ok(handle.wait()?)
}

fn summarize(outcome: &BatchOutcome, recorded: usize) {
    println!(
        "done: {} converted, {} failed, {} album record(s) updated",
        outcome.converted.iter().filter(|c| c.is_new()).count(),
        outcome.errors.len(),
        recorded
    );
    for e in &outcome.errors {
        println!("  {e}");
    }
}
