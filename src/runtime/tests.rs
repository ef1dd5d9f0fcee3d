use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::tempdir;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use super::cli::{Cli, Command};
use super::import::{record_outcome, submit_import};
use crate::codec::{CodecError, CodecProvider, MetadataError, MetadataProvider, TranscodeOutcome};
use crate::config::ConversionSettings;
use crate::convert::ConversionEngine;
use crate::format::{TargetFormat, TargetSpec};
use crate::library::Song;
use crate::tracker::ConversionTracker;

struct CopyCodec;

impl CodecProvider for CopyCodec {
    fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _spec: &TargetSpec,
    ) -> Result<TranscodeOutcome, CodecError> {
        fs::copy(input, output)?;
        Ok(TranscodeOutcome::Encoded)
    }
}

struct NoTags;

impl MetadataProvider for NoTags {
    fn copy_tags(&self, _source: &Path, _destination: &Path) -> Result<(), MetadataError> {
        Ok(())
    }
}

fn engine() -> ConversionEngine {
    ConversionEngine::new(Arc::new(CopyCodec), Arc::new(NoTags))
}

fn parse(list: &[&str]) -> Result<Command, clap::Error> {
    Cli::try_parse_from(std::iter::once("recast").chain(list.iter().copied())).map(|c| c.command)
}

fn song(path: PathBuf, album: &str) -> Song {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"audio").unwrap();
    Song::with_tags(path, Some("Artist"), Some(album))
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn parse_recognizes_every_command() {
    assert_eq!(parse(&["analyze", "/m"]).unwrap(), Command::Analyze { dir: "/m".into() });
    assert_eq!(
        parse(&["convert", "a.mp3", "b.flac"]).unwrap(),
        Command::Convert {
            files: vec!["a.mp3".into(), "b.flac".into()]
        }
    );
    assert_eq!(
        parse(&["convert-dir", "/m"]).unwrap(),
        Command::ConvertDir { dir: "/m".into() }
    );
    assert_eq!(parse(&["import", "/m"]).unwrap(), Command::Import { dir: "/m".into() });
    assert_eq!(
        parse(&["forget", "a.mp3"]).unwrap(),
        Command::Forget { file: "a.mp3".into() }
    );
    assert_eq!(parse(&["history"]).unwrap(), Command::History);
    assert_eq!(parse(&["clear-history"]).unwrap(), Command::ClearHistory);
    assert_eq!(parse(&["show-config"]).unwrap(), Command::ShowConfig);
}

#[test]
fn parse_rejects_bad_arguments() {
    assert_eq!(
        parse(&["analyze"]).unwrap_err().kind(),
        ErrorKind::MissingRequiredArgument
    );
    assert!(parse(&["analyze", "a", "b"]).is_err());
    assert_eq!(
        parse(&["convert"]).unwrap_err().kind(),
        ErrorKind::MissingRequiredArgument
    );
    assert!(parse(&["history", "extra"]).is_err());
    assert_eq!(
        parse(&["transmogrify"]).unwrap_err().kind(),
        ErrorKind::InvalidSubcommand
    );
}

#[test]
fn no_arguments_shows_help() {
    assert_eq!(
        parse(&[]).unwrap_err().kind(),
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    );
    assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
}

#[test]
fn import_does_nothing_when_auto_convert_is_off() {
    let dir = tempdir().unwrap();
    let songs = vec![song(dir.path().join("A/a.mp3"), "One")];
    let mut tracker = ConversionTracker::in_memory();

    let handle = submit_import(
        &engine(),
        &mut tracker,
        &songs,
        &ConversionSettings::default(),
        None,
    )
    .unwrap();
    assert!(handle.is_none());
    assert!(!dir.path().join("A/a_converted.wav").exists());
}

#[test]
fn import_converts_only_unconverted_convertible_songs_and_records_them() {
    let dir = tempdir().unwrap();
    let done = song(dir.path().join("Done/a.mp3"), "Done");
    let fresh = song(dir.path().join("Fresh/b.flac"), "Fresh");
    let compatible = song(dir.path().join("Fresh/c.wav"), "Fresh");

    let mut tracker = ConversionTracker::in_memory();
    let already = dir.path().join("Done/a_converted.wav");
    fs::write(&already, b"old").unwrap();
    tracker.record_conversion(&done, &already, TargetFormat::Wav);

    let settings = ConversionSettings {
        auto_convert_on_import: true,
        ..ConversionSettings::default()
    };
    let songs = vec![done.clone(), fresh.clone(), compatible];
    let outcome = submit_import(&engine(), &mut tracker, &songs, &settings, None)
        .unwrap()
        .expect("fresh song submitted")
        .wait()
        .unwrap();

    assert_eq!(outcome.converted.len(), 1);
    assert_eq!(outcome.converted[0].source, fresh.path);

    let recorded = record_outcome(&mut tracker, &outcome, &songs, settings.target_format);
    assert_eq!(recorded, 1);
    assert!(tracker.is_album_converted(&fresh));
    assert_eq!(tracker.len(), 2);

    // A second import finds nothing left to do.
    let again = submit_import(&engine(), &mut tracker, &songs, &settings, None).unwrap();
    assert!(again.is_none());
}

#[test]
fn record_outcome_uses_known_tags_even_if_source_is_gone() {
    let dir = tempdir().unwrap();
    let s = song(dir.path().join("Folder/a.mp3"), "Tagged Album");
    let settings = ConversionSettings {
        preserve_originals: false,
        ..ConversionSettings::default()
    };

    let outcome = engine()
        .convert_files(vec![s.path.clone()], &settings, None)
        .unwrap()
        .wait()
        .unwrap();
    assert!(!s.path.exists());

    let mut tracker = ConversionTracker::in_memory();
    record_outcome(&mut tracker, &outcome, &[s.clone()], settings.target_format);
    let record = tracker.conversion_record(&s).unwrap();
    assert_eq!(record.album_key, "artist / tagged album");
}

#[test]
fn record_outcome_reads_tags_for_sources_it_was_not_given() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Loose Album/a.mp3");
    song(path.clone(), "ignored");

    let outcome = engine()
        .convert_files(vec![path.clone()], &ConversionSettings::default(), None)
        .unwrap()
        .wait()
        .unwrap();

    let mut tracker = ConversionTracker::in_memory();
    let recorded = record_outcome(&mut tracker, &outcome, &[], TargetFormat::Wav);
    assert_eq!(recorded, 1);
    // The fake file carries no tags, so the directory names the album.
    assert!(tracker.is_file_converted(&path));
    assert_eq!(tracker.records().next().unwrap().album_key, "loose album");
}
