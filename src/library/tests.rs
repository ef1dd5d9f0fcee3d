use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::{ConversionAnalysis, analyze_directory};

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"not real audio").unwrap();
}

#[test]
fn analyze_directory_ignores_converted_output_and_groups_by_album() {
    let dir = tempdir().unwrap();
    let music = dir.path().join("music");
    touch(&music.join("AlbumA/a.mp3"));
    touch(&music.join("AlbumA/b.flac"));
    touch(&music.join("AlbumA-converted/a_converted.wav"));
    touch(&music.join("AlbumB/c.ogg"));
    touch(&music.join("AlbumB/notes.txt"));

    let analysis = analyze_directory(&music);

    assert_eq!(analysis.total_audio_files, 3);
    assert_eq!(analysis.convertible_files, 3);
    assert_eq!(analysis.compatible_files, 0);
    assert_eq!(analysis.files_to_convert.len(), 3);

    let dirs: Vec<&Path> = analysis.per_directory.keys().map(|p| p.as_path()).collect();
    assert_eq!(dirs, vec![music.join("AlbumA").as_path(), music.join("AlbumB").as_path()]);
    let counts = analysis.directory_counts();
    assert_eq!(counts[music.join("AlbumA").as_path()], 2);
    assert_eq!(counts[music.join("AlbumB").as_path()], 1);
}

#[test]
fn analyze_directory_counts_compatible_files_separately() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("x/a.wav"));
    touch(&dir.path().join("x/b.mp3"));

    let analysis = analyze_directory(dir.path());
    assert_eq!(analysis.total_audio_files, 2);
    assert_eq!(analysis.compatible_files, 1);
    assert_eq!(analysis.convertible_files, 1);
    assert!(analysis.needs_conversion());
}

#[test]
fn analyze_directory_on_missing_or_file_root_is_empty() {
    let dir = tempdir().unwrap();
    let missing = analyze_directory(&dir.path().join("missing"));
    assert_eq!(missing, ConversionAnalysis::default());

    let file = dir.path().join("song.mp3");
    touch(&file);
    let on_file = analyze_directory(&file);
    assert_eq!(on_file.total_audio_files, 0);
    assert!(!on_file.needs_conversion());
}
