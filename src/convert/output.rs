use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConversionSettings;
use crate::library::CONVERTED_DIR_SUFFIX;

use super::ConversionError;

/// Where `input` is converted to: `<dir>/<stem>_converted.<ext>`.
///
/// `<dir>` is the configured output directory (created if missing) or the
/// input's own directory.
pub fn resolve_output_path(
    input: &Path,
    settings: &ConversionSettings,
) -> Result<PathBuf, ConversionError> {
    let dir = match &settings.output_directory {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|source| ConversionError::OutputDir {
                path: dir.clone(),
                source,
            })?;
            dir.clone()
        }
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    Ok(dir.join(format!(
        "{stem}_converted.{}",
        settings.target_format.extension()
    )))
}

/// The sibling `<dir>-converted` directory used for auto-directory runs.
///
/// Relative directories are made absolute first, so `.`, `..` and the empty
/// parent of a bare file name still have a name to derive from.
pub fn converted_dir_for(dir: &Path) -> Option<PathBuf> {
    let dir = absolute_dir(dir);
    let name = dir.file_name()?.to_string_lossy().into_owned();
    Some(dir.with_file_name(format!("{name}{CONVERTED_DIR_SUFFIX}")))
}

fn absolute_dir(dir: &Path) -> PathBuf {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    match std::path::absolute(dir) {
        Ok(abs) if abs.file_name().is_some() => abs,
        // `..` survives `absolute`; only the filesystem can resolve it.
        _ => fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TargetFormat;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_input_directory() {
        let settings = ConversionSettings::default();
        let out = resolve_output_path(Path::new("/music/Album/01 Song.flac"), &settings).unwrap();
        assert_eq!(out, PathBuf::from("/music/Album/01 Song_converted.wav"));
    }

    #[test]
    fn uses_target_extension() {
        let settings = ConversionSettings {
            target_format: TargetFormat::Aiff,
            ..ConversionSettings::default()
        };
        let out = resolve_output_path(Path::new("/m/a.mp3"), &settings).unwrap();
        assert_eq!(out, PathBuf::from("/m/a_converted.aiff"));
    }

    #[test]
    fn override_directory_is_created() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out").join("deeper");
        let settings = ConversionSettings {
            output_directory: Some(target.clone()),
            ..ConversionSettings::default()
        };

        let out = resolve_output_path(Path::new("/m/a.ogg"), &settings).unwrap();
        assert!(target.is_dir());
        assert_eq!(out, target.join("a_converted.wav"));
    }

    #[test]
    fn override_directory_that_cannot_be_created_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let settings = ConversionSettings {
            output_directory: Some(blocker.join("sub")),
            ..ConversionSettings::default()
        };

        let err = resolve_output_path(Path::new("/m/a.ogg"), &settings).unwrap_err();
        assert!(matches!(err, ConversionError::OutputDir { .. }));
    }

    #[test]
    fn converted_dir_is_a_sibling() {
        assert_eq!(
            converted_dir_for(Path::new("/music/AlbumA")),
            Some(PathBuf::from("/music/AlbumA-converted"))
        );
        assert_eq!(converted_dir_for(Path::new("/")), None);
    }

    #[test]
    fn converted_dir_resolves_parent_components() {
        let dir = tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("Music/Album")).unwrap();

        assert_eq!(
            converted_dir_for(&root.join("Music/Album/..")),
            Some(root.join("Music-converted"))
        );
        assert_eq!(
            converted_dir_for(&root.join("Music/./Album")),
            Some(root.join("Music/Album-converted"))
        );
    }
}
