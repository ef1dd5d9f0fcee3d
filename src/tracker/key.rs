use std::fmt;
use std::path::Path;

use crate::library::Song;

const UNKNOWN_ALBUM: &str = "unknown";

/// Joins artist and album. `normalize` drops `/`, so it never occurs inside
/// either half.
const TAG_SEPARATOR: &str = " / ";

/// Normalized identity of an album in the conversion history.
///
/// Derived from the artist and album tags when both are present, otherwise
/// from the name of the directory holding the file. Songs read from files go
/// through the same tag reader, so both call paths share one keyspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlbumKey(String);

impl AlbumKey {
    pub fn for_song(song: &Song) -> Self {
        Self::from_tags(song.artist.as_deref(), song.album.as_deref())
            .unwrap_or_else(|| Self::from_directory(&song.path))
    }

    pub fn from_tags(artist: Option<&str>, album: Option<&str>) -> Option<Self> {
        let artist = normalize(artist?);
        let album = normalize(album?);
        if artist.is_empty() || album.is_empty() {
            return None;
        }
        Some(Self(format!("{artist}{TAG_SEPARATOR}{album}")))
    }

    /// Key from the directory containing `file`.
    pub fn from_directory(file: &Path) -> Self {
        let name = file
            .parent()
            .and_then(Path::file_name)
            .and_then(|s| s.to_str())
            .map(normalize)
            .unwrap_or_default();
        if name.is_empty() {
            Self(UNKNOWN_ALBUM.to_string())
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlbumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase, keep only alphanumerics, spaces and hyphens, collapse runs of
/// whitespace.
pub(crate) fn normalize(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  The Beatles! "), "the beatles");
        assert_eq!(normalize("AC/DC"), "acdc");
        assert_eq!(normalize("Sigur Rós"), "sigur rós");
        assert_eq!(normalize("Jay-Z   &  Kanye"), "jay-z kanye");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn tags_win_over_directory() {
        let song = Song::with_tags("/music/Some Folder/a.mp3", Some("Artist"), Some("Album"));
        assert_eq!(AlbumKey::for_song(&song).as_str(), "artist / album");
    }

    #[test]
    fn missing_or_blank_tag_falls_back_to_directory() {
        let song = Song::with_tags("/music/Kind of Blue (1959)/a.flac", Some("Miles"), None);
        assert_eq!(AlbumKey::for_song(&song).as_str(), "kind of blue 1959");

        let punct = Song::with_tags("/music/Dir/a.flac", Some("???"), Some("Album"));
        assert_eq!(AlbumKey::for_song(&punct).as_str(), "dir");
    }

    #[test]
    fn key_is_deterministic() {
        let a = Song::with_tags("/x/y/a.mp3", Some("A"), Some("B"));
        let b = Song::with_tags("/elsewhere/b.mp3", Some("a"), Some("b!"));
        assert_eq!(AlbumKey::for_song(&a), AlbumKey::for_song(&b));
    }

    #[test]
    fn hyphens_inside_tags_cannot_shift_between_artist_and_album() {
        let a = AlbumKey::from_tags(Some("Simon - Garfunkel"), Some("Hits"));
        let b = AlbumKey::from_tags(Some("Simon"), Some("Garfunkel - Hits"));
        assert_ne!(a, b);
        assert_eq!(a.unwrap().as_str(), "simon - garfunkel / hits");
    }

    #[test]
    fn file_at_filesystem_root_gets_unknown_key() {
        assert_eq!(AlbumKey::from_directory(Path::new("/a.mp3")).as_str(), "unknown");
    }
}
