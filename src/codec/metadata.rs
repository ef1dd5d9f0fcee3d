use std::path::Path;

use lofty::config::WriteOptions;
use lofty::error::LoftyError;
use lofty::prelude::*;
use lofty::tag::TagType;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("tag error: {0}")]
    Tag(#[from] LoftyError),
}

pub trait MetadataProvider: Send + Sync {
    /// Copy the tags of `source` onto `destination`.
    fn copy_tags(&self, source: &Path, destination: &Path) -> Result<(), MetadataError>;
}

/// Copies the primary tag as ID3v2, which both WAV and AIFF can carry.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyMetadata;

impl MetadataProvider for LoftyMetadata {
    fn copy_tags(&self, source: &Path, destination: &Path) -> Result<(), MetadataError> {
        let tagged = lofty::read_from_path(source)?;
        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            debug!(source = %source.display(), "no tags to copy");
            return Ok(());
        };

        let mut tag = tag.clone();
        tag.re_map(TagType::Id3v2);
        tag.save_to_path(destination, WriteOptions::default())?;
        Ok(())
    }
}
