use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Layout of `conversionDate` in the history file.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One converted album. Field names match the on-disk JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub album_key: String,
    pub original_format: String,
    pub converted_format: String,
    pub original_file_path: PathBuf,
    pub converted_file_path: PathBuf,
    pub conversion_date: String,
}

impl ConversionRecord {
    pub fn new(
        album_key: String,
        original_format: String,
        converted_format: String,
        original_file_path: PathBuf,
        converted_file_path: PathBuf,
    ) -> Self {
        Self {
            album_key,
            original_format,
            converted_format,
            original_file_path,
            converted_file_path,
            conversion_date: Local::now().format(DATE_FORMAT).to_string(),
        }
    }

    /// `conversion_date` parsed back, if it is well formed.
    pub fn converted_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.conversion_date, DATE_FORMAT).ok()
    }

    /// A record whose output file is gone no longer proves anything.
    pub fn is_stale(&self) -> bool {
        !self.converted_file_path.exists()
    }
}
