use std::fmt;

use serde::{Deserialize, Serialize};

/// Columns that must exist in the source header; a missing one fails the fetch.
pub const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "prompt",
    "type",
    "tags",
    "upload_youtube",
    "upload_instagram",
];

/// Columns read when present.
pub const OPTIONAL_FIELDS: &[&str] = &["schedule_time", "caption"];

/// Output format of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    Short,
    Long,
}

impl RecordType {
    /// `short` (any case) is a short; every other value is long-form.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("short") {
            RecordType::Short
        } else {
            RecordType::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Short => "SHORT",
            RecordType::Long => "LONG",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated row of the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based row identity, the same numbering the cursor uses.
    pub id: u64,
    pub title: String,
    pub prompt: String,
    pub record_type: RecordType,
    pub tags: Vec<String>,
    pub upload_youtube: bool,
    pub upload_instagram: bool,
    pub schedule_time: Option<String>,
    pub caption: Option<String>,
}

impl Record {
    /// Minimal record, mostly for tests and programmatic sources.
    pub fn new(id: u64, title: &str, prompt: &str, record_type: RecordType) -> Self {
        Self {
            id,
            title: title.to_string(),
            prompt: prompt.to_string(),
            record_type,
            tags: Vec::new(),
            upload_youtube: false,
            upload_instagram: false,
            schedule_time: None,
            caption: None,
        }
    }
}

/// Normalizes a header cell: trimmed, lowercase, spaces and dashes as `_`.
///
/// `"Upload YouTube"`, `"upload-youtube"` and `"UPLOAD_YOUTUBE"` all map to
/// `"upload_youtube"`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Spreadsheet-style boolean cell.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "x" | "on"
    )
}

/// Splits a comma-separated tag cell, dropping blanks.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
