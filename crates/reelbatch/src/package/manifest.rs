use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::GeneratedContent;
use crate::error::PackageError;
use crate::render::Artifact;
use crate::source::{Record, RecordType};

/// File name of the manifest inside every archive.
pub const MANIFEST_NAME: &str = "manifest.csv";

/// One row of `manifest.csv`, describing a successfully produced record.
///
/// The first six columns are the fixed manifest contract. The rest carry the
/// metadata a later standalone publish needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: u64,
    pub title: String,
    pub filename: String,
    /// `sink:id` pairs joined by `;`, empty when no sink accepted the record.
    pub external_id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub processed_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub caption: String,
    /// Comma-joined tags.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub schedule_time: Option<String>,
    #[serde(default)]
    pub duration_secs: u32,
    #[serde(default)]
    pub content_source: String,
}

impl ManifestEntry {
    pub fn new(
        record: &Record,
        artifact: &Artifact,
        content: &GeneratedContent,
        external_ids: &[(String, String)],
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            filename: artifact.video_filename(),
            external_id: join_external_ids(external_ids),
            record_type: record.record_type,
            processed_at,
            description: content.bundle.description.clone(),
            caption: content.bundle.caption.clone(),
            tags: record.tags.join(","),
            schedule_time: record.schedule_time.clone(),
            duration_secs: artifact.duration_secs,
            content_source: content.source.as_str().to_string(),
        }
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

pub fn join_external_ids(ids: &[(String, String)]) -> String {
    ids.iter()
        .map(|(sink, id)| format!("{}:{}", sink, id))
        .collect::<Vec<_>>()
        .join(";")
}

/// Serializes entries as CSV with a header row.
pub fn write_manifest(entries: &[ManifestEntry]) -> Result<Vec<u8>, PackageError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer
            .serialize(entry)
            .map_err(|e| PackageError::Manifest(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| PackageError::Manifest(e.to_string()))
}

pub fn read_manifest(data: &[u8]) -> Result<Vec<ManifestEntry>, csv::Error> {
    csv::Reader::from_reader(data)
        .deserialize()
        .collect::<Result<Vec<ManifestEntry>, _>>()
}
