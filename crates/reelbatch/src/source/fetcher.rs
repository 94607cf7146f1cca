use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::error::SourceError;
use crate::pipeline::window::identity_of;
use crate::sanitize;

use super::record::{
    normalize_header, parse_flag, split_tags, Record, RecordType, OPTIONAL_FIELDS,
    REQUIRED_FIELDS,
};

/// Anything that can produce the ordered record set for a run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<Record>, SourceError>;
}

/// Fetches CSV over HTTP(S) or from the local filesystem.
///
/// No retries: a failed fetch is fatal to the run and the next scheduled run
/// tries again from the same cursor.
pub struct SourceFetcher {
    client: reqwest::Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    async fn read_payload(&self, location: &str) -> Result<String, SourceError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let fetch_err = |message: String| SourceError::Fetch {
                location: sanitize::redact_url(location),
                message,
            };

            let response = self
                .client
                .get(location)
                .send()
                .await
                .map_err(|e| fetch_err(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(fetch_err(format!("HTTP status {}", status)));
            }

            response.text().await.map_err(|e| fetch_err(e.to_string()))
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SourceError::Fetch {
                    location: sanitize::redact_url(location),
                    message: e.to_string(),
                })
        }
    }
}

#[async_trait]
impl RecordSource for SourceFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<Record>, SourceError> {
        info!("Fetching records from {}", sanitize::redact_url(location));
        let payload = self.read_payload(location).await?;
        let records = parse_records(&payload)?;
        info!("Fetched {} records", records.len());
        Ok(records)
    }
}

/// Column indices resolved once from the header row.
struct ColumnLayout {
    title: usize,
    prompt: usize,
    record_type: usize,
    tags: usize,
    upload_youtube: usize,
    upload_instagram: usize,
    schedule_time: Option<usize>,
    caption: Option<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SourceError> {
        let mut columns: HashMap<String, usize> = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            columns.entry(normalize_header(header)).or_insert(index);
        }

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !columns.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SourceError::Schema { missing });
        }

        for field in OPTIONAL_FIELDS {
            if !columns.contains_key(*field) {
                debug!("Optional column '{}' not present", field);
            }
        }

        Ok(Self {
            title: columns["title"],
            prompt: columns["prompt"],
            record_type: columns["type"],
            tags: columns["tags"],
            upload_youtube: columns["upload_youtube"],
            upload_instagram: columns["upload_instagram"],
            schedule_time: columns.get("schedule_time").copied(),
            caption: columns.get("caption").copied(),
        })
    }

    fn record(&self, id: u64, row: &csv::StringRecord) -> Record {
        let cell = |index: usize| row.get(index).unwrap_or("").trim();
        let optional = |index: Option<usize>| {
            index
                .map(cell)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Record {
            id,
            title: cell(self.title).to_string(),
            prompt: cell(self.prompt).to_string(),
            record_type: RecordType::parse(cell(self.record_type)),
            tags: split_tags(cell(self.tags)),
            upload_youtube: parse_flag(cell(self.upload_youtube)),
            upload_instagram: parse_flag(cell(self.upload_instagram)),
            schedule_time: optional(self.schedule_time),
            caption: optional(self.caption),
        }
    }
}

/// Parses a CSV payload into records, preserving row order.
///
/// The header must contain every [`REQUIRED_FIELDS`] column; otherwise no
/// records are returned at all.
pub fn parse_records(payload: &str) -> Result<Vec<Record>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(payload.as_bytes());

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut records = Vec::new();
    for (position, row) in reader.records().enumerate() {
        let row = row?;
        records.push(layout.record(identity_of(position), &row));
    }

    debug!("Parsed {} rows with {} columns", records.len(), headers.len());
    Ok(records)
}
