//! Publish sinks: destinations that accept a finished artifact and return an
//! external identifier.
//!
//! A sink failure never demotes a record's success; callers log the error,
//! collect it, and move on to the next sink.

pub mod archive;
pub mod instagram;
pub mod upload;
pub mod youtube;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::PublishConfig;
use crate::content::ContentBundle;
use crate::error::PublishError;
use crate::package::ManifestEntry;
use crate::render::Artifact;
use crate::secrets::Credentials;
use crate::source::{Record, RecordType};

pub use archive::{publish_archive, PublishReport};
pub use instagram::InstagramSink;
pub use upload::Uploader;
pub use youtube::YouTubeSink;

/// Which per-record opt-in flag a sink honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkTarget {
    YouTube,
    Instagram,
}

impl SinkTarget {
    pub fn wanted_by(&self, record: &Record) -> bool {
        match self {
            SinkTarget::YouTube => record.upload_youtube,
            SinkTarget::Instagram => record.upload_instagram,
        }
    }
}

/// Everything a sink receives for one artifact.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub record_id: u64,
    pub title: String,
    pub description: String,
    pub caption: String,
    pub tags: Vec<String>,
    pub record_type: RecordType,
    pub schedule_time: Option<String>,
    pub filename: String,
    pub content_type: String,
    pub duration_secs: u32,
    pub video_path: PathBuf,
}

impl PublishRequest {
    /// A record's own caption wins over the generated one when present.
    pub fn from_record(record: &Record, bundle: &ContentBundle, artifact: &Artifact) -> Self {
        let caption = record
            .caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .unwrap_or_else(|| bundle.caption.clone());

        Self {
            record_id: record.id,
            title: record.title.clone(),
            description: bundle.description.clone(),
            caption,
            tags: record.tags.clone(),
            record_type: record.record_type,
            schedule_time: record.schedule_time.clone(),
            filename: artifact.video_filename(),
            content_type: content_type_for(&artifact.video_filename()),
            duration_secs: artifact.duration_secs,
            video_path: artifact.video_path.clone(),
        }
    }

    pub fn from_manifest(entry: &ManifestEntry, video_path: PathBuf) -> Self {
        Self {
            record_id: entry.id,
            title: entry.title.clone(),
            description: entry.description.clone(),
            caption: entry.caption.clone(),
            tags: entry.tag_list(),
            record_type: entry.record_type,
            schedule_time: entry.schedule_time.clone(),
            filename: entry.filename.clone(),
            content_type: content_type_for(&entry.filename),
            duration_secs: entry.duration_secs,
            video_path,
        }
    }
}

fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[async_trait]
pub trait PublishSink: Send + Sync {
    fn name(&self) -> &str;

    fn target(&self) -> SinkTarget;

    /// Publishes one artifact and returns the platform's identifier for it.
    async fn publish(&self, request: &PublishRequest) -> Result<String, PublishError>;
}

/// The configured sinks, in a fixed order (YouTube before Instagram).
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn PublishSink>>,
}

impl SinkSet {
    pub fn new(sinks: Vec<Box<dyn PublishSink>>) -> Self {
        Self { sinks }
    }

    /// Builds every enabled sink. Missing credentials make a sink simulated,
    /// not absent.
    pub fn from_config(config: &PublishConfig, credentials: &Credentials) -> Self {
        let mut sinks: Vec<Box<dyn PublishSink>> = Vec::new();
        if config.youtube.enabled {
            sinks.push(Box::new(YouTubeSink::new(
                &config.youtube,
                credentials.youtube_token.clone(),
            )));
        }
        if config.instagram.enabled {
            sinks.push(Box::new(InstagramSink::new(
                &config.instagram,
                credentials.instagram_token.clone(),
            )));
        }
        Self { sinks }
    }

    /// Sinks the record opted into.
    pub fn for_record<'a>(
        &'a self,
        record: &'a Record,
    ) -> impl Iterator<Item = &'a dyn PublishSink> + 'a {
        self.sinks
            .iter()
            .map(|s| s.as_ref())
            .filter(move |s| s.target().wanted_by(record))
    }

    pub fn all(&self) -> impl Iterator<Item = &dyn PublishSink> {
        self.sinks.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}
