//! Content generation for records.
//!
//! A [`ContentGenerator`] tries an external provider once and falls back to a
//! deterministic template when the provider is unconfigured or fails, so a
//! caller always gets a complete [`ContentBundle`].

pub mod fallback;
pub mod generator;
pub mod provider;

use serde::{Deserialize, Serialize};

use crate::source::{Record, RecordType};

pub use fallback::TemplateFallback;
pub use generator::{ContentGenerator, GeneratedContent};
pub use provider::{ContentError, ContentProvider, OpenAiProvider};

/// Inputs for generating one record's content.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub title: String,
    pub prompt: String,
    pub record_type: RecordType,
    pub tags: Vec<String>,
}

impl From<&Record> for ContentRequest {
    fn from(record: &Record) -> Self {
        Self {
            title: record.title.clone(),
            prompt: record.prompt.clone(),
            record_type: record.record_type,
            tags: record.tags.clone(),
        }
    }
}

/// The four generated text fields for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    pub script: String,
    pub description: String,
    pub thumbnail_title: String,
    pub caption: String,
}

impl ContentBundle {
    /// Name of the first blank field, if any.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("script", &self.script),
            ("description", &self.description),
            ("thumbnail_title", &self.thumbnail_title),
            ("caption", &self.caption),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Which strategy produced a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Provider,
    Fallback,
}

impl ContentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSource::Provider => "provider",
            ContentSource::Fallback => "fallback",
        }
    }
}
