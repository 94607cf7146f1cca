use std::collections::HashSet;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};

use crate::config::SinkConfig;
use crate::error::PublishError;
use crate::sanitize::truncate_chars;

use super::upload::Uploader;
use super::{PublishRequest, PublishSink, SinkTarget};

const MAX_CAPTION_CHARS: usize = 2200;

/// Reels sink. The caption carries the hashtags.
pub struct InstagramSink {
    uploader: Uploader,
}

impl InstagramSink {
    pub fn new(config: &SinkConfig, token: Option<SecretString>) -> Self {
        Self {
            uploader: Uploader::new("instagram", config, token),
        }
    }

    fn caption(request: &PublishRequest) -> String {
        let mut caption = request.caption.trim().to_string();
        let present: HashSet<String> = caption
            .split_whitespace()
            .filter(|word| word.starts_with('#'))
            .map(|word| word.trim_end_matches(|c: char| c.is_ascii_punctuation()))
            .map(str::to_lowercase)
            .collect();
        let mut missing: Vec<String> = Vec::new();
        for tag in &request.tags {
            let tag = format!("#{}", tag.trim().trim_start_matches('#'));
            if tag.len() > 1
                && !present.contains(&tag.to_lowercase())
                && !missing.contains(&tag)
            {
                missing.push(tag);
            }
        }
        if !missing.is_empty() {
            if !caption.is_empty() {
                caption.push_str("\n\n");
            }
            caption.push_str(&missing.join(" "));
        }
        truncate_chars(&caption, MAX_CAPTION_CHARS)
    }

    fn payload(request: &PublishRequest) -> Value {
        json!({
            "media_type": "REELS",
            "caption": Self::caption(request),
            "scheduled_publish_time": request.schedule_time,
            "video": {
                "name": request.filename,
                "content_type": request.content_type,
                "duration_secs": request.duration_secs,
            },
        })
    }
}

#[async_trait]
impl PublishSink for InstagramSink {
    fn name(&self) -> &str {
        "instagram"
    }

    fn target(&self) -> SinkTarget {
        SinkTarget::Instagram
    }

    async fn publish(&self, request: &PublishRequest) -> Result<String, PublishError> {
        self.uploader.upload(&Self::payload(request), request).await
    }
}
