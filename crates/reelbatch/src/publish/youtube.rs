use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};

use crate::config::SinkConfig;
use crate::error::PublishError;
use crate::source::RecordType;

use super::upload::Uploader;
use super::{PublishRequest, PublishSink, SinkTarget};

const MAX_TITLE_CHARS: usize = 100;

/// Video-platform sink. Scheduled records are uploaded private with a
/// `publish_at` time; everything else goes out public.
pub struct YouTubeSink {
    uploader: Uploader,
}

impl YouTubeSink {
    pub fn new(config: &SinkConfig, token: Option<SecretString>) -> Self {
        Self {
            uploader: Uploader::new("youtube", config, token),
        }
    }

    fn payload(request: &PublishRequest) -> Value {
        let (privacy, publish_at) = match request.schedule_time.as_deref().map(str::trim) {
            Some(time) if !time.is_empty() => ("private", Some(time)),
            _ => ("public", None),
        };

        json!({
            "snippet": {
                "title": crate::sanitize::truncate_chars(&request.title, MAX_TITLE_CHARS),
                "description": request.description,
                "tags": request.tags,
            },
            "status": {
                "privacy_status": privacy,
                "publish_at": publish_at,
                "short": request.record_type == RecordType::Short,
            },
            "file": {
                "name": request.filename,
                "content_type": request.content_type,
                "duration_secs": request.duration_secs,
            },
        })
    }
}

#[async_trait]
impl PublishSink for YouTubeSink {
    fn name(&self) -> &str {
        "youtube"
    }

    fn target(&self) -> SinkTarget {
        SinkTarget::YouTube
    }

    async fn publish(&self, request: &PublishRequest) -> Result<String, PublishError> {
        self.uploader.upload(&Self::payload(request), request).await
    }
}
