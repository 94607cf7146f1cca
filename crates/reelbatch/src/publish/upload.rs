use std::time::Duration;

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::SinkConfig;
use crate::error::PublishError;
use crate::sanitize;

use super::PublishRequest;

const MAX_ERROR_BODY_LENGTH: usize = 200;

/// HTTP plumbing shared by the platform sinks.
///
/// With both an endpoint and a token the artifact is POSTed as
/// `multipart/form-data` with bearer auth: a JSON `metadata` part followed by
/// a `file` part carrying the rendered bytes. The response's `id` is returned.
/// Otherwise the upload is simulated and a `sim-<sink>-<uuid>` id is returned.
/// The artifact is read in both modes, so a missing file fails either way.
pub struct Uploader {
    sink: &'static str,
    client: reqwest::Client,
    endpoint: Option<String>,
    token: Option<SecretString>,
}

impl Uploader {
    pub fn new(sink: &'static str, config: &SinkConfig, token: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            sink,
            client,
            endpoint: config
                .endpoint
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(String::from),
            token,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.endpoint.is_none() || self.token.is_none()
    }

    pub async fn upload(
        &self,
        metadata: &Value,
        request: &PublishRequest,
    ) -> Result<String, PublishError> {
        let bytes = tokio::fs::read(&request.video_path)
            .await
            .map_err(|e| PublishError::Artifact {
                sink: self.sink.to_string(),
                path: request.video_path.clone(),
                source: e,
            })?;

        let (endpoint, token) = match (&self.endpoint, &self.token) {
            (Some(endpoint), Some(token)) => (endpoint, token),
            _ => {
                let id = format!("sim-{}-{}", self.sink, uuid::Uuid::new_v4());
                info!(
                    "{} upload of {} ({} bytes) simulated (no endpoint or token), id {}",
                    self.sink,
                    request.filename,
                    bytes.len(),
                    id
                );
                return Ok(id);
            }
        };

        debug!(
            "Uploading {} ({} bytes) to {} at {}",
            request.filename,
            bytes.len(),
            self.sink,
            sanitize::redact_url(endpoint)
        );

        let form = self.form(metadata, request, bytes)?;
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(token.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.http_err(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Status {
                sink: self.sink.to_string(),
                status,
                body: sanitize::truncate_chars(&body, MAX_ERROR_BODY_LENGTH),
            });
        }

        let body: Value = response.json().await.map_err(|e| self.http_err(e))?;

        extract_id(&body).ok_or_else(|| PublishError::MissingId {
            sink: self.sink.to_string(),
        })
    }

    fn form(
        &self,
        metadata: &Value,
        request: &PublishRequest,
        bytes: Vec<u8>,
    ) -> Result<Form, PublishError> {
        let metadata = Part::text(metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| self.http_err(e))?;
        let file = Part::bytes(bytes)
            .file_name(request.filename.clone())
            .mime_str(&request.content_type)
            .map_err(|e| self.http_err(e))?;

        Ok(Form::new().part("metadata", metadata).part("file", file))
    }

    fn http_err(&self, source: reqwest::Error) -> PublishError {
        PublishError::Http {
            sink: self.sink.to_string(),
            source,
        }
    }
}

/// Reads a non-empty `id` that is either a string or a number.
pub(crate) fn extract_id(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
