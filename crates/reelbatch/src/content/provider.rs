//! External content provider (OpenAI-compatible chat completions).

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ContentConfig;
use crate::sanitize::{sanitize_for_prompt, truncate_chars};

use super::{ContentBundle, ContentRequest};

const MAX_PROMPT_CHARS: usize = 1500;
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Errors from the primary content strategy. Never escapes the generator.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider returned no message content")]
    EmptyResponse,

    #[error("Failed to parse provider response: {0}")]
    ResponseParse(String),

    #[error("Provider response is missing field '{0}'")]
    MissingField(&'static str),
}

/// A primary content strategy.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &ContentRequest) -> Result<ContentBundle, ContentError>;
}

/// Chat-completions client requesting a JSON object response.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiProvider {
    pub fn new(config: &ContentConfig, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        }
    }

    fn build_messages(&self, request: &ContentRequest) -> Vec<ChatMessage> {
        let format = match request.record_type {
            crate::source::RecordType::Short => "a vertical short under 60 seconds",
            crate::source::RecordType::Long => "a long-form video of several minutes",
        };

        let tags = request
            .tags
            .iter()
            .map(|t| sanitize_for_prompt(t))
            .collect::<Vec<_>>()
            .join(", ");

        let user = format!(
            "Format: {format}\nTitle: {title}\nTags: {tags}\nBrief:\n{prompt}\n\n\
             Return JSON: {{\"script\": \"...\", \"description\": \"...\", \
             \"thumbnail_title\": \"...\", \"caption\": \"...\"}}",
            format = format,
            title = sanitize_for_prompt(&request.title),
            tags = tags,
            prompt = truncate_chars(&sanitize_for_prompt(&request.prompt), MAX_PROMPT_CHARS),
        );

        vec![
            ChatMessage {
                role: "system".to_string(),
                content: "You write scripts and metadata for social videos. \
                          Respond ONLY with a JSON object containing the keys \
                          script, description, thumbnail_title and caption. \
                          thumbnail_title must be at most 40 characters."
                    .to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user,
            },
        ]
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Structured payload as returned by the provider; every field is validated.
#[derive(Debug, Deserialize)]
struct RawBundle {
    script: Option<String>,
    description: Option<String>,
    thumbnail_title: Option<String>,
    caption: Option<String>,
}

#[async_trait]
impl ContentProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &ContentRequest) -> Result<ContentBundle, ContentError> {
        let body = ChatRequest {
            model: &self.model,
            messages: self.build_messages(request),
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ContentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ContentError::Status {
                status: status.as_u16(),
                body: truncate_chars(&text, MAX_ERROR_BODY_LENGTH),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ContentError::ResponseParse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ContentError::EmptyResponse)?;

        debug!("Provider response: {} chars", content.len());
        parse_bundle(&content)
    }
}

/// Parses and validates a structured response into a bundle.
pub fn parse_bundle(response: &str) -> Result<ContentBundle, ContentError> {
    let json = extract_json(response);
    let raw: RawBundle = serde_json::from_str(json).map_err(|e| {
        ContentError::ResponseParse(format!(
            "{}. Response was: {}",
            e,
            truncate_chars(json, MAX_ERROR_BODY_LENGTH)
        ))
    })?;

    fn required(value: Option<String>, name: &'static str) -> Result<String, ContentError> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ContentError::MissingField(name))
    }

    Ok(ContentBundle {
        script: required(raw.script, "script")?,
        description: required(raw.description, "description")?,
        thumbnail_title: required(raw.thumbnail_title, "thumbnail_title")?,
        caption: required(raw.caption, "caption")?,
    })
}

/// Extracts the first balanced JSON object from a response that may carry
/// extra text around it. Tracks string boundaries and escapes.
fn extract_json(response: &str) -> &str {
    let start = match response.find('{') {
        Some(idx) => idx,
        None => return response,
    };

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;
    let mut end = response.len();

    for (i, c) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    end = start + i + 1;
                    break;
                }
            }
            _ => {}
        }
    }

    &response[start..end]
}
