//! Deterministic, offline content templates.
//!
//! Used when no provider is configured or the provider fails. Pure string
//! composition: it cannot fail and every field is non-empty for any input.

use crate::sanitize::truncate_chars;
use crate::source::RecordType;

use super::{ContentBundle, ContentRequest};

const UNTITLED: &str = "Untitled video";
const THUMBNAIL_MAX_CHARS: usize = 40;

/// Template-based content strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFallback;

impl TemplateFallback {
    pub fn generate(&self, request: &ContentRequest) -> ContentBundle {
        let title = non_blank(&request.title).unwrap_or(UNTITLED);
        let prompt = non_blank(&request.prompt).unwrap_or(title);
        let hashtags = hashtags(&request.tags);

        let script = match request.record_type {
            RecordType::Short => format!(
                "Stop scrolling: {title}!\n\n{prompt}\n\nFollow for more in under a minute."
            ),
            RecordType::Long => format!(
                "Welcome! Today: {title}.\n\n\
                 Part 1 - The idea\n{prompt}\n\n\
                 Part 2 - Why it matters\nWe break down {title} step by step.\n\n\
                 Thanks for watching. Subscribe for the next episode."
            ),
        };

        let description = if hashtags.is_empty() {
            format!("{title}\n\n{prompt}")
        } else {
            format!("{title}\n\n{prompt}\n\n{hashtags}")
        };

        let thumbnail_title = truncate_chars(&title.to_uppercase(), THUMBNAIL_MAX_CHARS);

        let caption = if hashtags.is_empty() {
            title.to_string()
        } else {
            format!("{title} {hashtags}")
        };

        ContentBundle {
            script,
            description,
            thumbnail_title,
            caption,
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// `["rust lang", "c++"]` → `"#rustlang #c"`; tags with nothing usable are dropped.
fn hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| {
            tag.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}
