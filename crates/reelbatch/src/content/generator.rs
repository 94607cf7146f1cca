use log::{debug, warn};

use crate::config::ContentConfig;
use crate::secrets::Credentials;

use super::fallback::TemplateFallback;
use super::provider::{ContentProvider, OpenAiProvider};
use super::{ContentBundle, ContentRequest, ContentSource};

/// A bundle plus the strategy that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub bundle: ContentBundle,
    pub source: ContentSource,
}

/// Primary-then-fallback content strategy chain.
///
/// The provider is tried at most once per call; any failure (request error,
/// malformed response, missing field) switches to the template fallback,
/// which cannot fail. `generate` therefore has no error path.
pub struct ContentGenerator {
    provider: Option<Box<dyn ContentProvider>>,
    fallback: TemplateFallback,
}

impl ContentGenerator {
    pub fn new(provider: Option<Box<dyn ContentProvider>>) -> Self {
        Self {
            provider,
            fallback: TemplateFallback,
        }
    }

    /// Generator that never calls out.
    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    /// Uses the OpenAI-compatible provider when an API key was resolved.
    pub fn from_config(config: &ContentConfig, credentials: &Credentials) -> Self {
        match &credentials.content_api_key {
            Some(key) => Self::new(Some(Box::new(OpenAiProvider::new(config, key.clone())))),
            None => {
                debug!("No content provider key configured, using template fallback");
                Self::fallback_only()
            }
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate(&self, request: &ContentRequest) -> GeneratedContent {
        if let Some(provider) = &self.provider {
            match provider.generate(request).await {
                Ok(bundle) => match bundle.first_blank_field() {
                    None => {
                        return GeneratedContent {
                            bundle,
                            source: ContentSource::Provider,
                        };
                    }
                    Some(field) => warn!(
                        "{} returned blank '{}', using fallback content",
                        provider.name(),
                        field
                    ),
                },
                Err(e) => warn!("{} failed, using fallback content: {}", provider.name(), e),
            }
        }

        GeneratedContent {
            bundle: self.fallback.generate(request),
            source: ContentSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentError;
    use crate::source::RecordType;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedProvider {
        result: fn() -> Result<ContentBundle, ContentError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ContentProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _request: &ContentRequest) -> Result<ContentBundle, ContentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn request() -> ContentRequest {
        ContentRequest {
            title: "Title".to_string(),
            prompt: "Prompt".to_string(),
            record_type: RecordType::Short,
            tags: vec!["tag".to_string()],
        }
    }

    fn provider_bundle() -> Result<ContentBundle, ContentError> {
        Ok(ContentBundle {
            script: "provider script".to_string(),
            description: "provider description".to_string(),
            thumbnail_title: "PROVIDER".to_string(),
            caption: "provider caption".to_string(),
        })
    }

    fn generator(
        result: fn() -> Result<ContentBundle, ContentError>,
    ) -> (ContentGenerator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            result,
            calls: calls.clone(),
        };
        (ContentGenerator::new(Some(Box::new(provider))), calls)
    }

    #[tokio::test]
    async fn test_provider_success_is_used() {
        let (generator, calls) = generator(provider_bundle);
        let generated = generator.generate(&request()).await;
        assert_eq!(generated.source, ContentSource::Provider);
        assert_eq!(generated.bundle.script, "provider script");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back_once() {
        let (generator, calls) = generator(|| Err(ContentError::Request("boom".to_string())));
        let generated = generator.generate(&request()).await;
        assert_eq!(generated.source, ContentSource::Fallback);
        assert_eq!(generated.bundle.first_blank_field(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_field_falls_back() {
        let (generator, _) = generator(|| Err(ContentError::MissingField("caption")));
        let generated = generator.generate(&request()).await;
        assert_eq!(generated.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_blank_provider_field_falls_back() {
        let (generator, _) = generator(|| {
            let mut bundle = provider_bundle()?;
            bundle.caption = " ".to_string();
            Ok(bundle)
        });
        let generated = generator.generate(&request()).await;
        assert_eq!(generated.source, ContentSource::Fallback);
        assert!(!generated.bundle.caption.trim().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_uses_fallback() {
        let generator = ContentGenerator::from_config(&ContentConfig::default(), &Credentials::default());
        assert!(!generator.has_provider());
        let generated = generator.generate(&request()).await;
        assert_eq!(generated.source, ContentSource::Fallback);
    }

    #[tokio::test]
    async fn test_fallback_total_for_odd_inputs() {
        let generator = ContentGenerator::fallback_only();
        let inputs = [
            ("", "", RecordType::Short, vec![]),
            ("   ", "\n", RecordType::Long, vec!["".to_string()]),
            ("🎬", "…", RecordType::Short, vec!["#!?".to_string()]),
        ];
        for (title, prompt, record_type, tags) in inputs {
            let generated = generator
                .generate(&ContentRequest {
                    title: title.to_string(),
                    prompt: prompt.to_string(),
                    record_type,
                    tags,
                })
                .await;
            assert_eq!(generated.bundle.first_blank_field(), None);
        }
    }
}
