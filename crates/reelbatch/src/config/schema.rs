use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    /// Path of the cursor file holding the next row to process.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default = "default_max_per_run")]
    pub max_per_run: usize,
    /// Cursor used when the state file is missing or corrupt.
    #[serde(default = "default_cursor")]
    pub default_cursor: u64,
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    #[serde(default)]
    pub duration: DurationConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_state_file() -> String {
    "state.txt".to_string()
}

fn default_max_per_run() -> usize {
    2
}

fn default_cursor() -> u64 {
    1
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_archive_name() -> String {
    "production_package.zip".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            state_file: default_state_file(),
            max_per_run: default_max_per_run(),
            default_cursor: default_cursor(),
            output_directory: default_output_directory(),
            archive_name: default_archive_name(),
            duration: DurationConfig::default(),
            render: RenderConfig::default(),
            content: ContentConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

/// Inclusive duration range in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_secs: u32,
    pub max_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationConfig {
    #[serde(default = "default_short_range")]
    pub short: DurationRange,
    #[serde(default = "default_long_range")]
    pub long: DurationRange,
}

fn default_short_range() -> DurationRange {
    DurationRange {
        min_secs: 15,
        max_secs: 60,
    }
}

fn default_long_range() -> DurationRange {
    DurationRange {
        min_secs: 120,
        max_secs: 600,
    }
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            short: default_short_range(),
            long: default_long_range(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// File extension of rendered video artifacts.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "mp4".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

/// Where to find a secret. See [`crate::secrets::resolve_secret`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretRef {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub env: Option<String>,
}

impl SecretRef {
    pub fn env(name: &str) -> Self {
        Self {
            env: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn direct(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_content_base_url")]
    pub base_url: String,
    #[serde(default = "default_content_model")]
    pub model: String,
    #[serde(default = "default_content_api_key")]
    pub api_key: SecretRef,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_content_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_content_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_content_api_key() -> SecretRef {
    SecretRef::env("OPENAI_API_KEY")
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: default_content_base_url(),
            model: default_content_model(),
            api_key: default_content_api_key(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upload endpoint. Without an endpoint and a token the sink runs simulated.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub token: SecretRef,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

impl SinkConfig {
    fn with_token_env(name: &str) -> Self {
        Self {
            enabled: true,
            endpoint: None,
            token: SecretRef::env(name),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            token: SecretRef::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_youtube")]
    pub youtube: SinkConfig,
    #[serde(default = "default_instagram")]
    pub instagram: SinkConfig,
}

fn default_youtube() -> SinkConfig {
    SinkConfig::with_token_env("YOUTUBE_API_TOKEN")
}

fn default_instagram() -> SinkConfig {
    SinkConfig::with_token_env("INSTAGRAM_ACCESS_TOKEN")
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            youtube: default_youtube(),
            instagram: default_instagram(),
        }
    }
}
