//! Secret resolution for the content provider and publish sinks.
//!
//! Each secret can come from one of three sources, checked in priority order:
//!
//! 1. **Direct value** - handy for local testing (e.g., `"api_key": "sk-..."`)
//! 2. **File reference** - Docker/Kubernetes secret mounts (e.g., `"api_key_file": "/run/secrets/key"`)
//! 3. **Env var reference** - CI secrets (e.g., `"api_key_env": "OPENAI_API_KEY"`)
//!
//! Secrets are resolved exactly once per process into a [`Credentials`] value
//! that is handed to the components that need them.

use log::{debug, warn};
use secrecy::SecretString;
use std::fs;

use crate::config::schema::{Config, SecretRef};

/// Error type for secret resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No secret source provided (need one of: direct value, file path, or env var name)")]
    NoSourceProvided,

    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

/// Result type for secret resolution.
pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret from multiple sources in priority order:
/// 1. Direct value (if provided and non-empty)
/// 2. File contents (if path provided)
/// 3. Environment variable (if name provided)
///
/// # Examples
///
/// ```ignore
/// use reelbatch::secrets::resolve_secret;
///
/// let key = resolve_secret(None, None, Some("OPENAI_API_KEY"))?;
/// ```
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = direct {
        if !value.is_empty() {
            return Ok(SecretString::from(value.to_string()));
        }
    }

    if let Some(path) = file_path {
        if !path.is_empty() {
            let expanded = expand_home(path);
            return match fs::read_to_string(&expanded) {
                Ok(content) => Ok(SecretString::from(content.trim().to_string())),
                Err(e) => Err(SecretError::FileReadError {
                    path: expanded,
                    source: e,
                }),
            };
        }
    }

    if let Some(var_name) = env_var {
        if !var_name.is_empty() {
            return match std::env::var(var_name) {
                Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim())),
                Ok(_) | Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                    name: var_name.to_string(),
                }),
                Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                    name: var_name.to_string(),
                }),
            };
        }
    }

    Err(SecretError::NoSourceProvided)
}

/// Resolves a secret, returning `None` when it is simply absent.
///
/// Both "no source configured" and "env var not set" count as absent: a
/// missing credential selects fallback or simulated behavior downstream.
/// Unreadable files and non-UTF-8 variables are still errors.
pub fn resolve_secret_optional(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<Option<SecretString>> {
    match resolve_secret(direct, file_path, env_var) {
        Ok(secret) => Ok(Some(secret)),
        Err(SecretError::NoSourceProvided) | Err(SecretError::EnvVarNotSet { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Expands `~` to the user's home directory.
///
/// Only `~` and `~/path` are supported, not `~user/path`.
pub fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            if path == "~" {
                return home.to_string_lossy().into_owned();
            }
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

/// Credentials for every external collaborator, resolved once at startup.
#[derive(Clone, Default)]
pub struct Credentials {
    pub content_api_key: Option<SecretString>,
    pub youtube_token: Option<SecretString>,
    pub instagram_token: Option<SecretString>,
}

impl Credentials {
    /// Resolves all configured secrets.
    ///
    /// A secret that fails to resolve (unreadable file, invalid UTF-8) is
    /// logged and treated as absent so the run can still proceed with
    /// fallback content and simulated publishing.
    pub fn resolve(config: &Config) -> Self {
        Self {
            content_api_key: resolve_logged("content provider", &config.content.api_key),
            youtube_token: resolve_logged("youtube", &config.publish.youtube.token),
            instagram_token: resolve_logged("instagram", &config.publish.instagram.token),
        }
    }
}

fn resolve_logged(label: &str, secret: &SecretRef) -> Option<SecretString> {
    match resolve_secret_optional(
        secret.value.as_deref(),
        secret.file.as_deref(),
        secret.env.as_deref(),
    ) {
        Ok(Some(value)) => {
            debug!("Resolved {} credential", label);
            Some(value)
        }
        Ok(None) => {
            debug!("No {} credential configured", label);
            None
        }
        Err(e) => {
            warn!("Ignoring {} credential: {}", label, e);
            None
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("content_api_key", &self.content_api_key.is_some())
            .field("youtube_token", &self.youtube_token.is_some())
            .field("instagram_token", &self.instagram_token.is_some())
            .finish()
    }
}
