use std::path::Path;

use crate::config::schema::{Config, DurationRange, CONFIG_VERSION};
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.max_per_run == 0 {
        return Err(ConfigError::Validation {
            message: "max_per_run must be at least 1".to_string(),
        });
    }

    if config.default_cursor == 0 {
        return Err(ConfigError::Validation {
            message: "default_cursor must be at least 1".to_string(),
        });
    }

    if config.state_file.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "state_file must not be empty".to_string(),
        });
    }

    let archive = config.archive_name.trim();
    if archive.is_empty() || archive.contains('/') || archive.contains('\\') {
        return Err(ConfigError::Validation {
            message: format!(
                "archive_name must be a plain file name: '{}'",
                config.archive_name
            ),
        });
    }

    let extension = config.render.extension.trim();
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation {
            message: format!(
                "render.extension must be alphanumeric: '{}'",
                config.render.extension
            ),
        });
    }

    validate_range("duration.short", &config.duration.short)?;
    validate_range("duration.long", &config.duration.long)?;

    validate_timeout("content.timeout_secs", config.content.timeout_secs)?;
    validate_timeout("publish.youtube.timeout_secs", config.publish.youtube.timeout_secs)?;
    validate_timeout(
        "publish.instagram.timeout_secs",
        config.publish.instagram.timeout_secs,
    )?;

    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation {
            message: format!("{} must be at least 1", name),
        });
    }
    Ok(())
}

fn validate_range(name: &str, range: &DurationRange) -> Result<(), ConfigError> {
    if range.min_secs == 0 || range.min_secs > range.max_secs {
        return Err(ConfigError::Validation {
            message: format!(
                "{} must satisfy 0 < min_secs <= max_secs (got {}..={})",
                name, range.min_secs, range.max_secs
            ),
        });
    }
    Ok(())
}
