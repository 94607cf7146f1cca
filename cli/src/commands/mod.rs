pub mod publish;
pub mod run;

use std::path::Path;

use anyhow::Context;
use reelbatch::config::validate_config;
use reelbatch::sanitize::redact_path;
use reelbatch::Config;

/// Loads the config file when given, otherwise the built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => reelbatch::load_config(path)
            .with_context(|| format!("loading config {}", redact_path(path)))?,
        None => Config::default(),
    };
    validate_config(&config)?;
    Ok(config)
}
