use std::path::PathBuf;

use crate::config::Config;
use crate::render::DurationPolicy;

pub struct PipelineConfig {
    pub max_per_run: usize,
    pub state_file: PathBuf,
    pub default_cursor: u64,
    pub output_directory: PathBuf,
    pub archive_name: String,
    pub render_extension: String,
    pub duration: DurationPolicy,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_per_run: config.max_per_run,
            state_file: PathBuf::from(crate::secrets::expand_home(&config.state_file)),
            default_cursor: config.default_cursor,
            output_directory: PathBuf::from(crate::secrets::expand_home(
                &config.output_directory,
            )),
            archive_name: config.archive_name.clone(),
            render_extension: config.render.extension.clone(),
            duration: DurationPolicy::from_config(&config.duration),
        }
    }
}
