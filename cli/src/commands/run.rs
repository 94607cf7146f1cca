//! `reelbatch run`: one checkpointed batch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use log::{error, warn};
use reelbatch::config::validate_config;
use reelbatch::pipeline::{LogProgress, CI_OUTPUT_ENV};
use reelbatch::storage::CursorStore;
use reelbatch::{
    Config, Credentials, FileCursorStore, Pipeline, PipelineConfig, ReelError, RunSummary,
};

const DEFAULT_STATE_FILE: &str = "state.txt";

pub struct RunArgs {
    pub source: String,
    pub state_file: Option<PathBuf>,
    pub max_per_run: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

/// State file consulted when a run dies before printing its own summary.
///
/// Starts from `--state-file` (or the default) and follows the config's
/// `state_file` once the config has loaded.
#[derive(Clone)]
struct FallbackState(Arc<Mutex<PathBuf>>);

impl FallbackState {
    fn new(path: PathBuf) -> Self {
        Self(Arc::new(Mutex::new(path)))
    }

    fn set(&self, path: PathBuf) {
        match self.0.lock() {
            Ok(mut guard) => *guard = path,
            Err(poisoned) => *poisoned.into_inner() = path,
        }
    }

    fn get(&self) -> PathBuf {
        match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

pub async fn run(config_path: Option<&Path>, args: RunArgs) -> ExitCode {
    let fallback_state = FallbackState::new(
        args.state_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
    );
    install_panic_summary(fallback_state.clone());

    let (summary, exit) = match execute(config_path, &args, &fallback_state).await {
        Ok(summary) => (summary, ExitCode::SUCCESS),
        Err(e) => {
            error!("Run failed: {:#}", e);
            (summary_for_error(&e, &fallback_state.get()), ExitCode::FAILURE)
        }
    };

    emit(&summary);
    exit
}

async fn execute(
    config_path: Option<&Path>,
    args: &RunArgs,
    fallback_state: &FallbackState,
) -> anyhow::Result<RunSummary> {
    let mut config = super::load_config(config_path)?;
    if let Some(state_file) = &args.state_file {
        config.state_file = state_file.display().to_string();
    }
    if let Some(max_per_run) = args.max_per_run {
        config.max_per_run = max_per_run;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_directory = output_dir.display().to_string();
    }
    validate_config(&config)?;
    fallback_state.set(PipelineConfig::from_config(&config).state_file);

    Ok(run_pipeline(&config, &args.source).await?)
}

async fn run_pipeline(config: &Config, source: &str) -> reelbatch::Result<RunSummary> {
    let credentials = Credentials::resolve(config);
    let pipeline = Pipeline::from_config(config, &credentials);
    Ok(pipeline.run(source, &LogProgress).await?)
}

/// A failed fetch reports a null cursor. Anything else reports the stored
/// cursor so downstream steps still see a usable value.
fn summary_for_error(e: &anyhow::Error, state_file: &Path) -> RunSummary {
    if let Some(ReelError::Pipeline(pipeline_error)) = e.downcast_ref::<ReelError>() {
        return RunSummary::fatal(pipeline_error.to_string());
    }
    fallback_summary(format!("{:#}", e), state_file)
}

fn fallback_summary(error: String, state_file: &Path) -> RunSummary {
    RunSummary {
        videos_generated: 0,
        next_start_index: Some(FileCursorStore::new(state_file, 1).read()),
        zip_path: String::new(),
        errors: vec![error],
    }
}

/// Prints a best-effort summary if anything panics before one is emitted.
fn install_panic_summary(state_file: FallbackState) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        let summary = fallback_summary(format!("unexpected error: {}", info), &state_file.get());
        println!("{}", summary.to_json());
    }));
}

fn emit(summary: &RunSummary) {
    println!("{}", summary.to_json());

    if let Some(path) = std::env::var_os(CI_OUTPUT_ENV).filter(|p| !p.is_empty()) {
        if let Err(e) = summary.append_ci_outputs(Path::new(&path)) {
            warn!("Failed to write CI outputs: {}", e);
        }
    }
}
