pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;
pub mod summary;
pub mod window;

pub use config::PipelineConfig;
pub use context::{ProcessingOutcome, RecordOutcome, RunContext};
pub use error::PipelineError;
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter, RunState};
pub use runner::Pipeline;
pub use summary::{RunSummary, CI_OUTPUT_ENV};
