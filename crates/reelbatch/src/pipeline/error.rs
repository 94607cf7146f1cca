use thiserror::Error;

/// Failures that abort a run before any record is attempted.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load records: {0}")]
    Source(#[from] crate::error::SourceError),

    #[error("Failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),
}
