use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Cursor error: {0}")]
    Cursor(#[from] CursorError),

    #[error("Packaging error: {0}")]
    Package(#[from] PackageError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),

    #[error("Run aborted: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// Failures of the source fetcher. Every variant is fatal to a run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to fetch '{location}': {message}")]
    Fetch { location: String, message: String },

    #[error("Failed to parse tabular data: {0}")]
    Parse(#[from] csv::Error),

    #[error("Source is missing required fields: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write artifact '{path}': {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Renderer rejected record {id}: {reason}")]
    Rejected { id: u64, reason: String },
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{sink} request failed: {source}")]
    Http {
        sink: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{sink} returned status {status}: {body}")]
    Status {
        sink: String,
        status: u16,
        body: String,
    },

    #[error("{sink} could not read artifact '{path}': {source}")]
    Artifact {
        sink: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{sink} response did not contain an id")]
    MissingId { sink: String },

    #[error("Failed to read archive '{path}': {message}")]
    Archive { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum CursorError {
    #[error("Failed to create state directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write state file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Nothing to package")]
    Empty,

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write archive '{path}': {source}")]
    WriteArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write manifest: {0}")]
    Manifest(String),
}

pub type Result<T> = std::result::Result<T, ReelError>;
