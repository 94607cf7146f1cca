pub mod config;
pub mod content;
pub mod error;
pub mod package;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod sanitize;
pub mod secrets;
pub mod source;
pub mod storage;

pub use config::{load_config, load_config_from_str, Config};
pub use content::{ContentBundle, ContentGenerator, ContentRequest, ContentSource};
pub use error::{
    ConfigError, CursorError, PackageError, PublishError, ReelError, RenderError, Result,
    SourceError,
};
pub use package::{ManifestEntry, Packager};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, RunSummary};
pub use publish::{publish_archive, PublishReport, SinkSet};
pub use render::{Artifact, ArtifactRenderer, PlaceholderRenderer};
pub use secrets::{resolve_secret, resolve_secret_optional, Credentials, SecretError};
pub use source::{Record, RecordSource, RecordType, SourceFetcher};
pub use storage::{CursorStore, FileCursorStore};
