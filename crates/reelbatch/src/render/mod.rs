//! Artifact rendering contract.
//!
//! Real video rendering lives outside this crate; the pipeline only needs an
//! [`ArtifactRenderer`] that writes files into a scratch directory and reports
//! failure distinctly so the record can be skipped.

pub mod placeholder;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::{DurationConfig, DurationRange};
use crate::content::ContentBundle;
use crate::error::RenderError;
use crate::source::{Record, RecordType};

pub use placeholder::PlaceholderRenderer;

/// Everything a renderer needs for one record.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub record: &'a Record,
    pub bundle: &'a ContentBundle,
    pub duration_secs: u32,
}

/// Files produced for one record, owned by the run's scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: u64,
    pub video_path: PathBuf,
    pub script_path: Option<PathBuf>,
    pub duration_secs: u32,
}

impl Artifact {
    pub fn video_filename(&self) -> String {
        file_name(&self.video_path)
    }

    /// Every file belonging to this artifact, video first.
    pub fn files(&self) -> Vec<&Path> {
        let mut files = vec![self.video_path.as_path()];
        if let Some(script) = &self.script_path {
            files.push(script.as_path());
        }
        files
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
pub trait ArtifactRenderer: Send + Sync {
    async fn render(
        &self,
        request: &RenderRequest<'_>,
        workdir: &Path,
    ) -> Result<Artifact, RenderError>;
}

/// Picks a clip duration from the range matching the record type.
///
/// The pick is deterministic per record identity so re-running a failed
/// window produces the same durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    pub short: DurationRange,
    pub long: DurationRange,
}

impl DurationPolicy {
    pub fn from_config(config: &DurationConfig) -> Self {
        Self {
            short: config.short,
            long: config.long,
        }
    }

    pub fn duration_for(&self, record: &Record) -> u32 {
        let range = match record.record_type {
            RecordType::Short => self.short,
            RecordType::Long => self.long,
        };
        let span = u64::from(range.max_secs.saturating_sub(range.min_secs)) + 1;
        let offset = record.id.wrapping_mul(7919) % span;
        range.min_secs + offset as u32
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self::from_config(&DurationConfig::default())
    }
}
