use std::ops::Range;
use std::path::PathBuf;

use crate::package::ManifestEntry;
use crate::render::Artifact;

use super::summary::RunSummary;

/// Result of processing one record. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Success {
        video_filename: String,
        /// `(sink, id)` for every sink that accepted the artifact.
        external_ids: Vec<(String, String)>,
    },
    Failure {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub id: u64,
    pub outcome: ProcessingOutcome,
}

/// Mutable state of one run, filled in phase by phase.
pub struct RunContext {
    // Input
    pub cursor: u64,

    // Fetching / windowing
    pub total: usize,
    pub window: Range<usize>,

    // Per record, in window order
    pub outcomes: Vec<RecordOutcome>,
    pub manifest: Vec<ManifestEntry>,
    pub artifacts: Vec<Artifact>,

    // Aggregating
    pub archive_path: Option<PathBuf>,
    pub next_cursor: Option<u64>,

    // Non-fatal errors, in the order they happened
    pub errors: Vec<String>,
}

impl RunContext {
    pub fn new(cursor: u64) -> Self {
        Self {
            cursor,
            total: 0,
            window: 0..0,
            outcomes: Vec::new(),
            manifest: Vec::new(),
            artifacts: Vec::new(),
            archive_path: None,
            next_cursor: None,
            errors: Vec::new(),
        }
    }

    pub fn window_was_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn successes(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, ProcessingOutcome::Success { .. }))
            .count()
    }

    /// Identity of the last successful record in processing order.
    pub fn last_success(&self) -> Option<u64> {
        self.outcomes
            .iter()
            .rev()
            .find(|o| matches!(o.outcome, ProcessingOutcome::Success { .. }))
            .map(|o| o.id)
    }

    /// The cursor is persisted only when it moved forward or the window was
    /// empty. A window where every record failed leaves the stored value alone.
    pub fn should_checkpoint(&self) -> bool {
        self.successes() > 0 || self.window_was_empty()
    }

    pub fn into_summary(self) -> RunSummary {
        RunSummary {
            videos_generated: self.successes(),
            next_start_index: self.next_cursor,
            zip_path: self
                .archive_path
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            errors: self.errors,
        }
    }
}
