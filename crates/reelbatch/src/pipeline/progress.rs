use std::fmt;

use log::{info, warn};

/// Phases of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Fetching,
    Windowing,
    ProcessingRecord(u64),
    Failed(u64),
    Aggregating,
    Checkpointing,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Fetching => f.write_str("fetching"),
            RunState::Windowing => f.write_str("windowing"),
            RunState::ProcessingRecord(id) => write!(f, "processing record {}", id),
            RunState::Failed(id) => write!(f, "record {} failed", id),
            RunState::Aggregating => f.write_str("aggregating"),
            RunState::Checkpointing => f.write_str("checkpointing"),
            RunState::Done => f.write_str("done"),
        }
    }
}

/// Events emitted by the pipeline during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    State(RunState),
    RecordCompleted {
        id: u64,
        filename: String,
        external_id: String,
    },
    RecordFailed {
        id: u64,
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for tests and library callers.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Reports progress through the logger.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::State(state) => info!("Run state: {}", state),
            ProgressEvent::RecordCompleted {
                id,
                filename,
                external_id,
            } => {
                if external_id.is_empty() {
                    info!("Record {} produced {}", id, filename);
                } else {
                    info!("Record {} produced {} ({})", id, filename, external_id);
                }
            }
            ProgressEvent::RecordFailed { id, error } => {
                warn!("Record {} failed: {}", id, error);
            }
        }
    }
}
