//! Builders and scripted collaborators for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reelbatch::error::{CursorError, PublishError, RenderError};
use reelbatch::publish::{PublishRequest, PublishSink, SinkTarget};
use reelbatch::render::{Artifact, ArtifactRenderer, PlaceholderRenderer, RenderRequest};
use reelbatch::storage::CursorStore;

pub const HEADER: &str = "title,prompt,type,tags,upload_youtube,upload_instagram";

/// Builds a CSV source with the required columns.
pub struct CsvBuilder {
    header: String,
    rows: Vec<String>,
}

impl CsvBuilder {
    pub fn new() -> Self {
        Self {
            header: HEADER.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn with_header(header: &str) -> Self {
        Self {
            header: header.to_string(),
            rows: Vec::new(),
        }
    }

    /// Adds `count` short records that opt out of every sink.
    pub fn records(mut self, count: usize) -> Self {
        for _ in 0..count {
            let n = self.rows.len() + 1;
            self.rows
                .push(format!("Video {n},Prompt {n},short,tag{n},no,no"));
        }
        self
    }

    pub fn row(mut self, row: &str) -> Self {
        self.rows.push(row.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut csv = self.header.clone();
        csv.push('\n');
        for row in &self.rows {
            csv.push_str(row);
            csv.push('\n');
        }
        csv
    }
}

/// Placeholder renderer that fails for the listed identities and counts calls.
pub struct ScriptedRenderer {
    inner: PlaceholderRenderer,
    fail_ids: Vec<u64>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedRenderer {
    pub fn succeeding() -> Self {
        Self::failing(&[])
    }

    pub fn failing(ids: &[u64]) -> Self {
        Self {
            inner: PlaceholderRenderer::default(),
            fail_ids: ids.to_vec(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl ArtifactRenderer for ScriptedRenderer {
    async fn render(
        &self,
        request: &RenderRequest<'_>,
        workdir: &Path,
    ) -> Result<Artifact, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ids.contains(&request.record.id) {
            return Err(RenderError::Rejected {
                id: request.record.id,
                reason: "scripted render failure".to_string(),
            });
        }
        self.inner.render(request, workdir).await
    }
}

/// Sink that records the identities it was asked to publish and the
/// artifact bytes it received for each.
pub struct RecordingSink {
    name: &'static str,
    target: SinkTarget,
    fail: bool,
    pub published: Arc<Mutex<Vec<u64>>>,
    pub artifacts: Arc<Mutex<Vec<(u64, Vec<u8>)>>>,
}

impl RecordingSink {
    pub fn new(target: SinkTarget) -> Self {
        let name = match target {
            SinkTarget::YouTube => "youtube",
            SinkTarget::Instagram => "instagram",
        };
        Self {
            name,
            target,
            fail: false,
            published: Arc::new(Mutex::new(Vec::new())),
            artifacts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(target: SinkTarget) -> Self {
        Self {
            fail: true,
            ..Self::new(target)
        }
    }

    pub fn log(&self) -> Arc<Mutex<Vec<u64>>> {
        self.published.clone()
    }

    pub fn artifact_log(&self) -> Arc<Mutex<Vec<(u64, Vec<u8>)>>> {
        self.artifacts.clone()
    }
}

#[async_trait]
impl PublishSink for RecordingSink {
    fn name(&self) -> &str {
        self.name
    }

    fn target(&self) -> SinkTarget {
        self.target
    }

    async fn publish(&self, request: &PublishRequest) -> Result<String, PublishError> {
        self.published.lock().unwrap().push(request.record_id);
        let bytes = tokio::fs::read(&request.video_path)
            .await
            .map_err(|e| PublishError::Artifact {
                sink: self.name.to_string(),
                path: request.video_path.clone(),
                source: e,
            })?;
        self.artifacts
            .lock()
            .unwrap()
            .push((request.record_id, bytes));
        if self.fail {
            return Err(PublishError::Status {
                sink: self.name.to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(format!("{}-{}", self.name, request.record_id))
    }
}

/// Cursor store whose writes always fail.
pub struct ReadOnlyCursor(pub u64);

impl CursorStore for ReadOnlyCursor {
    fn read(&self) -> u64 {
        self.0
    }

    fn write(&self, _next: u64) -> Result<(), CursorError> {
        Err(CursorError::WriteFile {
            path: "state.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}
