use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::Config;
use crate::content::{ContentGenerator, ContentRequest};
use crate::package::{ManifestEntry, Packager};
use crate::publish::{PublishRequest, SinkSet};
use crate::render::{ArtifactRenderer, PlaceholderRenderer, RenderRequest};
use crate::sanitize;
use crate::secrets::Credentials;
use crate::source::{Record, RecordSource, SourceFetcher};
use crate::storage::{scratch_dir, CursorStore, FileCursorStore};

use super::config::PipelineConfig;
use super::context::{ProcessingOutcome, RecordOutcome, RunContext};
use super::error::PipelineError;
use super::progress::{ProgressEvent, ProgressReporter, RunState};
use super::summary::RunSummary;
use super::window;

const SOURCE_TIMEOUT_SECS: u64 = 60;

/// Sequential batch orchestrator.
///
/// One run reads the cursor, fetches all records, processes the window
/// starting at the cursor one record at a time, packages the successes and
/// persists the next cursor.
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    source: Box<dyn RecordSource>,
    generator: ContentGenerator,
    renderer: Box<dyn ArtifactRenderer>,
    sinks: SinkSet,
    cursor_store: Box<dyn CursorStore>,
    packager: Packager,
}

impl Pipeline {
    /// Production constructor. Builds all collaborators from config.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Self {
        let pipeline_config = Arc::new(PipelineConfig::from_config(config));
        let source = SourceFetcher::new(std::time::Duration::from_secs(SOURCE_TIMEOUT_SECS));
        let generator = ContentGenerator::from_config(&config.content, credentials);
        let renderer = PlaceholderRenderer::new(&pipeline_config.render_extension);
        let sinks = SinkSet::from_config(&config.publish, credentials);
        let cursor_store =
            FileCursorStore::new(&pipeline_config.state_file, pipeline_config.default_cursor);

        Self::new(
            pipeline_config,
            Box::new(source),
            generator,
            Box::new(renderer),
            sinks,
            Box::new(cursor_store),
        )
    }

    /// Injects specific collaborators.
    pub fn new(
        config: Arc<PipelineConfig>,
        source: Box<dyn RecordSource>,
        generator: ContentGenerator,
        renderer: Box<dyn ArtifactRenderer>,
        sinks: SinkSet,
        cursor_store: Box<dyn CursorStore>,
    ) -> Self {
        let packager = Packager::new(&config.output_directory, &config.archive_name);
        Self {
            config,
            source,
            generator,
            renderer,
            sinks,
            cursor_store,
            packager,
        }
    }

    /// Runs one batch against the records at `location`.
    ///
    /// Only a failed fetch or scratch setup returns `Err`; the cursor is not
    /// touched in that case. Every other failure is collected into the
    /// summary's errors.
    pub async fn run(
        &self,
        location: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary, PipelineError> {
        let span = info_span!(
            "run",
            source = %sanitize::redact_url(location),
            max_per_run = self.config.max_per_run,
        );
        self.run_inner(location, progress).instrument(span).await
    }

    async fn run_inner(
        &self,
        location: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary, PipelineError> {
        progress.report(ProgressEvent::State(RunState::Idle));
        let mut ctx = RunContext::new(self.cursor_store.read());
        info!("Starting run at cursor {}", ctx.cursor);

        // Fetching
        progress.report(ProgressEvent::State(RunState::Fetching));
        let records = match self.source.fetch(location).await {
            Ok(records) => records,
            Err(e) => {
                error!("Fetch failed, cursor left at {}: {}", ctx.cursor, e);
                return Err(e.into());
            }
        };
        ctx.total = records.len();

        // Windowing
        progress.report(ProgressEvent::State(RunState::Windowing));
        ctx.window = window::select_window(ctx.total, ctx.cursor, self.config.max_per_run);

        if ctx.window_was_empty() {
            info!(
                "Cursor {} is past the last of {} records, nothing to do",
                ctx.cursor, ctx.total
            );
            progress.report(ProgressEvent::State(RunState::Aggregating));
        } else {
            info!(
                "Processing records {}..={} of {}",
                window::identity_of(ctx.window.start),
                window::identity_of(ctx.window.end - 1),
                ctx.total
            );

            let scratch = scratch_dir().map_err(PipelineError::Scratch)?;
            for record in &records[ctx.window.clone()] {
                let span = info_span!("record", id = record.id, kind = %record.record_type);
                self.step_process_record(&mut ctx, record, scratch.path(), progress)
                    .instrument(span)
                    .await;
            }

            progress.report(ProgressEvent::State(RunState::Aggregating));
            self.step_package(&mut ctx);
        }

        ctx.next_cursor = Some(window::next_cursor(
            ctx.cursor,
            ctx.window_was_empty(),
            ctx.last_success(),
            ctx.total,
        ));

        progress.report(ProgressEvent::State(RunState::Checkpointing));
        self.step_checkpoint(&mut ctx);

        progress.report(ProgressEvent::State(RunState::Done));
        let summary = ctx.into_summary();
        info!(
            "Run finished: {} generated, next cursor {:?}, {} error(s)",
            summary.videos_generated,
            summary.next_start_index,
            summary.errors.len()
        );
        Ok(summary)
    }

    async fn step_process_record(
        &self,
        ctx: &mut RunContext,
        record: &Record,
        workdir: &Path,
        progress: &dyn ProgressReporter,
    ) {
        let id = record.id;
        progress.report(ProgressEvent::State(RunState::ProcessingRecord(id)));

        let content = self.generator.generate(&ContentRequest::from(record)).await;
        debug!("Record {} content from {}", id, content.source.as_str());

        let request = RenderRequest {
            record,
            bundle: &content.bundle,
            duration_secs: self.config.duration.duration_for(record),
        };
        let artifact = match self.renderer.render(&request, workdir).await {
            Ok(artifact) => artifact,
            Err(e) => {
                let reason = e.to_string();
                warn!("Record {} render failed, skipping: {}", id, reason);
                ctx.errors.push(format!("record {}: {}", id, reason));
                ctx.outcomes.push(RecordOutcome {
                    id,
                    outcome: ProcessingOutcome::Failure {
                        reason: reason.clone(),
                    },
                });
                progress.report(ProgressEvent::State(RunState::Failed(id)));
                progress.report(ProgressEvent::RecordFailed { id, error: reason });
                return;
            }
        };

        let publish_request = PublishRequest::from_record(record, &content.bundle, &artifact);
        let mut external_ids = Vec::new();
        for sink in self.sinks.for_record(record) {
            match sink.publish(&publish_request).await {
                Ok(external_id) => {
                    debug!("Record {} published to {} as {}", id, sink.name(), external_id);
                    external_ids.push((sink.name().to_string(), external_id));
                }
                Err(e) => {
                    warn!("Record {} publish to {} failed: {}", id, sink.name(), e);
                    ctx.errors
                        .push(format!("record {} ({}): {}", id, sink.name(), e));
                }
            }
        }

        let entry = ManifestEntry::new(record, &artifact, &content, &external_ids, Utc::now());
        progress.report(ProgressEvent::RecordCompleted {
            id,
            filename: entry.filename.clone(),
            external_id: entry.external_id.clone(),
        });

        ctx.outcomes.push(RecordOutcome {
            id,
            outcome: ProcessingOutcome::Success {
                video_filename: entry.filename.clone(),
                external_ids,
            },
        });
        ctx.manifest.push(entry);
        ctx.artifacts.push(artifact);
    }

    fn step_package(&self, ctx: &mut RunContext) {
        if ctx.manifest.is_empty() {
            debug!("No successful records, skipping archive");
            return;
        }

        match self.packager.package(&ctx.manifest, &ctx.artifacts) {
            Ok(path) => ctx.archive_path = Some(path),
            Err(e) => {
                error!("Packaging failed: {}", e);
                ctx.errors.push(format!("packaging failed: {}", e));
            }
        }
    }

    fn step_checkpoint(&self, ctx: &mut RunContext) {
        let Some(next) = ctx.next_cursor else {
            return;
        };

        if !ctx.should_checkpoint() {
            info!("No record succeeded, cursor stays at {}", ctx.cursor);
            return;
        }

        if let Err(e) = self.cursor_store.write(next) {
            error!("Checkpoint failed: {}", e);
            ctx.errors.push(format!("checkpoint failed: {}", e));
        }
    }
}
