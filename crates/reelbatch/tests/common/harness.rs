//! Test harness for isolated pipeline runs.
//!
//! Every harness owns a temp directory holding the CSV source, the cursor
//! state file and the output directory, so runs never share state.

#![allow(dead_code)]

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use reelbatch::content::ContentGenerator;
use reelbatch::package::{read_manifest, ManifestEntry, MANIFEST_NAME};
use reelbatch::pipeline::{NoopProgress, PipelineConfig, PipelineError, RunSummary};
use reelbatch::publish::SinkSet;
use reelbatch::render::{ArtifactRenderer, DurationPolicy};
use reelbatch::storage::{CursorStore, FileCursorStore};
use reelbatch::{Pipeline, SourceFetcher};

pub const ARCHIVE_NAME: &str = "package.zip";

pub struct TestHarness {
    temp_dir: TempDir,
    pub source_path: PathBuf,
    pub state_file: PathBuf,
    pub output_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path().to_path_buf();

        Self {
            source_path: base.join("source.csv"),
            state_file: base.join("state").join("state.txt"),
            output_dir: base.join("output"),
            temp_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_source(&self, csv: &str) {
        std::fs::write(&self.source_path, csv).expect("Failed to write source");
    }

    pub fn write_cursor(&self, content: &str) {
        if let Some(parent) = self.state_file.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create state dir");
        }
        std::fs::write(&self.state_file, content).expect("Failed to write cursor");
    }

    /// Raw cursor file content, `None` when the file does not exist.
    pub fn cursor_file(&self) -> Option<String> {
        std::fs::read_to_string(&self.state_file).ok()
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(ARCHIVE_NAME)
    }

    pub fn pipeline_config(&self, max_per_run: usize) -> PipelineConfig {
        PipelineConfig {
            max_per_run,
            state_file: self.state_file.clone(),
            default_cursor: 1,
            output_directory: self.output_dir.clone(),
            archive_name: ARCHIVE_NAME.to_string(),
            render_extension: "mp4".to_string(),
            duration: DurationPolicy::default(),
        }
    }

    /// Pipeline over this harness's source file and cursor file.
    pub fn pipeline(
        &self,
        max_per_run: usize,
        renderer: Box<dyn ArtifactRenderer>,
        sinks: SinkSet,
    ) -> Pipeline {
        self.pipeline_with_cursor(
            self.pipeline_config(max_per_run),
            renderer,
            sinks,
            Box::new(FileCursorStore::new(&self.state_file, 1)),
        )
    }

    pub fn pipeline_with_cursor(
        &self,
        config: PipelineConfig,
        renderer: Box<dyn ArtifactRenderer>,
        sinks: SinkSet,
        cursor_store: Box<dyn CursorStore>,
    ) -> Pipeline {
        Pipeline::new(
            Arc::new(config),
            Box::new(SourceFetcher::new(Duration::from_secs(5))),
            ContentGenerator::fallback_only(),
            renderer,
            sinks,
            cursor_store,
        )
    }

    pub async fn run(&self, pipeline: &Pipeline) -> Result<RunSummary, PipelineError> {
        pipeline
            .run(&self.source_path.display().to_string(), &NoopProgress)
            .await
    }

    /// Sorted names of every file in the archive.
    pub fn archive_entries(&self, path: &Path) -> Vec<String> {
        let archive =
            zip::ZipArchive::new(File::open(path).expect("Failed to open archive")).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    /// Contents of one file in the archive.
    pub fn archive_file(&self, path: &Path, name: &str) -> Vec<u8> {
        let mut archive =
            zip::ZipArchive::new(File::open(path).expect("Failed to open archive")).unwrap();
        let mut data = Vec::new();
        archive
            .by_name(name)
            .expect("Archive entry missing")
            .read_to_end(&mut data)
            .unwrap();
        data
    }

    pub fn manifest(&self, path: &Path) -> Vec<ManifestEntry> {
        let mut archive =
            zip::ZipArchive::new(File::open(path).expect("Failed to open archive")).unwrap();
        let mut data = Vec::new();
        archive
            .by_name(MANIFEST_NAME)
            .expect("Archive has no manifest")
            .read_to_end(&mut data)
            .unwrap();
        read_manifest(&data).expect("Failed to parse manifest")
    }
}
