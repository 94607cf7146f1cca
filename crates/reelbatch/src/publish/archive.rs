use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::Serialize;
use tracing::Instrument;

use crate::error::PublishError;
use crate::package::{read_manifest, ManifestEntry, MANIFEST_NAME};
use crate::sanitize;
use crate::storage::scratch_dir;

use super::{PublishRequest, SinkSet};

/// Outcome of publishing a produced archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub published: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Publishes every artifact listed in the archive's manifest to every sink.
///
/// Unreadable archives or manifests are errors. Per-artifact failures are
/// counted in the report and publishing continues.
pub async fn publish_archive(path: &Path, sinks: &SinkSet) -> Result<PublishReport, PublishError> {
    let span = tracing::info_span!("publish_archive", archive = %sanitize::redact_path(path));
    publish_archive_inner(path, sinks).instrument(span).await
}

async fn publish_archive_inner(
    path: &Path,
    sinks: &SinkSet,
) -> Result<PublishReport, PublishError> {
    let archive_err = |message: String| PublishError::Archive {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| archive_err(e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_err(e.to_string()))?;

    let mut manifest = Vec::new();
    archive
        .by_name(MANIFEST_NAME)
        .map_err(|e| archive_err(format!("{}: {}", MANIFEST_NAME, e)))?
        .read_to_end(&mut manifest)
        .map_err(|e| archive_err(format!("{}: {}", MANIFEST_NAME, e)))?;
    let entries = read_manifest(&manifest).map_err(|e| archive_err(e.to_string()))?;

    let workdir = scratch_dir().map_err(|e| archive_err(e.to_string()))?;
    let mut report = PublishReport::default();

    info!(
        "Publishing {} artifact(s) to {} sink(s)",
        entries.len(),
        sinks.len()
    );

    for entry in &entries {
        let video_path = match extract_entry(&mut archive, entry, workdir.path()) {
            Ok(video_path) => video_path,
            Err(message) => {
                error!("Record {}: {}", entry.id, message);
                report.failed += 1;
                report.errors.push(format!("record {}: {}", entry.id, message));
                continue;
            }
        };

        let request = PublishRequest::from_manifest(entry, video_path);
        for sink in sinks.all() {
            match sink.publish(&request).await {
                Ok(id) => {
                    info!("Record {} published to {} as {}", entry.id, sink.name(), id);
                    report.published += 1;
                }
                Err(e) => {
                    warn!("Record {} failed on {}: {}", entry.id, sink.name(), e);
                    report.failed += 1;
                    report
                        .errors
                        .push(format!("record {} ({}): {}", entry.id, sink.name(), e));
                }
            }
        }
    }

    Ok(report)
}

/// Copies the entry's video out of the archive. Only the final path
/// component of the listed filename is honored.
fn extract_entry(
    archive: &mut zip::ZipArchive<File>,
    entry: &ManifestEntry,
    workdir: &Path,
) -> Result<PathBuf, String> {
    let name = Path::new(&entry.filename)
        .file_name()
        .ok_or_else(|| format!("invalid filename '{}'", entry.filename))?;
    let target = workdir.join(name);

    let mut source = archive
        .by_name(&entry.filename)
        .map_err(|e| format!("{} not in archive: {}", entry.filename, e))?;
    let mut out = File::create(&target).map_err(|e| e.to_string())?;
    std::io::copy(&mut source, &mut out).map_err(|e| e.to_string())?;
    Ok(target)
}
