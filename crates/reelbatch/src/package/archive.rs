use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PackageError;
use crate::render::{file_name, Artifact};
use crate::sanitize;
use crate::storage::filesystem::{ensure_directory, partial_path, replace_file};

use super::manifest::{write_manifest, ManifestEntry, MANIFEST_NAME};

/// Builds the run's output archive.
pub struct Packager {
    output_directory: PathBuf,
    archive_name: String,
}

impl Packager {
    pub fn new<P: AsRef<Path>>(output_directory: P, archive_name: &str) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
            archive_name: archive_name.to_string(),
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_directory.join(&self.archive_name)
    }

    /// Writes every artifact file plus `manifest.csv` into one zip.
    ///
    /// The archive is assembled next to its final path and renamed into
    /// place, so an existing archive is only ever replaced by a complete one.
    pub fn package(
        &self,
        entries: &[ManifestEntry],
        artifacts: &[Artifact],
    ) -> Result<PathBuf, PackageError> {
        if entries.is_empty() {
            return Err(PackageError::Empty);
        }

        ensure_directory(&self.output_directory).map_err(|e| PackageError::CreateDirectory {
            path: self.output_directory.clone(),
            source: e,
        })?;

        let target = self.archive_path();
        let partial = partial_path(&target);

        let result = write_archive(&partial, entries, artifacts).and_then(|()| {
            replace_file(&partial, &target).map_err(|e| PackageError::WriteArchive {
                path: target.clone(),
                source: e,
            })
        });

        if let Err(e) = result {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }

        info!(
            "Packaged {} record(s) into {}",
            entries.len(),
            sanitize::redact_path(&target)
        );
        Ok(target)
    }
}

fn write_archive(
    path: &Path,
    entries: &[ManifestEntry],
    artifacts: &[Artifact],
) -> Result<(), PackageError> {
    let io_err = |e: std::io::Error| PackageError::WriteArchive {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for artifact in artifacts {
        for file_path in artifact.files() {
            let name = file_name(file_path);
            let data = std::fs::read(file_path).map_err(io_err)?;
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&data).map_err(io_err)?;
            debug!("Added {} ({} bytes)", name, data.len());
        }
    }

    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(&write_manifest(entries)?).map_err(io_err)?;

    let mut writer = zip.finish()?;
    writer.flush().map_err(io_err)?;
    writer
        .into_inner()
        .map_err(|e| io_err(e.into_error()))?
        .sync_all()
        .map_err(io_err)?;
    Ok(())
}
