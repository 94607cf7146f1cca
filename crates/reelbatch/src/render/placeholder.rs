use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use crate::error::RenderError;
use crate::source::RecordType;

use super::{Artifact, ArtifactRenderer, RenderRequest};

/// Writes a descriptive placeholder instead of encoding real video.
///
/// Produces `video_<id>.<ext>` and `script_<id>.txt` in the work directory.
pub struct PlaceholderRenderer {
    extension: String,
}

impl PlaceholderRenderer {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    fn describe(request: &RenderRequest<'_>) -> String {
        let (width, height) = match request.record.record_type {
            RecordType::Short => (720, 1280),
            RecordType::Long => (1920, 1080),
        };

        let mut out = String::new();
        let _ = writeln!(out, "PLACEHOLDER VIDEO");
        let _ = writeln!(out, "id: {}", request.record.id);
        let _ = writeln!(out, "type: {}", request.record.record_type);
        let _ = writeln!(out, "resolution: {}x{}", width, height);
        let _ = writeln!(out, "duration_secs: {}", request.duration_secs);
        let _ = writeln!(out, "title: {}", request.bundle.thumbnail_title);
        out.push('\n');
        out.push_str(&request.bundle.script);
        out.push('\n');
        out
    }
}

impl Default for PlaceholderRenderer {
    fn default() -> Self {
        Self::new("mp4")
    }
}

async fn write_file(path: PathBuf, content: &[u8]) -> Result<PathBuf, RenderError> {
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| RenderError::WriteArtifact {
            path: path.clone(),
            source: e,
        })?;
    Ok(path)
}

#[async_trait]
impl ArtifactRenderer for PlaceholderRenderer {
    async fn render(
        &self,
        request: &RenderRequest<'_>,
        workdir: &Path,
    ) -> Result<Artifact, RenderError> {
        let id = request.record.id;

        let video_path = write_file(
            workdir.join(format!("video_{}.{}", id, self.extension)),
            Self::describe(request).as_bytes(),
        )
        .await?;
        let script_path = write_file(
            workdir.join(format!("script_{}.txt", id)),
            request.bundle.script.as_bytes(),
        )
        .await?;

        debug!("Rendered placeholder for record {}", id);
        Ok(Artifact {
            id,
            video_path,
            script_path: Some(script_path),
            duration_secs: request.duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentBundle;
    use crate::source::Record;
    use tempfile::TempDir;

    fn bundle() -> ContentBundle {
        ContentBundle {
            script: "the script".to_string(),
            description: "d".to_string(),
            thumbnail_title: "THUMB".to_string(),
            caption: "c".to_string(),
        }
    }

    #[tokio::test]
    async fn test_render_writes_video_and_script() {
        let dir = TempDir::new().unwrap();
        let record = Record::new(3, "Title", "Prompt", RecordType::Short);
        let bundle = bundle();
        let request = RenderRequest {
            record: &record,
            bundle: &bundle,
            duration_secs: 20,
        };

        let artifact = PlaceholderRenderer::new(".mp4")
            .render(&request, dir.path())
            .await
            .unwrap();

        assert_eq!(artifact.id, 3);
        assert_eq!(artifact.video_filename(), "video_3.mp4");
        let video = std::fs::read_to_string(&artifact.video_path).unwrap();
        assert!(video.contains("resolution: 720x1280"));
        assert!(video.contains("duration_secs: 20"));
        assert!(video.contains("the script"));
        let script = std::fs::read_to_string(artifact.script_path.unwrap()).unwrap();
        assert_eq!(script, "the script");
    }

    #[tokio::test]
    async fn test_render_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let record = Record::new(1, "Title", "Prompt", RecordType::Long);
        let bundle = bundle();
        let request = RenderRequest {
            record: &record,
            bundle: &bundle,
            duration_secs: 200,
        };

        let err = PlaceholderRenderer::default()
            .render(&request, &dir.path().join("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::WriteArtifact { .. }));
    }
}
