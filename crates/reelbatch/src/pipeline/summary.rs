use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable naming the CI step-output file.
pub const CI_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// The single structured result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub videos_generated: usize,
    /// `None` only when the run aborted before a cursor could be computed.
    pub next_start_index: Option<u64>,
    /// Empty when no archive was produced.
    pub zip_path: String,
    pub errors: Vec<String>,
}

impl RunSummary {
    /// Zero-progress summary for a run that aborted.
    pub fn fatal(error: impl Into<String>) -> Self {
        Self {
            videos_generated: 0,
            next_start_index: None,
            zip_path: String::new(),
            errors: vec![error.into()],
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"videos_generated":0,"next_start_index":null,"zip_path":"","errors":["failed to serialize summary"]}"#
                .to_string()
        })
    }

    /// `key=value` lines for CI step outputs.
    pub fn ci_outputs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("videos_generated", self.videos_generated.to_string()),
            (
                "next_start_index",
                self.next_start_index
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
            ),
            ("zip_path", self.zip_path.replace(['\r', '\n'], " ")),
            ("error_count", self.errors.len().to_string()),
        ]
    }

    /// Appends [`Self::ci_outputs`] to the file at `path`.
    pub fn append_ci_outputs(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        for (key, value) in self.ci_outputs() {
            writeln!(file, "{}={}", key, value)?;
        }
        Ok(())
    }
}
