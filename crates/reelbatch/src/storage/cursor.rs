use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::CursorError;
use crate::sanitize;

use super::filesystem::{ensure_directory, write_atomic};

/// Durable "next record to process" value.
pub trait CursorStore: Send + Sync {
    /// Current cursor, always >= 1. Missing or corrupt state yields the default.
    fn read(&self) -> u64;

    /// Persists `next`, creating any containing directories.
    fn write(&self, next: u64) -> Result<(), CursorError>;
}

/// Cursor kept as a decimal integer in a plain text file.
pub struct FileCursorStore {
    path: PathBuf,
    default: u64,
}

impl FileCursorStore {
    pub fn new<P: AsRef<Path>>(path: P, default: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            default: default.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CursorStore for FileCursorStore {
    fn read(&self) -> u64 {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(
                    "No cursor state at {} ({}), starting at {}",
                    sanitize::redact_path(&self.path),
                    e,
                    self.default
                );
                return self.default;
            }
        };

        match content.trim().parse::<u64>() {
            Ok(value) if value >= 1 => value,
            _ => {
                warn!(
                    "Ignoring corrupt cursor state {:?} in {}, starting at {}",
                    content.trim(),
                    sanitize::redact_path(&self.path),
                    self.default
                );
                self.default
            }
        }
    }

    fn write(&self, next: u64) -> Result<(), CursorError> {
        if let Some(parent) = self.path.parent() {
            ensure_directory(parent).map_err(|e| CursorError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        write_atomic(&self.path, next.to_string().as_bytes()).map_err(|e| {
            CursorError::WriteFile {
                path: self.path.clone(),
                source: e,
            }
        })?;

        info!("Updated cursor to {}", next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCursorStore::new(temp_dir.path().join("state.txt"), 1);
        assert_eq!(store.read(), 1);
    }

    #[test]
    fn test_read_valid_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.txt");
        std::fs::write(&path, "  42\n").unwrap();
        assert_eq!(FileCursorStore::new(&path, 1).read(), 42);
    }

    #[test]
    fn test_read_corrupt_or_empty_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.txt");
        let store = FileCursorStore::new(&path, 3);

        for content in ["", "abc", "-4", "0", "1.5"] {
            std::fs::write(&path, content).unwrap();
            assert_eq!(store.read(), 3, "content {:?}", content);
        }
    }

    #[test]
    fn test_default_is_at_least_one() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCursorStore::new(temp_dir.path().join("state.txt"), 0);
        assert_eq!(store.read(), 1);
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCursorStore::new(temp_dir.path().join("nested/dir/state.txt"), 1);

        store.write(9).unwrap();

        assert_eq!(store.read(), 9);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "9"
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let store = FileCursorStore::new(blocker.join("state.txt"), 1);
        assert!(store.write(5).is_err());
    }
}
