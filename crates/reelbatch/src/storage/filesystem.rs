use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Move a file from `src` to `dst`, replacing `dst`. Uses `rename` first
/// (atomic on the same filesystem) and falls back to copy + delete for
/// cross-device moves.
pub fn replace_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    std::fs::copy(src, dst)?;
    std::fs::remove_file(src)?;
    Ok(())
}

/// Creates `path` and its parents if missing.
pub fn ensure_directory(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used while a file is being written.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Writes `content` to a `.partial` sibling, syncs it, then moves it over
/// `path`. Readers never observe a half-written file.
pub fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let partial = partial_path(path);
    let result = (|| {
        let mut file = std::fs::File::create(&partial)?;
        file.write_all(content)?;
        file.sync_all()?;
        replace_file(&partial, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    result
}

/// Scratch directory for one run's artifacts, removed when dropped.
pub fn scratch_dir() -> std::io::Result<TempDir> {
    tempfile::Builder::new().prefix("reelbatch-").tempdir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deep/nested/state.txt");

        write_atomic(&path, b"7").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "7");
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.txt");
        std::fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_into_file_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let result = write_atomic(&blocker.join("state.txt"), b"1");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/out/package.zip")),
            PathBuf::from("/out/package.zip.partial")
        );
    }

    #[test]
    fn test_replace_file_moves_content() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("a");
        let dst = temp_dir.path().join("b");
        std::fs::write(&src, b"payload").unwrap();
        std::fs::write(&dst, b"stale").unwrap();

        replace_file(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let path = {
            let dir = scratch_dir().unwrap();
            std::fs::write(dir.path().join("video_1.mp4"), b"x").unwrap();
            dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
