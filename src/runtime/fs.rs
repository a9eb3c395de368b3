//! File system operations (read, list, metadata).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context("Failed to read file to string")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_impl(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(path)
            .with_context(|| format!("Failed to list directory {:?}", path))?;
        entries.map(|entry| Ok(entry?.path())).collect()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn modified_impl(&self, path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .with_context(|| format!("Failed to read modification time of {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime, is_not_found};
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_read_to_string() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        std::fs::write(&file_path, "hello").unwrap();

        assert_eq!(runtime.read_to_string(&file_path).unwrap(), "hello");
    }

    #[test]
    fn test_real_runtime_read_dir() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let entries = runtime.read_dir(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("nested"));
    }

    #[test]
    fn test_real_runtime_read_dir_missing_is_not_found() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let err = runtime.read_dir(&dir.path().join("missing")).unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_real_runtime_modified() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("stamped");
        let file = File::create(&file_path).unwrap();
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        file.set_modified(stamp).unwrap();
        drop(file);

        assert_eq!(runtime.modified(&file_path).unwrap(), stamp);
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;

        let result = runtime.read_to_string(std::path::Path::new("/nonexistent/path/file.txt"));
        assert!(result.is_err());

        let result = runtime.modified(std::path::Path::new("/nonexistent/path/file.txt"));
        assert!(result.is_err());
    }
}
