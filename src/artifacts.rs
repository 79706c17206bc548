//! Scoped ownership of the intermediate files produced while a video is processed.
//!
//! Everything tracked here is removed when the owner goes out of scope, on the
//! success path and on every error path alike.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;

/// Per-run scratch directory holding the decoded audio
#[derive(Debug)]
pub enum ScratchDir {
    /// Deleted with its contents on drop
    Temporary(TempDir),
    /// Left on disk for inspection
    Kept(PathBuf),
}

impl ScratchDir {
    /// Create a fresh, uniquely named scratch directory.
    ///
    /// Kept directories are created under `keep_in` so they are easy to find.
    pub fn create(keep: bool, keep_in: &Path) -> Result<Self> {
        if keep {
            let path = keep_in.join(format!("autosubs-{}", Uuid::new_v4().simple()));
            std::fs::create_dir_all(&path)?;
            return Ok(ScratchDir::Kept(path));
        }

        let dir = tempfile::Builder::new().prefix("autosubs-").tempdir()?;
        Ok(ScratchDir::Temporary(dir))
    }

    pub fn path(&self) -> &Path {
        match self {
            ScratchDir::Temporary(dir) => dir.path(),
            ScratchDir::Kept(path) => path,
        }
    }
}

/// Set of intermediate files removed together on drop
#[derive(Debug, Default)]
pub struct IntermediateFiles {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl IntermediateFiles {
    pub fn new(keep: bool) -> Self {
        Self {
            paths: Vec::new(),
            keep,
        }
    }

    /// Take ownership of `path`; returns it for convenience
    pub fn track(&mut self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        self.paths.push(path.clone());
        path
    }

    /// Remove every tracked file that exists. Idempotent.
    pub fn cleanup(&mut self) {
        if self.keep {
            self.paths.clear();
            return;
        }

        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed intermediate file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove intermediate file {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for IntermediateFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_tracked_files_removed_on_drop() {
        let temp = assert_fs::TempDir::new().unwrap();
        let a = temp.child("a.ass");
        let b = temp.child("b.srt");
        a.write_str("x").unwrap();
        b.write_str("y").unwrap();

        {
            let mut files = IntermediateFiles::new(false);
            files.track(a.path());
            files.track(b.path());
            let missing = files.track(temp.path().join("never-created.srt"));
            assert!(!missing.exists());
        }

        assert!(!a.path().exists());
        assert!(!b.path().exists());
    }

    #[test]
    fn test_keep_leaves_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        let a = temp.child("a.ass");
        a.write_str("x").unwrap();

        {
            let mut files = IntermediateFiles::new(true);
            files.track(a.path());
        }

        assert!(a.path().exists());
    }

    #[test]
    fn test_scratch_dir_lifecycle() {
        let temp = assert_fs::TempDir::new().unwrap();

        let scratch = ScratchDir::create(false, temp.path()).unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::write(path.join("audio.wav"), b"RIFF").unwrap();
        drop(scratch);
        assert!(!path.exists());

        let kept = ScratchDir::create(true, temp.path()).unwrap();
        assert!(kept.path().starts_with(temp.path()));
        drop(kept);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}
