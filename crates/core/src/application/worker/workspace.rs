// Per-run Workspace
// Ephemeral directory holding the run's stdout/stderr streams. Never reused;
// removed when dropped.

use super::constants::{STDERR_FILE, STDOUT_FILE, WORKSPACE_PREFIX};
use crate::port::ExecutionError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under `root` (system temp dir if None)
    pub fn create(root: Option<&Path>) -> Result<Self, ExecutionError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| ExecutionError::Workspace(format!("failed to create workspace: {}", e)))?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn stdout_path(&self) -> PathBuf {
        self.dir.path().join(STDOUT_FILE)
    }

    pub fn stderr_path(&self) -> PathBuf {
        self.dir.path().join(STDERR_FILE)
    }

    /// Create both stream files (stdout, stderr)
    pub fn open_streams(&self) -> Result<(File, File), ExecutionError> {
        let open = |path: PathBuf| {
            File::create(&path).map_err(|e| {
                ExecutionError::Workspace(format!("failed to create {}: {}", path.display(), e))
            })
        };
        Ok((open(self.stdout_path())?, open(self.stderr_path())?))
    }

    /// Remove the workspace, reporting cleanup errors
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspaces_are_fresh_and_removed() {
        let root = tempfile::tempdir().unwrap();

        let a = Workspace::create(Some(root.path())).unwrap();
        let b = Workspace::create(Some(root.path())).unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(WORKSPACE_PREFIX));

        a.open_streams().unwrap();
        assert!(a.stdout_path().exists());
        assert!(a.stderr_path().exists());

        let path = a.path().to_path_buf();
        a.close().unwrap();
        assert!(!path.exists());
        drop(b);
    }

    #[test]
    fn test_missing_root_is_workspace_error() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("does-not-exist");
        let err = Workspace::create(Some(missing.as_path())).err().unwrap();
        assert!(matches!(err, ExecutionError::Workspace(_)));
    }
}
