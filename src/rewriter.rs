//! Applies transformed page text to disk, keeping a pristine backup of the original.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// What happened to a page after the rewriter saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
  /// No changes were reported; nothing was touched.
  Unchanged,
  /// Changes were found but the run is a dry run.
  DryRun,
  /// The page was overwritten.
  Written {
    /// Backup created by this write, or `None` when an earlier backup was kept.
    backup: Option<PathBuf>,
  },
}

/// Writes transformed pages, optionally as a dry run.
#[derive(Debug, Clone)]
pub struct FileRewriter {
  backup_suffix: String,
  dry_run: bool,
}

impl FileRewriter {
  /// Create a rewriter using `backup_suffix` for backup file names.
  pub fn new(backup_suffix: impl Into<String>, dry_run: bool) -> Self {
    Self {
      backup_suffix: backup_suffix.into(),
      dry_run,
    }
  }

  /// Whether this rewriter leaves the filesystem untouched.
  pub fn is_dry_run(&self) -> bool {
    self.dry_run
  }

  /// Backup location for `path`: the same file name with the suffix appended.
  pub fn backup_path(&self, path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(&self.backup_suffix);
    path.with_file_name(name)
  }

  /// Persist `transformed` over `path` when `changes` is non-zero.
  ///
  /// The original bytes are written to the backup path first, unless a backup already exists,
  /// so repeated runs never replace the earliest pristine copy.
  pub fn apply(
    &self,
    path: &Path,
    original: &[u8],
    transformed: &str,
    changes: usize,
  ) -> Result<RewriteOutcome> {
    if changes == 0 {
      return Ok(RewriteOutcome::Unchanged);
    }
    if self.dry_run {
      return Ok(RewriteOutcome::DryRun);
    }

    let backup_path = self.backup_path(path);
    let backup = if backup_path.exists() {
      None
    } else {
      fs::write(&backup_path, original)
        .with_context(|| format!("failed to write backup {}", backup_path.display()))?;
      Some(backup_path)
    };

    fs::write(path, transformed).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(RewriteOutcome::Written { backup })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn zero_changes_touch_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.html");
    fs::write(&path, "old").unwrap();

    let rewriter = FileRewriter::new(".bak", false);
    let outcome = rewriter.apply(&path, b"old", "new", 0).unwrap();

    assert_eq!(outcome, RewriteOutcome::Unchanged);
    assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    assert!(!dir.path().join("index.html.bak").exists());
  }

  #[test]
  fn dry_run_does_not_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.html");
    fs::write(&path, "old").unwrap();

    let rewriter = FileRewriter::new(".bak", true);
    let outcome = rewriter.apply(&path, b"old", "new", 3).unwrap();

    assert_eq!(outcome, RewriteOutcome::DryRun);
    assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    assert!(!rewriter.backup_path(&path).exists());
  }

  #[test]
  fn writes_backup_then_page() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.html");
    fs::write(&path, b"old\xff").unwrap();

    let rewriter = FileRewriter::new(".bak", false);
    let outcome = rewriter.apply(&path, b"old\xff", "new", 1).unwrap();

    let backup = dir.path().join("index.html.bak");
    assert_eq!(outcome, RewriteOutcome::Written {
      backup: Some(backup.clone())
    });
    assert_eq!(fs::read(&backup).unwrap(), b"old\xff");
    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
  }

  #[test]
  fn keeps_existing_backup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.html");
    let backup = dir.path().join("index.html.bak");
    fs::write(&path, "second").unwrap();
    fs::write(&backup, "pristine").unwrap();

    let rewriter = FileRewriter::new(".bak", false);
    let outcome = rewriter.apply(&path, b"second", "third", 2).unwrap();

    assert_eq!(outcome, RewriteOutcome::Written { backup: None });
    assert_eq!(fs::read_to_string(&backup).unwrap(), "pristine");
    assert_eq!(fs::read_to_string(&path).unwrap(), "third");
  }
}
