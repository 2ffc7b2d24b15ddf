//! Per-release build logs
//!
//! Every deploy appends to `log/<product>-<releaseDir>.log`. Installer child
//! processes write straight into the same file, so one artifact tells the
//! whole story of a release and survives the invocation that produced it.

use crate::core::error::{ShipResult, ResultExt};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// An append-only log for one release
pub struct ReleaseLog {
  path: PathBuf,
  file: File,
}

impl ReleaseLog {
  /// Open (or create) the log, appending to any previous attempt
  pub fn create(path: &Path) -> ShipResult<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .with_context(|| format!("Failed to open log {}", path.display()))?;
    Ok(Self {
      path: path.to_path_buf(),
      file,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Append one timestamped line
  pub fn line(&mut self, msg: &str) -> ShipResult<()> {
    writeln!(self.file, "[{}] {}", Utc::now().format("%Y-%m-%d %H:%M:%S"), msg)
      .with_context(|| format!("Failed to write log {}", self.path.display()))
  }

  /// A handle suitable for redirecting child stdout/stderr into the log
  pub fn stdio_handle(&self) -> ShipResult<File> {
    self
      .file
      .try_clone()
      .with_context(|| format!("Failed to clone log handle for {}", self.path.display()))
  }
}
