//! Archive upload
//!
//! Uploads go through rclone, which is idempotent at the file level: copying
//! an unchanged file to a destination that already holds it is a no-op. A
//! failed deploy can therefore be retried without any upload bookkeeping.

use crate::core::error::{PipelineError, ShipError, ShipResult, ResultExt};
use std::path::Path;
use std::process::Command;

/// Copies release artifacts to a destination
pub trait Uploader {
  /// Copy `file` into `dest`, keeping its file name
  fn upload(&self, file: &Path, dest: &str) -> ShipResult<()>;
}

/// rclone-backed uploader
///
/// `dest` is anything rclone accepts: a configured `remote:bucket/prefix`
/// or a plain local directory.
pub struct RcloneUploader;

impl Uploader for RcloneUploader {
  fn upload(&self, file: &Path, dest: &str) -> ShipResult<()> {
    let output = Command::new("rclone")
      .arg("copy")
      .arg(file)
      .arg(dest)
      .output()
      .context("Failed to execute rclone")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(ShipError::Pipeline(PipelineError::UploadFailed {
        dest: dest.to_string(),
        reason: stderr,
      }));
    }

    Ok(())
  }
}
