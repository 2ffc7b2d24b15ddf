//! CernVM-FS server backend
//!
//! Wraps the `cvmfs_server` publishing workflow on a stratum 0 host:
//! `transaction <repo>` opens the writable union mount, `publish <repo>`
//! seals it into a new revision, `abort -f <repo>` discards it. The heavy
//! lifting stays in the external tool; this backend only sequences the calls
//! and surfaces exit status with captured stderr.

use super::TransactionalStore;
use crate::core::error::{ShipResult, ResultExt};
use std::process::Command;

/// A named CernVM-FS repository managed through `cvmfs_server`
pub struct CvmfsStore {
  repo: String,
}

impl CvmfsStore {
  pub fn new(repo: impl Into<String>) -> Self {
    Self { repo: repo.into() }
  }

  fn run(&self, action: &str, args: &[&str]) -> ShipResult<()> {
    let output = Command::new("cvmfs_server")
      .arg(action)
      .args(args)
      .arg(&self.repo)
      .output()
      .with_context(|| format!("Failed to execute cvmfs_server {}", action))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(format!("cvmfs_server {} {} failed: {}", action, self.repo, stderr).into());
    }

    Ok(())
  }
}

impl TransactionalStore for CvmfsStore {
  fn describe(&self) -> String {
    format!("cvmfs repository {}", self.repo)
  }

  fn begin(&self) -> ShipResult<()> {
    self.run("transaction", &[])
  }

  fn commit(&self) -> ShipResult<()> {
    self.run("publish", &[])
  }

  fn abort(&self) -> ShipResult<()> {
    // -f skips the interactive confirmation; publish runs unattended
    self.run("abort", &["-f"])
  }
}
