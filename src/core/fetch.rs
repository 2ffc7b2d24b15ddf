//! Bootstrap installer reachability and download
//!
//! A deploy builds its stack environment from a bootstrap installer fetched
//! over HTTPS. The installer must answer a HEAD probe with 200 before the
//! site is mutated at all; discovering a dead URL halfway through an install
//! would leave a half-built release directory behind. Both the probe and the
//! download go through curl, the same way the rest of the tool drives
//! external binaries.

use crate::core::error::{PipelineError, ShipError, ShipResult, ResultExt};
use std::path::Path;
use std::process::Command;

/// The environment bootstrap installer at a fixed URL
#[derive(Debug, Clone)]
pub struct Bootstrap {
  url: String,
}

impl Bootstrap {
  pub fn new(url: impl Into<String>) -> Self {
    Self { url: url.into() }
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  fn download_failed(&self, reason: String) -> ShipError {
    ShipError::Pipeline(PipelineError::DownloadFailed {
      url: self.url.clone(),
      reason,
    })
  }

  /// HEAD the installer URL; anything but HTTP 200 is a failure
  pub fn probe(&self) -> ShipResult<()> {
    let output = Command::new("curl")
      .args(["-sS", "-I", "-o", "/dev/null", "-w", "%{http_code}", "--max-time", "30"])
      .arg(&self.url)
      .output()
      .context("Failed to execute curl")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(self.download_failed(stderr));
    }

    let code = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if code != "200" {
      return Err(self.download_failed(format!("HEAD request returned HTTP {}", code)));
    }

    Ok(())
  }

  /// Download the installer to `dest`
  pub fn fetch(&self, dest: &Path) -> ShipResult<()> {
    let output = Command::new("curl")
      .args(["-sS", "-f", "-L", "-o"])
      .arg(dest)
      .arg(&self.url)
      .output()
      .context("Failed to execute curl")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      return Err(self.download_failed(stderr));
    }

    Ok(())
  }
}
