//! On-disk layout of a distribution site
//!
//! The build side and the publish side arrange releases identically:
//!
//! ```text
//! <root>/<platform>-<arch>/<product>/<releaseDir>/   installed stacks
//! <root>/<platform>-<arch>/scratch/                  per-invocation staging
//! <root>/<platform>-<arch>/archives/                 release tarballs + checksums
//! <root>/<platform>-<arch>/log/                      per-release build logs
//! ```
//!
//! Keeping the two sides symmetric means an archive produced on a build host
//! unpacks onto the publish host with no path rewriting.

use crate::core::error::{ShipResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Paths of one platform slice of a distribution site
#[derive(Debug, Clone)]
pub struct SiteLayout {
  platform_root: PathBuf,
}

impl SiteLayout {
  pub fn new(root: &Path, platform_dir: &str) -> Self {
    Self {
      platform_root: root.join(platform_dir),
    }
  }

  /// `<root>/<platform>-<arch>`
  pub fn platform_root(&self) -> &Path {
    &self.platform_root
  }

  /// Directory holding every release of one product
  pub fn product_dir(&self, product: &str) -> PathBuf {
    self.platform_root.join(product)
  }

  /// Directory one release installs into
  pub fn release_dir(&self, product: &str, dir_name: &str) -> PathBuf {
    self.product_dir(product).join(dir_name)
  }

  pub fn scratch_dir(&self) -> PathBuf {
    self.platform_root.join("scratch")
  }

  pub fn archives_dir(&self) -> PathBuf {
    self.platform_root.join("archives")
  }

  pub fn log_dir(&self) -> PathBuf {
    self.platform_root.join("log")
  }

  /// `archives/<releaseDir>.tar.gz`
  pub fn archive_path(&self, dir_name: &str) -> PathBuf {
    self.archives_dir().join(format!("{}.tar.gz", dir_name))
  }

  /// Checksum sidecar next to the archive
  pub fn checksum_path(&self, dir_name: &str) -> PathBuf {
    self.archives_dir().join(format!("{}.tar.gz.sha256", dir_name))
  }

  /// `log/<product>-<releaseDir>.log`
  pub fn log_path(&self, product: &str, dir_name: &str) -> PathBuf {
    self.log_dir().join(format!("{}-{}.log", product, dir_name))
  }

  /// Create the platform-level directories and the product directory
  pub fn ensure(&self, product: &str) -> ShipResult<()> {
    for dir in [
      self.product_dir(product),
      self.scratch_dir(),
      self.archives_dir(),
      self.log_dir(),
    ] {
      fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(())
  }

  /// A unique per-invocation staging directory under scratch/
  ///
  /// The random suffix keeps concurrent invocations from trampling each
  /// other. The directory is removed when the handle drops.
  pub fn unique_scratch(&self, label: &str) -> ShipResult<TempDir> {
    let scratch = self.scratch_dir();
    fs::create_dir_all(&scratch).with_context(|| format!("Failed to create {}", scratch.display()))?;
    tempfile::Builder::new()
      .prefix(&format!("{}-", label))
      .tempdir_in(&scratch)
      .with_context(|| format!("Failed to create staging directory under {}", scratch.display()))
  }
}
