//! The deploy pipeline
//!
//! One parameterized sequence replaces a pile of per-release build scripts:
//! classify the tag, verify the bootstrap answers, lay the site out, install,
//! archive, fingerprint, upload. Steps run strictly in order and the first
//! error stops the run; nothing here retries. Validation (classification,
//! the already-deployed guard, the bootstrap probe) happens before the site
//! is mutated at all.

use crate::core::archive::{Archiver, write_checksum_sidecar};
use crate::core::error::{PublishError, ShipError, ShipResult, ResultExt};
use crate::core::install::Installer;
use crate::core::layout::SiteLayout;
use crate::core::logfile::ReleaseLog;
use crate::core::tag::{ReleaseKind, ReleaseTag};
use crate::core::upload::Uploader;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Everything one deploy run needs, resolved up front
#[derive(Debug, Clone)]
pub struct DeployRequest {
  pub product: String,
  pub tag: String,
  pub experimental: bool,
  /// rclone destination; `None` skips the upload step
  pub upload_dest: Option<String>,
}

/// What a finished deploy produced
#[derive(Debug, Clone, Serialize)]
pub struct DeployOutcome {
  pub tag: String,
  pub kind: ReleaseKind,
  pub release_dir: String,
  pub stack_dir: PathBuf,
  pub archive: PathBuf,
  pub sha256: String,
  pub entries: usize,
  pub total_bytes: u64,
  pub uploaded: bool,
  pub log: PathBuf,
}

/// Sequences one deploy over the external tool seams
pub struct Pipeline<'a> {
  layout: &'a SiteLayout,
  installer: &'a dyn Installer,
  archiver: &'a dyn Archiver,
  uploader: &'a dyn Uploader,
  quiet: bool,
}

impl<'a> Pipeline<'a> {
  pub fn new(
    layout: &'a SiteLayout,
    installer: &'a dyn Installer,
    archiver: &'a dyn Archiver,
    uploader: &'a dyn Uploader,
  ) -> Self {
    Self {
      layout,
      installer,
      archiver,
      uploader,
      quiet: false,
    }
  }

  /// Suppress step output (JSON mode)
  pub fn with_quiet(mut self, quiet: bool) -> Self {
    self.quiet = quiet;
    self
  }

  fn step(&self, msg: &str) {
    if !self.quiet {
      println!("{}", msg);
    }
  }

  pub fn run(&self, request: &DeployRequest) -> ShipResult<DeployOutcome> {
    let tag = ReleaseTag::classify(&request.tag)?;
    let release_dir = tag.dir_name(request.experimental);
    let stack_dir = self.layout.release_dir(&request.product, &release_dir);

    // Releases are never overwritten, on the build side either.
    if stack_dir.exists() {
      return Err(ShipError::Publish(PublishError::AlreadyDeployed { path: stack_dir }));
    }

    // The bootstrap must answer before the site is mutated.
    self.step(&format!("🔍 Probing bootstrap installer for {} {}", request.product, tag.raw));
    self.installer.preflight()?;

    self.layout.ensure(&request.product)?;
    let mut log = ReleaseLog::create(&self.layout.log_path(&request.product, &release_dir))?;
    log.line(&format!("deploy {} {} ({} release, directory {})", request.product, tag.raw, tag.kind, release_dir))?;

    fs::create_dir_all(&stack_dir).with_context(|| format!("Failed to create {}", stack_dir.display()))?;
    let scratch = self.layout.unique_scratch(&release_dir)?;

    self.step(&format!("🔧 Installing into {}", stack_dir.display()));
    if let Err(e) = self.installer.install(&tag.raw, &stack_dir, scratch.path(), &mut log) {
      let _ = log.line(&format!("install failed: {}", e));
      // A half-installed tree would block the retry with AlreadyDeployed.
      let _ = fs::remove_dir_all(&stack_dir);
      return Err(e);
    }

    let archive_path = self.layout.archive_path(&release_dir);
    self.step(&format!("📦 Archiving to {}", archive_path.display()));
    let summary = match self.archiver.create(&stack_dir, &archive_path) {
      Ok(summary) => summary,
      Err(e) => {
        let _ = log.line(&format!("archive failed: {}", e));
        return Err(e);
      }
    };
    log.line(&format!(
      "archived {} entries ({} bytes) to {}, sha256 {}",
      summary.entries,
      summary.total_bytes,
      summary.path.display(),
      summary.sha256
    ))?;
    let sidecar = write_checksum_sidecar(&summary.path, &summary.sha256)?;

    let mut uploaded = false;
    if let Some(dest) = &request.upload_dest {
      self.step(&format!("📤 Uploading to {}", dest));
      for file in [&summary.path, &sidecar] {
        if let Err(e) = self.uploader.upload(file, dest) {
          let _ = log.line(&format!("upload failed: {}", e));
          return Err(e);
        }
      }
      log.line(&format!("uploaded {} and checksum to {}", release_dir, dest))?;
      uploaded = true;
    }

    log.line("deploy complete")?;
    Ok(DeployOutcome {
      tag: tag.raw,
      kind: tag.kind,
      release_dir,
      stack_dir,
      archive: summary.path,
      sha256: summary.sha256,
      entries: summary.entries,
      total_bytes: summary.total_bytes,
      uploaded,
      log: log.path().to_path_buf(),
    })
  }
}
