//! Stack installation via the EUPS package tool
//!
//! `eups distrib install <product> -t <tag>` does the real work. This module
//! sequences it, wires the child's output into the release log, and keeps the
//! child environment explicit: EUPS_PKGROOT, EUPS_PATH, and TMPDIR are set on
//! the spawned process, never exported into our own. When a product
//! configures a builder image, the same invocation runs inside `docker run`
//! with the stack and scratch directories bind-mounted at identical paths.

use crate::core::error::{PipelineError, ShipError, ShipResult, ResultExt};
use crate::core::fetch::Bootstrap;
use crate::core::logfile::ReleaseLog;
use std::path::Path;
use std::process::{Command, Stdio};

/// Installs a tagged product into a stack directory
pub trait Installer {
  /// Cheap environment validation; runs before anything is mutated
  fn preflight(&self) -> ShipResult<()>;

  /// Install `tag` into `stack_dir`, staging through `scratch` and appending
  /// all output to `log`
  fn install(&self, tag: &str, stack_dir: &Path, scratch: &Path, log: &mut ReleaseLog) -> ShipResult<()>;
}

/// EUPS-backed installer
pub struct EupsInstaller {
  product: String,
  pkgroot: String,
  image: Option<String>,
  bootstrap: Bootstrap,
}

impl EupsInstaller {
  pub fn new(product: impl Into<String>, pkgroot: impl Into<String>, image: Option<String>, bootstrap: Bootstrap) -> Self {
    Self {
      product: product.into(),
      pkgroot: pkgroot.into(),
      image,
      bootstrap,
    }
  }

  fn program(&self) -> &str {
    if self.image.is_some() { "docker" } else { "eups" }
  }

  /// Build the install invocation, wrapped in `docker run` when an image is
  /// configured
  fn command(&self, tag: &str, stack_dir: &Path, scratch: &Path) -> Command {
    match &self.image {
      Some(image) => {
        let mut cmd = Command::new("docker");
        cmd.args(["run", "--rm"]);
        cmd.arg("-v").arg(format!("{}:{}", stack_dir.display(), stack_dir.display()));
        cmd.arg("-v").arg(format!("{}:{}", scratch.display(), scratch.display()));
        cmd.arg("-e").arg(format!("EUPS_PKGROOT={}", self.pkgroot));
        cmd.arg("-e").arg(format!("EUPS_PATH={}", stack_dir.display()));
        cmd.arg("-e").arg(format!("TMPDIR={}", scratch.display()));
        cmd.arg("-w").arg(stack_dir);
        cmd.arg(image);
        cmd.args(["eups", "distrib", "install", &self.product, "-t", tag]);
        cmd
      }
      None => {
        let mut cmd = Command::new("eups");
        cmd.args(["distrib", "install", &self.product, "-t", tag]);
        cmd.current_dir(stack_dir);
        cmd.env("EUPS_PKGROOT", &self.pkgroot);
        cmd.env("EUPS_PATH", stack_dir);
        cmd.env("TMPDIR", scratch);
        cmd
      }
    }
  }
}

impl Installer for EupsInstaller {
  fn preflight(&self) -> ShipResult<()> {
    self.bootstrap.probe()
  }

  fn install(&self, tag: &str, stack_dir: &Path, scratch: &Path, log: &mut ReleaseLog) -> ShipResult<()> {
    // The installer script stages into scratch; the stack build environment
    // sources it from there.
    let installer_path = scratch.join("bootstrap.sh");
    self.bootstrap.fetch(&installer_path)?;
    log.line(&format!("fetched bootstrap installer from {}", self.bootstrap.url()))?;

    log.line(&format!("eups distrib install {} -t {}", self.product, tag))?;
    let status = self
      .command(tag, stack_dir, scratch)
      .stdout(Stdio::from(log.stdio_handle()?))
      .stderr(Stdio::from(log.stdio_handle()?))
      .status()
      .with_context(|| format!("Failed to execute {}", self.program()))?;

    if !status.success() {
      return Err(ShipError::Pipeline(PipelineError::InstallFailed {
        product: self.product.clone(),
        tag: tag.to_string(),
        reason: format!("{} (see {})", status, log.path().display()),
      }));
    }

    log.line("install finished")?;
    Ok(())
  }
}
