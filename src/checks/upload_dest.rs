//! Upload destination accessibility check
//!
//! Uploads fail at the very end of a long deploy, so a broken remote is the
//! most expensive misconfiguration to discover late. In thorough mode the
//! destination is probed the way rclone itself would use it: local
//! directories must exist, configured remotes must answer a listing at the
//! remote root (credentials and connectivity, without requiring the target
//! prefix to exist yet).

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::{ShipResult, ResultExt};
use crate::utils;
use std::path::Path;
use std::process::Command;

pub struct UploadDestCheck;

/// `rclone lsd <remote>:` as a credentials and connectivity probe
fn probe_remote(remote: &str) -> ShipResult<bool> {
  let output = Command::new("rclone")
    .arg("lsd")
    .arg(format!("{}:", remote))
    .output()
    .context("Failed to execute rclone")?;
  Ok(output.status.success())
}

impl Check for UploadDestCheck {
  fn name(&self) -> &str {
    "upload-destination"
  }

  fn description(&self) -> &str {
    "Checks that the configured upload destination is accessible"
  }

  fn is_expensive(&self) -> bool {
    true
  }

  fn requires_config(&self) -> bool {
    true
  }

  fn run(&self, ctx: &CheckContext) -> ShipResult<CheckResult> {
    let Some(config) = ctx.config.as_ref() else {
      return Ok(CheckResult::pass(self.name(), "No configuration loaded"));
    };
    let Some(upload) = config.upload.as_ref() else {
      return Ok(CheckResult::pass(self.name(), "No upload destination configured"));
    };

    match utils::remote_name(&upload.dest) {
      Some(remote) => {
        if probe_remote(remote)? {
          Ok(CheckResult::pass(
            self.name(),
            format!("Remote '{}' answers: {}", remote, upload.dest),
          ))
        } else {
          Ok(CheckResult::error(
            self.name(),
            format!("Remote '{}' is not accessible", remote),
            Some(format!("Check `rclone config show {}` and the credentials it points at", remote)),
          ))
        }
      }
      None => {
        if Path::new(&upload.dest).is_dir() {
          Ok(CheckResult::pass(
            self.name(),
            format!("Local destination exists: {}", upload.dest),
          ))
        } else {
          Ok(CheckResult::error(
            self.name(),
            format!("Local destination does not exist: {}", upload.dest),
            Some("Create the directory, or fix [upload] dest in ship.toml"),
          ))
        }
      }
    }
  }
}
