//! Required external tool check
//!
//! Everything heavy is delegated to system binaries, so a missing tool turns
//! into a confusing failure halfway through a deploy. The required set
//! depends on the configuration: rclone only matters with an upload
//! destination, cvmfs_server only with a repository, docker only for
//! containerized products.

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use std::process::{Command, Stdio};

pub struct RequiredToolsCheck;

/// Tools the current configuration needs on PATH
fn required_tools(config: Option<&ShipConfig>) -> Vec<&'static str> {
  let mut tools = vec!["curl"];

  match config {
    Some(config) => {
      if config.products.iter().any(|p| p.image.is_none()) || config.products.is_empty() {
        tools.push("eups");
      }
      if config.products.iter().any(|p| p.image.is_some()) {
        tools.push("docker");
      }
      if config.upload.is_some() {
        tools.push("rclone");
      }
      if config.publish.as_ref().and_then(|p| p.repo.as_ref()).is_some() {
        tools.push("cvmfs_server");
      }
    }
    None => tools.push("eups"),
  }

  tools
}

/// Whether a tool can be spawned at all; exit status does not matter
fn on_path(tool: &str) -> bool {
  Command::new(tool)
    .arg("--version")
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .is_ok()
}

impl Check for RequiredToolsCheck {
  fn name(&self) -> &str {
    "required-tools"
  }

  fn description(&self) -> &str {
    "Checks that the external tools this configuration needs are on PATH"
  }

  fn run(&self, ctx: &CheckContext) -> ShipResult<CheckResult> {
    let tools = required_tools(ctx.config.as_ref());
    let missing: Vec<&str> = tools.iter().copied().filter(|tool| !on_path(tool)).collect();

    if missing.is_empty() {
      Ok(CheckResult::pass(
        self.name(),
        format!("All required tools found: {}", tools.join(", ")),
      ))
    } else {
      Ok(CheckResult::error(
        self.name(),
        format!("Missing required tools: {}", missing.join(", ")),
        Some("Install the missing tools, or adjust ship.toml so they are not needed"),
      ))
    }
  }
}
