//! Site root check
//!
//! Deploys write installed stacks, archives, and logs under the configured
//! site root. The root has to exist and be writable by the invoking user.

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShipResult;

pub struct SiteRootCheck;

impl Check for SiteRootCheck {
  fn name(&self) -> &str {
    "site-root"
  }

  fn description(&self) -> &str {
    "Checks that the configured site root exists and is writable"
  }

  fn requires_config(&self) -> bool {
    true
  }

  fn run(&self, ctx: &CheckContext) -> ShipResult<CheckResult> {
    let Some(config) = ctx.config.as_ref() else {
      return Ok(CheckResult::pass(self.name(), "No configuration loaded"));
    };
    let root = &config.site.root;

    if !root.is_dir() {
      return Ok(CheckResult::error(
        self.name(),
        format!("Site root does not exist: {}", root.display()),
        Some("Create the directory, or fix [site] root in ship.toml"),
      ));
    }

    // A short-lived probe file is the only reliable writability test; it is
    // removed when the handle drops.
    match tempfile::Builder::new().prefix(".stackship-doctor-").tempfile_in(root) {
      Ok(_probe) => Ok(CheckResult::pass(
        self.name(),
        format!("Site root is writable: {}", root.display()),
      )),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        format!("Site root is not writable: {} ({})", root.display(), e),
        Some("Fix the directory ownership or run as a user that can write there"),
      )),
    }
  }
}
