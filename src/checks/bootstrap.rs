//! Bootstrap installer reachability check
//!
//! The same HEAD probe a deploy runs before mutating anything, exposed as a
//! thorough-mode doctor check so a dead bootstrap URL is caught ahead of
//! release day.

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShipResult;
use crate::core::fetch::Bootstrap;

pub struct BootstrapReachableCheck;

impl Check for BootstrapReachableCheck {
  fn name(&self) -> &str {
    "bootstrap-reachable"
  }

  fn description(&self) -> &str {
    "Probes the bootstrap installer URL with a HEAD request"
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

    let bootstrap = Bootstrap::new(&config.bootstrap.url);
    match bootstrap.probe() {
      Ok(()) => Ok(CheckResult::pass(
        self.name(),
        format!("Bootstrap installer answers: {}", bootstrap.url()),
      )),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        e.to_string(),
        Some("Fix [bootstrap] url in ship.toml or check network access from this host"),
      )),
    }
  }
}
