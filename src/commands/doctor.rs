//! Health check command for diagnosing issues
//!
//! The doctor command runs all health checks and reports any issues found.

use std::env;

use crate::checks::{CheckContext, Severity, create_default_runner};
use crate::core::config::ShipConfig;
use crate::core::error::{ExitCode, ShipResult};

/// Run the doctor command to diagnose issues
///
/// Returns Ok(()) if all checks pass, or exits with error code if checks fail
pub fn run_doctor(thorough: bool, json: bool) -> ShipResult<()> {
  let current_dir = env::current_dir()?;

  let ctx = CheckContext {
    config: ShipConfig::load(&current_dir).ok(),
    thorough,
  };

  let runner = create_default_runner();
  let results = runner.run_all(&ctx)?;

  if json {
    // JSON output for CI/automation
    println!("{}", serde_json::to_string_pretty(&results)?);
    if results.iter().any(|r| !r.passed && r.severity == Severity::Error) {
      std::process::exit(ExitCode::Validation.as_i32());
    }
    return Ok(());
  }

  // Human-readable output
  println!("🏥 Running health checks...\n");

  if ctx.config.is_none() {
    println!("ℹ️  No ship.toml found; configuration-dependent checks were skipped.\n");
  }

  println!("📋 Registered checks:");
  for check in runner.checks() {
    println!("   • {}: {}", check.name(), check.description());
  }
  println!();

  let mut has_errors = false;
  let mut has_warnings = false;

  for result in &results {
    let icon = if result.passed { "✅" } else { "❌" };
    println!("{} {}: {}", icon, result.check_name, result.message);

    if !result.passed {
      if let Some(ref suggestion) = result.suggestion {
        println!("   💡 Fix: {}", suggestion);
      }

      match result.severity {
        Severity::Error => has_errors = true,
        Severity::Warning => has_warnings = true,
        _ => {}
      }
    }
    println!();
  }

  let passed_count = results.iter().filter(|r| r.passed).count();
  let total_count = results.len();

  println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
  println!("Summary: {}/{} checks passed", passed_count, total_count);

  if has_errors {
    println!("\n⚠️  Critical issues found. Please fix errors before deploying.");
    std::process::exit(ExitCode::Validation.as_i32());
  } else if has_warnings {
    println!("\n⚠️  Some warnings found. Consider addressing them.");
  } else {
    println!("\n✨ All checks passed! Your site looks healthy.");
  }

  Ok(())
}
