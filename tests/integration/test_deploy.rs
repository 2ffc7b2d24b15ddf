//! End-to-end deploy tests over stubbed external tools

use crate::helpers::*;
use anyhow::Result;
use std::fs;

#[test]
fn test_deploy_end_to_end() -> Result<()> {
  let site = TestSite::new()?;
  let uploads = site.enable_upload()?;

  run_stackship(&site, &["deploy", "w_2025_10", "--product", "demo"])?;

  // The installed stack is in place.
  let manifest = site.stack_dir("demo", "w_2025_10").join("ups_db").join("manifest.txt");
  assert!(manifest.is_file());

  // Archive and checksum sidecar exist.
  let archive = site.archive_path("w_2025_10");
  assert!(archive.is_file());
  let mut sidecar_path = archive.clone().into_os_string();
  sidecar_path.push(".sha256");
  let sidecar = fs::read_to_string(sidecar_path)?;
  assert!(sidecar.contains("w_2025_10.tar.gz"));

  // The per-release log is non-empty and captured installer output.
  let log = fs::read_to_string(site.log_path("demo", "w_2025_10"))?;
  assert!(!log.is_empty());
  assert!(log.contains("eups distrib install output"));
  assert!(log.contains("deploy complete"));

  // Archive and checksum were both uploaded.
  assert!(uploads.join("w_2025_10.tar.gz").is_file());
  assert!(uploads.join("w_2025_10.tar.gz.sha256").is_file());

  // Scratch staging was cleaned up.
  assert_eq!(fs::read_dir(site.scratch_dir())?.count(), 0);
  Ok(())
}

#[test]
fn test_deploy_probes_bootstrap_before_installing() -> Result<()> {
  let site = TestSite::new()?;

  run_stackship(&site, &["deploy", "w_2025_10"])?;

  let calls = site.calls();
  let probe = calls
    .iter()
    .position(|c| c.starts_with("curl") && c.contains("-I"))
    .expect("HEAD probe ran");
  let install = calls
    .iter()
    .position(|c| c.starts_with("eups"))
    .expect("eups ran");
  assert!(probe < install, "probe must precede install: {:?}", calls);
  Ok(())
}

#[test]
fn test_deploy_without_tag_prints_usage_and_exits_zero() -> Result<()> {
  let site = TestSite::new()?;

  let output = try_stackship(&site, &["deploy"])?;
  assert_eq!(output.status.code(), Some(0));
  assert!(stdout_of(&output).contains("Usage"));
  // Nothing was mutated.
  assert!(!site.site_root.join("linux-x86_64").exists());
  Ok(())
}

#[test]
fn test_deploy_invalid_tag_exits_nonzero_without_mutation() -> Result<()> {
  let site = TestSite::new()?;

  let output = try_stackship(&site, &["deploy", "foo_123"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Invalid release tag"));
  assert!(!site.site_root.join("linux-x86_64").exists());
  Ok(())
}

#[test]
fn test_second_deploy_of_same_release_is_refused() -> Result<()> {
  let site = TestSite::new()?;

  run_stackship(&site, &["deploy", "w_2025_10"])?;
  let output = try_stackship(&site, &["deploy", "w_2025_10"])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr_of(&output).contains("already deployed"));
  Ok(())
}

#[test]
fn test_deploy_unknown_product_exits_nonzero() -> Result<()> {
  let site = TestSite::new()?;

  let output = try_stackship(&site, &["deploy", "w_2025_10", "--product", "nonexistent"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("not found"));
  Ok(())
}

#[test]
fn test_deploy_json_outcome() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["deploy", "v13_0", "--experimental", "--skip-upload", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;

  assert_eq!(json["tag"], "v13_0");
  assert_eq!(json["kind"], "stable");
  assert_eq!(json["release_dir"], "v13.0-dev");
  assert_eq!(json["uploaded"], false);
  assert_eq!(json["sha256"].as_str().unwrap().len(), 64);
  assert!(site.stack_dir("demo", "v13.0-dev").is_dir());
  Ok(())
}

#[test]
fn test_deploy_dry_run_mutates_nothing() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["deploy", "w_2025_10", "--dry-run"])?;
  assert!(stdout_of(&output).contains("Dry run"));
  assert!(!site.site_root.join("linux-x86_64").exists());
  assert!(site.calls().is_empty());
  Ok(())
}
