//! Tag classification CLI tests

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_tag_stable_prints_kind_and_directory() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["tag", "v12_1"])?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("stable"));
  assert!(stdout.contains("v12.1"));
  Ok(())
}

#[test]
fn test_tag_json_output() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["tag", "w_2024_35", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(json["tag"], "w_2024_35");
  assert_eq!(json["kind"], "weekly");
  assert_eq!(json["release_dir"], "w_2024_35");
  Ok(())
}

#[test]
fn test_tag_experimental_suffix() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["tag", "v13_0_2", "--experimental", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(json["kind"], "stable");
  assert_eq!(json["release_dir"], "v13.0.2-dev");
  Ok(())
}

#[test]
fn test_tag_daily_and_sims_pass_through() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["tag", "d_2024_7_3", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(json["kind"], "daily");
  assert_eq!(json["release_dir"], "d_2024_7_3");

  let output = run_stackship(&site, &["tag", "sims_2_13_0", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(json["kind"], "sims");
  assert_eq!(json["release_dir"], "sims_2_13_0");
  Ok(())
}

#[test]
fn test_invalid_tag_exits_nonzero() -> Result<()> {
  let site = TestSite::new()?;

  let output = try_stackship(&site, &["tag", "foo_123"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("Invalid release tag"));
  Ok(())
}
