//! Upload command tests

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_upload_sends_archive_and_checksum() -> Result<()> {
  let site = TestSite::new()?;
  let uploads = site.enable_upload()?;
  run_stackship(&site, &["deploy", "w_2025_10", "--skip-upload"])?;

  run_stackship(&site, &["upload", "w_2025_10"])?;

  assert!(uploads.join("w_2025_10.tar.gz").is_file());
  assert!(uploads.join("w_2025_10.tar.gz.sha256").is_file());
  Ok(())
}

#[test]
fn test_upload_is_safe_to_retry() -> Result<()> {
  let site = TestSite::new()?;
  let uploads = site.enable_upload()?;
  run_stackship(&site, &["deploy", "w_2025_10", "--skip-upload"])?;

  run_stackship(&site, &["upload", "w_2025_10"])?;
  run_stackship(&site, &["upload", "w_2025_10"])?;

  assert!(uploads.join("w_2025_10.tar.gz").is_file());
  let rclone_calls = site.calls().iter().filter(|c| c.starts_with("rclone")).count();
  assert_eq!(rclone_calls, 4);
  Ok(())
}

#[test]
fn test_upload_dest_flag_overrides_config() -> Result<()> {
  let site = TestSite::new()?;
  run_stackship(&site, &["deploy", "w_2025_10", "--skip-upload"])?;

  let dest = site.path.join("elsewhere");
  run_stackship(&site, &["upload", "w_2025_10", "--dest", dest.to_str().unwrap()])?;
  assert!(dest.join("w_2025_10.tar.gz").is_file());
  Ok(())
}

#[test]
fn test_upload_without_destination_fails() -> Result<()> {
  let site = TestSite::new()?;
  run_stackship(&site, &["deploy", "w_2025_10", "--skip-upload"])?;

  let output = try_stackship(&site, &["upload", "w_2025_10"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("No upload destination configured"));
  Ok(())
}

#[test]
fn test_upload_missing_archive_fails() -> Result<()> {
  let site = TestSite::new()?;
  site.enable_upload()?;

  let output = try_stackship(&site, &["upload", "w_2025_10"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr_of(&output).contains("Path not found"));
  Ok(())
}
