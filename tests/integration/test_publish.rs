//! Transactional publish tests over the stubbed cvmfs_server workflow

use crate::helpers::*;
use anyhow::Result;
use std::fs;

/// Deploy one release so an archive exists to publish
fn deploy_weekly(site: &TestSite) -> Result<()> {
  run_stackship(site, &["deploy", "w_2025_10"])?;
  Ok(())
}

fn cvmfs_calls(site: &TestSite) -> Vec<String> {
  site
    .calls()
    .into_iter()
    .filter(|c| c.starts_with("cvmfs_server"))
    .collect()
}

#[test]
fn test_publish_end_to_end_over_cvmfs() -> Result<()> {
  let site = TestSite::new()?;
  let publish_root = site.enable_publish(Some("sw.test"))?;
  deploy_weekly(&site)?;

  run_stackship(&site, &["publish", "w_2025_10"])?;

  // The release tree came out of the archive intact.
  let published = publish_root
    .join("linux-x86_64")
    .join("demo")
    .join("w_2025_10")
    .join("ups_db")
    .join("manifest.txt");
  assert!(published.is_file());

  // Target-root creation and the release each ran one begin/commit pair,
  // and nothing was aborted.
  let calls = cvmfs_calls(&site);
  assert_eq!(
    calls,
    vec![
      "cvmfs_server transaction sw.test",
      "cvmfs_server publish sw.test",
      "cvmfs_server transaction sw.test",
      "cvmfs_server publish sw.test",
    ]
  );

  // Publish staging was cleaned up.
  assert_eq!(fs::read_dir(site.scratch_dir())?.count(), 0);
  Ok(())
}

#[test]
fn test_republish_reports_already_deployed_without_transaction() -> Result<()> {
  let site = TestSite::new()?;
  site.enable_publish(Some("sw.test"))?;
  deploy_weekly(&site)?;

  run_stackship(&site, &["publish", "w_2025_10"])?;
  let transactions_before = cvmfs_calls(&site).len();

  let output = try_stackship(&site, &["publish", "w_2025_10"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr_of(&output).contains("already deployed"));

  // The second attempt opened no transaction at all.
  assert_eq!(cvmfs_calls(&site).len(), transactions_before);
  Ok(())
}

#[test]
fn test_failed_commit_aborts_and_unwinds() -> Result<()> {
  let site = TestSite::new()?;
  let publish_root = site.enable_publish(Some("sw.test"))?;
  deploy_weekly(&site)?;

  // Pre-create the target root so only the release publish opens a
  // transaction, then make that commit fail.
  let target_root = publish_root.join("linux-x86_64").join("demo");
  fs::create_dir_all(&target_root)?;
  site.fail_next_publish()?;

  let output = try_stackship(&site, &["publish", "w_2025_10"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr_of(&output).contains("Committing the transaction"));

  // The transaction was aborted, never left open, and the half-published
  // tree is gone.
  let calls = cvmfs_calls(&site);
  assert_eq!(
    calls,
    vec![
      "cvmfs_server transaction sw.test",
      "cvmfs_server publish sw.test",
      "cvmfs_server abort -f sw.test",
    ]
  );
  assert!(!target_root.join("w_2025_10").exists());
  Ok(())
}

#[test]
fn test_publish_to_plain_directory_needs_no_cvmfs() -> Result<()> {
  let site = TestSite::new()?;
  let publish_root = site.enable_publish(None)?;
  site.remove_stub("cvmfs_server")?;
  deploy_weekly(&site)?;

  run_stackship(&site, &["publish", "w_2025_10"])?;

  assert!(
    publish_root
      .join("linux-x86_64")
      .join("demo")
      .join("w_2025_10")
      .is_dir()
  );
  assert!(cvmfs_calls(&site).is_empty());
  Ok(())
}

#[test]
fn test_publish_without_target_configured_fails() -> Result<()> {
  let site = TestSite::new()?;
  deploy_weekly(&site)?;

  let output = try_stackship(&site, &["publish", "w_2025_10"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("No publish target configured"));
  Ok(())
}

#[test]
fn test_publish_missing_archive_fails() -> Result<()> {
  let site = TestSite::new()?;
  site.enable_publish(Some("sw.test"))?;

  let output = try_stackship(&site, &["publish", "w_2025_10"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr_of(&output).contains("Path not found"));
  assert!(cvmfs_calls(&site).is_empty());
  Ok(())
}

#[test]
fn test_publish_explicit_archive_path() -> Result<()> {
  let site = TestSite::new()?;
  let publish_root = site.enable_publish(None)?;
  deploy_weekly(&site)?;

  // Move the archive out of the site layout and point at it directly.
  let moved = site.path.join("w_2025_10.tar.gz");
  fs::rename(site.archive_path("w_2025_10"), &moved)?;

  run_stackship(&site, &["publish", "w_2025_10", "--archive", moved.to_str().unwrap()])?;
  assert!(
    publish_root
      .join("linux-x86_64")
      .join("demo")
      .join("w_2025_10")
      .is_dir()
  );
  Ok(())
}
