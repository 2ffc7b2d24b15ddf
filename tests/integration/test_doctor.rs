//! Doctor command tests

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_doctor_passes_with_stub_tools() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["doctor", "--json"])?;
  let results: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;

  let results = results.as_array().expect("doctor --json emits an array");
  assert!(!results.is_empty());
  for result in results {
    assert_eq!(result["passed"], true, "check failed: {}", result);
  }

  let names: Vec<&str> = results.iter().filter_map(|r| r["check_name"].as_str()).collect();
  assert!(names.contains(&"required-tools"));
  assert!(names.contains(&"site-root"));
  Ok(())
}

#[test]
fn test_doctor_exits_validation_code_when_tool_missing() -> Result<()> {
  let site = TestSite::new()?;
  // A configured cvmfs repository makes cvmfs_server required.
  site.enable_publish(Some("sw.test"))?;
  site.remove_stub("cvmfs_server")?;

  let output = try_stackship(&site, &["doctor", "--json"])?;
  assert_eq!(output.status.code(), Some(3));

  let results: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  let tools = results
    .as_array()
    .unwrap()
    .iter()
    .find(|r| r["check_name"] == "required-tools")
    .expect("required-tools result present");
  assert_eq!(tools["passed"], false);
  assert!(tools["message"].as_str().unwrap().contains("cvmfs_server"));
  Ok(())
}

#[test]
fn test_doctor_human_output_summarizes() -> Result<()> {
  let site = TestSite::new()?;

  let output = run_stackship(&site, &["doctor"])?;
  let stdout = stdout_of(&output);
  assert!(stdout.contains("Registered checks"));
  assert!(stdout.contains("checks passed"));
  Ok(())
}
