//! Init command tests

use crate::helpers::*;
use anyhow::Result;
use std::fs;

#[test]
fn test_init_scaffolds_ship_toml() -> Result<()> {
  let site = TestSite::new()?;
  // Start from a clean directory; TestSite pre-writes a config.
  fs::remove_file(site.path.join("ship.toml"))?;

  run_stackship(&site, &["init", "--root", site.site_root.to_str().unwrap()])?;

  let config = fs::read_to_string(site.path.join("ship.toml"))?;
  assert!(config.contains("[site]"));
  assert!(config.contains("[bootstrap]"));
  assert!(config.contains("[[products]]"));
  assert!(config.contains("name = \"demo\""));

  // The scaffold is a loadable configuration: doctor runs against it.
  run_stackship(&site, &["doctor", "--json"])?;
  Ok(())
}

#[test]
fn test_init_without_confirmation_leaves_existing_config_alone() -> Result<()> {
  let site = TestSite::new()?;
  let before = fs::read_to_string(site.path.join("ship.toml"))?;

  // stdin is closed, so the overwrite prompt reads EOF and aborts.
  let output = run_stackship(&site, &["init"])?;
  assert!(stdout_of(&output).contains("Aborted"));
  assert_eq!(fs::read_to_string(site.path.join("ship.toml"))?, before);
  Ok(())
}

#[test]
fn test_init_force_overwrites() -> Result<()> {
  let site = TestSite::new()?;

  let custom_root = site.path.join("elsewhere");
  run_stackship(&site, &["init", "--force", "--root", custom_root.to_str().unwrap()])?;

  let config = fs::read_to_string(site.path.join("ship.toml"))?;
  assert!(config.contains("elsewhere"));
  Ok(())
}
