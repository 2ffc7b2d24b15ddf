//! Scaffold a ship.toml for a distribution site

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;

/// Run the init command to set up stackship configuration
pub fn run_init(root: Option<PathBuf>, force: bool) -> ShipResult<()> {
  let current_dir = env::current_dir()?;

  if ShipConfig::exists(&current_dir) && !force {
    print!("⚠️  Configuration already exists. Overwrite? [y/N]: ");
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    if !response.trim().eq_ignore_ascii_case("y") {
      println!("Aborted.");
      return Ok(());
    }
  }

  let site_root = root.unwrap_or_else(|| current_dir.join("site"));
  println!("📦 Scaffolding configuration for site root: {}", site_root.display());

  let config = ShipConfig::new(site_root);
  config.save(&current_dir)?;

  println!("\n✅ Successfully initialized stackship!");
  println!("   Configuration saved to: {}/ship.toml", current_dir.display());
  println!("\n🚀 Next steps:");
  println!("   1. Edit ship.toml: set the pkgroot for each [[products]] entry");
  println!("      Example: pkgroot = \"https://eups.lsst.codes/stack/src\"");
  println!("   2. Optionally add [upload] and [publish] sections");
  println!("   3. Run: stackship doctor");
  println!("   4. Run: stackship deploy <tag> --product <name>");

  Ok(())
}
