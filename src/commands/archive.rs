//! Re-archive an already-installed release
//!
//! Useful when an archive was lost or the deploy was interrupted after the
//! install step: the installed stack is still on disk and only the tarball
//! needs rebuilding. Refuses to overwrite an existing archive for the same
//! release.

use crate::core::archive::{Archiver, TarGzArchiver, write_checksum_sidecar};
use crate::core::config::ShipConfig;
use crate::core::error::{PublishError, ShipError, ShipResult};
use crate::core::layout::SiteLayout;
use crate::core::tag::ReleaseTag;
use std::env;

pub fn run_archive(tag: &str, product: Option<String>, experimental: bool, json: bool) -> ShipResult<()> {
  let current_dir = env::current_dir()?;
  let config = ShipConfig::load(&current_dir)?;
  let product = super::deploy::resolve_product(&config, product.as_deref())?;

  let classified = ReleaseTag::classify(tag)?;
  let release_dir = classified.dir_name(experimental);

  let layout = SiteLayout::new(&config.site.root, &config.site.platform_dir());
  let stack_dir = layout.release_dir(&product.name, &release_dir);
  if !stack_dir.is_dir() {
    return Err(ShipError::Publish(PublishError::PathNotFound { path: stack_dir }));
  }

  let archive_path = layout.archive_path(&release_dir);
  if archive_path.exists() {
    return Err(ShipError::Publish(PublishError::AlreadyDeployed { path: archive_path }));
  }
  std::fs::create_dir_all(layout.archives_dir())?;

  let archiver = if json { TarGzArchiver::quiet() } else { TarGzArchiver::new() };
  let summary = archiver.create(&stack_dir, &archive_path)?;
  write_checksum_sidecar(&summary.path, &summary.sha256)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    println!("📦 Archived {} {} to {}", product.name, release_dir, summary.path.display());
    println!("   {} entries, {} bytes, sha256 {}", summary.entries, summary.total_bytes, summary.sha256);
  }

  Ok(())
}
