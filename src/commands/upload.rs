//! Upload an existing release archive and its checksum
//!
//! rclone is idempotent at the file level, so re-running a failed or
//! interrupted upload is always safe.

use crate::core::config::ShipConfig;
use crate::core::error::{PublishError, ShipError, ShipResult};
use crate::core::layout::SiteLayout;
use crate::core::tag::ReleaseTag;
use crate::core::upload::{RcloneUploader, Uploader};
use std::env;

pub fn run_upload(tag: &str, product: Option<String>, experimental: bool, dest: Option<String>) -> ShipResult<()> {
  let current_dir = env::current_dir()?;
  let config = ShipConfig::load(&current_dir)?;
  // The product only picks the site slice here; uploads are per-release.
  super::deploy::resolve_product(&config, product.as_deref())?;

  let dest = match dest.or_else(|| config.upload.as_ref().map(|u| u.dest.clone())) {
    Some(dest) => dest,
    None => {
      return Err(ShipError::with_help(
        "No upload destination configured",
        "Set [upload] dest in ship.toml or pass --dest",
      ));
    }
  };

  let classified = ReleaseTag::classify(tag)?;
  let release_dir = classified.dir_name(experimental);

  let layout = SiteLayout::new(&config.site.root, &config.site.platform_dir());
  let archive = layout.archive_path(&release_dir);
  if !archive.is_file() {
    return Err(ShipError::Publish(PublishError::PathNotFound { path: archive }));
  }

  let uploader = RcloneUploader;
  println!("📤 Uploading {} to {}", archive.display(), dest);
  uploader.upload(&archive, &dest)?;

  let checksum = layout.checksum_path(&release_dir);
  if checksum.is_file() {
    uploader.upload(&checksum, &dest)?;
  }

  println!("✅ Uploaded {}", release_dir);
  Ok(())
}
