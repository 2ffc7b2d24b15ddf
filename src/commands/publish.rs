//! Publish-side command: unpack an archive and publish it transactionally
//!
//! Runs on the stratum 0 host. The archive is extracted into a unique
//! staging directory under the build-side scratch, then handed to the
//! transactional publisher. Staging is process-local and removed when the
//! command returns, success or not; the publish target is only ever touched
//! inside a store transaction.

use crate::core::archive::{Archiver, TarGzArchiver};
use crate::core::config::{FailurePolicy, ShipConfig};
use crate::core::error::{PublishError, ShipError, ShipResult};
use crate::core::layout::SiteLayout;
use crate::core::publish::Publisher;
use crate::core::store::{CvmfsStore, DirectStore, TransactionalStore};
use crate::core::tag::ReleaseTag;
use std::env;
use std::path::PathBuf;

pub fn run_publish(
  tag: &str,
  product: Option<String>,
  experimental: bool,
  archive: Option<PathBuf>,
  strict: bool,
) -> ShipResult<()> {
  let current_dir = env::current_dir()?;
  let config = ShipConfig::load(&current_dir)?;
  let product = super::deploy::resolve_product(&config, product.as_deref())?;

  let Some(publish) = &config.publish else {
    return Err(ShipError::with_help(
      "No publish target configured",
      "Add a [publish] section with a root (and optionally a cvmfs repo) to ship.toml",
    ));
  };

  let classified = ReleaseTag::classify(tag)?;
  let release_dir = classified.dir_name(experimental);

  let site = SiteLayout::new(&config.site.root, &config.site.platform_dir());
  let archive_path = archive.unwrap_or_else(|| site.archive_path(&release_dir));
  if !archive_path.is_file() {
    return Err(ShipError::Publish(PublishError::PathNotFound { path: archive_path }));
  }

  // Extraction stages under scratch; the TempDir removes it on return.
  let staging = site.unique_scratch(&release_dir)?;
  println!("📥 Unpacking {} into staging", archive_path.display());
  TarGzArchiver::new().extract(&archive_path, staging.path())?;

  let staged_release = staging.path().join(&release_dir);
  if !staged_release.is_dir() {
    return Err(ShipError::Publish(PublishError::PathNotFound { path: staged_release }));
  }

  let store: Box<dyn TransactionalStore> = match &publish.repo {
    Some(repo) => Box::new(CvmfsStore::new(repo)),
    None => Box::new(DirectStore),
  };

  let policy = if strict { FailurePolicy::Strict } else { publish.policy };
  let publisher = Publisher::new(store.as_ref())
    .with_owner(publish.owner.clone())
    .with_policy(policy);

  let target = SiteLayout::new(&publish.root, &config.site.platform_dir());
  let target_root = target.product_dir(&product.name);

  println!("🚚 Publishing {} to {} via {}", release_dir, target_root.display(), store.describe());
  publisher.ensure_target_root(&target_root)?;
  publisher.publish(&staged_release, &target_root, &release_dir)?;

  println!("✅ Published {}", target_root.join(&release_dir).display());
  Ok(())
}
