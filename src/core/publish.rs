//! Transactional release publishing
//!
//! Places a staged release tree under the target root inside one store
//! transaction. The rule that can never break: a transaction that was opened
//! is always committed or aborted before control returns. Failures before
//! `begin` need no cleanup; failures after it go through `abort_and_fail`,
//! which force-aborts and unwinds the partial copy.

use crate::core::config::FailurePolicy;
use crate::core::error::{PublishError, ShipError, ShipResult, ResultExt};
use crate::core::store::TransactionalStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Publishes staged release trees through a transactional store
pub struct Publisher<'a> {
  store: &'a dyn TransactionalStore,
  owner: Option<String>,
  policy: FailurePolicy,
}

impl<'a> Publisher<'a> {
  pub fn new(store: &'a dyn TransactionalStore) -> Self {
    Self {
      store,
      owner: None,
      policy: FailurePolicy::Lenient,
    }
  }

  /// Account the published tree is handed to (`user` or `user:group`)
  pub fn with_owner(mut self, owner: Option<String>) -> Self {
    self.owner = owner;
    self
  }

  pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Publish `source_dir` as `target_root/<release_dir_name>`
  ///
  /// The target is append-only: an existing release directory fails the
  /// publish before any transaction is opened.
  pub fn publish(&self, source_dir: &Path, target_root: &Path, release_dir_name: &str) -> ShipResult<()> {
    if !source_dir.is_dir() {
      return Err(ShipError::Publish(PublishError::PathNotFound {
        path: source_dir.to_path_buf(),
      }));
    }
    if !target_root.is_dir() {
      return Err(ShipError::Publish(PublishError::PathNotFound {
        path: target_root.to_path_buf(),
      }));
    }

    let final_target = target_root.join(release_dir_name);
    if final_target.exists() {
      return Err(ShipError::Publish(PublishError::AlreadyDeployed { path: final_target }));
    }

    self.store.begin().map_err(|e| {
      ShipError::Publish(PublishError::TransactionStartFailed {
        store: self.store.describe(),
        reason: e.to_string(),
      })
    })?;

    // The transaction is open from here on. Every early return below must
    // go through abort_and_fail.

    if let Err(e) = copy_tree(source_dir, &final_target) {
      let error = ShipError::Publish(PublishError::CopyFailed { reason: e.to_string() });
      return Err(self.abort_and_fail(error, &final_target));
    }

    if let Some(owner) = &self.owner
      && let Err(e) = chown_tree(&final_target, owner)
    {
      match self.policy {
        FailurePolicy::Lenient => {
          eprintln!("⚠️  Ownership change to {} failed (continuing): {}", owner, e);
        }
        FailurePolicy::Strict => {
          return Err(self.abort_and_fail(e, &final_target));
        }
      }
    }

    if let Err(e) = self.store.commit() {
      let error = ShipError::Publish(PublishError::CommitFailed {
        store: self.store.describe(),
        reason: e.to_string(),
      });
      return Err(self.abort_and_fail(error, &final_target));
    }

    Ok(())
  }

  /// Create `target_root` inside its own transaction when missing
  ///
  /// The first publish of a product lands in a hierarchy that exists on the
  /// build side but not yet on the store side. Directory creation needs a
  /// transaction just like any other write.
  pub fn ensure_target_root(&self, target_root: &Path) -> ShipResult<()> {
    if target_root.is_dir() {
      return Ok(());
    }

    self.store.begin().map_err(|e| {
      ShipError::Publish(PublishError::TransactionStartFailed {
        store: self.store.describe(),
        reason: e.to_string(),
      })
    })?;

    if let Err(e) = fs::create_dir_all(target_root) {
      let error = ShipError::Publish(PublishError::CopyFailed {
        reason: format!("creating {}: {}", target_root.display(), e),
      });
      return Err(self.abort_and_fail(error, target_root));
    }

    if let Err(e) = self.store.commit() {
      let error = ShipError::Publish(PublishError::CommitFailed {
        store: self.store.describe(),
        reason: e.to_string(),
      });
      return Err(self.abort_and_fail(error, target_root));
    }

    Ok(())
  }

  /// Force-abort the active transaction, unwind partial writes, and hand the
  /// original error back. If even the abort fails, both failures are
  /// reported and the original one wins.
  fn abort_and_fail(&self, error: ShipError, final_target: &Path) -> ShipError {
    if let Err(abort_err) = self.store.abort() {
      eprintln!("⚠️  Transaction abort on {} also failed: {}", self.store.describe(), abort_err);
    }

    // A plain-directory target has no union mount to roll back; drop the
    // partial copy so a retry does not see AlreadyDeployed.
    if final_target.exists() {
      let _ = fs::remove_dir_all(final_target);
    }

    error
  }
}

/// Recursively copy `source` to `dest`, preserving permission bits and file
/// modification times
///
/// Symlinks are followed. Staged trees come out of archive extraction and
/// contain none, so a dangling link is a copy error rather than a case to
/// preserve.
fn copy_tree(source: &Path, dest: &Path) -> ShipResult<()> {
  let mut dir_mtimes: Vec<(PathBuf, SystemTime)> = Vec::new();

  for entry in WalkDir::new(source).follow_links(true) {
    let entry = entry.map_err(|e| ShipError::message(format!("walking {}: {}", source.display(), e)))?;
    let rel = entry.path().strip_prefix(source)?;
    let target = dest.join(rel);
    let meta = entry
      .metadata()
      .map_err(|e| ShipError::message(format!("reading metadata of {}: {}", entry.path().display(), e)))?;

    if meta.is_dir() {
      fs::create_dir_all(&target).with_context(|| format!("Failed to create {}", target.display()))?;
      fs::set_permissions(&target, meta.permissions())
        .with_context(|| format!("Failed to set permissions on {}", target.display()))?;
      if let Ok(mtime) = meta.modified() {
        dir_mtimes.push((target, mtime));
      }
    } else {
      fs::copy(entry.path(), &target)
        .with_context(|| format!("Failed to copy {} to {}", entry.path().display(), target.display()))?;
      if let Ok(mtime) = meta.modified() {
        let file = fs::File::options()
          .write(true)
          .open(&target)
          .with_context(|| format!("Failed to reopen {}", target.display()))?;
        file
          .set_modified(mtime)
          .with_context(|| format!("Failed to set mtime on {}", target.display()))?;
      }
    }
  }

  // Creating children dirties parent directory mtimes; restore deepest-first.
  for (dir, mtime) in dir_mtimes.iter().rev() {
    if let Ok(file) = fs::File::open(dir) {
      let _ = file.set_modified(*mtime);
    }
  }

  Ok(())
}

/// `chown -R <owner>` on the published tree
///
/// Ownership stays delegated to the system chown so user/group name
/// resolution follows the host's NSS configuration.
fn chown_tree(path: &Path, owner: &str) -> ShipResult<()> {
  let output = Command::new("chown")
    .arg("-R")
    .arg(owner)
    .arg(path)
    .output()
    .context("Failed to execute chown")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    return Err(ShipError::message(format!(
      "chown -R {} {} failed: {}",
      owner,
      path.display(),
      stderr
    )));
  }

  Ok(())
}
