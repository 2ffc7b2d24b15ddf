//! Transactional store backends
//!
//! A publish must never leave a transaction open: a dangling transaction
//! blocks every later publish against the same repository until someone
//! aborts it by hand. The trait keeps the begin/commit/abort surface narrow
//! so the publish sequencing can be exercised against fakes.

use crate::core::error::ShipResult;

pub mod cvmfs;

pub use cvmfs::CvmfsStore;

/// A target filesystem with transactional publish semantics
pub trait TransactionalStore {
  /// Human-readable identity for error messages
  fn describe(&self) -> String;

  /// Open a transaction; the target accepts writes only while one is open
  fn begin(&self) -> ShipResult<()>;

  /// Seal everything written since `begin` into a new published revision
  fn commit(&self) -> ShipResult<()>;

  /// Force-abort the open transaction, discarding written data
  fn abort(&self) -> ShipResult<()>;
}

/// Plain-directory target: writes land directly and transactions are no-ops
pub struct DirectStore;

impl TransactionalStore for DirectStore {
  fn describe(&self) -> String {
    "local directory".to_string()
  }

  fn begin(&self) -> ShipResult<()> {
    Ok(())
  }

  fn commit(&self) -> ShipResult<()> {
    Ok(())
  }

  fn abort(&self) -> ShipResult<()> {
    Ok(())
  }
}
