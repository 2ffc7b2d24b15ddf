//! Core engine for stackship operations
//!
//! This module contains the fundamental building blocks for all stackship functionality:
//!
//! - **archive**: release tarball creation, extraction, and fingerprints
//! - **config**: ship.toml parsing and validation
//! - **error**: error types with contextual help messages and exit codes
//! - **fetch**: bootstrap installer reachability and download
//! - **install**: stack installation through the EUPS package tool
//! - **layout**: on-disk site layout (releases, scratch, archives, logs)
//! - **logfile**: per-release build logs
//! - **pipeline**: the end-to-end deploy sequence
//! - **publish**: transactional publishing into the distribution filesystem
//! - **store**: transactional store backends (CernVM-FS, plain directory)
//! - **tag**: release tag classification
//! - **upload**: archive upload via rclone

pub mod archive;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod layout;
pub mod logfile;
pub mod pipeline;
pub mod publish;
pub mod store;
pub mod tag;
pub mod upload;
