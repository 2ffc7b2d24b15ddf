//! CLI commands for stackship
//!
//! This module contains all user-facing command implementations:
//!
//! ## Setup & Inspection
//! - **init**: Scaffold a ship.toml for a distribution site
//! - **doctor**: Run health checks and validation
//! - **tag**: Classify a release tag
//!
//! ## Build Side
//! - **deploy**: Install, archive, and upload one release end to end
//! - **archive**: Re-archive an already-installed release
//! - **upload**: Upload an existing archive and its checksum
//!
//! ## Publish Side
//! - **publish**: Unpack an archive and publish it transactionally
//!
//! Each command loads ship.toml itself; there is no ambient workspace state.

pub mod archive;
pub mod deploy;
pub mod doctor;
pub mod init;
pub mod publish;
pub mod tag;
pub mod upload;

pub use archive::run_archive;
pub use deploy::run_deploy;
pub use doctor::run_doctor;
pub use init::run_init;
pub use publish::run_publish;
pub use tag::run_tag;
pub use upload::run_upload;
