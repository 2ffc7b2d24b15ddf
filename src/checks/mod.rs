//! Health checks and validation infrastructure
//!
//! This module provides a unified interface for running health checks and validations.
//! All checks implement the `Check` trait, making it easy to add new checks without
//! modifying core logic.
//!
//! # Built-in Checks
//!
//! - **required-tools**: Checks the external tools this configuration needs
//! - **site-root**: Checks the site root exists and is writable
//! - **bootstrap-reachable**: Probes the bootstrap installer URL (thorough mode)
//! - **upload-destination**: Probes the upload destination (thorough mode)
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::checks::{CheckContext, create_default_runner};
//!
//! let ctx = CheckContext {
//!   config: ShipConfig::load(&cwd).ok(),
//!   thorough: true,
//! };
//!
//! let runner = create_default_runner();
//! let results = runner.run_all(&ctx)?;
//!
//! for result in results {
//!   if !result.passed {
//!     println!("❌ {}: {}", result.check_name, result.message);
//!   }
//! }
//! ```

mod binaries;
mod bootstrap;
mod runner;
mod site;
mod trait_def;
mod upload_dest;

// Re-export public API
pub use runner::create_default_runner;
pub use trait_def::{CheckContext, Severity};

// Individual checks are not exported - they're registered in create_default_runner()
// This keeps the API simple and prevents misuse
