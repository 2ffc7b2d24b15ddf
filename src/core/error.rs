//! Error types for stackship with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to operators. Every external-tool failure surfaces
//! the command that failed alongside its captured stderr.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Exit codes for stackship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid tags, unknown products)
  User = 1,
  /// System error (external tools, network, I/O)
  System = 2,
  /// Validation failure (health checks)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for stackship
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// Release tag classification errors
  Tag(TagError),

  /// Transactional publish errors
  Publish(PublishError),

  /// Deploy pipeline errors (download, install, archive, upload)
  Pipeline(PipelineError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Tag(_) => ExitCode::User,
      ShipError::Publish(_) => ExitCode::System,
      ShipError::Pipeline(_) => ExitCode::System,
      ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Tag(e) => e.help_message(),
      ShipError::Publish(e) => e.help_message(),
      ShipError::Pipeline(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Tag(e) => write!(f, "{}", e),
      ShipError::Publish(e) => write!(f, "{}", e),
      ShipError::Pipeline(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ShipError {
  fn from(err: toml_edit::TomlError) -> Self {
    ShipError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ShipError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ShipError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<std::str::Utf8Error> for ShipError {
  fn from(err: std::str::Utf8Error) -> Self {
    ShipError::message(format!("UTF-8 error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ShipError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ShipError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for ShipError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ShipError::message(format!("Path strip prefix error: {}", err))
  }
}

impl From<std::env::VarError> for ShipError {
  fn from(err: std::env::VarError) -> Self {
    ShipError::message(format!("Environment variable error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// ship.toml not found
  NotFound { search_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Product not found in configuration
  ProductNotFound { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `stackship init` to create a configuration file.".to_string()),
      ConfigError::ProductNotFound { name } => Some(format!(
        "Configured products are the `[[products]]` entries in ship.toml. Add one named '{}' or pick an existing one.",
        name
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { search_root } => {
        write!(
          f,
          "No stackship configuration found.\nExpected file: {}/ship.toml",
          search_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::ProductNotFound { name } => {
        write!(f, "Product '{}' not found in configuration", name)
      }
    }
  }
}

/// Release tag classification errors
#[derive(Debug)]
pub enum TagError {
  /// Tag matches none of the recognized grammars
  Invalid { tag: String },
}

impl TagError {
  fn help_message(&self) -> Option<String> {
    match self {
      TagError::Invalid { .. } => Some(
        "Recognized forms: v<major>_<minor>[_<patch>] (stable), w_<year>_<week> (weekly), d_<year>_<month>_<day> (daily), sims_<anything> (sims).".to_string(),
      ),
    }
  }
}

impl fmt::Display for TagError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TagError::Invalid { tag } => {
        write!(f, "Invalid release tag: '{}'", tag)
      }
    }
  }
}

/// Transactional publish errors
#[derive(Debug)]
pub enum PublishError {
  /// Source or target path missing
  PathNotFound { path: PathBuf },

  /// Release directory already exists at the target
  AlreadyDeployed { path: PathBuf },

  /// Opening the store transaction failed
  TransactionStartFailed { store: String, reason: String },

  /// Copying the release tree failed
  CopyFailed { reason: String },

  /// Committing the store transaction failed
  CommitFailed { store: String, reason: String },
}

impl PublishError {
  fn help_message(&self) -> Option<String> {
    match self {
      PublishError::AlreadyDeployed { .. } => Some(
        "Published releases are never overwritten. Remove the existing directory by hand, or pick a different tag.".to_string(),
      ),
      PublishError::TransactionStartFailed { .. } => Some(
        "Another publish may hold the transaction. Check for stale transactions with `cvmfs_server info` and abort them.".to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::PathNotFound { path } => {
        write!(f, "Path not found: {}", path.display())
      }
      PublishError::AlreadyDeployed { path } => {
        write!(f, "Release already deployed at: {}", path.display())
      }
      PublishError::TransactionStartFailed { store, reason } => {
        write!(f, "Could not open a transaction on {}: {}", store, reason)
      }
      PublishError::CopyFailed { reason } => {
        write!(f, "Copying the release tree failed: {}", reason)
      }
      PublishError::CommitFailed { store, reason } => {
        write!(f, "Committing the transaction on {} failed: {}", store, reason)
      }
    }
  }
}

/// Deploy pipeline errors
#[derive(Debug)]
pub enum PipelineError {
  /// Bootstrap installer unreachable or download failed
  DownloadFailed { url: String, reason: String },

  /// Stack installation failed
  InstallFailed {
    product: String,
    tag: String,
    reason: String,
  },

  /// Archive creation or extraction failed
  ArchiveFailed { path: PathBuf, reason: String },

  /// Archive upload failed
  UploadFailed { dest: String, reason: String },
}

impl PipelineError {
  fn help_message(&self) -> Option<String> {
    match self {
      PipelineError::DownloadFailed { .. } => Some(
        "Check the [bootstrap] url in ship.toml and network access from this host. `stackship doctor --thorough` probes it.".to_string(),
      ),
      PipelineError::UploadFailed { dest, .. } => Some(format!(
        "Check that '{}' is a configured rclone remote (or an existing directory). `rclone lsd {}` should succeed.",
        dest, dest
      )),
      _ => None,
    }
  }
}

impl fmt::Display for PipelineError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PipelineError::DownloadFailed { url, reason } => {
        write!(f, "Bootstrap download from {} failed: {}", url, reason)
      }
      PipelineError::InstallFailed { product, tag, reason } => {
        write!(f, "Install of {} {} failed: {}", product, tag, reason)
      }
      PipelineError::ArchiveFailed { path, reason } => {
        write!(f, "Archive operation on {} failed: {}", path.display(), reason)
      }
      PipelineError::UploadFailed { dest, reason } => {
        write!(f, "Upload to {} failed: {}", dest, reason)
      }
    }
  }
}

/// Result type alias for stackship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Name the binary was invoked as, for error prefixes
fn invoked_as() -> String {
  std::env::args()
    .next()
    .and_then(|arg0| {
      Path::new(&arg0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
    })
    .unwrap_or_else(|| "stackship".to_string())
}

/// Pretty-print an error to stderr with the invoking binary name and help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}: {}\n", invoked_as(), error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to ShipError (for transition period)
impl From<anyhow::Error> for ShipError {
  fn from(err: anyhow::Error) -> Self {
    ShipError::message(err.to_string())
  }
}
