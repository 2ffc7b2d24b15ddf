//! Release tag classification
//!
//! Maps version-control tags onto a release kind and the canonical directory
//! name the release installs under. Four grammars are recognized, tried in
//! order:
//! - `v12_1` / `v12_1_3` (stable; directory swaps underscores for dots)
//! - `w_2024_35` (weekly; directory unchanged)
//! - `d_2024_7_3` (daily; directory unchanged)
//! - `sims_<anything>` (sims; directory unchanged)
//!
//! Anything else is invalid and the whole operation stops. An unrecognized
//! tag deployed under a best-effort name would poison the append-only target,
//! so there is no fallback.

use crate::core::error::{ShipError, ShipResult, TagError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Directory suffix for experimental releases
pub const EXPERIMENTAL_SUFFIX: &str = "-dev";

static STABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v(\d+)_(\d+)(?:_(\d+))?$").expect("valid stable tag regex"));
static WEEKLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^w_(\d{4})_(\d{1,2})$").expect("valid weekly tag regex"));
static DAILY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^d_(\d{4})_(\d{1,2})_(\d{1,2})$").expect("valid daily tag regex"));
static SIMS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^sims_.+$").expect("valid sims tag regex"));

/// The four recognized release kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
  Stable,
  Weekly,
  Daily,
  Sims,
}

impl fmt::Display for ReleaseKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseKind::Stable => write!(f, "stable"),
      ReleaseKind::Weekly => write!(f, "weekly"),
      ReleaseKind::Daily => write!(f, "daily"),
      ReleaseKind::Sims => write!(f, "sims"),
    }
  }
}

/// A classified release tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseTag {
  /// Tag exactly as given (e.g., "w_2024_35")
  pub raw: String,
  /// Release kind the tag matched
  pub kind: ReleaseKind,
  /// Canonical directory base name, before any experimental suffix
  pub dir_base: String,
}

impl ReleaseTag {
  /// Classify a tag against the recognized grammars
  ///
  /// The grammars are disjoint by prefix, but they are still tried in a fixed
  /// order (stable, weekly, daily, sims) so classification stays
  /// deterministic if they ever grow overlaps.
  pub fn classify(tag: &str) -> ShipResult<Self> {
    if let Some(caps) = STABLE.captures(tag) {
      let mut dir_base = format!("v{}.{}", &caps[1], &caps[2]);
      if let Some(patch) = caps.get(3) {
        dir_base.push('.');
        dir_base.push_str(patch.as_str());
      }
      return Ok(Self {
        raw: tag.to_string(),
        kind: ReleaseKind::Stable,
        dir_base,
      });
    }

    if WEEKLY.is_match(tag) {
      return Ok(Self::verbatim(tag, ReleaseKind::Weekly));
    }

    if DAILY.is_match(tag) {
      return Ok(Self::verbatim(tag, ReleaseKind::Daily));
    }

    if SIMS.is_match(tag) {
      return Ok(Self::verbatim(tag, ReleaseKind::Sims));
    }

    Err(ShipError::Tag(TagError::Invalid { tag: tag.to_string() }))
  }

  /// Kinds whose directory name is the tag itself
  fn verbatim(tag: &str, kind: ReleaseKind) -> Self {
    Self {
      raw: tag.to_string(),
      kind,
      dir_base: tag.to_string(),
    }
  }

  /// Directory name for this release, `-dev` suffixed when experimental
  pub fn dir_name(&self, experimental: bool) -> String {
    if experimental {
      format!("{}{}", self.dir_base, EXPERIMENTAL_SUFFIX)
    } else {
      self.dir_base.clone()
    }
  }
}
