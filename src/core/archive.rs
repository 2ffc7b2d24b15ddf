//! Release archive creation and extraction
//!
//! Archives are plain `<releaseDir>.tar.gz` trees with the release directory
//! as the single top-level entry. Every file is appended by content: symlinks
//! are followed and hard-linked pairs become independent copies, because the
//! distribution filesystem the archives are published into cannot represent
//! hard links across its content-addressed storage.

use crate::core::error::{PipelineError, ShipError, ShipResult, ResultExt};
use crate::ui::progress::FileProgress;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tar::{Archive, Builder};
use walkdir::WalkDir;

/// What a finished archive looks like
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSummary {
  /// Where the archive was written
  pub path: PathBuf,
  /// Number of tar entries (directories included)
  pub entries: usize,
  /// Uncompressed payload size in bytes
  pub total_bytes: u64,
  /// SHA-256 of the finished archive file
  pub sha256: String,
}

/// Creates and unpacks release archives
pub trait Archiver {
  /// Pack `source` into `dest`, with `source`'s directory name as the
  /// top-level entry
  fn create(&self, source: &Path, dest: &Path) -> ShipResult<ArchiveSummary>;

  /// Unpack `archive` under `dest`, preserving modes and mtimes
  fn extract(&self, archive: &Path, dest: &Path) -> ShipResult<()>;
}

/// tar + gzip implementation
pub struct TarGzArchiver {
  show_progress: bool,
}

impl TarGzArchiver {
  pub fn new() -> Self {
    Self { show_progress: true }
  }

  /// No progress bar (JSON output and tests)
  pub fn quiet() -> Self {
    Self { show_progress: false }
  }
}

impl Default for TarGzArchiver {
  fn default() -> Self {
    Self::new()
  }
}

fn archive_failed(path: &Path, reason: impl Into<String>) -> ShipError {
  ShipError::Pipeline(PipelineError::ArchiveFailed {
    path: path.to_path_buf(),
    reason: reason.into(),
  })
}

impl Archiver for TarGzArchiver {
  fn create(&self, source: &Path, dest: &Path) -> ShipResult<ArchiveSummary> {
    let top = source
      .file_name()
      .and_then(|name| name.to_str())
      .ok_or_else(|| archive_failed(dest, "source has no usable directory name"))?
      .to_string();

    // First pass counts entries so the bar has a total.
    let mut total = 0usize;
    for entry in WalkDir::new(source).follow_links(true) {
      entry.map_err(|e| archive_failed(dest, e.to_string()))?;
      total += 1;
    }

    let file = File::create(dest).with_context(|| format!("Failed to create {}", dest.display()))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);
    builder.follow_symlinks(true);

    let mut progress = if self.show_progress {
      Some(FileProgress::new(total, format!("Packing {}", top)))
    } else {
      None
    };

    let mut entries = 0usize;
    let mut total_bytes = 0u64;
    for entry in WalkDir::new(source).follow_links(true) {
      let entry = entry.map_err(|e| archive_failed(dest, e.to_string()))?;
      let rel = entry.path().strip_prefix(source)?;
      let name = Path::new(&top).join(rel);
      let meta = entry.metadata().map_err(|e| archive_failed(dest, e.to_string()))?;

      if meta.is_dir() {
        builder
          .append_dir(&name, entry.path())
          .map_err(|e| archive_failed(dest, e.to_string()))?;
      } else {
        // append_path_with_name streams file content, so hard links and
        // symlink targets land as full independent copies.
        builder
          .append_path_with_name(entry.path(), &name)
          .map_err(|e| archive_failed(dest, e.to_string()))?;
        total_bytes += meta.len();
      }

      entries += 1;
      if let Some(bar) = progress.as_mut() {
        bar.inc();
      }
    }

    let encoder = builder.into_inner().map_err(|e| archive_failed(dest, e.to_string()))?;
    encoder.finish().map_err(|e| archive_failed(dest, e.to_string()))?;

    let sha256 = sha256_file(dest)?;
    Ok(ArchiveSummary {
      path: dest.to_path_buf(),
      entries,
      total_bytes,
      sha256,
    })
  }

  fn extract(&self, archive: &Path, dest: &Path) -> ShipResult<()> {
    let file = File::open(archive).with_context(|| format!("Failed to open {}", archive.display()))?;
    let mut tar = Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);
    tar.set_preserve_mtime(true);
    tar
      .unpack(dest)
      .map_err(|e| archive_failed(archive, format!("unpacking into {}: {}", dest.display(), e)))?;
    Ok(())
  }
}

/// SHA-256 of a file, streaming
pub fn sha256_file(path: &Path) -> ShipResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher).with_context(|| format!("Failed to hash {}", path.display()))?;
  Ok(format!("{:x}", hasher.finalize()))
}

/// Write the conventional `sha256sum`-style sidecar next to the archive
pub fn write_checksum_sidecar(archive: &Path, sha256: &str) -> ShipResult<PathBuf> {
  let file_name = archive
    .file_name()
    .and_then(|name| name.to_str())
    .ok_or_else(|| archive_failed(archive, "archive has no usable file name"))?;

  let mut sidecar = OsString::from(archive.as_os_str());
  sidecar.push(".sha256");
  let sidecar = PathBuf::from(sidecar);

  std::fs::write(&sidecar, format!("{}  {}\n", sha256, file_name))
    .with_context(|| format!("Failed to write {}", sidecar.display()))?;
  Ok(sidecar)
}
