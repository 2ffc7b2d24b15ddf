//! Test helpers for integration tests
//!
//! A `TestSite` is a temporary directory holding a ship.toml, a site root,
//! and a `bin/` directory of stub executables standing in for eups, curl,
//! rclone, and cvmfs_server. Every stub appends its invocation to a shared
//! calls log so tests can assert on command sequencing.

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A disposable distribution site with stubbed external tools
pub struct TestSite {
  _root: TempDir,
  /// Directory holding ship.toml; commands run from here
  pub path: PathBuf,
  pub site_root: PathBuf,
  pub bin_dir: PathBuf,
  calls_log: PathBuf,
  fail_publish_marker: PathBuf,
}

impl TestSite {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    let site_root = path.join("site");
    let bin_dir = path.join("bin");
    fs::create_dir_all(&site_root)?;
    fs::create_dir_all(&bin_dir)?;

    let site = Self {
      _root: root,
      calls_log: path.join("calls.log"),
      fail_publish_marker: path.join("fail_publish.marker"),
      path,
      site_root,
      bin_dir,
    };

    site.write_base_config()?;
    site.install_stubs()?;
    Ok(site)
  }

  fn write_base_config(&self) -> Result<()> {
    fs::write(
      self.path.join("ship.toml"),
      format!(
        r#"[site]
root = "{}"

[bootstrap]
url = "https://bootstrap.test/install.sh"

[[products]]
name = "demo"
pkgroot = "https://eups.test/stack/src"
"#,
        self.site_root.display()
      ),
    )?;
    Ok(())
  }

  /// Append an [upload] section pointing at a local directory
  pub fn enable_upload(&self) -> Result<PathBuf> {
    let dest = self.path.join("uploads");
    self.append_config(&format!("\n[upload]\ndest = \"{}\"\n", dest.display()))?;
    Ok(dest)
  }

  /// Append a [publish] section; `repo` picks the cvmfs backend
  pub fn enable_publish(&self, repo: Option<&str>) -> Result<PathBuf> {
    let publish_root = self.path.join("publish");
    fs::create_dir_all(&publish_root)?;
    let mut section = format!("\n[publish]\nroot = \"{}\"\n", publish_root.display());
    if let Some(repo) = repo {
      section.push_str(&format!("repo = \"{}\"\n", repo));
    }
    self.append_config(&section)?;
    Ok(publish_root)
  }

  fn append_config(&self, section: &str) -> Result<()> {
    let config_path = self.path.join("ship.toml");
    let mut config = fs::read_to_string(&config_path)?;
    config.push_str(section);
    fs::write(&config_path, config)?;
    Ok(())
  }

  fn install_stubs(&self) -> Result<()> {
    // curl: HEAD probes report 200, downloads create the -o target.
    self.write_stub(
      "curl",
      r#"#!/bin/sh
echo "curl $*" >> "$STACKSHIP_CALLS"
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
case " $* " in
  *" -I "*) printf '200' ;;
  *) [ -n "$out" ] && echo '#!/bin/sh' > "$out" ;;
esac
"#,
    )?;

    // eups: materializes a tiny installed stack under EUPS_PATH.
    self.write_stub(
      "eups",
      r#"#!/bin/sh
echo "eups $*" >> "$STACKSHIP_CALLS"
if [ -n "$EUPS_PATH" ]; then
  mkdir -p "$EUPS_PATH/ups_db"
  echo "installed via $*" > "$EUPS_PATH/ups_db/manifest.txt"
fi
echo "eups distrib install output"
"#,
    )?;

    // rclone: `rclone copy FILE DEST` into a local directory.
    self.write_stub(
      "rclone",
      r#"#!/bin/sh
echo "rclone $*" >> "$STACKSHIP_CALLS"
if [ "$1" = "copy" ]; then
  mkdir -p "$3"
  cp "$2" "$3/"
fi
"#,
    )?;

    // cvmfs_server: records the workflow; publish fails when the marker exists.
    self.write_stub(
      "cvmfs_server",
      r#"#!/bin/sh
echo "cvmfs_server $*" >> "$STACKSHIP_CALLS"
if [ "$1" = "publish" ] && [ -f "$STACKSHIP_FAIL_PUBLISH" ]; then
  echo "cannot publish: repository lease busy" >&2
  exit 1
fi
exit 0
"#,
    )?;

    Ok(())
  }

  fn write_stub(&self, name: &str, script: &str) -> Result<()> {
    let path = self.bin_dir.join(name);
    fs::write(&path, script)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(())
  }

  /// Remove a stub so a required tool goes missing
  pub fn remove_stub(&self, name: &str) -> Result<()> {
    fs::remove_file(self.bin_dir.join(name))?;
    Ok(())
  }

  /// Make the cvmfs_server stub fail its publish step
  pub fn fail_next_publish(&self) -> Result<()> {
    fs::write(&self.fail_publish_marker, "")?;
    Ok(())
  }

  /// Every stub invocation so far, one line per call
  pub fn calls(&self) -> Vec<String> {
    fs::read_to_string(&self.calls_log)
      .map(|log| log.lines().map(String::from).collect())
      .unwrap_or_default()
  }

  /// Path of one installed release under the build site
  pub fn stack_dir(&self, product: &str, release_dir: &str) -> PathBuf {
    self
      .site_root
      .join("linux-x86_64")
      .join(product)
      .join(release_dir)
  }

  pub fn archive_path(&self, release_dir: &str) -> PathBuf {
    self
      .site_root
      .join("linux-x86_64")
      .join("archives")
      .join(format!("{}.tar.gz", release_dir))
  }

  pub fn log_path(&self, product: &str, release_dir: &str) -> PathBuf {
    self
      .site_root
      .join("linux-x86_64")
      .join("log")
      .join(format!("{}-{}.log", product, release_dir))
  }

  pub fn scratch_dir(&self) -> PathBuf {
    self.site_root.join("linux-x86_64").join("scratch")
  }
}

/// Run the stackship binary against a test site, without checking the status
pub fn try_stackship(site: &TestSite, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_stackship");
  let path_env = std::env::var("PATH").unwrap_or_default();

  Command::new(bin)
    .current_dir(&site.path)
    .args(args)
    .env("PATH", format!("{}:{}", site.bin_dir.display(), path_env))
    .env("STACKSHIP_CALLS", &site.calls_log)
    .env("STACKSHIP_FAIL_PUBLISH", &site.fail_publish_marker)
    .stdin(Stdio::null())
    .output()
    .context("Failed to run stackship")
}

/// Run the stackship binary and fail the test if it exits non-zero
pub fn run_stackship(site: &TestSite, args: &[&str]) -> Result<Output> {
  let output = try_stackship(site, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "stackship command failed: stackship {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Read a command's stdout as UTF-8
pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Read a command's stderr as UTF-8
pub fn stderr_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
