//! The full build-side deploy command
//!
//! One invocation replaces the historic per-release scripts: classify the
//! tag, probe the bootstrap, install through EUPS, archive, fingerprint, and
//! upload. Omitting the TAG argument prints usage and exits 0, matching the
//! convention of the scripts this tool replaced; every structural failure
//! exits non-zero.

use crate::core::archive::TarGzArchiver;
use crate::core::config::{ProductConfig, ShipConfig};
use crate::core::error::{ConfigError, ShipError, ShipResult};
use crate::core::fetch::Bootstrap;
use crate::core::install::EupsInstaller;
use crate::core::layout::SiteLayout;
use crate::core::pipeline::{DeployRequest, Pipeline};
use crate::core::tag::ReleaseTag;
use crate::core::upload::RcloneUploader;
use std::env;
use std::path::PathBuf;

/// Everything `stackship deploy` accepts
pub struct DeployArgs {
  pub tag: Option<String>,
  pub product: Option<String>,
  pub root: Option<PathBuf>,
  pub platform: Option<String>,
  pub arch: Option<String>,
  pub experimental: bool,
  pub skip_upload: bool,
  pub dry_run: bool,
  pub json: bool,
}

/// Pick the requested product, defaulting to the first configured one
pub(crate) fn resolve_product<'a>(config: &'a ShipConfig, name: Option<&str>) -> ShipResult<&'a ProductConfig> {
  match name {
    Some(name) => config.find_product(name),
    None => config.products.first().ok_or_else(|| {
      ShipError::Config(ConfigError::MissingField {
        field: "products".to_string(),
      })
    }),
  }
}

pub fn run_deploy(args: DeployArgs) -> ShipResult<()> {
  // The scripts this replaces treated a missing tag as "show me how to call
  // this", not as an error.
  let Some(tag) = args.tag else {
    println!("Usage: stackship deploy <TAG> [--product <name>] [--experimental] [--skip-upload]");
    println!("       TAG is a release tag: v12_1, w_2024_35, d_2024_7_3, or sims_<suffix>");
    return Ok(());
  };

  let current_dir = env::current_dir()?;
  let mut config = ShipConfig::load(&current_dir)?;

  if let Some(root) = args.root {
    config.site.root = root;
  }
  if let Some(platform) = args.platform {
    config.site.platform = platform;
  }
  if let Some(arch) = args.arch {
    config.site.arch = arch;
  }

  let product = resolve_product(&config, args.product.as_deref())?;
  let layout = SiteLayout::new(&config.site.root, &config.site.platform_dir());

  if args.dry_run {
    let classified = ReleaseTag::classify(&tag)?;
    let release_dir = classified.dir_name(args.experimental);
    println!("🔍 Dry run: deploy {} {} ({} release)", product.name, classified.raw, classified.kind);
    println!("   Stack directory: {}", layout.release_dir(&product.name, &release_dir).display());
    println!("   Archive:         {}", layout.archive_path(&release_dir).display());
    println!("   Log:             {}", layout.log_path(&product.name, &release_dir).display());
    match (&config.upload, args.skip_upload) {
      (Some(upload), false) => println!("   Upload to:       {}", upload.dest),
      _ => println!("   Upload:          skipped"),
    }
    return Ok(());
  }

  let bootstrap = Bootstrap::new(&config.bootstrap.url);
  let installer = EupsInstaller::new(&product.name, &product.pkgroot, product.image.clone(), bootstrap);
  let archiver = if args.json { TarGzArchiver::quiet() } else { TarGzArchiver::new() };
  let uploader = RcloneUploader;

  let upload_dest = if args.skip_upload {
    None
  } else {
    config.upload.as_ref().map(|u| u.dest.clone())
  };

  let request = DeployRequest {
    product: product.name.clone(),
    tag,
    experimental: args.experimental,
    upload_dest,
  };

  let pipeline = Pipeline::new(&layout, &installer, &archiver, &uploader).with_quiet(args.json);
  let outcome = pipeline.run(&request)?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&outcome)?);
  } else {
    println!("\n✅ Deployed {} {} ({} release)", request.product, outcome.tag, outcome.kind);
    println!("   Stack:   {}", outcome.stack_dir.display());
    println!("   Archive: {} ({} entries, {} bytes)", outcome.archive.display(), outcome.entries, outcome.total_bytes);
    println!("   SHA-256: {}", outcome.sha256);
    println!("   Log:     {}", outcome.log.display());
    if outcome.uploaded {
      println!("   Uploaded archive and checksum");
    }
  }

  Ok(())
}
