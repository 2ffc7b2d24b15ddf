mod checks;
mod commands;
mod core;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::error::{ShipError, print_error};
use std::path::PathBuf;

/// Build, archive, and transactionally publish science-pipeline software stacks
#[derive(Parser)]
#[command(name = "stackship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Setup & Inspection
  // ============================================================================
  /// Initialize stackship configuration for a distribution site
  Init {
    /// Site root releases are installed and archived under
    #[arg(long)]
    root: Option<PathBuf>,
    /// Overwrite an existing configuration without asking
    #[arg(long)]
    force: bool,
  },

  /// Run health checks and diagnostics
  Doctor {
    /// Run thorough checks (includes network probes)
    #[arg(long)]
    thorough: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Classify a release tag and show its release directory name
  Tag {
    /// Release tag to classify (e.g. v12_1, w_2024_35)
    tag: String,
    /// Show the experimental (-dev suffixed) directory name
    #[arg(short, long)]
    experimental: bool,
    /// Output the classification in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Build Side
  // ============================================================================
  /// Install, archive, and upload one release (the full build-side sequence)
  Deploy {
    /// Release tag to deploy; omitting it prints usage and exits 0
    tag: Option<String>,
    /// Configured product to deploy (default: the first [[products]] entry)
    #[arg(short, long)]
    product: Option<String>,
    /// Override the configured site root
    #[arg(long)]
    root: Option<PathBuf>,
    /// Override the configured platform component
    #[arg(long)]
    platform: Option<String>,
    /// Override the configured architecture component
    #[arg(long)]
    arch: Option<String>,
    /// Mark the release experimental (-dev directory suffix)
    #[arg(short, long)]
    experimental: bool,
    /// Build and archive only; do not upload
    #[arg(long)]
    skip_upload: bool,
    /// Show what would happen without making changes
    #[arg(long)]
    dry_run: bool,
    /// Output the deploy outcome in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Re-archive an already-installed release
  Archive {
    /// Release tag whose installed stack to archive
    tag: String,
    /// Configured product (default: the first [[products]] entry)
    #[arg(short, long)]
    product: Option<String>,
    /// The release was deployed experimental
    #[arg(short, long)]
    experimental: bool,
    /// Output the archive summary in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Upload an existing release archive and its checksum
  Upload {
    /// Release tag whose archive to upload
    tag: String,
    /// Configured product (default: the first [[products]] entry)
    #[arg(short, long)]
    product: Option<String>,
    /// The release was deployed experimental
    #[arg(short, long)]
    experimental: bool,
    /// Override the configured upload destination
    #[arg(long)]
    dest: Option<String>,
  },

  // ============================================================================
  // Publish Side
  // ============================================================================
  /// Unpack a release archive and publish it transactionally
  Publish {
    /// Release tag to publish
    tag: String,
    /// Configured product (default: the first [[products]] entry)
    #[arg(short, long)]
    product: Option<String>,
    /// The release was deployed experimental
    #[arg(short, long)]
    experimental: bool,
    /// Archive to publish (default: the site's archives/<releaseDir>.tar.gz)
    #[arg(long)]
    archive: Option<PathBuf>,
    /// Treat best-effort step failures (ownership change) as fatal
    #[arg(long)]
    strict: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    // Setup & Inspection
    Commands::Init { root, force } => commands::run_init(root, force),
    Commands::Doctor { thorough, json } => commands::run_doctor(thorough, json),
    Commands::Tag { tag, experimental, json } => commands::run_tag(&tag, experimental, json),

    // Build side
    Commands::Deploy {
      tag,
      product,
      root,
      platform,
      arch,
      experimental,
      skip_upload,
      dry_run,
      json,
    } => commands::run_deploy(commands::deploy::DeployArgs {
      tag,
      product,
      root,
      platform,
      arch,
      experimental,
      skip_upload,
      dry_run,
      json,
    }),
    Commands::Archive {
      tag,
      product,
      experimental,
      json,
    } => commands::run_archive(&tag, product, experimental, json),
    Commands::Upload {
      tag,
      product,
      experimental,
      dest,
    } => commands::run_upload(&tag, product, experimental, dest),

    // Publish side
    Commands::Publish {
      tag,
      product,
      experimental,
      archive,
      strict,
    } => commands::run_publish(&tag, product, experimental, archive, strict),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
