//! Tag classification command

use crate::core::error::ShipResult;
use crate::core::tag::ReleaseTag;
use serde::Serialize;

#[derive(Serialize)]
struct TagOutput<'a> {
  tag: &'a str,
  kind: crate::core::tag::ReleaseKind,
  release_dir: String,
}

/// Classify a tag and print its kind and release directory name
pub fn run_tag(tag: &str, experimental: bool, json: bool) -> ShipResult<()> {
  let classified = ReleaseTag::classify(tag)?;
  let release_dir = classified.dir_name(experimental);

  if json {
    let output = TagOutput {
      tag: &classified.raw,
      kind: classified.kind,
      release_dir,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
  } else {
    println!("🏷️  {} is a {} release", classified.raw, classified.kind);
    println!("   Release directory: {}", release_dir);
  }

  Ok(())
}
