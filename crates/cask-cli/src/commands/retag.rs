//! Retag command: replace the tag or digest of one stage's base image

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use colored::*;
use tracing::debug;

use super::{load_config, parse_source, read_source, write_stdout};

/// Retag command implementation
///
/// Only the image reference of the chosen stage changes; every other byte
/// of the file is printed as it was read.
pub fn retag_command(
    file: PathBuf,
    stage: String,
    tag: Option<String>,
    digest: Option<String>,
    write: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Running retag command on {:?} (stage {})", file, stage);

    let source = read_source(&file)?;
    let config = load_config(config_path.as_deref(), &file)?;
    let result = parse_source(&file, &source, &config)?;
    let document = result.document();

    let (index, target) = document
        .find_stage(&stage)
        .with_context(|| format!("No stage '{stage}' in {}", file.display()))?;

    let from = match (tag, digest) {
        (Some(tag), None) => target.from.with_tag(tag),
        (None, Some(digest)) => target.from.with_digest(digest),
        _ => bail!("Exactly one of --tag or --digest is required"),
    };
    let edited = document.with_stage(index, target.with_from(from)).print();

    if !write {
        return write_stdout(&edited);
    }

    if edited == source {
        println!("{} {} is already up to date", "✓".green(), file.display());
        return Ok(());
    }

    std::fs::write(&file, &edited)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    println!("{} Updated stage {} in {}", "✓".green(), stage, file.display());
    Ok(())
}
