//! CLI command implementations
//!
//! Single-file commands (parse, print, stages) live in this file. Commands
//! with more moving parts have their own modules:
//! - commands/check.rs - discovery and parallel round-trip checks
//! - commands/retag.rs - FROM reference edits
//! - commands/config.rs - configuration init and show

pub mod check;
pub mod config;
pub mod retag;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cask_core::{CaskConfig, ConfigLoader, DockerfileParser, ParseResult};
use tracing::{debug, warn};

use crate::ParseFormat;
use crate::output;

/// Load configuration for a command working on `target`
///
/// An explicit `--config` wins; otherwise the nearest config file above the
/// target is used, falling back to defaults.
pub fn load_config(config_path: Option<&Path>, target: &Path) -> Result<CaskConfig> {
    let start_dir = if target.is_dir() {
        target
    } else {
        match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    let config = ConfigLoader::load(config_path, Some(start_dir))?;
    debug!("Loaded configuration");
    Ok(config)
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse one build script with the configured parser settings
pub fn parse_source(path: &Path, source: &str, config: &CaskConfig) -> Result<ParseResult> {
    let parser = DockerfileParser::with_config(config.parser_config());
    let result = parser
        .parse_content(source)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for warning in result.warnings() {
        warn!("{}: {}", path.display(), warning);
    }
    Ok(result)
}

fn load_and_parse(file: &Path, config_path: Option<&Path>) -> Result<ParseResult> {
    let source = read_source(file)?;
    let config = load_config(config_path, file)?;
    parse_source(file, &source, &config)
}

/// Write text to stdout exactly as given
pub fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Parse command implementation
pub fn parse_command(file: PathBuf, format: ParseFormat, config_path: Option<PathBuf>) -> Result<()> {
    debug!("Running parse command on {:?}", file);
    let result = load_and_parse(&file, config_path.as_deref())?;

    match format {
        ParseFormat::Outline => write_stdout(&output::outline(&result)),
        ParseFormat::Json => {
            let json = serde_json::to_string_pretty(result.document())
                .context("Failed to serialize the syntax tree")?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Print command implementation
pub fn print_command(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    debug!("Running print command on {:?}", file);
    let result = load_and_parse(&file, config_path.as_deref())?;
    write_stdout(&result.print())
}

/// Stages command implementation
pub fn stages_command(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    debug!("Running stages command on {:?}", file);
    let result = load_and_parse(&file, config_path.as_deref())?;
    output::print_stages(result.document());
    Ok(())
}
