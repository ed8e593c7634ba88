//! Configuration commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cask_core::{CaskConfig, ConfigLoader, ParserConfiguration};
use colored::*;
use tracing::debug;

use crate::ConfigFormat;

/// Config init command implementation
pub fn init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Toml => ".cask.toml",
        ConfigFormat::Yaml => "cask.yaml",
        ConfigFormat::Json => "cask.json",
    };
    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        bail!("Configuration file '{filename}' already exists. Use --force to overwrite.");
    }

    let template = CaskConfig::template();
    let content = match format {
        ConfigFormat::Toml => template.to_toml()?,
        ConfigFormat::Yaml => {
            serde_yaml::to_string(&template).context("Failed to serialize YAML")?
        }
        ConfigFormat::Json => {
            serde_json::to_string_pretty(&template).context("Failed to serialize JSON")? + "\n"
        }
    };

    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {filename}"))?;

    println!("{} Created configuration file: {filename}", "✓".green());
    println!("   Edit the file to change discovery patterns or the escape character.");
    Ok(())
}

/// Config show command implementation
///
/// Prints the effective configuration as TOML, defaults filled in.
pub fn show_command(config_path: Option<PathBuf>) -> Result<()> {
    debug!("Showing configuration");

    let source = match &config_path {
        Some(path) => Some(path.clone()),
        None => ConfigLoader::auto_discover(Path::new("."))?,
    };
    let config = ConfigLoader::load(source.as_deref(), None)?;

    let parser = config.parser_config();
    let resolved = CaskConfig {
        parser: Some(ParserConfiguration {
            escape: parser.escape,
            directives: Some(parser.honor_directives),
        }),
        files: Some(config.files_config()),
    };

    match &source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# No configuration file found; showing defaults"),
    }
    print!("{}", resolved.to_toml()?);
    Ok(())
}
