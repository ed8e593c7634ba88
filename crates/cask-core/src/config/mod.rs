//! Configuration system for cask
//!
//! Configuration is optional. When present it is read from the first of the
//! following files found while walking up from the working directory:
//! `.cask.toml`, `cask.toml`, `cask.yaml`, `cask.yml`, `cask.json`.
//!
//! ## Example Configuration
//!
//! ```toml
//! [parser]
//! # Override the escape character for every file (`\` or `` ` ``)
//! escape = "`"
//! # Read `# escape=` and other leading parser directives
//! directives = true
//!
//! [files]
//! include = ["**/Dockerfile", "**/*.Dockerfile"]
//! exclude = ["**/vendor/**"]
//! ```

mod cask_config;
mod loader;

// Re-export main types
pub use cask_config::{CaskConfig, FilesConfiguration, ParserConfiguration};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
