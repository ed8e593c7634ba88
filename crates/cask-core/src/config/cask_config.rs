//! Configuration types for cask

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CaskError;
use crate::parser::ParserConfig;

/// Default patterns for build-script discovery
pub const DEFAULT_INCLUDE: &[&str] = &[
    "**/Dockerfile",
    "**/Dockerfile.*",
    "**/*.Dockerfile",
    "**/*.dockerfile",
    "**/Containerfile",
    "**/Containerfile.*",
];

/// Directories skipped during discovery unless configured otherwise
pub const DEFAULT_EXCLUDE: &[&str] = &["**/.git/**", "**/target/**", "**/node_modules/**"];

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<ParserConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

/// Parser configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParserConfiguration {
    /// Escape character for every file; overrides the `escape` directive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape: Option<char>,

    /// Whether leading parser directives are honoured (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directives: Option<bool>,
}

/// File discovery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilesConfiguration {
    /// Glob patterns of build scripts to check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// Glob patterns to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl CaskConfig {
    /// Load configuration from a file, choosing the format by extension
    ///
    /// Supports TOML (.toml), YAML (.yaml, .yml) and JSON (.json).
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| CaskError::io_error(path, source))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| CaskError::config_error(e.to_string()))?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| CaskError::config_error(e.to_string()))?
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| CaskError::config_error(e.to_string()))?
            }
            _ => {
                return Err(CaskError::config_error(format!(
                    "Unsupported file extension for '{}' (expected .toml, .yaml, .yml, or .json)",
                    path.display()
                )));
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the parser cannot honour
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(escape) = self.parser.as_ref().and_then(|parser| parser.escape)
            && escape != '\\'
            && escape != '`'
        {
            return Err(CaskError::config_error(format!(
                "Invalid escape character {escape:?} (expected '\\' or '`')"
            )));
        }
        Ok(())
    }

    /// Effective parser settings
    pub fn parser_config(&self) -> ParserConfig {
        let parser = self.parser.clone().unwrap_or_default();
        ParserConfig {
            escape: parser.escape,
            honor_directives: parser.directives.unwrap_or(true),
        }
    }

    /// Get files configuration with defaults
    pub fn files_config(&self) -> FilesConfiguration {
        let files = self.files.clone().unwrap_or_default();
        FilesConfiguration {
            include: Some(
                files
                    .include
                    .unwrap_or_else(|| DEFAULT_INCLUDE.iter().map(|p| p.to_string()).collect()),
            ),
            exclude: Some(
                files
                    .exclude
                    .unwrap_or_else(|| DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect()),
            ),
        }
    }

    /// Configuration written by `cask config init`
    pub fn template() -> Self {
        Self {
            parser: Some(ParserConfiguration {
                escape: None,
                directives: Some(true),
            }),
            files: Some(FilesConfiguration {
                include: Some(DEFAULT_INCLUDE.iter().map(|p| p.to_string()).collect()),
                exclude: Some(DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect()),
            }),
        }
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| CaskError::serialization_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_defaults() {
        let config = CaskConfig::default();
        assert_eq!(config.parser_config(), ParserConfig::default());

        let files = config.files_config();
        assert!(files.include.unwrap().contains(&"**/Dockerfile".to_string()));
    }

    #[test]
    fn test_toml_round_trip() {
        let config: CaskConfig = toml::from_str(
            r#"
[parser]
escape = "`"
directives = false
"#,
        )
        .unwrap();
        let parser = config.parser_config();
        assert_eq!(parser.escape, Some('`'));
        assert!(!parser.honor_directives);

        let template = CaskConfig::template();
        let text = template.to_toml().unwrap();
        let reloaded: CaskConfig = toml::from_str(&text).unwrap();
        assert_eq!(reloaded, template);
    }

    #[test]
    fn test_invalid_escape_is_rejected() {
        let config = CaskConfig {
            parser: Some(ParserConfiguration {
                escape: Some('x'),
                directives: None,
            }),
            files: None,
        };
        assert!(config.validate().is_err());
    }
}
