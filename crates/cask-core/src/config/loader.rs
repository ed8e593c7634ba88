//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use super::CaskConfig;
use crate::error::CaskError;
use crate::result::ResultExt;

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".cask.toml",
    "cask.toml",
    "cask.yaml",
    "cask.yml",
    "cask.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Starts from the given directory and moves up the directory tree until
    /// a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> crate::Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| CaskError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            // Move up to parent directory
            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> crate::Result<CaskConfig> {
        CaskConfig::load(path).map_err(|e| match e {
            CaskError::Config { message } => CaskError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                message
            )),
            other => other,
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the nearest config file is
    /// used; when none is found, or the one found cannot be read, the
    /// defaults apply. A discovered file that reads but does not validate is
    /// still an error.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> crate::Result<CaskConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(CaskError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Ok(Self::load_from_file(&path).recoverable()?.unwrap_or_default()),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(CaskConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_each_format() {
        let temp_dir = TempDir::new().unwrap();

        let toml = create_temp_config(temp_dir.path(), "cask.toml", "[parser]\nescape = \"`\"\n");
        let config = ConfigLoader::load_from_file(&toml).unwrap();
        assert_eq!(config.parser_config().escape, Some('`'));

        let yaml = create_temp_config(temp_dir.path(), "cask.yaml", "parser:\n  directives: false\n");
        let config = ConfigLoader::load_from_file(&yaml).unwrap();
        assert!(!config.parser_config().honor_directives);

        let json = create_temp_config(
            temp_dir.path(),
            "cask.json",
            r#"{"files": {"include": ["**/Containerfile"]}}"#,
        );
        let config = ConfigLoader::load_from_file(&json).unwrap();
        assert_eq!(
            config.files_config().include.unwrap(),
            vec!["**/Containerfile".to_string()]
        );
    }

    #[test]
    fn test_auto_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("services/api");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "cask.yml", "parser: {}\n");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), "cask.yml");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "cask.json", "{}");
        create_temp_config(temp_dir.path(), ".cask.toml", "");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".cask.toml");
    }

    #[test]
    fn test_load_errors() {
        assert!(ConfigLoader::load(Some(Path::new("missing/cask.toml")), None).is_err());

        let temp_dir = TempDir::new().unwrap();
        let invalid = create_temp_config(temp_dir.path(), "cask.json", "{ invalid json }");
        let error = ConfigLoader::load_from_file(&invalid).unwrap_err();
        assert!(error.to_string().contains("Failed to load config"));

        let unsupported = create_temp_config(temp_dir.path(), "cask.ini", "");
        assert!(ConfigLoader::load_from_file(&unsupported).is_err());
    }

    #[test]
    fn test_unreadable_discovered_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cask.toml");
        fs::write(&path, [0xff, 0xfe, b'\n']).unwrap();

        let error = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(error.is_recoverable());

        let config = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        assert_eq!(config, CaskConfig::default());

        // Named explicitly, the same file is an error
        assert!(ConfigLoader::load(Some(&path), None).is_err());
    }

    #[test]
    fn test_invalid_discovered_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), ".cask.toml", "[parser]\nescape = \"x\"\n");

        let error = ConfigLoader::load(None, Some(temp_dir.path())).unwrap_err();
        assert!(!error.is_recoverable());
    }
}
