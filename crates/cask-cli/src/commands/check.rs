//! Check command: discover build scripts and verify they round-trip

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use cask_core::{CaskConfig, CaskError, ResultExt, RoundTripValidator, ValidationResult};
use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::load_config;
use crate::output::{self, CheckSummary};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Result of checking one file
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Passed {
        path: PathBuf,
        warnings: Vec<String>,
    },
    Mismatch {
        path: PathBuf,
        result: Box<ValidationResult>,
    },
    Rejected {
        path: PathBuf,
        message: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Passed { path, .. } | Self::Mismatch { path, .. } | Self::Rejected { path, .. } => {
                path
            }
        }
    }
}

/// Check command implementation
pub fn check_command(
    paths: Vec<PathBuf>,
    include: Vec<String>,
    exclude: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Running check command on paths: {:?}", paths);

    let mut config = load_config(config_path.as_deref(), &paths[0])?;

    // Apply CLI overrides to configuration
    if !include.is_empty() {
        config.files.get_or_insert_with(Default::default).include = Some(include);
    }
    if !exclude.is_empty() {
        config.files.get_or_insert_with(Default::default).exclude = Some(exclude);
    }

    let files = discover_files(&paths, &config)?;
    if files.is_empty() {
        println!("No build scripts found in specified paths.");
        return Ok(());
    }
    info!("Checking {} build scripts", files.len());

    let start_time = Instant::now();
    let validator = RoundTripValidator::with_config(config.parser_config());
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|path| check_file(&validator, path))
        .collect();

    let summary = CheckSummary::from_outcomes(&outcomes, start_time.elapsed());
    output::print_check_report(&outcomes, &summary);

    if summary.has_failures() {
        bail!(
            "{} of {} build scripts failed the round-trip check",
            summary.failed(),
            summary.files_checked
        );
    }
    Ok(())
}

fn check_file(validator: &RoundTripValidator, path: &Path) -> FileOutcome {
    let path_buf = path.to_path_buf();
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            return FileOutcome::Rejected {
                path: path_buf,
                message: format!("Failed to read: {e}"),
            };
        }
    };

    match validator.validate(&source) {
        Ok(result) if result.is_valid() => FileOutcome::Passed {
            path: path_buf,
            warnings: result.warnings,
        },
        Ok(result) => {
            debug!("{}: {:?}", path.display(), result.issues());
            FileOutcome::Mismatch {
                path: path_buf,
                result: Box::new(result),
            }
        }
        Err(e) => FileOutcome::Rejected {
            path: path_buf,
            message: e.to_string(),
        },
    }
}

/// Expand paths into the build scripts to check
///
/// Files named explicitly are always checked. Directories are walked and
/// filtered through the include and exclude patterns, matched against the
/// path relative to the directory. Paths containing `*` are glob patterns.
pub fn discover_files(paths: &[PathBuf], config: &CaskConfig) -> Result<Vec<PathBuf>> {
    let files_config = config.files_config();
    let include = compile_patterns(files_config.include.as_deref().unwrap_or_default())?;
    let exclude = compile_patterns(files_config.exclude.as_deref().unwrap_or_default())?;

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(false) {
                // Unreadable directories are skipped with a warning
                let Some(entry) = entry.map_err(|e| walk_error(path, e)).log_and_continue()
                else {
                    continue;
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
                if matches_any(&include, relative) && !matches_any(&exclude, relative) {
                    files.push(entry.into_path());
                }
            }
        } else if path.to_string_lossy().contains('*') {
            let pattern = path.to_string_lossy();
            for entry in glob::glob(&pattern)
                .with_context(|| format!("Invalid glob pattern '{pattern}'"))?
                .flatten()
            {
                if entry.is_file() && !matches_any(&exclude, &entry) {
                    files.push(entry);
                }
            }
        } else {
            bail!("Path not found: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    debug!("Discovered {} build scripts", files.len());
    Ok(files)
}

fn walk_error(root: &Path, error: walkdir::Error) -> CaskError {
    let path = error.path().unwrap_or(root).to_path_buf();
    CaskError::io_error(path, error.into())
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).with_context(|| format!("Invalid glob pattern '{pattern}'"))
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern.matches_path_with(path, MATCH_OPTIONS))
}
