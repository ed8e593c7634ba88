//! Round-trip validation
//!
//! Checks that printing an unmodified parse reproduces the source byte for
//! byte, and that printing is stable: parsing the printed text and printing
//! it again gives the same text.
//!
//! # Example
//!
//! ```rust,ignore
//! use cask_core::round_trip::RoundTripValidator;
//!
//! let validator = RoundTripValidator::new();
//! let result = validator.validate("FROM alpine:3.18\nRUN apk add curl\n")?;
//! assert!(result.is_valid());
//! ```

use similar::TextDiff;

use crate::Result;
use crate::parser::{DockerfileParser, ParserConfig};

/// Result of round-trip validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the printed text equals the source
    pub is_valid: bool,
    /// Original source code
    pub original: String,
    /// Text printed from the parsed tree
    pub printed: String,
    /// Text printed after re-parsing `printed`
    pub reprinted: String,
    /// First position where `printed` departs from `original`
    pub mismatch: Option<Mismatch>,
    /// Unified diff of original against printed, when they differ
    pub diff: Option<String>,
    /// Lexer warnings of the original parse
    pub warnings: Vec<String>,
}

/// First differing position, 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub line: usize,
    pub column: usize,
    pub expected: String,
    pub actual: String,
}

impl ValidationResult {
    /// Check if the round-trip validation passed
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Get all validation issues
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(mismatch) = &self.mismatch {
            issues.push(format!(
                "Printed text differs at line {}, column {}: expected {:?}, found {:?}",
                mismatch.line, mismatch.column, mismatch.expected, mismatch.actual
            ));
        }

        if self.printed != self.reprinted {
            issues.push("Printing is not stable across a second parse".to_string());
        }

        if !self.warnings.is_empty() {
            issues.push(format!("Parsing reported {} warnings", self.warnings.len()));
        }

        issues
    }
}

/// Round-trip validator for build scripts
#[derive(Debug, Clone, Default)]
pub struct RoundTripValidator {
    parser: DockerfileParser,
}

impl RoundTripValidator {
    /// Create a new round-trip validator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new round-trip validator with custom parser settings
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            parser: DockerfileParser::with_config(config),
        }
    }

    /// Parse, print and compare
    ///
    /// Fails only when the grammar rejects the source.
    pub fn validate(&self, source: &str) -> Result<ValidationResult> {
        let parsed = self.parser.parse_content(source)?;
        let printed = parsed.print();
        let reprinted = self.parser.parse_content(&printed)?.print();

        let mismatch = first_mismatch(source, &printed);
        let diff = mismatch.as_ref().map(|_| unified_diff(source, &printed));
        if let Some(mismatch) = &mismatch {
            tracing::debug!(
                line = mismatch.line,
                column = mismatch.column,
                "round-trip mismatch"
            );
        }

        Ok(ValidationResult {
            is_valid: mismatch.is_none() && printed == reprinted,
            original: source.to_string(),
            printed,
            reprinted,
            mismatch,
            diff,
            warnings: parsed
                .warnings
                .iter()
                .map(|warning| warning.to_string())
                .collect(),
        })
    }
}

/// Locate the first differing character of two texts
pub fn first_mismatch(expected: &str, actual: &str) -> Option<Mismatch> {
    let mut line = 1;
    let mut column = 1;
    let mut expected_chars = expected.chars();
    let mut actual_chars = actual.chars();

    loop {
        match (expected_chars.next(), actual_chars.next()) {
            (None, None) => return None,
            (left, right) if left == right => {
                if left == Some('\n') {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
            (left, right) => {
                return Some(Mismatch {
                    line,
                    column,
                    expected: snippet(left, &mut expected_chars),
                    actual: snippet(right, &mut actual_chars),
                });
            }
        }
    }
}

fn snippet(first: Option<char>, rest: &mut std::str::Chars<'_>) -> String {
    first
        .into_iter()
        .chain(rest.take_while(|&ch| ch != '\n').take(20))
        .collect()
}

/// Unified diff of two texts
pub fn unified_diff(original: &str, printed: &str) -> String {
    TextDiff::from_lines(original, printed)
        .unified_diff()
        .context_radius(3)
        .header("original", "printed")
        .to_string()
}
