//! Parser directives
//!
//! Leading comments of the form `# key=value` configure the parser. Scanning
//! stops at the first line that is not a directive: a blank line, an
//! ordinary comment or an instruction. Directives remain ordinary comments
//! in the tree.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cst::DEFAULT_ESCAPE;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*#[ \t]*([A-Za-z][A-Za-z0-9_-]*)[ \t]*=[ \t]*(.*?)[ \t]*$")
        .expect("directive pattern is valid")
});

/// Directives declared at the top of a build script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directives {
    /// `escape`: `\` or `` ` ``
    pub escape: Option<char>,
    /// `syntax`: frontend image reference
    pub syntax: Option<String>,
    /// `check`: build check configuration
    pub check: Option<String>,
    /// Any other directive, lower-cased key, in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<(String, String)>,
}

impl Directives {
    /// Read the directives at the start of `source`
    pub fn scan(source: &str) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut directives = Self::default();
        let mut seen: Vec<String> = Vec::new();

        for line in source.lines() {
            let Some(captures) = DIRECTIVE.captures(line) else {
                break;
            };
            let key = captures[1].to_ascii_lowercase();
            let value = captures[2].to_string();

            if seen.contains(&key) {
                warn!(directive = %key, "duplicate parser directive ignored");
                continue;
            }
            seen.push(key.clone());

            match key.as_str() {
                "escape" => match value.as_str() {
                    "\\" => directives.escape = Some('\\'),
                    "`" => directives.escape = Some('`'),
                    _ => warn!(value = %value, "invalid escape directive ignored"),
                },
                "syntax" => directives.syntax = Some(value),
                "check" => directives.check = Some(value),
                _ => directives.other.push((key, value)),
            }
        }

        if !seen.is_empty() {
            debug!(count = seen.len(), "parser directives found");
        }
        directives
    }

    /// Escape character to lex with
    pub fn escape_char(&self) -> char {
        self.escape.unwrap_or(DEFAULT_ESCAPE)
    }

    pub fn is_empty(&self) -> bool {
        self.escape.is_none() && self.syntax.is_none() && self.check.is_none() && self.other.is_empty()
    }

    /// Value of any directive by key
    pub fn get(&self, key: &str) -> Option<String> {
        let key = key.to_ascii_lowercase();
        match key.as_str() {
            "escape" => self.escape.map(String::from),
            "syntax" => self.syntax.clone(),
            "check" => self.check.clone(),
            _ => self
                .other
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone()),
        }
    }
}
