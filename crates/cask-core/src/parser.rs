use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::cst::{DEFAULT_ESCAPE, parse_dockerfile};
use crate::directives::Directives;
use crate::tree::Document;

/// Outcome of parsing a build script
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Original source that was parsed
    pub source: Arc<str>,
    /// Typed tree of the source
    pub document: Document,
    /// Directives found at the top of the source
    pub directives: Directives,
    /// Escape character the source was lexed with
    pub escape: char,
    /// Non-fatal lexer diagnostics (unterminated quotes and heredocs)
    pub warnings: Vec<ParseError>,
}

impl ParseResult {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn warnings(&self) -> &[ParseError] {
        &self.warnings
    }

    /// Print the tree; equals `source` for an unmodified parse
    pub fn print(&self) -> String {
        self.document.print()
    }
}

pub trait Parser {
    fn parse(&mut self, content: &str) -> Result<ParseResult>;
}

/// Stateless build-script parser
///
/// Every call gets its own token stream and cursor, so one parser can be
/// shared across threads that parse different documents.
#[derive(Debug, Clone, Default)]
pub struct DockerfileParser {
    config: ParserConfig,
}

impl DockerfileParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse build-script content
    ///
    /// Grammar rejections are fatal and reported as the first
    /// [`ParseError`]; lexer diagnostics are returned as warnings.
    pub fn parse_content(&self, content: &str) -> Result<ParseResult> {
        let source: Arc<str> = Arc::from(content);
        let directives = if self.config.honor_directives {
            Directives::scan(&source)
        } else {
            Directives::default()
        };
        let escape = self
            .config
            .escape
            .or(directives.escape)
            .unwrap_or(DEFAULT_ESCAPE);

        let (cst, lex_errors, syntax_errors) = parse_dockerfile(&source, escape);

        let warnings: Vec<ParseError> = lex_errors
            .into_iter()
            .map(|error| ParseError::from_span(&source, error.message, error.span, ParseErrorKind::Lexer))
            .collect();
        for warning in &warnings {
            debug!(line = warning.line, column = warning.column, "{}", warning.message);
        }

        if let Some(error) = syntax_errors.into_iter().next() {
            return Err(ParseError::from_span(&source, error.message, error.span, error.kind).into());
        }

        let document = crate::build::build_document(&cst, &source);
        debug!(
            global_args = document.global_args.len(),
            stages = document.stages.len(),
            warnings = warnings.len(),
            "parsed build script"
        );

        Ok(ParseResult {
            source,
            document,
            directives,
            escape,
            warnings,
        })
    }
}

impl Parser for DockerfileParser {
    fn parse(&mut self, content: &str) -> Result<ParseResult> {
        self.parse_content(content)
    }
}

/// Parse with the default configuration
pub fn parse(source: &str) -> Result<Document> {
    DockerfileParser::new()
        .parse_content(source)
        .map(|result| result.document)
}

/// Print a document back to source text
pub fn print(document: &Document) -> String {
    document.print()
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Escape character override; takes precedence over the `escape` directive
    pub escape: Option<char>,
    /// Whether leading `# key=value` directives are read
    pub honor_directives: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            escape: None,
            honor_directives: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
    pub offset: usize,
    pub length: usize,
    pub span: Range<usize>,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorKind {
    /// A line does not start with an instruction keyword
    UnexpectedToken,
    UnknownInstruction,
    /// A non-ARG instruction before the first FROM
    ExpectedFrom,
    /// Content after a complete FROM alias or HEALTHCHECK NONE
    TrailingContent,
    /// ONBUILD without a trigger instruction
    MissingInstruction,
    Lexer,
}

impl ParseError {
    pub fn from_span(
        source: &str,
        message: String,
        span: Range<usize>,
        kind: ParseErrorKind,
    ) -> Self {
        let (line, column) = offset_to_line_col(source, span.start);
        let length = span.end.saturating_sub(span.start);
        Self {
            message,
            line,
            column,
            offset: span.start,
            length,
            span,
            kind,
        }
    }
}

fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut column = 1usize;
    let mut current = 0usize;

    for ch in source.chars() {
        if current >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }

        current += ch.len_utf8();
    }

    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaskError;

    #[test]
    fn test_parse_reports_position() {
        let error = match parse("FROM a\n  FETCH x\n") {
            Err(CaskError::Parse(error)) => error,
            other => panic!("expected parse error, got {other:?}"),
        };
        assert_eq!(error.kind, ParseErrorKind::UnknownInstruction);
        assert_eq!((error.line, error.column), (2, 3));
        assert_eq!(error.length, 5);
    }

    #[test]
    fn test_lexer_errors_are_warnings() {
        let result = DockerfileParser::new()
            .parse_content("FROM a\nRUN echo \"open\n")
            .unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, ParseErrorKind::Lexer);
        assert_eq!(result.print(), "FROM a\nRUN echo \"open\n");
    }

    #[test]
    fn test_escape_directive_and_override() {
        let source = "# escape=`\nFROM a\nRUN echo \\\nRUN b\n";
        let result = DockerfileParser::new().parse_content(source).unwrap();
        assert_eq!(result.escape, '`');
        // with a backtick escape the backslash does not continue the line
        assert_eq!(result.document.stages[0].instructions.len(), 2);

        let config = ParserConfig {
            escape: Some('\\'),
            honor_directives: true,
        };
        let result = DockerfileParser::with_config(config)
            .parse_content(source)
            .unwrap();
        assert_eq!(result.escape, '\\');
        assert_eq!(result.document.stages[0].instructions.len(), 1);
    }

    #[test]
    fn test_directives_can_be_ignored() {
        let config = ParserConfig {
            escape: None,
            honor_directives: false,
        };
        let result = DockerfileParser::with_config(config)
            .parse_content("# escape=`\nFROM a\n")
            .unwrap();
        assert!(result.directives.is_empty());
        assert_eq!(result.escape, '\\');
    }

    #[test]
    fn test_offset_to_line_col() {
        assert_eq!(offset_to_line_col("ab\ncd", 0), (1, 1));
        assert_eq!(offset_to_line_col("ab\ncd", 4), (2, 2));
        assert_eq!(offset_to_line_col("é\nx", 3), (2, 1));
    }
}
