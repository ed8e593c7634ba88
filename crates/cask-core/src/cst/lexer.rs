//! CST-aware lexer that preserves all trivia (whitespace, comments,
//! line continuations)
//!
//! Every byte of the input lands in exactly one token, so concatenating the
//! token texts reproduces the input. The lexer is line-aware: it knows which
//! word opens a logical line (the instruction keyword), where a line
//! continuation keeps the logical line open, and where a heredoc body starts.

use crate::cst::DockerSyntaxKind;
use std::collections::VecDeque;
use std::ops::Range;

/// Simple span representing a byte range in the source
pub type CstSpan = Range<usize>;

/// Escape character used when no directive or configuration overrides it
pub const DEFAULT_ESCAPE: char = '\\';

/// A non-fatal lexer diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: DockerSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: DockerSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// `escape` is the line-continuation and escape character (`\` by default,
/// often a backtick on Windows images).
pub fn lex_with_trivia(input: &str, escape: char) -> CstLexResult {
    let mut lexer = Lexer::new(input, escape);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct PendingHeredoc {
    name: String,
    strip_tabs: bool,
    span: CstSpan,
}

struct Lexer<'a> {
    input: &'a str,
    escape: char,
    pos: usize,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
    /// The next word opens an instruction
    expect_keyword: bool,
    /// A line continuation was seen and no content has followed it yet
    continued: bool,
    /// Upper-cased keyword of the current logical line
    keyword: Option<String>,
    /// Markers of the current line whose bodies follow it, in order
    heredocs: VecDeque<PendingHeredoc>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, escape: char) -> Self {
        Self {
            input,
            escape,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
            expect_keyword: true,
            continued: false,
            keyword: None,
            heredocs: VecDeque::new(),
        }
    }

    fn run(&mut self) {
        while let Some((ch, size)) = next_char(self.input, self.pos) {
            let start = self.pos;

            if ch == '\n' || ch == '\r' {
                self.lex_newline();
                continue;
            }

            if ch == self.escape
                && let Some(end) = continuation_end(self.input, start, self.escape)
            {
                self.push(DockerSyntaxKind::LineContinuation, start, end);
                self.continued = true;
                continue;
            }

            if is_blank(ch) {
                let end = scan_while(self.input, start, is_blank);
                self.push(DockerSyntaxKind::Whitespace, start, end);
                continue;
            }

            if ch == '#' {
                let end = scan_while(self.input, start, |c| c != '\n' && c != '\r');
                self.push(DockerSyntaxKind::Comment, start, end);
                continue;
            }

            // Everything below is content
            self.continued = false;

            match ch {
                '"' | '\'' => {
                    self.lex_quoted(ch);
                    self.expect_keyword = false;
                }
                '[' => self.push_punct(DockerSyntaxKind::LBracket, start, size),
                ']' => self.push_punct(DockerSyntaxKind::RBracket, start, size),
                ',' => self.push_punct(DockerSyntaxKind::Comma, start, size),
                '=' => self.push_punct(DockerSyntaxKind::Equals, start, size),
                '$' => match variable_end(self.input, start) {
                    Some((kind, end)) => {
                        self.push(kind, start, end);
                        self.expect_keyword = false;
                    }
                    None => self.lex_word(),
                },
                '<' => match self
                    .heredoc_allowed()
                    .then(|| heredoc_marker(self.input, start))
                    .flatten()
                {
                    Some((end, pending)) => {
                        tracing::trace!(name = %pending.name, "heredoc marker recognised");
                        self.push(DockerSyntaxKind::HeredocMarker, start, end);
                        self.heredocs.push_back(pending);
                    }
                    None => self.lex_word(),
                },
                _ => self.lex_word(),
            }
        }

        for pending in self.heredocs.drain(..) {
            self.errors.push(LexerError::new(
                format!("Unterminated heredoc, expected `{}`", pending.name),
                pending.span,
            ));
        }
    }

    fn lex_newline(&mut self) {
        let start = self.pos;
        let end = if self.input[start..].starts_with("\r\n") {
            start + 2
        } else {
            start + 1
        };
        self.push(DockerSyntaxKind::Newline, start, end);

        // Blank and comment-only lines inside a continuation keep the
        // logical line open
        if self.continued {
            return;
        }

        self.expect_keyword = true;
        self.keyword = None;

        // Bodies follow one another; the line break after each terminator
        // brings the lexer back here for the next one
        if let Some(pending) = self.heredocs.pop_front() {
            self.lex_heredoc_body(pending);
        }
    }

    fn lex_heredoc_body(&mut self, pending: PendingHeredoc) {
        let input = self.input;
        let len = input.len();
        loop {
            if self.pos >= len {
                self.errors.push(LexerError::new(
                    format!("Unterminated heredoc, expected `{}`", pending.name),
                    pending.span.clone(),
                ));
                break;
            }

            let start = self.pos;
            let line_end = input[start..]
                .find('\n')
                .map(|offset| start + offset + 1)
                .unwrap_or(len);
            let line = &input[start..line_end];
            let content = line
                .strip_suffix('\n')
                .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
                .unwrap_or(line);

            let candidate = if pending.strip_tabs {
                content.trim_start_matches('\t')
            } else {
                content
            };

            if candidate == pending.name {
                self.push(DockerSyntaxKind::HeredocEnd, start, start + content.len());
                break;
            }

            self.push(DockerSyntaxKind::HeredocLine, start, line_end);
        }
    }

    fn lex_quoted(&mut self, quote: char) {
        let start = self.pos;
        let mut i = start + quote.len_utf8();
        let mut closed = false;

        while let Some((c, size)) = next_char(self.input, i) {
            if c == quote {
                i += size;
                closed = true;
                break;
            }
            if c == '\n' || c == '\r' {
                break;
            }
            if c == self.escape {
                if let Some(end) = continuation_end(self.input, i, self.escape) {
                    i = end;
                    continue;
                }
                if quote == '"' {
                    i += size;
                    if let Some((next, next_size)) = next_char(self.input, i)
                        && next != '\n'
                        && next != '\r'
                    {
                        i += next_size;
                    }
                    continue;
                }
            }
            i += size;
        }

        if closed {
            let kind = if quote == '"' {
                DockerSyntaxKind::DoubleQuoted
            } else {
                DockerSyntaxKind::SingleQuoted
            };
            self.push(kind, start, i);
        } else {
            self.errors
                .push(LexerError::new("Unterminated quoted string", start..i));
            self.push(DockerSyntaxKind::Error, start, i);
        }
    }

    fn lex_word(&mut self) {
        let start = self.pos;
        let mut i = start;

        while let Some((c, size)) = next_char(self.input, i) {
            if is_blank(c) || matches!(c, '\n' | '\r' | '"' | '\'' | '[' | ']' | ',' | '=') {
                break;
            }
            if c == '$' && variable_end(self.input, i).is_some() {
                break;
            }
            if c == self.escape {
                if continuation_end(self.input, i, self.escape).is_some() {
                    break;
                }
                i += size;
                if let Some((next, next_size)) = next_char(self.input, i)
                    && next != '\n'
                    && next != '\r'
                {
                    i += next_size;
                }
                continue;
            }
            i += size;
        }

        if i == start {
            // Never stall on a character no rule accepted
            i = start + next_char(self.input, start).map_or(1, |(_, size)| size);
        }

        if self.expect_keyword {
            let keyword = self.input[start..i].to_ascii_uppercase();
            self.expect_keyword = keyword == "ONBUILD";
            self.keyword = Some(keyword);
            self.push(DockerSyntaxKind::Keyword, start, i);
        } else {
            self.push(DockerSyntaxKind::Word, start, i);
        }
    }

    fn heredoc_allowed(&self) -> bool {
        !self.expect_keyword
            && matches!(self.keyword.as_deref(), Some("RUN" | "COPY" | "ADD"))
    }

    fn push_punct(&mut self, kind: DockerSyntaxKind, start: usize, size: usize) {
        self.push(kind, start, start + size);
        self.expect_keyword = false;
    }

    fn push(&mut self, kind: DockerSyntaxKind, start: usize, end: usize) {
        self.tokens
            .push(CstToken::new(kind, &self.input[start..end], span(start, end)));
        self.pos = end;
    }
}

/// Recognise `<<NAME`, `<<-NAME`, `<<"NAME"` or `<<'NAME'` at `start`
fn heredoc_marker(input: &str, start: usize) -> Option<(usize, PendingHeredoc)> {
    let rest = input[start..].strip_prefix("<<")?;
    let (strip_tabs, rest) = match rest.strip_prefix('-') {
        Some(after) => (true, after),
        None => (false, rest),
    };
    let name_start = input.len() - rest.len();

    let (name, end) = match rest.chars().next()? {
        quote @ ('"' | '\'') => {
            let body = &rest[1..];
            let close = body.find(|c: char| c == quote || c == '\n')?;
            if !body[close..].starts_with(quote) || close == 0 {
                return None;
            }
            (body[..close].to_string(), name_start + close + 2)
        }
        c if is_heredoc_name_char(c) => {
            let end = scan_while(input, name_start, is_heredoc_name_char);
            (input[name_start..end].to_string(), end)
        }
        _ => return None,
    };

    Some((
        end,
        PendingHeredoc {
            name,
            strip_tabs,
            span: span(start, end),
        },
    ))
}

fn is_heredoc_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `$NAME` or `${...}`; `None` when the `$` does not start a reference
fn variable_end(input: &str, start: usize) -> Option<(DockerSyntaxKind, usize)> {
    let after = start + 1;
    let rest = input.get(after..)?;
    let first = rest.chars().next()?;

    if first == '{' {
        let close = rest.find(['}', '\n', '\r'])?;
        if !rest[close..].starts_with('}') {
            return None;
        }
        return Some((DockerSyntaxKind::BracedVariable, after + close + 1));
    }

    if first.is_ascii_alphabetic() || first == '_' {
        let end = scan_while(input, after, |c| c.is_ascii_alphanumeric() || c == '_');
        return Some((DockerSyntaxKind::Variable, end));
    }

    None
}

/// End of a line continuation starting at `start`, if there is one
fn continuation_end(input: &str, start: usize, escape: char) -> Option<usize> {
    let after = start + escape.len_utf8();
    let blanks_end = scan_while(input, after, |c| c == ' ' || c == '\t');
    let rest = &input[blanks_end..];
    if rest.starts_with("\r\n") {
        Some(blanks_end + 2)
    } else if rest.starts_with('\n') || rest.starts_with('\r') {
        Some(blanks_end + 1)
    } else {
        None
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\u{feff}' || (c.is_whitespace() && c != '\n' && c != '\r')
}

fn scan_while(input: &str, start: usize, predicate: impl Fn(char) -> bool) -> usize {
    let rest = &input[start..];
    rest.char_indices()
        .find(|&(_, c)| !predicate(c))
        .map_or(input.len(), |(offset, _)| start + offset)
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input.get(pos..)?.chars().next().map(|c| (c, c.len_utf8()))
}

fn span(start: usize, end: usize) -> CstSpan {
    start..end
}
