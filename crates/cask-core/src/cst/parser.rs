//! Hierarchical parser for build-script instructions
//!
//! Builds a structured CST from the token stream: a `Document` holding global
//! `ARG`s and `Stage`s, one node per instruction, and rule-context nodes for
//! flags, arguments, JSON arrays, shell forms, heredocs, key/value pairs and
//! ports. Every token lands in the tree, so `cst.text() == source`.
//!
//! An instruction node spans its keyword through the last non-trivia token of
//! its logical line. Trailing whitespace and comments stay outside so they
//! become leading space of whatever follows.

use super::lexer::{CstSpan, LexerError};
use super::{CstBuilder, CstToken, DockerSyntaxKind, DockerSyntaxNode};
use crate::parser::ParseErrorKind;

/// A grammar rejection with its byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: CstSpan,
}

/// Parse build-script source into a hierarchical CST
///
/// # Example
///
/// ```rust,ignore
/// use cask_core::cst::parse_dockerfile;
///
/// let source = "FROM alpine:3.18\nRUN apk add curl\n";
/// let (cst, lexer_errors, errors) = parse_dockerfile(source, '\\');
/// assert!(lexer_errors.is_empty() && errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_dockerfile(
    source: &str,
    escape: char,
) -> (DockerSyntaxNode, Vec<LexerError>, Vec<SyntaxError>) {
    let (tokens, lexer_errors) = super::lex_with_trivia(source, escape);
    let mut parser = Parser::new(&tokens);
    parser.parse_document();
    let (cst, errors) = parser.finish();
    (cst, lexer_errors, errors)
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: CstBuilder,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (DockerSyntaxNode, Vec<SyntaxError>) {
        (self.builder.finish(), self.errors)
    }

    /// Parse the top-level document
    fn parse_document(&mut self) {
        self.builder.start_node(DockerSyntaxKind::Document);

        let mut seen_stage = false;
        while !self.at_end() {
            if self.at_trivia() {
                self.bump();
                continue;
            }

            if !self.at(DockerSyntaxKind::Keyword) {
                let found = self.current_kind();
                self.error_here(
                    ParseErrorKind::UnexpectedToken,
                    format!("Expected an instruction keyword, found {found}"),
                );
                self.error_and_recover();
                continue;
            }

            match self.keyword_kind() {
                Some(DockerSyntaxKind::From) => {
                    self.parse_stage();
                    seen_stage = true;
                }
                Some(kind) => {
                    if !seen_stage && kind != DockerSyntaxKind::Arg {
                        let keyword = self.current_text().to_string();
                        self.error_here(
                            ParseErrorKind::ExpectedFrom,
                            format!("`{keyword}` must follow a FROM instruction"),
                        );
                    }
                    self.parse_instruction(kind);
                }
                None => {
                    let keyword = self.current_text().to_string();
                    self.error_here(
                        ParseErrorKind::UnknownInstruction,
                        format!("Unknown instruction `{keyword}`"),
                    );
                    self.error_and_recover();
                }
            }
        }

        self.builder.finish_node(); // DOCUMENT
    }

    /// Parse a stage: a FROM and every following non-FROM instruction
    ///
    /// Trivia after the last instruction is left to the document.
    fn parse_stage(&mut self) {
        self.builder.start_node(DockerSyntaxKind::Stage);
        self.parse_instruction(DockerSyntaxKind::From);

        loop {
            let Some(next) = self.next_content_index(self.tokens.len()) else {
                break;
            };
            let token = &self.tokens[next];
            if token.kind != DockerSyntaxKind::Keyword {
                break;
            }
            match DockerSyntaxKind::from_keyword(&token.text) {
                Some(kind) if kind != DockerSyntaxKind::From => {
                    while self.pos < next {
                        self.bump();
                    }
                    self.parse_instruction(kind);
                }
                _ => break,
            }
        }

        self.builder.finish_node(); // STAGE
    }

    fn parse_instruction(&mut self, kind: DockerSyntaxKind) {
        let limit = self.instruction_end();
        self.parse_instruction_to(kind, limit);
    }

    /// Parse an instruction whose extent ends at token index `limit`
    fn parse_instruction_to(&mut self, kind: DockerSyntaxKind, limit: usize) {
        self.builder.start_node(kind);
        self.bump(); // keyword

        match kind {
            DockerSyntaxKind::From => self.parse_from(limit),
            DockerSyntaxKind::Run => {
                self.parse_flags(limit);
                self.parse_command(limit);
            }
            DockerSyntaxKind::Cmd | DockerSyntaxKind::Entrypoint | DockerSyntaxKind::Shell => {
                self.parse_command(limit)
            }
            DockerSyntaxKind::Copy | DockerSyntaxKind::Add => {
                self.parse_flags(limit);
                self.parse_paths(limit);
            }
            DockerSyntaxKind::Volume => self.parse_paths(limit),
            DockerSyntaxKind::Arg => self.parse_pairs(limit),
            DockerSyntaxKind::Env | DockerSyntaxKind::Label => self.parse_env_pairs(limit),
            DockerSyntaxKind::Expose => self.parse_ports(limit),
            DockerSyntaxKind::Workdir
            | DockerSyntaxKind::User
            | DockerSyntaxKind::StopSignal
            | DockerSyntaxKind::Maintainer => {
                self.eat_trivia(limit);
                if self.pos < limit {
                    self.parse_span(limit);
                }
            }
            DockerSyntaxKind::OnBuild => self.parse_onbuild(limit),
            DockerSyntaxKind::Healthcheck => self.parse_healthcheck(limit),
            _ => {}
        }

        while self.pos < limit {
            self.bump();
        }
        self.builder.finish_node();
    }

    /// Grammar: FROM [--flag]* image [AS name]
    fn parse_from(&mut self, limit: usize) {
        self.parse_flags(limit);
        self.eat_trivia(limit);
        if self.pos < limit {
            self.parse_run(limit);
        }

        if self
            .peek_content(limit)
            .is_some_and(|token| token.kind == DockerSyntaxKind::Word && token.text.eq_ignore_ascii_case("AS"))
        {
            self.eat_trivia(limit);
            self.builder.start_node(DockerSyntaxKind::StageAlias);
            self.bump();
            self.eat_trivia(limit);
            if self.pos < limit {
                self.parse_run(limit);
            }
            self.builder.finish_node(); // STAGE_ALIAS
        }

        self.reject_trailing(limit, "FROM");
    }

    /// Grammar: HEALTHCHECK [--flag]* (NONE | CMD command)
    fn parse_healthcheck(&mut self, limit: usize) {
        self.parse_flags(limit);
        self.eat_trivia(limit);
        if self.pos >= limit {
            return;
        }

        let text = self.current_text();
        if self.at(DockerSyntaxKind::Word) && text.eq_ignore_ascii_case("NONE") {
            self.builder.start_node(DockerSyntaxKind::HealthcheckNone);
            self.bump();
            self.builder.finish_node();
            self.reject_trailing(limit, "HEALTHCHECK NONE");
        } else if self.at(DockerSyntaxKind::Word) && text.eq_ignore_ascii_case("CMD") {
            self.builder.start_node(DockerSyntaxKind::Cmd);
            self.builder.token(DockerSyntaxKind::Keyword, text);
            self.advance();
            self.parse_command(limit);
            self.builder.finish_node(); // CMD
        } else {
            let found = text.to_string();
            self.error_here(
                ParseErrorKind::UnexpectedToken,
                format!("HEALTHCHECK expects CMD or NONE, found `{found}`"),
            );
            self.wrap_error(limit);
        }
    }

    /// Grammar: ONBUILD instruction
    fn parse_onbuild(&mut self, limit: usize) {
        self.eat_trivia(limit);
        if self.pos >= limit {
            let span = self.previous_span();
            self.errors.push(SyntaxError {
                kind: ParseErrorKind::MissingInstruction,
                message: "ONBUILD requires a trigger instruction".to_string(),
                span,
            });
            return;
        }

        if !self.at(DockerSyntaxKind::Keyword) {
            let found = self.current_kind();
            self.error_here(
                ParseErrorKind::UnexpectedToken,
                format!("ONBUILD expects an instruction, found {found}"),
            );
            self.wrap_error(limit);
            return;
        }

        match self.keyword_kind() {
            Some(kind) => self.parse_instruction_to(kind, limit),
            None => {
                let keyword = self.current_text().to_string();
                self.error_here(
                    ParseErrorKind::UnknownInstruction,
                    format!("Unknown instruction `{keyword}`"),
                );
                self.wrap_error(limit);
            }
        }
    }

    /// Leading `--name[=value]` flags
    fn parse_flags(&mut self, limit: usize) {
        while self.peek_content(limit).is_some_and(|token| {
            token.kind == DockerSyntaxKind::Word && token.text.starts_with("--")
        }) {
            self.eat_trivia(limit);
            self.parse_flag(limit);
        }
    }

    /// A flag value is the run of tokens adjacent to the `=`
    fn parse_flag(&mut self, limit: usize) {
        self.builder.start_node(DockerSyntaxKind::Flag);
        let name = self.current_text();
        self.builder.token(DockerSyntaxKind::FlagName, name);
        self.advance();

        if self.pos < limit && self.at(DockerSyntaxKind::Equals) {
            self.bump();
            if self.pos < limit && !self.at_trivia() {
                self.parse_run(limit);
            }
        }
        self.builder.finish_node(); // FLAG
    }

    /// Shell form, exec form or heredoc
    fn parse_command(&mut self, limit: usize) {
        self.eat_trivia(limit);
        if self.pos >= limit {
            return;
        }

        if self.at(DockerSyntaxKind::HeredocMarker) {
            self.parse_heredoc(limit);
        } else if self.json_array_ahead(limit) {
            self.parse_json_array(limit);
        } else {
            self.builder.start_node(DockerSyntaxKind::ShellForm);
            while self.pos < limit {
                self.bump();
            }
            self.builder.finish_node(); // SHELL_FORM
        }
    }

    /// Heredoc, JSON array or whitespace-separated paths
    fn parse_paths(&mut self, limit: usize) {
        self.eat_trivia(limit);
        if self.at(DockerSyntaxKind::HeredocMarker) {
            self.parse_heredoc(limit);
            return;
        }
        if self.json_array_ahead(limit) {
            self.parse_json_array(limit);
            return;
        }
        loop {
            self.eat_trivia(limit);
            if self.pos >= limit {
                break;
            }
            self.parse_run(limit);
        }
    }

    fn parse_json_array(&mut self, limit: usize) {
        self.builder.start_node(DockerSyntaxKind::JsonArray);
        while self.pos < limit {
            self.bump();
        }
        self.builder.finish_node(); // JSON_ARRAY
    }

    /// Grammar: marker+ [destination] (newline body* end)+
    fn parse_heredoc(&mut self, limit: usize) {
        self.builder.start_node(DockerSyntaxKind::Heredoc);
        self.bump(); // marker

        let body = (self.pos..limit)
            .find(|&index| {
                self.tokens[index].kind == DockerSyntaxKind::Newline
                    && matches!(
                        self.tokens.get(index + 1).map(|token| token.kind),
                        Some(DockerSyntaxKind::HeredocLine | DockerSyntaxKind::HeredocEnd)
                    )
            })
            .unwrap_or(limit);

        // Markers right after the first open further bodies
        while let Some(index) = (self.pos..body).find(|&index| !self.tokens[index].kind.is_trivia())
            && self.tokens[index].kind == DockerSyntaxKind::HeredocMarker
        {
            while self.pos <= index {
                self.bump();
            }
        }

        self.eat_trivia(body);
        if self.pos < body {
            let end = (self.pos..body)
                .rev()
                .find(|&index| !self.tokens[index].kind.is_trivia())
                .map_or(body, |index| index + 1);
            self.parse_span(end);
        }

        while self.pos < limit {
            self.bump();
        }
        self.builder.finish_node(); // HEREDOC
    }

    /// ENV and LABEL: `key=value` pairs, or the legacy `key value...` form
    fn parse_env_pairs(&mut self, limit: usize) {
        self.eat_trivia(limit);
        if self.pos >= limit {
            return;
        }

        let first_run_has_equals = self.tokens[self.pos..limit]
            .iter()
            .take_while(|token| !token.kind.is_trivia())
            .any(|token| token.kind == DockerSyntaxKind::Equals);

        if first_run_has_equals {
            self.parse_pairs(limit);
            return;
        }

        self.builder.start_node(DockerSyntaxKind::KeyValue);
        self.parse_run(limit);
        self.eat_trivia(limit);
        if self.pos < limit {
            self.parse_span(limit);
        }
        self.builder.finish_node(); // KEY_VALUE
    }

    /// Runs of `NAME[=value]`
    fn parse_pairs(&mut self, limit: usize) {
        loop {
            self.eat_trivia(limit);
            if self.pos >= limit {
                break;
            }

            self.builder.start_node(DockerSyntaxKind::KeyValue);
            self.builder.start_node(DockerSyntaxKind::Argument);
            while self.pos < limit && !self.at_trivia() && !self.at(DockerSyntaxKind::Equals) {
                self.bump();
            }
            self.builder.finish_node(); // ARGUMENT (key)

            if self.pos < limit && self.at(DockerSyntaxKind::Equals) {
                self.bump();
                if self.pos < limit && !self.at_trivia() {
                    self.parse_run(limit);
                }
            }
            self.builder.finish_node(); // KEY_VALUE
        }
    }

    fn parse_ports(&mut self, limit: usize) {
        loop {
            self.eat_trivia(limit);
            if self.pos >= limit {
                break;
            }
            self.builder.start_node(DockerSyntaxKind::Port);
            while self.pos < limit && !self.at_trivia() {
                self.bump();
            }
            self.builder.finish_node(); // PORT
        }
    }

    /// An argument made of adjacent tokens (no intervening trivia)
    fn parse_run(&mut self, limit: usize) {
        self.builder.start_node(DockerSyntaxKind::Argument);
        while self.pos < limit && !self.at_trivia() {
            self.bump();
        }
        self.builder.finish_node(); // ARGUMENT
    }

    /// An argument spanning every token up to `limit`, interior trivia included
    fn parse_span(&mut self, limit: usize) {
        self.builder.start_node(DockerSyntaxKind::Argument);
        while self.pos < limit {
            self.bump();
        }
        self.builder.finish_node(); // ARGUMENT
    }

    /// Exec form requires a well-formed array of double-quoted strings that
    /// ends the instruction
    fn json_array_ahead(&self, limit: usize) -> bool {
        if !self.at(DockerSyntaxKind::LBracket) {
            return false;
        }

        let mut expect_value = true;
        let mut first = true;
        for index in self.pos + 1..limit {
            let kind = self.tokens[index].kind;
            if kind.is_trivia() {
                continue;
            }
            match kind {
                DockerSyntaxKind::RBracket if first || !expect_value => return index + 1 == limit,
                DockerSyntaxKind::DoubleQuoted if expect_value => expect_value = false,
                DockerSyntaxKind::Comma if !expect_value => expect_value = true,
                _ => return false,
            }
            first = false;
        }
        false
    }

    /// Index one past the last non-trivia token of the current logical line
    fn instruction_end(&self) -> usize {
        let mut index = self.pos;
        let mut last = self.pos;
        let mut continued = false;

        while let Some(token) = self.tokens.get(index) {
            match token.kind {
                DockerSyntaxKind::Newline => {
                    let heredoc_follows = matches!(
                        self.tokens.get(index + 1).map(|next| next.kind),
                        Some(DockerSyntaxKind::HeredocLine | DockerSyntaxKind::HeredocEnd)
                    );
                    if !continued && !heredoc_follows {
                        break;
                    }
                }
                DockerSyntaxKind::LineContinuation => continued = true,
                DockerSyntaxKind::Whitespace | DockerSyntaxKind::Comment => {}
                _ => {
                    continued = false;
                    last = index + 1;
                }
            }
            index += 1;
        }

        last
    }

    fn reject_trailing(&mut self, limit: usize, context: &str) {
        self.eat_trivia(limit);
        if self.pos < limit {
            let found = self.current_text().to_string();
            self.error_here(
                ParseErrorKind::TrailingContent,
                format!("Unexpected `{found}` after {context}"),
            );
            self.wrap_error(limit);
        }
    }

    fn wrap_error(&mut self, limit: usize) {
        self.builder.start_node(DockerSyntaxKind::Error);
        while self.pos < limit {
            self.bump();
        }
        self.builder.finish_node();
    }

    /// Swallow the rest of the logical line into an error node
    fn error_and_recover(&mut self) {
        let limit = self.instruction_end().max(self.pos + 1);
        self.wrap_error(limit);
    }

    fn error_here(&mut self, kind: ParseErrorKind, message: String) {
        let span = self
            .current()
            .map(|token| token.span.clone())
            .unwrap_or_else(|| self.previous_span());
        self.errors.push(SyntaxError {
            kind,
            message,
            span,
        });
    }

    fn previous_span(&self) -> CstSpan {
        let end = self
            .pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or(0, |token| token.span.end);
        end..end
    }

    fn next_content_index(&self, limit: usize) -> Option<usize> {
        (self.pos..limit.min(self.tokens.len())).find(|&index| !self.tokens[index].kind.is_trivia())
    }

    fn peek_content(&self, limit: usize) -> Option<&CstToken> {
        self.next_content_index(limit)
            .map(|index| &self.tokens[index])
    }

    fn keyword_kind(&self) -> Option<DockerSyntaxKind> {
        DockerSyntaxKind::from_keyword(self.current_text())
    }

    fn eat_trivia(&mut self, limit: usize) {
        while self.pos < limit && self.at_trivia() {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current(&self) -> Option<&'a CstToken> {
        let tokens = self.tokens;
        tokens.get(self.pos)
    }

    fn current_kind(&self) -> DockerSyntaxKind {
        self.current()
            .map(|token| token.kind)
            .unwrap_or(DockerSyntaxKind::Eof)
    }

    fn current_text(&self) -> &'a str {
        self.current().map(|token| token.text.as_str()).unwrap_or("")
    }

    fn at(&self, kind: DockerSyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_trivia(&self) -> bool {
        self.current_kind().is_trivia()
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.add_token(token);
        }
        self.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::DockerSyntaxNodeExt;

    fn parse(source: &str) -> (DockerSyntaxNode, Vec<SyntaxError>) {
        let (cst, _, errors) = parse_dockerfile(source, '\\');
        (cst, errors)
    }

    #[test]
    fn test_parse_simple_stage() {
        let source = "FROM alpine:3.18\nRUN echo hi\n";
        let (cst, errors) = parse(source);

        assert!(errors.is_empty());
        assert_eq!(cst.text().to_string(), source);

        let stage = cst.child_of_kind(DockerSyntaxKind::Stage).unwrap();
        let kinds: Vec<_> = stage.children().map(|child| child.kind()).collect();
        assert_eq!(kinds, vec![DockerSyntaxKind::From, DockerSyntaxKind::Run]);
    }

    #[test]
    fn test_instruction_excludes_trailing_comment() {
        let source = "FROM a\nCOPY a b # note\nRUN x\n";
        let (cst, errors) = parse(source);
        assert!(errors.is_empty());

        let stage = cst.child_of_kind(DockerSyntaxKind::Stage).unwrap();
        let copy = stage.child_of_kind(DockerSyntaxKind::Copy).unwrap();
        assert_eq!(copy.text().to_string(), "COPY a b");
    }

    #[test]
    fn test_global_args_precede_stages() {
        let source = "ARG VERSION=1\nFROM base:$VERSION\nFROM other\n";
        let (cst, errors) = parse(source);
        assert!(errors.is_empty());

        let kinds: Vec<_> = cst.children().map(|child| child.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                DockerSyntaxKind::Arg,
                DockerSyntaxKind::Stage,
                DockerSyntaxKind::Stage
            ]
        );
    }

    #[test]
    fn test_flag_value_stops_at_whitespace() {
        let source = "FROM a\nRUN --mount=type=bind dest\n";
        let (cst, _) = parse(source);
        let run = cst
            .descendants()
            .find(|node| node.kind() == DockerSyntaxKind::Run)
            .unwrap();
        let flag = run.child_of_kind(DockerSyntaxKind::Flag).unwrap();
        assert_eq!(flag.text().to_string(), "--mount=type=bind");
        let shell = run.child_of_kind(DockerSyntaxKind::ShellForm).unwrap();
        assert_eq!(shell.text().to_string(), "dest");
    }

    #[test]
    fn test_exec_form_requires_closed_array() {
        let (cst, _) = parse("FROM a\nCMD [\"a\", \"b\" ]\nCMD [\"a\" x\n");
        let cmds: Vec<_> = cst
            .descendants()
            .filter(|node| node.kind() == DockerSyntaxKind::Cmd)
            .collect();
        assert!(cmds[0].child_of_kind(DockerSyntaxKind::JsonArray).is_some());
        assert!(cmds[1].child_of_kind(DockerSyntaxKind::ShellForm).is_some());
    }

    #[test]
    fn test_continuation_spans_comment_lines() {
        let source = "FROM a\nRUN apt-get update \\\n# refresh\n    && apt-get install -y curl\n";
        let (cst, errors) = parse(source);
        assert!(errors.is_empty());
        let run = cst
            .descendants()
            .find(|node| node.kind() == DockerSyntaxKind::Run)
            .unwrap();
        assert!(run.text().to_string().ends_with("curl"));
    }

    #[test]
    fn test_heredoc_stays_inside_instruction() {
        let source = "FROM a\nRUN <<EOF\nset -e\necho hi\nEOF\nCMD [\"sh\"]\n";
        let (cst, errors) = parse(source);
        assert!(errors.is_empty());
        let heredoc = cst
            .descendants()
            .find(|node| node.kind() == DockerSyntaxKind::Heredoc)
            .unwrap();
        assert_eq!(heredoc.text().to_string(), "<<EOF\nset -e\necho hi\nEOF");
    }

    #[test]
    fn test_heredocs_on_one_line_share_the_node() {
        let source = "FROM a\nCOPY <<A <<B /dst/\na\nA\nb\nB\nRUN true\n";
        let (cst, errors) = parse(source);
        assert!(errors.is_empty());
        let heredoc = cst
            .descendants()
            .find(|node| node.kind() == DockerSyntaxKind::Heredoc)
            .unwrap();
        assert_eq!(heredoc.text().to_string(), "<<A <<B /dst/\na\nA\nb\nB");
        let destination = heredoc.children_of_kind(DockerSyntaxKind::Argument);
        assert_eq!(destination.len(), 1);
        assert_eq!(destination[0].text().to_string(), "/dst/");
    }

    #[test]
    fn test_legacy_env_form() {
        let (cst, _) = parse("FROM a\nENV PATH /usr/bin:/bin\n");
        let pair = cst
            .descendants()
            .find(|node| node.kind() == DockerSyntaxKind::KeyValue)
            .unwrap();
        let arguments = pair.children_of_kind(DockerSyntaxKind::Argument);
        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[1].text().to_string(), "/usr/bin:/bin");
    }

    #[test]
    fn test_onbuild_nests_instruction() {
        let (cst, errors) = parse("FROM a\nONBUILD RUN make\n");
        assert!(errors.is_empty());
        let onbuild = cst
            .descendants()
            .find(|node| node.kind() == DockerSyntaxKind::OnBuild)
            .unwrap();
        assert!(onbuild.child_of_kind(DockerSyntaxKind::Run).is_some());
    }

    #[test]
    fn test_errors_are_reported() {
        let (_, errors) = parse("RUN x\n");
        assert_eq!(errors[0].kind, ParseErrorKind::ExpectedFrom);

        let (_, errors) = parse("FROM a\nFETCH x\n");
        assert_eq!(errors[0].kind, ParseErrorKind::UnknownInstruction);

        let (_, errors) = parse("FROM a AS b c\n");
        assert_eq!(errors[0].kind, ParseErrorKind::TrailingContent);

        let (_, errors) = parse("FROM a\nHEALTHCHECK NONE extra\n");
        assert_eq!(errors[0].kind, ParseErrorKind::TrailingContent);

        let (_, errors) = parse("[\"x\"]\n");
        assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_erroneous_input_is_still_lossless() {
        let source = "FROM a AS b c\nFETCH x\n  \"oops\n";
        let (cst, _) = parse(source);
        assert_eq!(cst.text().to_string(), source);
    }
}
