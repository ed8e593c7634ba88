//! Typed-tree builders
//!
//! One builder per instruction kind. Each captures the leading space through
//! the shared cursor, consumes its keyword verbatim, then its flags and
//! payload, and finally moves the cursor to the end of the instruction node.
//! Trailing comments sit outside instruction nodes, so they end up in the
//! prefix of whatever follows.

use tracing::debug;

use super::classify::{TokenClass, classify};
use super::cursor::Cursor;
use super::split::{ImageReference, split_image_reference, split_user};
use crate::cst::{
    DockerSyntaxKind, DockerSyntaxNode, DockerSyntaxNodeExt, DockerSyntaxToken,
    DockerSyntaxTokenExt, NodeOrToken,
};
use crate::tree::{
    self, Add, AdditionalHeredoc, Arg, Argument, ArgumentContent, Cmd, CommandForm, Document,
    Entrypoint, Env, EnvironmentVariable, ExecArgument, ExecForm, Expose, Flag, Healthcheck,
    HealthcheckBody, Heredoc, Id, Instruction, KeyValuePair, Label, Literal, Maintainer, Markers,
    OnBuild, PathList, Port, Run, Shell, ShellForm, Space, Stage, StageAlias, StopSignal,
    TransferForm, User, Volume, Workdir,
};

/// Assemble the typed document from a parsed CST
pub fn build_document(root: &DockerSyntaxNode, source: &str) -> Document {
    TreeBuilder::new(source).document(root)
}

pub(crate) struct TreeBuilder<'a> {
    cursor: Cursor<'a>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    pub(crate) fn document(mut self, root: &DockerSyntaxNode) -> Document {
        let mut global_args = Vec::new();
        let mut stages = Vec::new();

        for child in root.children() {
            match child.kind() {
                DockerSyntaxKind::Arg => global_args.push(self.arg(&child)),
                DockerSyntaxKind::Stage => {
                    if let Some(stage) = self.stage(&child) {
                        stages.push(stage);
                    }
                }
                kind => {
                    debug!(%kind, "skipping node outside any stage");
                    self.cursor.skip_to(child.end());
                }
            }
        }

        let eof = self.cursor.prefix_before(self.cursor.source().len());
        Document {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            global_args,
            stages,
            eof,
        }
    }

    fn stage(&mut self, node: &DockerSyntaxNode) -> Option<Stage> {
        let Some(from_node) = node.child_of_kind(DockerSyntaxKind::From) else {
            self.cursor.skip_to(node.end());
            return None;
        };
        let from = self.from(&from_node);

        let mut instructions = Vec::new();
        for child in node.children().skip(1) {
            if let Some(instruction) = self.instruction(&child) {
                instructions.push(instruction);
            }
        }

        Some(Stage::new(from, instructions))
    }

    fn instruction(&mut self, node: &DockerSyntaxNode) -> Option<Instruction> {
        let instruction = match node.kind() {
            DockerSyntaxKind::From => Instruction::From(self.from(node)),
            DockerSyntaxKind::Run => Instruction::Run(self.run(node)),
            DockerSyntaxKind::Cmd => Instruction::Cmd(self.cmd(node)),
            DockerSyntaxKind::Entrypoint => Instruction::Entrypoint(self.entrypoint(node)),
            DockerSyntaxKind::Shell => Instruction::Shell(self.shell(node)),
            DockerSyntaxKind::Copy => Instruction::Copy(self.copy(node)),
            DockerSyntaxKind::Add => Instruction::Add(self.add(node)),
            DockerSyntaxKind::Arg => Instruction::Arg(self.arg(node)),
            DockerSyntaxKind::Env => Instruction::Env(self.env(node)),
            DockerSyntaxKind::Label => Instruction::Label(self.label(node)),
            DockerSyntaxKind::Expose => Instruction::Expose(self.expose(node)),
            DockerSyntaxKind::Volume => Instruction::Volume(self.volume(node)),
            DockerSyntaxKind::Workdir => Instruction::Workdir(self.workdir(node)),
            DockerSyntaxKind::User => Instruction::User(self.user(node)),
            DockerSyntaxKind::StopSignal => Instruction::StopSignal(self.stop_signal(node)),
            DockerSyntaxKind::OnBuild => Instruction::OnBuild(self.onbuild(node)?),
            DockerSyntaxKind::Healthcheck => Instruction::Healthcheck(self.healthcheck(node)),
            DockerSyntaxKind::Maintainer => Instruction::Maintainer(self.maintainer(node)),
            kind => {
                debug!(%kind, "skipping non-instruction node");
                self.cursor.skip_to(node.end());
                return None;
            }
        };
        Some(instruction)
    }

    fn from(&mut self, node: &DockerSyntaxNode) -> tree::From {
        let (prefix, keyword) = self.open(node);
        let flags = self.flags(node);
        let ImageReference { image, tag, digest } = match node.child_of_kind(DockerSyntaxKind::Argument) {
            Some(argument) => split_image_reference(&self.argument(&argument)),
            None => ImageReference {
                image: Argument::empty(),
                tag: None,
                digest: None,
            },
        };
        let alias = node
            .child_of_kind(DockerSyntaxKind::StageAlias)
            .map(|alias| self.stage_alias(&alias));
        self.cursor.skip_to(node.end());

        tree::From {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            flags,
            image,
            tag,
            digest,
            alias,
        }
    }

    fn stage_alias(&mut self, node: &DockerSyntaxNode) -> StageAlias {
        let prefix = self.cursor.prefix_before(node.start());
        let keyword = node
            .token_of_kind(DockerSyntaxKind::Word)
            .map(|token| self.consume(&token))
            .unwrap_or_default();
        let name = self.single_argument(node);
        self.cursor.skip_to(node.end());

        StageAlias {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            name,
        }
    }

    fn run(&mut self, node: &DockerSyntaxNode) -> Run {
        let (prefix, keyword) = self.open(node);
        let flags = self.flags(node);
        let command = self.command(node);
        self.cursor.skip_to(node.end());

        Run {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            flags,
            command,
        }
    }

    fn cmd(&mut self, node: &DockerSyntaxNode) -> Cmd {
        let (prefix, keyword) = self.open(node);
        let command = self.command(node);
        self.cursor.skip_to(node.end());

        Cmd {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            command,
        }
    }

    fn entrypoint(&mut self, node: &DockerSyntaxNode) -> Entrypoint {
        let (prefix, keyword) = self.open(node);
        let command = self.command(node);
        self.cursor.skip_to(node.end());

        Entrypoint {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            command,
        }
    }

    fn shell(&mut self, node: &DockerSyntaxNode) -> Shell {
        let (prefix, keyword) = self.open(node);
        let command = self.command(node);
        self.cursor.skip_to(node.end());

        Shell {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            command,
        }
    }

    fn copy(&mut self, node: &DockerSyntaxNode) -> tree::Copy {
        let (prefix, keyword) = self.open(node);
        let flags = self.flags(node);
        let form = self.transfer_form(node);
        self.cursor.skip_to(node.end());

        tree::Copy {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            flags,
            form,
        }
    }

    fn add(&mut self, node: &DockerSyntaxNode) -> Add {
        let (prefix, keyword) = self.open(node);
        let flags = self.flags(node);
        let form = self.transfer_form(node);
        self.cursor.skip_to(node.end());

        Add {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            flags,
            form,
        }
    }

    fn arg(&mut self, node: &DockerSyntaxNode) -> Arg {
        let (prefix, keyword) = self.open(node);
        let pairs = self.pairs(node);
        self.cursor.skip_to(node.end());

        Arg {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            pairs,
        }
    }

    fn env(&mut self, node: &DockerSyntaxNode) -> Env {
        let (prefix, keyword) = self.open(node);
        let pairs = self.pairs(node);
        self.cursor.skip_to(node.end());

        Env {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            pairs,
        }
    }

    fn label(&mut self, node: &DockerSyntaxNode) -> Label {
        let (prefix, keyword) = self.open(node);
        let pairs = self.pairs(node);
        self.cursor.skip_to(node.end());

        Label {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            pairs,
        }
    }

    fn expose(&mut self, node: &DockerSyntaxNode) -> Expose {
        let (prefix, keyword) = self.open(node);
        let mut ports = Vec::new();
        for port in node.children_of_kind(DockerSyntaxKind::Port) {
            let space = self.cursor.prefix_before(port.start());
            let text = self.cursor.consume_to(port.end());
            ports.push(Port::parse(text).with_prefix(space));
        }
        self.cursor.skip_to(node.end());

        Expose {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            ports,
        }
    }

    fn volume(&mut self, node: &DockerSyntaxNode) -> Volume {
        let (prefix, keyword) = self.open(node);
        let paths = match node.child_of_kind(DockerSyntaxKind::JsonArray) {
            Some(array) => PathList::Exec(self.exec_form(&array)),
            None => PathList::Plain {
                paths: self.arguments(node),
            },
        };
        self.cursor.skip_to(node.end());

        Volume {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            paths,
        }
    }

    fn workdir(&mut self, node: &DockerSyntaxNode) -> Workdir {
        let (prefix, keyword) = self.open(node);
        let path = self.single_argument(node);
        self.cursor.skip_to(node.end());

        Workdir {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            path,
        }
    }

    fn user(&mut self, node: &DockerSyntaxNode) -> User {
        let (prefix, keyword) = self.open(node);
        let (user, group) = split_user(&self.single_argument(node));
        self.cursor.skip_to(node.end());

        User {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            user,
            group,
        }
    }

    fn stop_signal(&mut self, node: &DockerSyntaxNode) -> StopSignal {
        let (prefix, keyword) = self.open(node);
        let signal = self.single_argument(node);
        self.cursor.skip_to(node.end());

        StopSignal {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            signal,
        }
    }

    fn maintainer(&mut self, node: &DockerSyntaxNode) -> Maintainer {
        let (prefix, keyword) = self.open(node);
        let name = self.single_argument(node);
        self.cursor.skip_to(node.end());

        Maintainer {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            name,
        }
    }

    fn onbuild(&mut self, node: &DockerSyntaxNode) -> Option<OnBuild> {
        let (prefix, keyword) = self.open(node);
        let trigger = node
            .children()
            .find(|child| child.kind().is_instruction())
            .and_then(|child| self.instruction(&child));
        self.cursor.skip_to(node.end());

        Some(OnBuild {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            instruction: Box::new(trigger?),
        })
    }

    fn healthcheck(&mut self, node: &DockerSyntaxNode) -> Healthcheck {
        let (prefix, keyword) = self.open(node);
        let flags = self.flags(node);
        let body = match node.child_of_kind(DockerSyntaxKind::HealthcheckNone) {
            Some(none) => Some(HealthcheckBody::Disabled {
                prefix: self.cursor.prefix_before(none.start()),
                keyword: self.cursor.consume_to(none.end()).to_string(),
            }),
            None => node
                .child_of_kind(DockerSyntaxKind::Cmd)
                .map(|cmd| HealthcheckBody::Cmd(self.cmd(&cmd))),
        };
        self.cursor.skip_to(node.end());

        Healthcheck {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            keyword,
            flags,
            body,
        }
    }

    /// Leading space and keyword of an instruction node
    fn open(&mut self, node: &DockerSyntaxNode) -> (Space, String) {
        let prefix = self.cursor.prefix_before(node.start());
        let keyword = node
            .token_of_kind(DockerSyntaxKind::Keyword)
            .map(|token| self.consume(&token))
            .unwrap_or_default();
        (prefix, keyword)
    }

    /// Text of a token that directly follows the cursor
    fn consume(&mut self, token: &DockerSyntaxToken) -> String {
        self.cursor.skip_to(token.start());
        self.cursor.consume_to(token.end()).to_string()
    }

    fn flags(&mut self, node: &DockerSyntaxNode) -> Vec<Flag> {
        node.children_of_kind(DockerSyntaxKind::Flag)
            .iter()
            .map(|flag| self.flag(flag))
            .collect()
    }

    fn flag(&mut self, node: &DockerSyntaxNode) -> Flag {
        let prefix = self.cursor.prefix_before(node.start());
        let raw = node
            .token_of_kind(DockerSyntaxKind::FlagName)
            .map(|token| self.consume(&token))
            .unwrap_or_default();
        let name = raw.strip_prefix("--").unwrap_or(&raw).to_string();

        let value = node.token_of_kind(DockerSyntaxKind::Equals).map(|equals| {
            self.cursor.skip_to(equals.end());
            match node.child_of_kind(DockerSyntaxKind::Argument) {
                Some(argument) => self.argument(&argument),
                None => Argument::empty(),
            }
        });
        self.cursor.skip_to(node.end());

        Flag {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            name,
            value,
        }
    }

    fn command(&mut self, node: &DockerSyntaxNode) -> CommandForm {
        for child in node.children() {
            match child.kind() {
                DockerSyntaxKind::ShellForm => {
                    let prefix = self.cursor.prefix_before(child.start());
                    let text = self.cursor.consume_to(child.end());
                    return CommandForm::Shell(ShellForm::new(text).with_prefix(prefix));
                }
                DockerSyntaxKind::JsonArray => return CommandForm::Exec(self.exec_form(&child)),
                DockerSyntaxKind::Heredoc => return CommandForm::Heredoc(self.heredoc(&child)),
                _ => {}
            }
        }
        CommandForm::Shell(ShellForm::empty())
    }

    fn transfer_form(&mut self, node: &DockerSyntaxNode) -> TransferForm {
        if let Some(heredoc) = node.child_of_kind(DockerSyntaxKind::Heredoc) {
            return TransferForm::Heredoc(self.heredoc(&heredoc));
        }
        if let Some(array) = node.child_of_kind(DockerSyntaxKind::JsonArray) {
            return TransferForm::Exec(self.exec_form(&array));
        }
        TransferForm::Paths {
            paths: self.arguments(node),
        }
    }

    /// Commas belong to the element that follows them
    fn exec_form(&mut self, node: &DockerSyntaxNode) -> ExecForm {
        let prefix = self.cursor.prefix_before(node.start());
        let mut elements = Vec::new();
        let mut delimiter = None;
        let mut closing = Space::EMPTY;

        for token in node
            .children_with_tokens()
            .filter_map(|element| element.into_token())
        {
            match token.kind() {
                DockerSyntaxKind::LBracket => self.cursor.skip_to(token.end()),
                DockerSyntaxKind::Comma => {
                    delimiter = Some(self.cursor.prefix_before(token.start()));
                    self.cursor.skip_to(token.end());
                }
                DockerSyntaxKind::RBracket => {
                    closing = self.cursor.prefix_before(token.start());
                    self.cursor.skip_to(token.end());
                }
                kind if kind.is_trivia() => {}
                kind => {
                    let space = self.cursor.prefix_before(token.start());
                    self.cursor.skip_to(token.end());
                    let literal = match classify(kind, token.text()) {
                        TokenClass::QuotedString { value, style } => Literal::quoted(value, style),
                        _ => Literal::plain(token.text()),
                    };
                    elements.push(ExecArgument {
                        delimiter: delimiter.take().unwrap_or(Space::EMPTY),
                        literal: literal.with_prefix(space),
                    });
                }
            }
        }
        self.cursor.skip_to(node.end());

        ExecForm {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            elements,
            closing,
        }
    }

    fn heredoc(&mut self, node: &DockerSyntaxNode) -> Heredoc {
        let prefix = self.cursor.prefix_before(node.start());
        let mut opening = String::new();
        let mut destination = None;
        let mut line_break = Space::EMPTY;
        let mut lines = Vec::new();
        let mut closing = String::new();
        let mut additional: Vec<AdditionalHeredoc> = Vec::new();
        // Index of the body being read; 0 is the first heredoc's
        let mut body = 0;
        let mut in_body = false;

        for element in node.children_with_tokens() {
            match element {
                NodeOrToken::Node(child) if child.kind() == DockerSyntaxKind::Argument => {
                    destination = Some(self.argument(&child));
                }
                NodeOrToken::Node(child) => self.cursor.skip_to(child.end()),
                NodeOrToken::Token(token) => match token.kind() {
                    DockerSyntaxKind::HeredocMarker if opening.is_empty() => {
                        opening = self.consume(&token);
                    }
                    DockerSyntaxKind::HeredocMarker => {
                        let prefix = self.cursor.prefix_before(token.start());
                        let opening = self.consume(&token);
                        additional.push(AdditionalHeredoc::new(prefix, opening));
                    }
                    kind @ (DockerSyntaxKind::HeredocLine | DockerSyntaxKind::HeredocEnd) => {
                        let start = if in_body {
                            None
                        } else {
                            in_body = true;
                            Some(self.cursor.prefix_before(token.start()))
                        };
                        let text = self.cursor.consume_to(token.end()).to_string();

                        if body == 0 {
                            if let Some(space) = start {
                                line_break = space;
                            }
                            match kind {
                                DockerSyntaxKind::HeredocEnd => closing = text,
                                _ => lines.push(text),
                            }
                        } else {
                            // Markers inside the destination text have no entry yet
                            if additional.len() < body {
                                additional.push(AdditionalHeredoc::new(Space::EMPTY, ""));
                            }
                            let current = &mut additional[body - 1];
                            if let Some(space) = start {
                                current.line_break = space;
                            }
                            match kind {
                                DockerSyntaxKind::HeredocEnd => current.closing = text,
                                _ => current.lines.push(text),
                            }
                        }

                        if kind == DockerSyntaxKind::HeredocEnd {
                            body += 1;
                            in_body = false;
                        }
                    }
                    _ => {}
                },
            }
        }
        self.cursor.skip_to(node.end());

        tracing::trace!(
            opening = %opening,
            lines = lines.len(),
            additional = additional.len(),
            "built heredoc"
        );
        Heredoc {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            opening,
            destination,
            line_break,
            lines,
            closing,
            additional,
        }
    }

    fn pairs(&mut self, node: &DockerSyntaxNode) -> Vec<KeyValuePair> {
        let mut pairs = Vec::new();
        for pair in node.children_of_kind(DockerSyntaxKind::KeyValue) {
            let prefix = self.cursor.prefix_before(pair.start());
            let mut arguments = pair.children_of_kind(DockerSyntaxKind::Argument).into_iter();
            let key = match arguments.next() {
                Some(key) => self.argument(&key),
                None => Argument::empty(),
            };
            let equals = pair.token_of_kind(DockerSyntaxKind::Equals);
            if let Some(equals) = &equals {
                self.cursor.skip_to(equals.end());
            }
            let value = arguments.next().map(|value| self.argument(&value));
            self.cursor.skip_to(pair.end());

            pairs.push(KeyValuePair {
                id: Id::random(),
                prefix,
                markers: Markers::EMPTY,
                key,
                equals: equals.is_some(),
                value,
            });
        }
        pairs
    }

    /// Direct argument children of `node`
    fn arguments(&mut self, node: &DockerSyntaxNode) -> Vec<Argument> {
        node.children_of_kind(DockerSyntaxKind::Argument)
            .iter()
            .map(|argument| self.argument(argument))
            .collect()
    }

    /// The single argument of WORKDIR-like instructions, empty when absent
    fn single_argument(&mut self, node: &DockerSyntaxNode) -> Argument {
        match node.child_of_kind(DockerSyntaxKind::Argument) {
            Some(argument) => self.argument(&argument),
            None => Argument::empty(),
        }
    }

    fn argument(&mut self, node: &DockerSyntaxNode) -> Argument {
        let prefix = self.cursor.prefix_before(node.start());
        let contents = self.contents(node);
        self.cursor.skip_to(node.end());

        Argument {
            id: Id::random(),
            prefix,
            markers: Markers::EMPTY,
            contents,
        }
    }

    /// Content elements of an argument
    ///
    /// Trivia is left to the cursor so it becomes the prefix of the next
    /// element. A comment is never consumed here; it lands in the next
    /// element's prefix along with the whitespace around it. Adjacent plain
    /// text on one line is folded into a single literal.
    fn contents(&mut self, node: &DockerSyntaxNode) -> Vec<ArgumentContent> {
        let mut contents: Vec<ArgumentContent> = Vec::new();

        for token in node
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
        {
            let kind = token.kind();
            if matches!(
                kind,
                DockerSyntaxKind::Whitespace
                    | DockerSyntaxKind::Newline
                    | DockerSyntaxKind::LineContinuation
            ) {
                continue;
            }

            let class = classify(kind, token.text());
            if let TokenClass::Comment(_) = class {
                continue;
            }

            let prefix = self.cursor.prefix_before(token.start());
            self.cursor.skip_to(token.end());

            match class {
                TokenClass::PlainText(text) => {
                    if let Some(ArgumentContent::Literal(last)) = contents.last_mut()
                        && last.quote.is_none()
                        && prefix.comments.is_empty()
                        && !prefix.whitespace.contains(['\n', '\r'])
                    {
                        last.text.push_str(&prefix.whitespace);
                        last.text.push_str(text);
                    } else {
                        contents.push(Literal::plain(text).with_prefix(prefix).into());
                    }
                }
                TokenClass::QuotedString { value, style } => {
                    contents.push(Literal::quoted(value, style).with_prefix(prefix).into());
                }
                TokenClass::EnvironmentVariable { name, braced } => {
                    contents.push(
                        EnvironmentVariable {
                            prefix,
                            ..EnvironmentVariable::new(name, braced)
                        }
                        .into(),
                    );
                }
                TokenClass::Comment(_) => {}
            }
        }

        contents
    }
}
