//! Printer for converting the typed tree back to source text
//!
//! Every node prints as its captured prefix followed by its own content.
//! Punctuation that the tree does not store (`--`, `=`, `:`, `@`, brackets,
//! commas, quote delimiters) is re-derived from the node shape, so edited
//! nodes print with correct punctuation while untouched nodes reproduce the
//! source byte for byte.

use crate::tree::{
    self, Argument, ArgumentContent, CommandForm, Document, ExecForm, Flag, HealthcheckBody,
    Heredoc, Instruction, KeyValuePair, Literal, PathList, Port, Space, Stage, TransferForm,
};

/// Print a document to source text
pub fn print_document(document: &Document) -> String {
    let mut printer = Printer::new();
    printer.document(document);
    printer.finish()
}

/// Print a single instruction, prefix included
pub fn print_instruction(instruction: &Instruction) -> String {
    let mut printer = Printer::new();
    printer.instruction(instruction);
    printer.finish()
}

/// Print an argument, prefix included
pub fn print_argument(argument: &Argument) -> String {
    let mut printer = Printer::new();
    printer.argument(argument);
    printer.finish()
}

/// Buffered tree printer
pub struct Printer {
    buffer: String,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(4096),
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    fn token(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn space(&mut self, space: &Space) {
        for comment in &space.comments {
            self.buffer.push_str(&comment.prefix);
            self.buffer.push_str(&comment.text);
        }
        self.buffer.push_str(&space.whitespace);
    }

    pub fn document(&mut self, document: &Document) {
        self.space(&document.prefix);
        for arg in &document.global_args {
            self.head(&arg.prefix, &arg.keyword);
            self.pairs(&arg.pairs);
        }
        for stage in &document.stages {
            self.stage(stage);
        }
        self.space(&document.eof);
    }

    pub fn stage(&mut self, stage: &Stage) {
        self.space(&stage.prefix);
        self.head(&stage.from.prefix, &stage.from.keyword);
        self.from(&stage.from);
        for instruction in &stage.instructions {
            self.instruction(instruction);
        }
    }

    pub fn instruction(&mut self, instruction: &Instruction) {
        self.head(instruction.prefix(), instruction.keyword());

        match instruction {
            Instruction::From(from) => self.from(from),
            Instruction::Run(run) => {
                self.flags(&run.flags);
                self.command(&run.command);
            }
            Instruction::Cmd(cmd) => self.command(&cmd.command),
            Instruction::Entrypoint(entrypoint) => self.command(&entrypoint.command),
            Instruction::Shell(shell) => self.command(&shell.command),
            Instruction::Copy(copy) => {
                self.flags(&copy.flags);
                self.transfer_form(&copy.form);
            }
            Instruction::Add(add) => {
                self.flags(&add.flags);
                self.transfer_form(&add.form);
            }
            Instruction::Arg(arg) => self.pairs(&arg.pairs),
            Instruction::Env(env) => self.pairs(&env.pairs),
            Instruction::Label(label) => self.pairs(&label.pairs),
            Instruction::Expose(expose) => {
                for port in &expose.ports {
                    self.port(port);
                }
            }
            Instruction::Volume(volume) => match &volume.paths {
                PathList::Plain { paths } => {
                    for path in paths {
                        self.argument(path);
                    }
                }
                PathList::Exec(exec) => self.exec_form(exec),
            },
            Instruction::Workdir(workdir) => self.argument(&workdir.path),
            Instruction::User(user) => {
                self.argument(&user.user);
                if let Some(group) = &user.group {
                    self.token(":");
                    self.argument(group);
                }
            }
            Instruction::StopSignal(signal) => self.argument(&signal.signal),
            Instruction::OnBuild(onbuild) => self.instruction(&onbuild.instruction),
            Instruction::Healthcheck(healthcheck) => {
                self.flags(&healthcheck.flags);
                match &healthcheck.body {
                    Some(HealthcheckBody::Cmd(cmd)) => {
                        self.head(&cmd.prefix, &cmd.keyword);
                        self.command(&cmd.command);
                    }
                    Some(HealthcheckBody::Disabled { prefix, keyword }) => {
                        self.space(prefix);
                        self.token(keyword);
                    }
                    None => {}
                }
            }
            Instruction::Maintainer(maintainer) => self.argument(&maintainer.name),
        }
    }

    fn head(&mut self, prefix: &Space, keyword: &str) {
        self.space(prefix);
        self.token(keyword);
    }

    fn from(&mut self, from: &tree::From) {
        self.flags(&from.flags);
        self.argument(&from.image);
        if let Some(digest) = &from.digest {
            self.token("@");
            self.argument(digest);
        } else if let Some(tag) = &from.tag {
            self.token(":");
            self.argument(tag);
        }
        if let Some(alias) = &from.alias {
            self.head(&alias.prefix, &alias.keyword);
            self.argument(&alias.name);
        }
    }

    fn flags(&mut self, flags: &[Flag]) {
        for flag in flags {
            self.space(&flag.prefix);
            self.token("--");
            self.token(&flag.name);
            if let Some(value) = &flag.value {
                self.token("=");
                self.argument(value);
            }
        }
    }

    fn pairs(&mut self, pairs: &[KeyValuePair]) {
        for pair in pairs {
            self.space(&pair.prefix);
            self.argument(&pair.key);
            if pair.equals {
                self.token("=");
            }
            if let Some(value) = &pair.value {
                self.argument(value);
            }
        }
    }

    fn port(&mut self, port: &Port) {
        self.space(&port.prefix);
        self.token(&port.text);
    }

    fn command(&mut self, command: &CommandForm) {
        match command {
            CommandForm::Shell(shell) => {
                self.space(&shell.prefix);
                self.token(&shell.text);
            }
            CommandForm::Exec(exec) => self.exec_form(exec),
            CommandForm::Heredoc(heredoc) => self.heredoc(heredoc),
        }
    }

    fn transfer_form(&mut self, form: &TransferForm) {
        match form {
            TransferForm::Paths { paths } => {
                for path in paths {
                    self.argument(path);
                }
            }
            TransferForm::Exec(exec) => self.exec_form(exec),
            TransferForm::Heredoc(heredoc) => self.heredoc(heredoc),
        }
    }

    fn exec_form(&mut self, exec: &ExecForm) {
        self.space(&exec.prefix);
        self.token("[");
        for (index, element) in exec.elements.iter().enumerate() {
            if index > 0 {
                self.space(&element.delimiter);
                self.token(",");
            }
            self.literal(&element.literal);
        }
        self.space(&exec.closing);
        self.token("]");
    }

    fn heredoc(&mut self, heredoc: &Heredoc) {
        self.space(&heredoc.prefix);
        self.token(&heredoc.opening);
        for other in &heredoc.additional {
            self.space(&other.prefix);
            self.token(&other.opening);
        }
        if let Some(destination) = &heredoc.destination {
            self.argument(destination);
        }
        self.space(&heredoc.line_break);
        for line in &heredoc.lines {
            self.token(line);
        }
        self.token(&heredoc.closing);
        for other in &heredoc.additional {
            self.space(&other.line_break);
            for line in &other.lines {
                self.token(line);
            }
            self.token(&other.closing);
        }
    }

    pub fn argument(&mut self, argument: &Argument) {
        self.space(&argument.prefix);
        for content in &argument.contents {
            match content {
                ArgumentContent::Literal(literal) => self.literal(literal),
                ArgumentContent::EnvironmentVariable(variable) => {
                    self.space(&variable.prefix);
                    if variable.braced {
                        self.token("${");
                        self.token(&variable.name);
                        self.token("}");
                    } else {
                        self.token("$");
                        self.token(&variable.name);
                    }
                }
            }
        }
    }

    fn literal(&mut self, literal: &Literal) {
        self.space(&literal.prefix);
        match literal.quote {
            Some(style) => {
                self.buffer.push(style.delimiter());
                self.buffer.push_str(&literal.text);
                self.buffer.push(style.delimiter());
            }
            None => self.token(&literal.text),
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}
