//! Instruction nodes
//!
//! Every instruction keeps its keyword exactly as written (`from` vs `FROM`)
//! and the space that precedes it.

use serde::{Deserialize, Serialize};

use super::{
    Argument, ArgumentContent, CommandForm, ExecForm, Heredoc, Id, Literal, Markers, Port, Space,
};

/// A closed union over every supported instruction keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Instruction {
    From(From),
    Run(Run),
    Cmd(Cmd),
    Entrypoint(Entrypoint),
    Copy(Copy),
    Add(Add),
    Arg(Arg),
    Env(Env),
    Label(Label),
    Expose(Expose),
    Volume(Volume),
    Shell(Shell),
    Workdir(Workdir),
    User(User),
    StopSignal(StopSignal),
    OnBuild(OnBuild),
    Healthcheck(Healthcheck),
    Maintainer(Maintainer),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Instruction::From($inner) => $body,
            Instruction::Run($inner) => $body,
            Instruction::Cmd($inner) => $body,
            Instruction::Entrypoint($inner) => $body,
            Instruction::Copy($inner) => $body,
            Instruction::Add($inner) => $body,
            Instruction::Arg($inner) => $body,
            Instruction::Env($inner) => $body,
            Instruction::Label($inner) => $body,
            Instruction::Expose($inner) => $body,
            Instruction::Volume($inner) => $body,
            Instruction::Shell($inner) => $body,
            Instruction::Workdir($inner) => $body,
            Instruction::User($inner) => $body,
            Instruction::StopSignal($inner) => $body,
            Instruction::OnBuild($inner) => $body,
            Instruction::Healthcheck($inner) => $body,
            Instruction::Maintainer($inner) => $body,
        }
    };
}

impl Instruction {
    pub fn id(&self) -> Id {
        dispatch!(self, inner => inner.id)
    }

    pub fn prefix(&self) -> &Space {
        dispatch!(self, inner => &inner.prefix)
    }

    pub fn markers(&self) -> &Markers {
        dispatch!(self, inner => &inner.markers)
    }

    /// Keyword as written in the source
    pub fn keyword(&self) -> &str {
        dispatch!(self, inner => &inner.keyword)
    }

    /// Canonical upper-case keyword
    pub fn name(&self) -> &'static str {
        match self {
            Self::From(_) => "FROM",
            Self::Run(_) => "RUN",
            Self::Cmd(_) => "CMD",
            Self::Entrypoint(_) => "ENTRYPOINT",
            Self::Copy(_) => "COPY",
            Self::Add(_) => "ADD",
            Self::Arg(_) => "ARG",
            Self::Env(_) => "ENV",
            Self::Label(_) => "LABEL",
            Self::Expose(_) => "EXPOSE",
            Self::Volume(_) => "VOLUME",
            Self::Shell(_) => "SHELL",
            Self::Workdir(_) => "WORKDIR",
            Self::User(_) => "USER",
            Self::StopSignal(_) => "STOPSIGNAL",
            Self::OnBuild(_) => "ONBUILD",
            Self::Healthcheck(_) => "HEALTHCHECK",
            Self::Maintainer(_) => "MAINTAINER",
        }
    }

    pub fn with_prefix(mut self, prefix: Space) -> Self {
        dispatch!(&mut self, inner => inner.prefix = prefix);
        self
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        dispatch!(&mut self, inner => inner.markers = markers);
        self
    }
}

/// `--name[=value]`
///
/// `value` is `None` for a bare flag and an empty argument for `--name=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    /// Name without the leading dashes
    pub name: String,
    pub value: Option<Argument>,
}

impl Flag {
    pub fn new(name: impl Into<String>, value: Option<Argument>) -> Self {
        Self {
            id: Id::random(),
            prefix: Space::build(" "),
            markers: Markers::EMPTY,
            name: name.into(),
            value,
        }
    }
}

/// Look up a flag by name
pub fn find_flag<'a>(flags: &'a [Flag], name: &str) -> Option<&'a Flag> {
    flags.iter().find(|flag| flag.name == name)
}

/// `NAME`, `NAME=value` or the legacy `NAME value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub key: Argument,
    pub equals: bool,
    pub value: Option<Argument>,
}

impl KeyValuePair {
    /// `key=value` with a single leading space
    pub fn new(key: impl Into<String>, value: Argument) -> Self {
        Self {
            id: Id::random(),
            prefix: Space::build(" "),
            markers: Markers::EMPTY,
            key: Argument::text(key),
            equals: true,
            value: Some(value),
        }
    }
}

/// `AS name` of a FROM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageAlias {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub name: Argument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct From {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub flags: Vec<Flag>,
    pub image: Argument,
    pub tag: Option<Argument>,
    pub digest: Option<Argument>,
    pub alias: Option<StageAlias>,
}

impl From {
    /// Replace the reference with `image:tag`, dropping any digest
    ///
    /// A quoted reference is edited inside its quotes.
    pub fn with_tag(&self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if let Some(literal) = self.quoted_image() {
            return self.with_quoted_reference(literal, ':', &tag);
        }
        Self {
            tag: Some(Argument::text(tag)),
            digest: None,
            ..self.clone()
        }
    }

    /// Replace the reference with `image@digest`, dropping any tag
    ///
    /// A quoted reference is edited inside its quotes.
    pub fn with_digest(&self, digest: impl Into<String>) -> Self {
        let digest = digest.into();
        if let Some(literal) = self.quoted_image() {
            return self.with_quoted_reference(literal, '@', &digest);
        }
        Self {
            tag: None,
            digest: Some(Argument::text(digest)),
            ..self.clone()
        }
    }

    /// The image when it is written as a single quoted literal, which the
    /// builders never split
    fn quoted_image(&self) -> Option<&Literal> {
        match self.image.contents.as_slice() {
            [ArgumentContent::Literal(literal)] if literal.is_quoted() => Some(literal),
            _ => None,
        }
    }

    fn with_quoted_reference(&self, literal: &Literal, separator: char, value: &str) -> Self {
        let text = literal.text.as_str();
        let name = text
            .find('@')
            .or_else(|| text.find(':'))
            .map_or(text, |index| &text[..index]);
        let literal = Literal {
            text: format!("{name}{separator}{value}"),
            ..literal.clone()
        };
        Self {
            image: Argument {
                contents: vec![ArgumentContent::Literal(literal)],
                ..self.image.clone()
            },
            tag: None,
            digest: None,
            ..self.clone()
        }
    }

    pub fn with_image(&self, image: impl Into<String>) -> Self {
        Self {
            image: Argument::text(image),
            ..self.clone()
        }
    }

    pub fn platform(&self) -> Option<&Argument> {
        find_flag(&self.flags, "platform").and_then(|flag| flag.value.as_ref())
    }

    /// Alias text, when the stage is named
    pub fn alias_name(&self) -> Option<String> {
        self.alias.as_ref().map(|alias| alias.name.value())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub flags: Vec<Flag>,
    pub command: CommandForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cmd {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub command: CommandForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrypoint {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub command: CommandForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub command: CommandForm,
}

/// Sources and destination of COPY/ADD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form")]
pub enum TransferForm {
    Paths { paths: Vec<Argument> },
    Exec(ExecForm),
    Heredoc(Heredoc),
}

impl TransferForm {
    /// Last path of a path list or exec array; the inline destination of a heredoc
    pub fn destination(&self) -> Option<String> {
        match self {
            Self::Paths { paths } => paths.last().map(Argument::value),
            Self::Exec(exec) => exec.values().last().map(|value| value.to_string()),
            Self::Heredoc(heredoc) => heredoc.destination.as_ref().map(Argument::value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Copy {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub flags: Vec<Flag>,
    pub form: TransferForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Add {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub flags: Vec<Flag>,
    pub form: TransferForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub pairs: Vec<KeyValuePair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Env {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub pairs: Vec<KeyValuePair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub pairs: Vec<KeyValuePair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expose {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub ports: Vec<Port>,
}

/// Paths of a VOLUME
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form")]
pub enum PathList {
    Plain { paths: Vec<Argument> },
    Exec(ExecForm),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub paths: PathList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workdir {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub path: Argument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub user: Argument,
    pub group: Option<Argument>,
}

impl User {
    pub fn with_group(&self, group: impl Into<String>) -> Self {
        Self {
            group: Some(Argument::text(group)),
            ..self.clone()
        }
    }

    pub fn without_group(&self) -> Self {
        Self {
            group: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSignal {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub signal: Argument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnBuild {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub instruction: Box<Instruction>,
}

/// What follows HEALTHCHECK's flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "body")]
pub enum HealthcheckBody {
    Cmd(Cmd),
    /// `NONE`, with the space before it
    Disabled { prefix: Space, keyword: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Healthcheck {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub flags: Vec<Flag>,
    pub body: Option<HealthcheckBody>,
}

impl Healthcheck {
    pub fn is_disabled(&self) -> bool {
        matches!(self.body, Some(HealthcheckBody::Disabled { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintainer {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub keyword: String,
    pub name: Argument,
}
