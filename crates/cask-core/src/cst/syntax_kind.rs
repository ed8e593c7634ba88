//! Syntax kind enumeration for the build-script CST
//!
//! This module defines all possible node and token types in the syntax tree.

use std::fmt;

/// Syntax kind for build-script elements
///
/// This enum represents all possible types of nodes and tokens in the CST.
/// It includes:
/// - Trivia (whitespace, comments, line continuations)
/// - Content tokens (words, quoted strings, variables, punctuation)
/// - Heredoc tokens
/// - Structural nodes (document, stages, instructions, arguments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum DockerSyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces, tabs and byte-order marks
    Whitespace = 0,
    /// `\n`, `\r\n` or a lone `\r`
    Newline = 1,
    /// `#` up to the end of the line
    Comment = 2,
    /// Escape character, optional blanks and a line break
    LineContinuation = 3,

    // ==================
    // Tokens (10-99)
    // ==================
    /// Unquoted text
    Word = 10,
    /// Instruction keyword at the start of a logical line
    Keyword = 11,
    /// `"..."`
    DoubleQuoted = 12,
    /// `'...'`
    SingleQuoted = 13,
    /// `$NAME`
    Variable = 14,
    /// `${NAME}`
    BracedVariable = 15,
    /// `[`
    LBracket = 16,
    /// `]`
    RBracket = 17,
    /// `,`
    Comma = 18,
    /// `=`
    Equals = 19,
    /// `<<EOF`, `<<-EOF`, `<<"EOF"`
    HeredocMarker = 20,
    /// One raw heredoc body line, terminator included
    HeredocLine = 21,
    /// Heredoc terminator line, line break excluded
    HeredocEnd = 22,
    /// `--name` of a flag
    FlagName = 23,

    /// Unrecognised or unterminated input
    Error = 90,
    /// End of input
    Eof = 99,

    // ==================
    // Nodes (100+)
    // ==================
    Document = 100,
    Stage = 101,

    From = 110,
    Run = 111,
    Cmd = 112,
    Entrypoint = 113,
    Copy = 114,
    Add = 115,
    Arg = 116,
    Env = 117,
    Label = 118,
    Expose = 119,
    Volume = 120,
    Shell = 121,
    Workdir = 122,
    User = 123,
    StopSignal = 124,
    OnBuild = 125,
    Healthcheck = 126,
    Maintainer = 127,

    Flag = 130,
    Argument = 131,
    JsonArray = 133,
    ShellForm = 134,
    Heredoc = 135,
    KeyValue = 136,
    Port = 137,
    StageAlias = 138,
    HealthcheckNone = 139,
}

impl DockerSyntaxKind {
    /// Check if this is a trivia kind (whitespace, comments, newlines, continuations)
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::Comment | Self::LineContinuation
        )
    }

    /// Check if this is a structural node
    pub const fn is_node(self) -> bool {
        (self as u16) >= 100
    }

    /// Check if this is an instruction node
    pub const fn is_instruction(self) -> bool {
        (self as u16) >= 110 && (self as u16) < 130
    }

    /// Map an instruction keyword (any casing) to its node kind
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text.to_ascii_uppercase().as_str() {
            "FROM" => Self::From,
            "RUN" => Self::Run,
            "CMD" => Self::Cmd,
            "ENTRYPOINT" => Self::Entrypoint,
            "COPY" => Self::Copy,
            "ADD" => Self::Add,
            "ARG" => Self::Arg,
            "ENV" => Self::Env,
            "LABEL" => Self::Label,
            "EXPOSE" => Self::Expose,
            "VOLUME" => Self::Volume,
            "SHELL" => Self::Shell,
            "WORKDIR" => Self::Workdir,
            "USER" => Self::User,
            "STOPSIGNAL" => Self::StopSignal,
            "ONBUILD" => Self::OnBuild,
            "HEALTHCHECK" => Self::Healthcheck,
            "MAINTAINER" => Self::Maintainer,
            _ => return None,
        };
        Some(kind)
    }

    /// Instructions that accept `--name[=value]` flags
    pub const fn takes_flags(self) -> bool {
        matches!(
            self,
            Self::From | Self::Run | Self::Copy | Self::Add | Self::Healthcheck
        )
    }
}

impl fmt::Display for DockerSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<DockerSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: DockerSyntaxKind) -> Self {
        Self(kind as u16)
    }
}
