//! Command forms: shell text, JSON exec arrays and heredocs

use serde::{Deserialize, Serialize};

use super::{Argument, Id, Literal, Markers, QuoteStyle, Space};

/// How an instruction's command is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form")]
pub enum CommandForm {
    Shell(ShellForm),
    Exec(ExecForm),
    Heredoc(Heredoc),
}

impl CommandForm {
    pub fn prefix(&self) -> &Space {
        match self {
            Self::Shell(shell) => &shell.prefix,
            Self::Exec(exec) => &exec.prefix,
            Self::Heredoc(heredoc) => &heredoc.prefix,
        }
    }
}

/// Opaque shell text, never parsed further
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellForm {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub text: String,
}

impl ShellForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            text: text.into(),
        }
    }

    /// Stand-in for an instruction written without a command
    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn with_prefix(mut self, prefix: Space) -> Self {
        self.prefix = prefix;
        self
    }
}

/// One element of an exec array
///
/// `delimiter` is the space before the comma that precedes this element; it
/// is empty for the first element. The literal's own prefix is the space
/// after `[` or `,`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecArgument {
    pub delimiter: Space,
    pub literal: Literal,
}

/// `["executable", "param"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecForm {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub elements: Vec<ExecArgument>,
    /// Space before `]`
    pub closing: Space,
}

impl ExecForm {
    /// Exec array formatted as `["a", "b"]`
    ///
    /// Values are unescaped strings; quotes and backslashes in them are
    /// escaped so the printed array stays valid JSON.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let elements = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let prefix = if index == 0 {
                    Space::EMPTY
                } else {
                    Space::build(" ")
                };
                ExecArgument {
                    delimiter: Space::EMPTY,
                    literal: Literal::quoted_escaped(value.as_ref(), QuoteStyle::Double)
                        .with_prefix(prefix),
                }
            })
            .collect();

        Self {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            elements,
            closing: Space::EMPTY,
        }
    }

    pub fn with_prefix(mut self, prefix: Space) -> Self {
        self.prefix = prefix;
        self
    }

    /// Element texts as written between the quotes
    pub fn values(&self) -> Vec<&str> {
        self.elements
            .iter()
            .map(|element| element.literal.text.as_str())
            .collect()
    }
}

/// Inline here-document
///
/// `lines` keep their line terminators; `closing` is the terminator line
/// without its line break, empty when the heredoc is unterminated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heredoc {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    /// `<<EOF`, `<<-EOF`, `<<"EOF"`
    pub opening: String,
    pub destination: Option<Argument>,
    /// Everything between the opening line's content and the first body line
    pub line_break: Space,
    pub lines: Vec<String>,
    pub closing: String,
    /// Here-documents opened later on the same line, bodies in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional: Vec<AdditionalHeredoc>,
}

impl Heredoc {
    /// Terminator name, without `-` and quotes
    pub fn name(&self) -> &str {
        heredoc_name(&self.opening)
    }

    /// Body text as the build would see it
    pub fn body(&self) -> String {
        self.lines.concat()
    }

    pub fn is_terminated(&self) -> bool {
        !self.closing.is_empty() && self.additional.iter().all(|other| !other.closing.is_empty())
    }
}

/// A further `<<NAME` on a heredoc's opening line
///
/// `opening` is empty when the marker sits inside the destination text; the
/// body still prints in its place after the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalHeredoc {
    /// Space before the marker on the opening line
    pub prefix: Space,
    pub opening: String,
    /// Line break after the previous terminator
    pub line_break: Space,
    pub lines: Vec<String>,
    pub closing: String,
}

impl AdditionalHeredoc {
    /// Opened but not yet read: no body and no terminator
    pub fn new(prefix: Space, opening: impl Into<String>) -> Self {
        Self {
            prefix,
            opening: opening.into(),
            line_break: Space::EMPTY,
            lines: Vec::new(),
            closing: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        heredoc_name(&self.opening)
    }

    pub fn body(&self) -> String {
        self.lines.concat()
    }
}

fn heredoc_name(opening: &str) -> &str {
    opening
        .trim_start_matches("<<")
        .trim_start_matches('-')
        .trim_matches(|c| c == '"' || c == '\'')
}
