//! Arguments and their content elements

use serde::{Deserialize, Serialize};

use super::{Id, Markers, Space};

/// Quote delimiter of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    Double,
}

impl QuoteStyle {
    pub const fn delimiter(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }
}

/// Literal text, optionally quoted
///
/// `text` excludes the quote delimiters; escapes inside quotes are kept as
/// written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub text: String,
    pub quote: Option<QuoteStyle>,
}

impl Literal {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            text: text.into(),
            quote: None,
        }
    }

    /// Quoted literal; `text` is stored as written between the quotes
    pub fn quoted(text: impl Into<String>, style: QuoteStyle) -> Self {
        Self {
            quote: Some(style),
            ..Self::plain(text)
        }
    }

    /// Quoted literal holding `value`, with `\` and `"` escaped inside
    /// double quotes
    ///
    /// Single quotes have no escapes, so the value is stored unchanged.
    pub fn quoted_escaped(value: &str, style: QuoteStyle) -> Self {
        let text = match style {
            QuoteStyle::Double => escape_double_quoted(value),
            QuoteStyle::Single => value.to_string(),
        };
        Self::quoted(text, style)
    }

    pub fn with_prefix(mut self, prefix: Space) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }
}

fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `$NAME` or `${NAME}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    /// Everything between the decoration, modifiers such as `:-default` included
    pub name: String,
    pub braced: bool,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, braced: bool) -> Self {
        Self {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            name: name.into(),
            braced,
        }
    }
}

/// One element of an [`Argument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArgumentContent {
    Literal(Literal),
    EnvironmentVariable(EnvironmentVariable),
}

impl ArgumentContent {
    pub fn prefix(&self) -> &Space {
        match self {
            Self::Literal(literal) => &literal.prefix,
            Self::EnvironmentVariable(variable) => &variable.prefix,
        }
    }

    pub fn id(&self) -> Id {
        match self {
            Self::Literal(literal) => literal.id,
            Self::EnvironmentVariable(variable) => variable.id,
        }
    }
}

impl From<Literal> for ArgumentContent {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<EnvironmentVariable> for ArgumentContent {
    fn from(variable: EnvironmentVariable) -> Self {
        Self::EnvironmentVariable(variable)
    }
}

/// An ordered sequence of literals and variable references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub id: Id,
    pub prefix: Space,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
    pub contents: Vec<ArgumentContent>,
}

impl Argument {
    pub fn new(contents: Vec<ArgumentContent>) -> Self {
        Self {
            id: Id::random(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            contents,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Argument holding one plain literal
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Literal::plain(text).into()])
    }

    /// Argument holding one quoted literal
    pub fn quoted(text: impl Into<String>, style: QuoteStyle) -> Self {
        Self::new(vec![Literal::quoted(text, style).into()])
    }

    pub fn with_prefix(mut self, prefix: Space) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Semantic value: literal text without quotes, variables as written
    ///
    /// Interior spaces and comments are dropped; use the printer for the
    /// exact source text.
    pub fn value(&self) -> String {
        let mut value = String::new();
        for content in &self.contents {
            if !content.prefix().whitespace.is_empty() && !value.is_empty() {
                value.push(' ');
            }
            match content {
                ArgumentContent::Literal(literal) => value.push_str(&literal.text),
                ArgumentContent::EnvironmentVariable(variable) if variable.braced => {
                    value.push_str("${");
                    value.push_str(&variable.name);
                    value.push('}');
                }
                ArgumentContent::EnvironmentVariable(variable) => {
                    value.push('$');
                    value.push_str(&variable.name);
                }
            }
        }
        value
    }

    /// Whether any element is a variable reference
    pub fn has_variables(&self) -> bool {
        self.contents
            .iter()
            .any(|content| matches!(content, ArgumentContent::EnvironmentVariable(_)))
    }
}
