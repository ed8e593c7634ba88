//! Token classification
//!
//! Decides what a content token means to the typed model and strips one
//! layer of decoration (quotes, `$`, `${ }`). Surrounding space is left to
//! the cursor.

use crate::cst::DockerSyntaxKind;
use crate::tree::QuoteStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass<'a> {
    PlainText(&'a str),
    QuotedString { value: &'a str, style: QuoteStyle },
    EnvironmentVariable { name: &'a str, braced: bool },
    Comment(&'a str),
}

pub fn classify(kind: DockerSyntaxKind, text: &str) -> TokenClass<'_> {
    match kind {
        DockerSyntaxKind::DoubleQuoted => unquote(text, QuoteStyle::Double),
        DockerSyntaxKind::SingleQuoted => unquote(text, QuoteStyle::Single),
        DockerSyntaxKind::Variable => match text.strip_prefix('$') {
            Some(name) => TokenClass::EnvironmentVariable {
                name,
                braced: false,
            },
            None => TokenClass::PlainText(text),
        },
        DockerSyntaxKind::BracedVariable => match text
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(name) => TokenClass::EnvironmentVariable { name, braced: true },
            None => TokenClass::PlainText(text),
        },
        DockerSyntaxKind::Comment => TokenClass::Comment(text),
        _ => TokenClass::PlainText(text),
    }
}

fn unquote(text: &str, style: QuoteStyle) -> TokenClass<'_> {
    let delimiter = style.delimiter();
    match text
        .strip_prefix(delimiter)
        .and_then(|rest| rest.strip_suffix(delimiter))
    {
        Some(value) => TokenClass::QuotedString { value, style },
        None => TokenClass::PlainText(text),
    }
}
