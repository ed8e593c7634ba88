//! Whitespace and comments preceding a syntactic element

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Markers;

/// Leading whitespace and comments of a node
///
/// A `Space` is an ordered list of comments, each with the whitespace that
/// precedes it, followed by the trailing whitespace before the node itself.
/// Printing a `Space` reproduces the captured source text exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub comments: Vec<Comment>,
    pub whitespace: String,
}

/// A `#` comment, delimiter included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub prefix: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Markers::is_empty")]
    pub markers: Markers,
}

impl Space {
    pub const EMPTY: Space = Space {
        comments: Vec::new(),
        whitespace: String::new(),
    };

    /// Space made of whitespace only
    pub fn build(whitespace: impl Into<String>) -> Self {
        Self {
            comments: Vec::new(),
            whitespace: whitespace.into(),
        }
    }

    /// Split raw inter-token text into comments and whitespace
    ///
    /// Every `#` starts a comment that runs to the end of its line; the line
    /// break belongs to the text that follows.
    pub fn format(text: &str) -> Self {
        if text.is_empty() {
            return Self::EMPTY;
        }

        let mut comments = Vec::new();
        let mut rest = text;
        while let Some(start) = rest.find('#') {
            let end = rest[start..]
                .find(['\n', '\r'])
                .map_or(rest.len(), |offset| start + offset);
            comments.push(Comment {
                prefix: rest[..start].to_string(),
                text: rest[start..end].to_string(),
                markers: Markers::EMPTY,
            });
            rest = &rest[end..];
        }

        Self {
            comments,
            whitespace: rest.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.whitespace.is_empty()
    }

    /// Whitespace after the last line break, if the space spans lines
    pub fn indent(&self) -> &str {
        match self.whitespace.rfind('\n') {
            Some(index) => &self.whitespace[index + 1..],
            None => &self.whitespace,
        }
    }

    pub fn with_whitespace(mut self, whitespace: impl Into<String>) -> Self {
        self.whitespace = whitespace.into();
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }
}

impl Comment {
    pub fn new(prefix: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            text: text.into(),
            markers: Markers::EMPTY,
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comment in &self.comments {
            write!(f, "{}{}", comment.prefix, comment.text)?;
        }
        f.write_str(&self.whitespace)
    }
}
