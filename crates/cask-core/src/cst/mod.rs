//! Concrete Syntax Tree (CST) for build scripts
//!
//! This module implements the grammar front-end: a trivia-preserving lexer
//! and a hierarchical parser that produce a lossless Rowan tree. The tree is
//! the input of the typed-model builders in [`crate::build`].
//!
//! ## Architecture
//!
//! - **Lexer** (`lex_with_trivia`): every byte lands in a token. Whitespace,
//!   line breaks, comments and line continuations are trivia tokens.
//! - **Parser** (`parse_dockerfile`): groups tokens into rule contexts
//!   (`Stage`, one node per instruction, `Flag`, `Argument`, `JsonArray`,
//!   `ShellForm`, `Heredoc`, ...).
//!
//! This enables lossless representation: `cst.text() == source`
//!
//! ## Example
//!
//! ```rust,ignore
//! use cask_core::cst::{DockerSyntaxKind, parse_dockerfile};
//!
//! let (cst, _lexer_errors, errors) = parse_dockerfile("FROM alpine # base\n", '\\');
//! assert!(errors.is_empty());
//!
//! for element in cst.descendants_with_tokens() {
//!     if let Some(token) = element.as_token() {
//!         if token.kind() == DockerSyntaxKind::Comment {
//!             println!("Found comment: {}", token.text());
//!         }
//!     }
//! }
//! ```

mod builder;
mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub use builder::CstBuilder;
pub use language::DockerLanguage;
pub use lexer::{CstLexResult, CstSpan, CstToken, DEFAULT_ESCAPE, LexerError, lex_with_trivia};
pub use nodes::*;
pub use parser::{SyntaxError, parse_dockerfile};
pub use syntax_kind::DockerSyntaxKind;
