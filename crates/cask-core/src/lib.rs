//! Cask Core
//!
//! Lossless parser and printer for Dockerfile-style build scripts.
//! Source text is lexed and parsed into a Rowan concrete syntax tree, then
//! converted into a typed tree whose nodes carry the exact whitespace and
//! comments that precede them. Printing an unmodified tree reproduces the
//! source byte for byte; printing an edited tree changes only the edit.
//!
//! ```rust,ignore
//! let document = cask_core::parse("FROM alpine:3.18 AS base\nRUN apk add curl\n")?;
//! let stage = &document.stages()[0];
//! let edited = document.with_stage(0, stage.with_from(stage.from.with_tag("3.19")));
//! assert_eq!(edited.print(), "FROM alpine:3.19 AS base\nRUN apk add curl\n");
//! ```

pub mod build;
pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod directives;
pub mod error;
pub mod parser;
pub mod printer;
pub mod result;
pub mod round_trip;
pub mod tree;

// Re-export commonly used types
pub use config::{CaskConfig, ConfigLoader, FilesConfiguration, ParserConfiguration};
pub use directives::Directives;
pub use error::{CaskError, ErrorKind};
pub use parser::{
    DockerfileParser, ParseError, ParseErrorKind, ParseResult, Parser, ParserConfig, parse, print,
};
pub use printer::{Printer, print_argument, print_document, print_instruction};
pub use result::{Result, ResultExt};
pub use round_trip::{Mismatch, RoundTripValidator, ValidationResult};
pub use tree::{Document, Instruction, Stage};

/// Initialize the tracing subscriber for logging
///
/// `RUST_LOG` takes precedence over `default_directive`. Output goes to
/// stderr so printed build scripts on stdout stay clean.
pub fn init_tracing(default_directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
