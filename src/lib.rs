//! Parser for Pug templates.
//!
//! Turns the token stream produced by a Pug lexer into an [`ast::Block`].
//! Nothing is resolved or rendered here: include paths, expressions and
//! attribute values are kept exactly as the lexer produced them.

pub mod ast;
pub mod token;

mod cursor;
mod diagnostics;
mod error;
mod options;
mod parser;

// Public exports.
pub use diagnostics::{CollectingSink, DiagnosticSink, LogSink, Warning, WarningKind};
pub use error::{ErrorCode, ParseError, ParseErrorKind, PugResult};
pub use options::ParserOptions;
pub use parser::{Parser, parse, parse_with};
