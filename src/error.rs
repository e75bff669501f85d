use std::{fmt, sync::Arc};

use crate::token::TokenType;

pub type PugResult<T> = std::result::Result<T, ParseError>;

/// Stable, searchable identifier for each kind of parse failure.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnexpectedToken,
    DuplicateId,
    DuplicateAttribute,
    BlockOutsideMixin,
    BlockInBufferedCode,
    MalformedVerbatimToken,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnexpectedToken => "UNEXPECTED_TOKEN",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::DuplicateAttribute => "DUPLICATE_ATTRIBUTE",
            Self::BlockOutsideMixin => "BLOCK_OUTSIDE_MIXIN",
            Self::BlockInBufferedCode => "BLOCK_IN_BUFFERED_CODE",
            Self::MalformedVerbatimToken => "MALFORMED_VERBATIM_TOKEN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected token `{found}`{}", expected_suffix(.expected))]
    UnexpectedToken {
        found: TokenType,
        expected: Vec<TokenType>,
    },
    #[error("duplicate attribute \"id\" is not allowed")]
    DuplicateIdentifier,
    #[error("duplicate attribute \"{name}\" is not allowed")]
    DuplicateAttribute { name: String },
    #[error("anonymous blocks are not allowed unless they are part of a mixin")]
    BlockOutsideMixin,
    #[error("buffered code cannot have a block attached to it")]
    CodeBlockOnBufferedExpression,
    #[error("unexpected token `{found}` inside a verbatim text block")]
    MalformedVerbatimToken { found: TokenType },
}

impl ParseErrorKind {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedToken { .. } => ErrorCode::UnexpectedToken,
            Self::DuplicateIdentifier => ErrorCode::DuplicateId,
            Self::DuplicateAttribute { .. } => ErrorCode::DuplicateAttribute,
            Self::BlockOutsideMixin => ErrorCode::BlockOutsideMixin,
            Self::CodeBlockOnBufferedExpression => ErrorCode::BlockInBufferedCode,
            Self::MalformedVerbatimToken { .. } => ErrorCode::MalformedVerbatimToken,
        }
    }

    pub fn unexpected(found: TokenType, expected: &[TokenType]) -> Self {
        Self::UnexpectedToken {
            found,
            expected: expected.to_vec(),
        }
    }
}

/// Renders `expected` as ", expected `a`, `b` or `c`".
fn expected_suffix(expected: &[TokenType]) -> String {
    let mut names = expected.iter().map(|ty| format!("`{ty}`"));
    let Some(first) = names.next() else {
        return String::new();
    };
    let mut rest: Vec<String> = names.collect();
    let Some(last) = rest.pop() else {
        return format!(", expected {first}");
    };
    rest.insert(0, first);
    format!(", expected {} or {last}", rest.join(", "))
}

/// A fatal parse failure, located at the offending token.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{}: {kind}", location_prefix(.filename.as_deref(), .line, .column))]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub filename: Option<Arc<str>>,
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub const fn code(&self) -> ErrorCode {
        self.kind.code()
    }
}

fn location_prefix(filename: Option<&str>, line: &usize, column: &usize) -> String {
    match filename {
        Some(filename) => format!("{filename}:{line}:{column}"),
        None => format!("line {line}, column {column}"),
    }
}
