//! Tokens produced by the lexer and consumed by the parser.
//!
//! The parser never looks at source text. Every token already carries the
//! line and column it was lexed from, and any payload the grammar needs
//! (tag names, expressions, attribute values, ...).

use std::fmt;

use crate::ast::BlockMode;

/// A single lexical token.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Source line (1-indexed).
    pub line: usize,
    /// Source column (1-indexed).
    pub column: usize,
}

impl Token {
    pub const fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    /// The payload-free discriminant of this token.
    pub const fn ty(&self) -> TokenType {
        self.kind.ty()
    }
}

/// Every token kind the lexer can emit, together with its payload.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An element name, `div`.
    Tag { val: String },
    /// A mixin header, `mixin list(items)`.
    Mixin { val: String, args: Option<String> },
    /// The `block` keyword on its own inside a mixin body.
    MixinBlock,
    /// A named block header, `block content` / `append scripts`.
    Block { val: String, mode: BlockMode },
    Case { val: String },
    When { val: String },
    Default,
    Extends,
    Include,
    /// A filter name, `:markdown`.
    Filter { val: String },
    /// The doctype value; empty for a bare `doctype`.
    Doctype { val: String },
    /// A `//` comment; `buffer` is false for `//-`.
    Comment { val: String, buffer: bool },
    Text { val: String },
    /// `#{expr}` or `!{expr}` inside text.
    InterpolatedCode {
        val: String,
        buffer: bool,
        must_escape: bool,
    },
    /// Opens `#[...]`.
    StartInterpolation,
    /// Closes `#[...]`.
    EndInterpolation,
    /// A line of literal HTML, `<div>`.
    TextHtml { val: String },
    /// A trailing `.` introducing a verbatim text block.
    Dot,
    /// `each val, key in obj`.
    Each {
        val: String,
        key: Option<String>,
        obj: String,
    },
    /// `- expr`, `= expr` or `!= expr`.
    Code {
        val: String,
        buffer: bool,
        must_escape: bool,
    },
    /// A bare `-` introducing a verbatim code block.
    BlockCode,
    If { val: String },
    ElseIf { val: String },
    Else,
    While { val: String },
    /// A mixin call, `+list(items)`.
    Call { val: String, args: Option<String> },
    /// `#{expr}` in tag position.
    Interpolation { val: String },
    Yield,
    /// `#foo` shorthand.
    Id { val: String },
    /// `.foo` shorthand.
    Class { val: String },
    StartAttributes,
    EndAttributes,
    Attribute {
        name: String,
        val: String,
        must_escape: bool,
    },
    /// `&attributes(expr)`.
    AndAttributes { val: String },
    StartPipelessText,
    EndPipelessText,
    Indent,
    Outdent,
    Newline,
    /// A trailing `/` marking a self-closing tag.
    Slash,
    Colon,
    /// The path operand of `include` / `extends`.
    Path { val: String },
    Eos,
}

impl TokenKind {
    pub const fn ty(&self) -> TokenType {
        match self {
            Self::Tag { .. } => TokenType::Tag,
            Self::Mixin { .. } => TokenType::Mixin,
            Self::MixinBlock => TokenType::MixinBlock,
            Self::Block { .. } => TokenType::Block,
            Self::Case { .. } => TokenType::Case,
            Self::When { .. } => TokenType::When,
            Self::Default => TokenType::Default,
            Self::Extends => TokenType::Extends,
            Self::Include => TokenType::Include,
            Self::Filter { .. } => TokenType::Filter,
            Self::Doctype { .. } => TokenType::Doctype,
            Self::Comment { .. } => TokenType::Comment,
            Self::Text { .. } => TokenType::Text,
            Self::InterpolatedCode { .. } => TokenType::InterpolatedCode,
            Self::StartInterpolation => TokenType::StartInterpolation,
            Self::EndInterpolation => TokenType::EndInterpolation,
            Self::TextHtml { .. } => TokenType::TextHtml,
            Self::Dot => TokenType::Dot,
            Self::Each { .. } => TokenType::Each,
            Self::Code { .. } => TokenType::Code,
            Self::BlockCode => TokenType::BlockCode,
            Self::If { .. } => TokenType::If,
            Self::ElseIf { .. } => TokenType::ElseIf,
            Self::Else => TokenType::Else,
            Self::While { .. } => TokenType::While,
            Self::Call { .. } => TokenType::Call,
            Self::Interpolation { .. } => TokenType::Interpolation,
            Self::Yield => TokenType::Yield,
            Self::Id { .. } => TokenType::Id,
            Self::Class { .. } => TokenType::Class,
            Self::StartAttributes => TokenType::StartAttributes,
            Self::EndAttributes => TokenType::EndAttributes,
            Self::Attribute { .. } => TokenType::Attribute,
            Self::AndAttributes { .. } => TokenType::AndAttributes,
            Self::StartPipelessText => TokenType::StartPipelessText,
            Self::EndPipelessText => TokenType::EndPipelessText,
            Self::Indent => TokenType::Indent,
            Self::Outdent => TokenType::Outdent,
            Self::Newline => TokenType::Newline,
            Self::Slash => TokenType::Slash,
            Self::Colon => TokenType::Colon,
            Self::Path { .. } => TokenType::Path,
            Self::Eos => TokenType::Eos,
        }
    }
}

/// Payload-free token discriminant, used for lookahead and error reporting.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenType {
    Tag,
    Mixin,
    MixinBlock,
    Block,
    Case,
    When,
    Default,
    Extends,
    Include,
    Filter,
    Doctype,
    Comment,
    Text,
    InterpolatedCode,
    StartInterpolation,
    EndInterpolation,
    TextHtml,
    Dot,
    Each,
    Code,
    BlockCode,
    If,
    ElseIf,
    Else,
    While,
    Call,
    Interpolation,
    Yield,
    Id,
    Class,
    StartAttributes,
    EndAttributes,
    Attribute,
    AndAttributes,
    StartPipelessText,
    EndPipelessText,
    Indent,
    Outdent,
    Newline,
    Slash,
    Colon,
    Path,
    Eos,
}

impl TokenType {
    /// The name used for this kind in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Mixin => "mixin",
            Self::MixinBlock => "mixin-block",
            Self::Block => "block",
            Self::Case => "case",
            Self::When => "when",
            Self::Default => "default",
            Self::Extends => "extends",
            Self::Include => "include",
            Self::Filter => "filter",
            Self::Doctype => "doctype",
            Self::Comment => "comment",
            Self::Text => "text",
            Self::InterpolatedCode => "interpolated-code",
            Self::StartInterpolation => "start-interpolation",
            Self::EndInterpolation => "end-interpolation",
            Self::TextHtml => "text-html",
            Self::Dot => "dot",
            Self::Each => "each",
            Self::Code => "code",
            Self::BlockCode => "blockcode",
            Self::If => "if",
            Self::ElseIf => "else-if",
            Self::Else => "else",
            Self::While => "while",
            Self::Call => "call",
            Self::Interpolation => "interpolation",
            Self::Yield => "yield",
            Self::Id => "id",
            Self::Class => "class",
            Self::StartAttributes => "start-attributes",
            Self::EndAttributes => "end-attributes",
            Self::Attribute => "attribute",
            Self::AndAttributes => "&attributes",
            Self::StartPipelessText => "start-pipeless-text",
            Self::EndPipelessText => "end-pipeless-text",
            Self::Indent => "indent",
            Self::Outdent => "outdent",
            Self::Newline => "newline",
            Self::Slash => "slash",
            Self::Colon => ":",
            Self::Path => "path",
            Self::Eos => "eos",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
