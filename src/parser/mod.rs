//! Recursive-descent parser from tokens to [`Block`].
//!
//! [`Parser::parse_expr`] picks exactly one production from the current
//! token. Productions that open a nested scope go through [`Parser::block`],
//! which in turn dispatches back here until the matching outdent.

use std::sync::Arc;

use crate::{
    ast::{Block, Location, Node},
    cursor::TokenCursor,
    diagnostics::{DiagnosticSink, LogSink, Warning, WarningKind},
    error::{ParseError, ParseErrorKind, PugResult},
    options::ParserOptions,
    token::{Token, TokenKind, TokenType},
};

/// Consumes the current token, destructuring its kind with `$pattern`.
///
/// Evaluates to `($out, Location)`; a token of any other kind returns an
/// unexpected-token error from the enclosing function.
macro_rules! consume {
    ($parser:expr, $ty:expr, $pattern:pat => $out:expr) => {{
        let token = $parser.cursor.advance();
        let loc = $parser.loc(&token);
        match token {
            Token {
                kind: $pattern, ..
            } => ($out, loc),
            other => return Err($parser.unexpected(&other, &[$ty])),
        }
    }};
}

mod control;
mod structure;
mod tag;
mod text;

/// Lexical context threaded through every production.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub(crate) struct Scope {
    /// Number of mixin definition bodies enclosing the current production.
    mixin_depth: usize,
}

impl Scope {
    pub(crate) const fn enter_mixin(self) -> Self {
        Self {
            mixin_depth: self.mixin_depth.saturating_add(1),
        }
    }

    pub(crate) const fn in_mixin(self) -> bool {
        self.mixin_depth > 0
    }
}

/// Parses one token sequence into a syntax tree.
///
/// # Example
///
/// ```
/// use pugparse::{Parser, ParserOptions, ast::Node, token::{Token, TokenKind}};
///
/// let tokens = vec![
///     Token::new(TokenKind::Tag { val: "p".to_owned() }, 1, 1),
///     Token::new(TokenKind::Text { val: "Hello".to_owned() }, 1, 3),
///     Token::new(TokenKind::Eos, 1, 8),
/// ];
/// let root = Parser::new(tokens, &ParserOptions::default()).parse().unwrap();
/// let Some(Node::Tag(tag)) = root.nodes.first() else { panic!("expected a tag") };
/// assert_eq!(tag.name, "p");
/// ```
pub struct Parser<'s> {
    cursor: TokenCursor,
    options: ParserOptions,
    filename: Option<Arc<str>>,
    sink: Box<dyn DiagnosticSink + 's>,
}

impl<'s> Parser<'s> {
    pub fn new<I: IntoIterator<Item = Token>>(tokens: I, options: &ParserOptions) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            filename: options.filename.as_deref().map(Arc::from),
            options: options.clone(),
            sink: Box::new(LogSink),
        }
    }

    /// Sends advisory warnings to `sink` instead of the `log` facade.
    pub fn with_sink<D: DiagnosticSink + 's>(mut self, sink: D) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Consumes every token up to end-of-stream into the root block.
    ///
    /// # Errors
    /// Returns the first grammar violation; no partial tree is produced.
    pub fn parse(mut self) -> PugResult<Block> {
        log::trace!(filename = self.filename.as_deref().unwrap_or("<anonymous>"); "parsing template");
        let scope = Scope::default();
        let mut root = Block::empty(Location {
            line: 0,
            column: 0,
            filename: self.filename.clone(),
        });
        loop {
            match self.cursor.peek().ty() {
                TokenType::Eos => break,
                TokenType::Newline => {
                    self.cursor.advance();
                }
                TokenType::TextHtml => {
                    let nodes = self.parse_text_html(scope)?;
                    root.nodes.extend(nodes);
                }
                _ => {
                    let node = self.parse_expr(scope)?;
                    root.push_flattened(node);
                }
            }
        }
        Ok(root)
    }

    // --- Token helpers ---

    fn loc(&self, token: &Token) -> Location {
        Location {
            line: token.line,
            column: token.column,
            filename: self.filename.clone(),
        }
    }

    fn peek_is(&self, ty: TokenType) -> bool {
        self.cursor.peek().ty() == ty
    }

    /// Consumes the current token if it has type `ty`.
    fn accept(&mut self, ty: TokenType) -> Option<Token> {
        self.peek_is(ty).then(|| self.cursor.advance())
    }

    /// Consumes the current token, failing unless it has type `ty`.
    fn expect(&mut self, ty: TokenType) -> PugResult<Token> {
        if self.peek_is(ty) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(self.cursor.peek(), &[ty]))
        }
    }

    fn skip_newlines(&mut self) {
        while self.accept(TokenType::Newline).is_some() {}
    }

    /// Skips over newlines without consuming them.
    fn peek_past_newlines(&self) -> TokenType {
        let mut n = 0;
        while self.cursor.lookahead(n).ty() == TokenType::Newline {
            n = n.saturating_add(1);
        }
        self.cursor.lookahead(n).ty()
    }

    fn error(&self, kind: ParseErrorKind, token: &Token) -> ParseError {
        ParseError {
            line: token.line,
            column: token.column,
            filename: self.filename.clone(),
            kind,
        }
    }

    fn error_at(&self, kind: ParseErrorKind, loc: &Location) -> ParseError {
        ParseError {
            line: loc.line,
            column: loc.column,
            filename: self.filename.clone(),
            kind,
        }
    }

    fn unexpected(&self, token: &Token, expected: &[TokenType]) -> ParseError {
        self.error(ParseErrorKind::unexpected(token.ty(), expected), token)
    }

    fn warn(&mut self, kind: WarningKind, loc: &Location) {
        self.sink.warn(Warning {
            line: loc.line,
            column: loc.column,
            filename: self.filename.clone(),
            kind,
        });
    }

    // --- Dispatch ---

    /// Parses the single production starting at the current token.
    ///
    /// The result may be a [`Node::Block`] (text runs, raw HTML, `:`
    /// expansions); callers splice those into their own node list.
    fn parse_expr(&mut self, scope: Scope) -> PugResult<Node> {
        match self.cursor.peek().ty() {
            TokenType::Tag => self.parse_tag(scope),
            TokenType::Mixin => self.parse_mixin(scope),
            TokenType::Block => self.parse_named_block(scope),
            TokenType::MixinBlock => self.parse_mixin_block(scope),
            TokenType::Case => self.parse_case(scope),
            TokenType::Extends => self.parse_extends(),
            TokenType::Include => self.parse_include(scope),
            TokenType::Doctype => self.parse_doctype(),
            TokenType::Filter => Ok(Node::Filter(self.parse_filter(scope)?)),
            TokenType::Comment => self.parse_comment(scope),
            TokenType::Text | TokenType::InterpolatedCode | TokenType::StartInterpolation => {
                self.parse_text(scope, true)
            }
            TokenType::TextHtml => {
                let loc = self.loc(self.cursor.peek());
                Ok(Node::Block(Block::new(loc, self.parse_text_html(scope)?)))
            }
            TokenType::Dot => self.parse_dot(scope),
            TokenType::Each => self.parse_each(scope),
            TokenType::Code => self.parse_code(scope, false),
            TokenType::BlockCode => self.parse_block_code(),
            TokenType::If => self.parse_conditional(scope),
            TokenType::While => self.parse_while(scope),
            TokenType::Call => self.parse_call(scope),
            TokenType::Interpolation => self.parse_interpolation(scope),
            TokenType::Yield => self.parse_yield(),
            TokenType::Id | TokenType::Class => {
                let shorthand = self.cursor.peek();
                let implicit = Token::new(
                    TokenKind::Tag {
                        val: "div".to_owned(),
                    },
                    shorthand.line,
                    shorthand.column,
                );
                log::trace!(line = shorthand.line; "desugaring shorthand into an implicit div");
                self.cursor.defer(implicit);
                self.parse_expr(scope)
            }
            TokenType::When
            | TokenType::Default
            | TokenType::EndInterpolation
            | TokenType::ElseIf
            | TokenType::Else
            | TokenType::StartAttributes
            | TokenType::EndAttributes
            | TokenType::Attribute
            | TokenType::AndAttributes
            | TokenType::StartPipelessText
            | TokenType::EndPipelessText
            | TokenType::Indent
            | TokenType::Outdent
            | TokenType::Newline
            | TokenType::Slash
            | TokenType::Colon
            | TokenType::Path
            | TokenType::Eos => Err(self.unexpected(self.cursor.peek(), &[])),
        }
    }

    // --- Blocks ---

    /// `indent (newline | text-html+ | expr)* outdent`
    fn block(&mut self, scope: Scope) -> PugResult<Block> {
        let indent = self.expect(TokenType::Indent)?;
        let mut block = Block::empty(self.loc(&indent));
        loop {
            match self.cursor.peek().ty() {
                TokenType::Outdent => break,
                TokenType::Newline => {
                    self.cursor.advance();
                }
                TokenType::TextHtml => {
                    let nodes = self.parse_text_html(scope)?;
                    block.nodes.extend(nodes);
                }
                _ => {
                    let node = self.parse_expr(scope)?;
                    block.push_flattened(node);
                }
            }
        }
        self.expect(TokenType::Outdent)?;
        Ok(block)
    }

    /// `':' expr | block`
    fn parse_block_expansion(&mut self, scope: Scope) -> PugResult<Block> {
        let Some(colon) = self.accept(TokenType::Colon) else {
            return self.block(scope);
        };
        let loc = self.loc(&colon);
        Ok(match self.parse_expr(scope)? {
            Node::Block(block) => block,
            node => Block::new(loc, vec![node]),
        })
    }

    /// An indented block if one follows, otherwise an empty block at `loc`.
    fn optional_block(&mut self, scope: Scope, loc: &Location) -> PugResult<Block> {
        if self.peek_is(TokenType::Indent) {
            self.block(scope)
        } else {
            Ok(Block::empty(loc.clone()))
        }
    }
}

/// Parses `tokens` with default options, logging warnings through `log`.
///
/// # Errors
/// Returns the first grammar violation in the token stream.
pub fn parse<I: IntoIterator<Item = Token>>(tokens: I) -> PugResult<Block> {
    parse_with(tokens, &ParserOptions::default())
}

/// Parses `tokens` with the given options.
///
/// # Errors
/// Returns the first grammar violation in the token stream.
pub fn parse_with<I: IntoIterator<Item = Token>>(
    tokens: I,
    options: &ParserOptions,
) -> PugResult<Block> {
    Parser::new(tokens, options).parse()
}
