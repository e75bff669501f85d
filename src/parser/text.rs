use crate::{
    ast::{Block, Code, Node, Text},
    error::{ParseErrorKind, PugResult},
    token::{Token, TokenKind, TokenType},
};

use super::{Parser, Scope};

impl Parser<'_> {
    /// Coalesces a run of text, `#{}` code and `#[]` interpolations.
    ///
    /// A run of one fragment is returned as that fragment, never wrapped. In
    /// `block_mode` newlines are part of the run and are kept as `"\n"` text
    /// only when more text follows them.
    pub(super) fn parse_text(&mut self, scope: Scope, block_mode: bool) -> PugResult<Node> {
        let start = self.loc(self.cursor.peek());
        let mut nodes = Vec::new();
        loop {
            match self.cursor.peek().ty() {
                TokenType::Text | TokenType::InterpolatedCode => {
                    let token = self.cursor.advance();
                    nodes.push(self.inline_fragment(token)?);
                }
                TokenType::Newline if block_mode => {
                    let newline = self.cursor.advance();
                    if matches!(
                        self.cursor.peek().ty(),
                        TokenType::Text | TokenType::InterpolatedCode
                    ) {
                        nodes.push(Node::Text(Text {
                            val: "\n".to_owned(),
                            is_html: false,
                            loc: self.loc(&newline),
                        }));
                    }
                }
                TokenType::StartInterpolation => {
                    self.cursor.advance();
                    nodes.push(self.parse_expr(scope)?);
                    self.expect(TokenType::EndInterpolation)?;
                }
                _ => break,
            }
        }

        if nodes.len() == 1 {
            if let Some(node) = nodes.pop() {
                return Ok(node);
            }
        }
        Ok(Node::Block(Block::new(start, nodes)))
    }

    /// Turns a `text` or `interpolated-code` token into its node.
    fn inline_fragment(&self, token: Token) -> PugResult<Node> {
        let loc = self.loc(&token);
        match token.kind {
            TokenKind::Text { val } => Ok(Node::Text(Text {
                val,
                is_html: false,
                loc,
            })),
            TokenKind::InterpolatedCode {
                val,
                buffer,
                must_escape,
            } => Ok(Node::Code(Code {
                val,
                buffer,
                must_escape,
                is_inline: true,
                block: None,
                loc,
            })),
            other => Err(self.error_at(
                ParseErrorKind::unexpected(
                    other.ty(),
                    &[TokenType::Text, TokenType::InterpolatedCode],
                ),
                &loc,
            )),
        }
    }

    /// Merges consecutive raw HTML lines into single text nodes.
    ///
    /// Nested indented blocks are parsed in place; their HTML lines extend the
    /// current run while any other node closes it.
    pub(super) fn parse_text_html(&mut self, scope: Scope) -> PugResult<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut run: Option<Text> = None;
        loop {
            match self.cursor.peek().ty() {
                TokenType::TextHtml => {
                    let token = self.cursor.advance();
                    let loc = self.loc(&token);
                    if let TokenKind::TextHtml { val } = token.kind {
                        extend_html_run(
                            &mut run,
                            Text {
                                val,
                                is_html: true,
                                loc,
                            },
                        );
                    }
                }
                TokenType::Indent => {
                    let block = self.block(scope)?;
                    for node in block.nodes {
                        match node {
                            Node::Text(text) if text.is_html => extend_html_run(&mut run, text),
                            other => {
                                nodes.extend(run.take().map(Node::Text));
                                nodes.push(other);
                            }
                        }
                    }
                }
                TokenType::Newline => {
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        nodes.extend(run.map(Node::Text));
        Ok(nodes)
    }

    /// Reads a `start-pipeless-text ... end-pipeless-text` region.
    ///
    /// Returns `None` without consuming anything when no region starts here.
    pub(super) fn parse_text_block(&mut self, scope: Scope) -> PugResult<Option<Block>> {
        let Some(start) = self.accept(TokenType::StartPipelessText) else {
            return Ok(None);
        };
        let mut block = Block::empty(self.loc(&start));
        loop {
            let token = self.cursor.advance();
            let loc = self.loc(&token);
            match token.kind {
                TokenKind::EndPipelessText => break,
                TokenKind::Text { val } => block.nodes.push(Node::Text(Text {
                    val,
                    is_html: false,
                    loc,
                })),
                TokenKind::Newline => block.nodes.push(Node::Text(Text {
                    val: "\n".to_owned(),
                    is_html: false,
                    loc,
                })),
                TokenKind::InterpolatedCode {
                    val,
                    buffer,
                    must_escape,
                } => block.nodes.push(Node::Code(Code {
                    val,
                    buffer,
                    must_escape,
                    is_inline: true,
                    block: None,
                    loc,
                })),
                TokenKind::StartInterpolation => {
                    block.nodes.push(self.parse_expr(scope)?);
                    self.expect(TokenType::EndInterpolation)?;
                }
                other => {
                    return Err(self.error_at(
                        ParseErrorKind::MalformedVerbatimToken { found: other.ty() },
                        &loc,
                    ));
                }
            }
        }
        Ok(Some(block))
    }

    /// `dot` followed by a verbatim region.
    pub(super) fn parse_dot(&mut self, scope: Scope) -> PugResult<Node> {
        let dot = self.expect(TokenType::Dot)?;
        let loc = self.loc(&dot);
        let block = self.parse_text_block(scope)?.unwrap_or_else(|| Block::empty(loc));
        Ok(Node::Block(block))
    }
}

/// Appends `text` to the open HTML run, or starts a new run with it.
fn extend_html_run(run: &mut Option<Text>, text: Text) {
    match run {
        Some(current) => {
            current.val.push('\n');
            current.val.push_str(&text.val);
        }
        None => *run = Some(text),
    }
}
