use crate::{
    ast::{
        Alternate, Block, Case, Code, Conditional, DEFAULT_BRANCH, Each, Location, Node, When,
        While,
    },
    error::{ParseErrorKind, PugResult},
    token::{Token, TokenKind, TokenType},
};

use super::{Parser, Scope};

impl Parser<'_> {
    /// `if` with any number of `else if` branches and an optional `else`.
    ///
    /// Branches are collected first and chained back to front, so the first
    /// `else if` ends up as the alternate of the `if`.
    pub(super) fn parse_conditional(&mut self, scope: Scope) -> PugResult<Node> {
        let (test, loc) = consume!(self, TokenType::If, TokenKind::If { val } => val);
        let consequent = self.optional_block(scope, &loc)?;

        let mut branches: Vec<(String, Block, Location)> = Vec::new();
        let mut otherwise = None;
        loop {
            match self.peek_past_newlines() {
                TokenType::ElseIf => {
                    self.skip_newlines();
                    let (test, loc) =
                        consume!(self, TokenType::ElseIf, TokenKind::ElseIf { val } => val);
                    let block = self.optional_block(scope, &loc)?;
                    branches.push((test, block, loc));
                }
                TokenType::Else => {
                    self.skip_newlines();
                    self.expect(TokenType::Else)?;
                    if self.peek_is(TokenType::Indent) {
                        otherwise = Some(self.block(scope)?);
                    }
                    break;
                }
                _ => break,
            }
        }

        let mut alternate = otherwise.map(Alternate::Else);
        for (test, consequent, loc) in branches.into_iter().rev() {
            alternate = Some(Alternate::ElseIf(Box::new(Conditional {
                test,
                consequent,
                alternate,
                loc,
            })));
        }

        Ok(Node::Conditional(Conditional {
            test,
            consequent,
            alternate,
            loc,
        }))
    }

    pub(super) fn parse_while(&mut self, scope: Scope) -> PugResult<Node> {
        let (test, loc) = consume!(self, TokenType::While, TokenKind::While { val } => val);
        let block = self.optional_block(scope, &loc)?;
        Ok(Node::While(While { test, block, loc }))
    }

    pub(super) fn parse_each(&mut self, scope: Scope) -> PugResult<Node> {
        let ((obj, val, key), loc) = consume!(
            self,
            TokenType::Each,
            TokenKind::Each { obj, val, key } => (obj, val, key)
        );
        let block = self.block(scope)?;
        let alternate = if self.accept(TokenType::Else).is_some() {
            Some(self.block(scope)?)
        } else {
            None
        };
        Ok(Node::Each(Each {
            obj,
            val,
            key,
            block,
            alternate,
            loc,
        }))
    }

    /// `case` followed by an indented list of `when` and `default` branches.
    pub(super) fn parse_case(&mut self, scope: Scope) -> PugResult<Node> {
        let (expr, loc) = consume!(self, TokenType::Case, TokenKind::Case { val } => val);
        let indent = self.expect(TokenType::Indent)?;
        let mut block = Block::empty(self.loc(&indent));
        loop {
            match self.cursor.peek().ty() {
                TokenType::Outdent => break,
                TokenType::Comment | TokenType::Newline => {
                    self.cursor.advance();
                }
                TokenType::When => block.nodes.push(self.parse_when(scope)?),
                TokenType::Default => block.nodes.push(self.parse_default(scope)?),
                _ => {
                    return Err(self.unexpected(
                        self.cursor.peek(),
                        &[TokenType::When, TokenType::Default, TokenType::Newline],
                    ));
                }
            }
        }
        self.expect(TokenType::Outdent)?;
        Ok(Node::Case(Case { expr, block, loc }))
    }

    fn parse_when(&mut self, scope: Scope) -> PugResult<Node> {
        let (expr, loc) = consume!(self, TokenType::When, TokenKind::When { val } => val);
        let block = match self.cursor.peek().ty() {
            TokenType::Newline | TokenType::Outdent => None,
            _ => Some(self.parse_block_expansion(scope)?),
        };
        Ok(Node::When(When { expr, block, loc }))
    }

    fn parse_default(&mut self, scope: Scope) -> PugResult<Node> {
        let (expr, loc) = consume!(
            self,
            TokenType::Default,
            TokenKind::Default => DEFAULT_BRANCH.to_owned()
        );
        let block = self.parse_block_expansion(scope)?;
        Ok(Node::When(When {
            expr,
            block: Some(block),
            loc,
        }))
    }

    /// `- stmt`, `= expr` or `!= expr`.
    ///
    /// With `no_block` the code is inline content of a tag and never takes an
    /// indented block.
    pub(super) fn parse_code(&mut self, scope: Scope, no_block: bool) -> PugResult<Node> {
        let ((val, buffer, must_escape), loc) = consume!(
            self,
            TokenType::Code,
            TokenKind::Code { val, buffer, must_escape } => (val, buffer, must_escape)
        );
        let mut code = Code {
            val,
            buffer,
            must_escape,
            is_inline: no_block,
            block: None,
            loc,
        };
        if no_block || !self.peek_is(TokenType::Indent) {
            return Ok(Node::Code(code));
        }
        if code.buffer {
            return Err(self.error(
                ParseErrorKind::CodeBlockOnBufferedExpression,
                self.cursor.peek(),
            ));
        }
        code.block = Some(self.block(scope)?);
        Ok(Node::Code(code))
    }

    /// A bare `-` followed by an indented region of raw statements.
    pub(super) fn parse_block_code(&mut self) -> PugResult<Node> {
        let ((), loc) = consume!(self, TokenType::BlockCode, TokenKind::BlockCode => ());
        let mut val = String::new();
        if self.accept(TokenType::StartPipelessText).is_some() {
            loop {
                let token = self.cursor.advance();
                match token.kind {
                    TokenKind::EndPipelessText => break,
                    TokenKind::Text { val: line } => val.push_str(&line),
                    TokenKind::Newline => val.push('\n'),
                    other => {
                        let found = Token::new(other, token.line, token.column);
                        return Err(self.error(
                            ParseErrorKind::MalformedVerbatimToken { found: found.ty() },
                            &found,
                        ));
                    }
                }
            }
        }
        Ok(Node::Code(Code {
            val,
            buffer: false,
            must_escape: false,
            is_inline: false,
            block: None,
            loc,
        }))
    }
}
