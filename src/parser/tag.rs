use std::collections::HashSet;

use crate::{
    ast::{
        Attribute, AttributeBlock, Block, InterpolatedTag, Location, Node, Tag, is_inline_tag,
    },
    diagnostics::WarningKind,
    error::{ParseErrorKind, PugResult},
    token::{Token, TokenKind, TokenType},
};

use super::{Parser, Scope};

/// Everything after the element name of a tag, mixin call or interpolation.
#[derive(Debug)]
pub(super) struct TagBody {
    pub(super) attrs: Vec<Attribute>,
    pub(super) attribute_blocks: Vec<AttributeBlock>,
    pub(super) self_closing: bool,
    pub(super) text_only: bool,
    pub(super) block: Block,
}

impl Parser<'_> {
    pub(super) fn parse_tag(&mut self, scope: Scope) -> PugResult<Node> {
        let (name, loc) = consume!(self, TokenType::Tag, TokenKind::Tag { val } => val);
        let body = self.tag_body(scope, &loc, true)?;
        Ok(Node::Tag(Tag {
            is_inline: is_inline_tag(&name),
            name,
            self_closing: body.self_closing,
            text_only: body.text_only,
            attrs: body.attrs,
            attribute_blocks: body.attribute_blocks,
            block: body.block,
            loc,
        }))
    }

    pub(super) fn parse_interpolation(&mut self, scope: Scope) -> PugResult<Node> {
        let (expr, loc) = consume!(
            self,
            TokenType::Interpolation,
            TokenKind::Interpolation { val } => val
        );
        let body = self.tag_body(scope, &loc, true)?;
        Ok(Node::InterpolatedTag(InterpolatedTag {
            expr,
            self_closing: body.self_closing,
            text_only: body.text_only,
            attrs: body.attrs,
            attribute_blocks: body.attribute_blocks,
            block: body.block,
            loc,
        }))
    }

    /// Shorthands, attribute groups, inline content and the nested block.
    pub(super) fn tag_body(
        &mut self,
        scope: Scope,
        loc: &Location,
        self_closing_allowed: bool,
    ) -> PugResult<TagBody> {
        let mut body = TagBody {
            attrs: Vec::new(),
            attribute_blocks: Vec::new(),
            self_closing: false,
            text_only: false,
            block: Block::empty(loc.clone()),
        };
        let mut seen = HashSet::new();
        let mut seen_groups = false;

        loop {
            match self.cursor.peek().ty() {
                TokenType::Id | TokenType::Class => {
                    let token = self.cursor.advance();
                    let loc = self.loc(&token);
                    let (name, val) = match token.kind {
                        TokenKind::Id { val } => ("id", val),
                        TokenKind::Class { val } => ("class", val),
                        other => {
                            return Err(self.error_at(
                                ParseErrorKind::unexpected(
                                    other.ty(),
                                    &[TokenType::Id, TokenType::Class],
                                ),
                                &loc,
                            ));
                        }
                    };
                    if name == "id" && !seen.insert(name.to_owned()) {
                        return Err(self.error_at(ParseErrorKind::DuplicateIdentifier, &loc));
                    }
                    body.attrs.push(Attribute {
                        name: name.to_owned(),
                        val,
                        must_escape: false,
                        loc,
                    });
                }
                TokenType::StartAttributes => {
                    if seen_groups {
                        let loc = self.loc(self.cursor.peek());
                        self.warn(WarningKind::MultipleAttributeGroups, &loc);
                    }
                    seen_groups = true;
                    let attrs = self.attrs(Some(&mut seen))?;
                    body.attrs.extend(attrs);
                }
                TokenType::AndAttributes => {
                    let (val, loc) = consume!(
                        self,
                        TokenType::AndAttributes,
                        TokenKind::AndAttributes { val } => val
                    );
                    body.attribute_blocks.push(AttributeBlock { val, loc });
                }
                _ => break,
            }
        }

        if self.accept(TokenType::Dot).is_some() {
            body.text_only = true;
        }

        match self.cursor.peek().ty() {
            TokenType::Text | TokenType::InterpolatedCode => {
                let text = self.parse_text(scope, false)?;
                body.block.push_flattened(text);
            }
            TokenType::Code => {
                let code = self.parse_code(scope, true)?;
                body.block.nodes.push(code);
            }
            TokenType::Colon => {
                let colon = self.cursor.advance();
                let loc = self.loc(&colon);
                body.block = match self.parse_expr(scope)? {
                    Node::Block(block) => block,
                    node => Block::new(loc, vec![node]),
                };
            }
            TokenType::Slash if self_closing_allowed => {
                self.cursor.advance();
                body.self_closing = true;
            }
            TokenType::Newline
            | TokenType::Indent
            | TokenType::Outdent
            | TokenType::Eos
            | TokenType::StartPipelessText
            | TokenType::EndInterpolation => {}
            _ => {
                let mut expected = vec![
                    TokenType::Text,
                    TokenType::InterpolatedCode,
                    TokenType::Code,
                    TokenType::Colon,
                ];
                if self_closing_allowed {
                    expected.push(TokenType::Slash);
                }
                expected.extend([TokenType::Newline, TokenType::Eos]);
                return Err(self.unexpected(self.cursor.peek(), &expected));
            }
        }

        self.skip_newlines();

        if body.text_only {
            body.block = self
                .parse_text_block(scope)?
                .unwrap_or_else(|| Block::empty(loc.clone()));
        } else if self.peek_is(TokenType::Indent) {
            let nested = self.block(scope)?;
            body.block.nodes.extend(nested.nodes);
        }

        Ok(body)
    }

    /// `start-attributes attribute* end-attributes`
    ///
    /// Reads one token past the last attribute and defers it. With `seen`,
    /// repeated names other than `class` are rejected.
    pub(super) fn attrs(
        &mut self,
        mut seen: Option<&mut HashSet<String>>,
    ) -> PugResult<Vec<Attribute>> {
        self.expect(TokenType::StartAttributes)?;
        let mut attrs = Vec::new();
        loop {
            let token = self.cursor.advance();
            let loc = self.loc(&token);
            let (name, val, must_escape) = match token.kind {
                TokenKind::Attribute {
                    name,
                    val,
                    must_escape,
                } => (name, val, must_escape),
                other => {
                    // Pushed back for the closing `expect`.
                    self.cursor.defer(Token::new(other, loc.line, loc.column));
                    break;
                }
            };
            if name != "class" {
                if let Some(seen) = seen.as_deref_mut() {
                    if !seen.insert(name.clone()) {
                        let kind = if name == "id" {
                            ParseErrorKind::DuplicateIdentifier
                        } else {
                            ParseErrorKind::DuplicateAttribute { name }
                        };
                        return Err(self.error_at(kind, &loc));
                    }
                }
            }
            attrs.push(Attribute {
                name,
                val,
                must_escape,
                loc,
            });
        }
        self.expect(TokenType::EndAttributes)?;
        Ok(attrs)
    }
}
