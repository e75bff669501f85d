use crate::{
    ast::{
        Block, BlockComment, Comment, Doctype, Extends, FileReference, Filter, Include,
        IncludeFilter, Mixin, NamedBlock, Node, Placeholder, RawInclude, Text,
    },
    diagnostics::WarningKind,
    error::{ParseErrorKind, PugResult},
    options::IncludeTarget,
    token::{Token, TokenKind, TokenType},
};

use super::{Parser, Scope};

impl Parser<'_> {
    /// `mixin name(args)` followed by its definition body.
    ///
    /// A header without a body is the legacy call syntax.
    pub(super) fn parse_mixin(&mut self, scope: Scope) -> PugResult<Node> {
        let ((name, args), loc) = consume!(
            self,
            TokenType::Mixin,
            TokenKind::Mixin { val, args } => (val, args)
        );
        if self.peek_is(TokenType::Indent) {
            let block = self.block(scope.enter_mixin())?;
            return Ok(Node::Mixin(Mixin {
                name,
                args,
                block: Some(block),
                call: false,
                attrs: Vec::new(),
                attribute_blocks: Vec::new(),
                loc,
            }));
        }

        self.warn(WarningKind::LegacyMixinCall { name: name.clone() }, &loc);
        Ok(Node::Mixin(Mixin {
            name,
            args,
            block: None,
            call: true,
            attrs: Vec::new(),
            attribute_blocks: Vec::new(),
            loc,
        }))
    }

    pub(super) fn parse_mixin_block(&mut self, scope: Scope) -> PugResult<Node> {
        let token = self.expect(TokenType::MixinBlock)?;
        if !scope.in_mixin() {
            return Err(self.error(ParseErrorKind::BlockOutsideMixin, &token));
        }
        Ok(Node::MixinBlock(Placeholder {
            loc: self.loc(&token),
        }))
    }

    /// `+name(args)` with optional attributes and content.
    pub(super) fn parse_call(&mut self, scope: Scope) -> PugResult<Node> {
        let ((name, args), loc) = consume!(
            self,
            TokenType::Call,
            TokenKind::Call { val, args } => (val, args)
        );
        let body = self.tag_body(scope, &loc, false)?;
        Ok(Node::Mixin(Mixin {
            name,
            args,
            block: (!body.block.is_empty()).then_some(body.block),
            call: true,
            attrs: body.attrs,
            attribute_blocks: body.attribute_blocks,
            loc,
        }))
    }

    pub(super) fn parse_include(&mut self, scope: Scope) -> PugResult<Node> {
        let include = self.expect(TokenType::Include)?;
        let loc = self.loc(&include);

        let mut filters = Vec::new();
        while self.peek_is(TokenType::Filter) {
            filters.push(self.parse_include_filter()?);
        }
        let (path, path_loc) = consume!(self, TokenType::Path, TokenKind::Path { val } => val);
        let file = FileReference {
            path: path.trim().to_owned(),
            loc: path_loc,
        };

        let target = self.options.include_target(&file.path);
        if target == IncludeTarget::Raw {
            if self.peek_is(TokenType::Indent) {
                let discarded = self.block(scope)?;
                log::debug!(
                    path = file.path.as_str(), nodes = discarded.len();
                    "discarding block attached to a raw include"
                );
            }
            return Ok(Node::RawInclude(RawInclude { file, filters, loc }));
        }

        if target == IncludeTarget::LegacyTemplate {
            let warning = WarningKind::LegacyTemplateExtension {
                path: file.path.clone(),
                preferred: self.options.extension.clone(),
            };
            self.warn(warning, &loc);
        }
        if !filters.is_empty() {
            log::debug!(
                path = file.path.as_str(), filters = filters.len();
                "ignoring filters on a template include"
            );
        }
        let block = if self.peek_is(TokenType::Indent) {
            Some(self.block(scope)?)
        } else {
            None
        };
        Ok(Node::Include(Include { file, block, loc }))
    }

    fn parse_include_filter(&mut self) -> PugResult<IncludeFilter> {
        let (name, loc) = consume!(self, TokenType::Filter, TokenKind::Filter { val } => val);
        let attrs = if self.peek_is(TokenType::StartAttributes) {
            self.attrs(None)?
        } else {
            Vec::new()
        };
        Ok(IncludeFilter { name, attrs, loc })
    }

    pub(super) fn parse_extends(&mut self) -> PugResult<Node> {
        let extends = self.expect(TokenType::Extends)?;
        let (path, path_loc) = consume!(self, TokenType::Path, TokenKind::Path { val } => val);
        Ok(Node::Extends(Extends {
            file: FileReference {
                path: path.trim().to_owned(),
                loc: path_loc,
            },
            loc: self.loc(&extends),
        }))
    }

    /// `block name`, `append name` or `prepend name`.
    pub(super) fn parse_named_block(&mut self, scope: Scope) -> PugResult<Node> {
        let ((name, mode), loc) = consume!(
            self,
            TokenType::Block,
            TokenKind::Block { val, mode } => (val, mode)
        );
        let block = self.optional_block(scope, &loc)?;
        Ok(Node::NamedBlock(NamedBlock {
            name: name.trim().to_owned(),
            mode,
            block,
            loc,
        }))
    }

    pub(super) fn parse_yield(&mut self) -> PugResult<Node> {
        let token = self.expect(TokenType::Yield)?;
        Ok(Node::YieldBlock(Placeholder {
            loc: self.loc(&token),
        }))
    }

    /// `:name(attrs)` followed by inline text, a nested filter or a
    /// verbatim region.
    pub(super) fn parse_filter(&mut self, scope: Scope) -> PugResult<Filter> {
        let (name, loc) = consume!(self, TokenType::Filter, TokenKind::Filter { val } => val);
        let attrs = if self.peek_is(TokenType::StartAttributes) {
            self.attrs(None)?
        } else {
            Vec::new()
        };

        let block = match self.cursor.peek().ty() {
            TokenType::Text => {
                let (val, text_loc) = consume!(self, TokenType::Text, TokenKind::Text { val } => val);
                let text = Text {
                    val,
                    is_html: false,
                    loc: text_loc.clone(),
                };
                Block::new(text_loc, vec![Node::Text(text)])
            }
            TokenType::Filter => {
                let nested = self.parse_filter(scope)?;
                Block::new(loc.clone(), vec![Node::Filter(nested)])
            }
            _ => self
                .parse_text_block(scope)?
                .unwrap_or_else(|| Block::empty(loc.clone())),
        };

        Ok(Filter {
            name,
            attrs,
            block,
            loc,
        })
    }

    /// `//` comments; a following verbatim region makes a block comment.
    pub(super) fn parse_comment(&mut self, scope: Scope) -> PugResult<Node> {
        let ((val, buffer), loc) = consume!(
            self,
            TokenType::Comment,
            TokenKind::Comment { val, buffer } => (val, buffer)
        );
        Ok(match self.parse_text_block(scope)? {
            Some(block) => Node::BlockComment(BlockComment {
                val,
                buffer,
                block,
                loc,
            }),
            None => Node::Comment(Comment { val, buffer, loc }),
        })
    }

    pub(super) fn parse_doctype(&mut self) -> PugResult<Node> {
        let (val, loc) = consume!(self, TokenType::Doctype, TokenKind::Doctype { val } => val);
        Ok(Node::Doctype(Doctype { val, loc }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use crate::{
        ast::{Block, BlockMode, Mixin, Node},
        diagnostics::WarningKind,
        error::{ErrorCode, ParseErrorKind},
        token::{TokenKind, TokenType},
    };

    fn only(root: &Block) -> &Node {
        match root.nodes.as_slice() {
            [node] => node,
            other => panic!("expected a single node, got {other:?}"),
        }
    }

    fn mixin(node: &Node) -> &Mixin {
        match node {
            Node::Mixin(mixin) => mixin,
            other => panic!("expected a mixin, got {other:?}"),
        }
    }

    fn mixin_header(name: &str, args: Option<&str>) -> TokenKind {
        TokenKind::Mixin {
            val: s(name),
            args: args.map(s),
        }
    }

    fn call(name: &str, args: Option<&str>) -> TokenKind {
        TokenKind::Call {
            val: s(name),
            args: args.map(s),
        }
    }

    fn include(path: &str) -> Vec<TokenKind> {
        vec![TokenKind::Include, TokenKind::Path { val: s(path) }]
    }

    fn if_token(test: &str) -> TokenKind {
        TokenKind::If { val: s(test) }
    }

    fn filter(name: &str) -> TokenKind {
        TokenKind::Filter { val: s(name) }
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_mixin_definition_with_block_placeholder() {
        let root = parse(vec![
            mixin_header("card", Some("title")),
            TokenKind::Indent,
            tag("h2"),
            TokenKind::Newline,
            TokenKind::MixinBlock,
            TokenKind::Outdent,
            TokenKind::Eos,
        ])
        .unwrap();
        let card = mixin(only(&root));
        assert!(!card.call);
        assert_eq!(card.args.as_deref(), Some("title"));
        let body = card.block.as_ref().expect("definition has a body");
        assert!(matches!(body.nodes.last(), Some(Node::MixinBlock(_))));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_mixin_block_outside_mixin() {
        let err = parse(vec![TokenKind::MixinBlock, TokenKind::Eos]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BlockOutsideMixin);
        assert_eq!(err.kind, ParseErrorKind::BlockOutsideMixin);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_mixin_block_in_call_content_outside_definition() {
        let err = parse(vec![
            call("card", None),
            TokenKind::Indent,
            TokenKind::MixinBlock,
            TokenKind::Outdent,
            TokenKind::Eos,
        ])
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BlockOutsideMixin);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_mixin_block_nested_inside_definition() {
        let root = parse(vec![
            mixin_header("outer", None),
            TokenKind::Indent,
            tag("div"),
            TokenKind::Indent,
            if_token("show"),
            TokenKind::Indent,
            TokenKind::MixinBlock,
            TokenKind::Outdent,
            TokenKind::Outdent,
            TokenKind::Outdent,
            TokenKind::Eos,
        ])
        .unwrap();
        assert!(!mixin(only(&root)).call);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_bodyless_mixin_is_legacy_call() {
        let (result, warnings) = parse_collecting(vec![
            mixin_header("legacy", Some("1")),
            TokenKind::Newline,
            TokenKind::Eos,
        ]);
        let root = result.unwrap();
        let legacy = mixin(only(&root));
        assert!(legacy.call);
        assert!(legacy.block.is_none());
        assert_eq!(
            warnings.first().map(|w| &w.kind),
            Some(&WarningKind::LegacyMixinCall { name: s("legacy") })
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_call_with_attributes_and_content() {
        let root = parse(vec![
            call("button", Some("'primary'")),
            class("wide"),
            TokenKind::StartAttributes,
            attr("disabled", "true"),
            TokenKind::EndAttributes,
            TokenKind::Indent,
            text("Click"),
            TokenKind::Outdent,
            TokenKind::Eos,
        ])
        .unwrap();
        let button = mixin(only(&root));
        assert!(button.call);
        assert_eq!(button.args.as_deref(), Some("'primary'"));
        assert_eq!(button.attrs.len(), 2);
        assert_eq!(button.block.as_ref().map(Block::len), Some(1));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_call_without_content_has_no_block() {
        let root = parse(vec![call("icon", None), TokenKind::Eos]).unwrap();
        assert!(mixin(only(&root)).block.is_none());
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_call_cannot_self_close() {
        let err = parse(vec![call("icon", None), TokenKind::Slash, TokenKind::Eos]).unwrap_err();
        let ParseErrorKind::UnexpectedToken { found, expected } = err.kind else {
            panic!("expected an unexpected-token error")
        };
        assert_eq!(found, TokenType::Slash);
        assert!(!expected.contains(&TokenType::Slash));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_template_include_with_override_block() {
        let root = parse(vec![
            TokenKind::Include,
            filter("ignored"),
            TokenKind::Path {
                val: s(" header.pug "),
            },
            TokenKind::Indent,
            TokenKind::Block {
                val: s("title"),
                mode: BlockMode::Replace,
            },
            TokenKind::Outdent,
            TokenKind::Eos,
        ])
        .unwrap();
        let Node::Include(include) = only(&root) else {
            panic!("expected include, got {root:?}")
        };
        assert_eq!(include.file.path, "header.pug");
        assert_eq!(include.block.as_ref().map(Block::len), Some(1));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_template_include_without_block() {
        let mut tokens = include("nav.pug");
        tokens.push(TokenKind::Eos);
        let root = parse(tokens).unwrap();
        let Node::Include(include) = only(&root) else {
            panic!("expected include, got {root:?}")
        };
        assert!(include.block.is_none());
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_legacy_template_include_warns() {
        let mut tokens = include("old.jade");
        tokens.push(TokenKind::Eos);
        let (result, warnings) = parse_collecting(tokens);
        assert!(matches!(only(&result.unwrap()), Node::Include(_)));
        assert_eq!(
            warnings.first().map(|w| &w.kind),
            Some(&WarningKind::LegacyTemplateExtension {
                path: s("old.jade"),
                preferred: s(".pug"),
            })
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_raw_include_keeps_filters_and_discards_block() {
        let root = parse(vec![
            TokenKind::Include,
            filter("markdown-it"),
            TokenKind::StartAttributes,
            attr("linkify", "true"),
            TokenKind::EndAttributes,
            TokenKind::Path {
                val: s("article.md"),
            },
            TokenKind::Indent,
            tag("p"),
            TokenKind::Outdent,
            tag("footer"),
            TokenKind::Eos,
        ])
        .unwrap();
        assert_eq!(root.len(), 2);
        let Node::RawInclude(raw) = &root.nodes[0] else {
            panic!("expected raw include, got {root:?}")
        };
        assert_eq!(raw.file.path, "article.md");
        assert_eq!(raw.filters.len(), 1);
        assert_eq!(raw.filters[0].name, "markdown-it");
        assert_eq!(raw.filters[0].attrs.len(), 1);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_include_requires_path() {
        let err = parse(vec![TokenKind::Include, TokenKind::Eos]).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: TokenType::Eos,
                expected: vec![TokenType::Path],
            }
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_extends_trims_path() {
        let root = parse(vec![
            TokenKind::Extends,
            TokenKind::Path {
                val: s("layout.pug  "),
            },
            TokenKind::Eos,
        ])
        .unwrap();
        let Node::Extends(extends) = only(&root) else {
            panic!("expected extends")
        };
        assert_eq!(extends.file.path, "layout.pug");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_named_block_modes() {
        let root = parse(vec![
            TokenKind::Block {
                val: s(" scripts "),
                mode: BlockMode::Append,
            },
            TokenKind::Indent,
            tag("script"),
            TokenKind::Outdent,
            TokenKind::Block {
                val: s("footer"),
                mode: BlockMode::Replace,
            },
            TokenKind::Eos,
        ])
        .unwrap();
        let [Node::NamedBlock(scripts), Node::NamedBlock(footer)] = root.nodes.as_slice() else {
            panic!("expected two named blocks, got {root:?}")
        };
        assert_eq!(scripts.name, "scripts");
        assert_eq!(scripts.mode, BlockMode::Append);
        assert_eq!(scripts.block.len(), 1);
        assert!(footer.block.is_empty());
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_yield() {
        let root = parse(vec![TokenKind::Yield, TokenKind::Eos]).unwrap();
        assert!(matches!(only(&root), Node::YieldBlock(_)));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_filter_bodies() {
        let root = parse(vec![
            filter("markdown"),
            text("# Title"),
            TokenKind::Newline,
            filter("cdata"),
            filter("uglify-js"),
            TokenKind::StartPipelessText,
            text("go()"),
            TokenKind::EndPipelessText,
            TokenKind::Newline,
            filter("empty"),
            TokenKind::Eos,
        ])
        .unwrap();
        let [
            Node::Filter(inline),
            Node::Filter(outer),
            Node::Filter(empty),
        ] = root.nodes.as_slice()
        else {
            panic!("expected three filters, got {root:?}")
        };
        assert!(matches!(inline.block.nodes.as_slice(), [Node::Text(t)] if t.val == "# Title"));
        let [Node::Filter(inner)] = outer.block.nodes.as_slice() else {
            panic!("expected nested filter")
        };
        assert_eq!(inner.name, "uglify-js");
        assert_eq!(inner.block.len(), 1);
        assert!(empty.block.is_empty());
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_filter_attributes_allow_duplicates() {
        let root = parse(vec![
            filter("custom"),
            TokenKind::StartAttributes,
            attr("opt", "1"),
            attr("opt", "2"),
            TokenKind::EndAttributes,
            TokenKind::Eos,
        ])
        .unwrap();
        let Node::Filter(custom) = only(&root) else {
            panic!("expected filter")
        };
        assert_eq!(custom.attrs.len(), 2);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_comments() {
        let root = parse(vec![
            TokenKind::Comment {
                val: s(" note"),
                buffer: true,
            },
            TokenKind::Newline,
            TokenKind::Comment {
                val: s(""),
                buffer: false,
            },
            TokenKind::StartPipelessText,
            text("hidden"),
            TokenKind::EndPipelessText,
            TokenKind::Eos,
        ])
        .unwrap();
        let [Node::Comment(line), Node::BlockComment(block)] = root.nodes.as_slice() else {
            panic!("expected comment then block comment, got {root:?}")
        };
        assert!(line.buffer);
        assert_eq!(line.val, " note");
        assert!(!block.buffer);
        assert_eq!(block.block.len(), 1);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_doctype() {
        let root = parse(vec![
            TokenKind::Doctype { val: s("html") },
            TokenKind::Eos,
        ])
        .unwrap();
        assert!(matches!(only(&root), Node::Doctype(d) if d.val == "html"));
    }
}
