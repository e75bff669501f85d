//! The syntax tree produced by the parser.
//!
//! Every node owns its children outright. Nodes record where they came from
//! (line, column and the configured filename) so later stages can report
//! errors against the template source.

use std::sync::Arc;

/// Where a node was found.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub filename: Option<Arc<str>>,
}

/// Elements rendered inline by default.
const INLINE_TAGS: [&str; 19] = [
    "a", "abbr", "acronym", "b", "br", "code", "em", "font", "i", "img", "ins", "kbd", "map",
    "samp", "small", "span", "strong", "sub", "sup",
];

/// Returns true for element names that are inline (phrasing) elements.
pub fn is_inline_tag(name: &str) -> bool {
    INLINE_TAGS.contains(&name)
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested sequence of siblings.
    Block(Block),
    Tag(Tag),
    /// A tag whose name is computed, `#{'h' + level}`.
    InterpolatedTag(InterpolatedTag),
    Text(Text),
    Code(Code),
    Conditional(Conditional),
    While(While),
    Each(Each),
    Case(Case),
    When(When),
    /// A mixin definition or call.
    Mixin(Mixin),
    /// Marks where a mixin caller's content is inserted.
    MixinBlock(Placeholder),
    /// Marks where an including template's content is inserted.
    YieldBlock(Placeholder),
    NamedBlock(NamedBlock),
    Filter(Filter),
    IncludeFilter(IncludeFilter),
    Include(Include),
    /// An include of a non-template file.
    RawInclude(RawInclude),
    Extends(Extends),
    Comment(Comment),
    BlockComment(BlockComment),
    Doctype(Doctype),
}

impl Node {
    pub const fn loc(&self) -> &Location {
        match self {
            Self::Block(node) => &node.loc,
            Self::Tag(node) => &node.loc,
            Self::InterpolatedTag(node) => &node.loc,
            Self::Text(node) => &node.loc,
            Self::Code(node) => &node.loc,
            Self::Conditional(node) => &node.loc,
            Self::While(node) => &node.loc,
            Self::Each(node) => &node.loc,
            Self::Case(node) => &node.loc,
            Self::When(node) => &node.loc,
            Self::Mixin(node) => &node.loc,
            Self::MixinBlock(node) | Self::YieldBlock(node) => &node.loc,
            Self::NamedBlock(node) => &node.loc,
            Self::Filter(node) => &node.loc,
            Self::IncludeFilter(node) => &node.loc,
            Self::Include(node) => &node.loc,
            Self::RawInclude(node) => &node.loc,
            Self::Extends(node) => &node.loc,
            Self::Comment(node) => &node.loc,
            Self::BlockComment(node) => &node.loc,
            Self::Doctype(node) => &node.loc,
        }
    }

    pub const fn line(&self) -> usize {
        self.loc().line
    }
}

/// An ordered run of sibling nodes sharing one indentation scope.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub nodes: Vec<Node>,
    pub loc: Location,
}

impl Block {
    pub const fn new(loc: Location, nodes: Vec<Node>) -> Self {
        Self { nodes, loc }
    }

    pub const fn empty(loc: Location) -> Self {
        Self::new(loc, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Appends `node`, splicing its children in place when it is a block.
    pub(crate) fn push_flattened(&mut self, node: Node) {
        match node {
            Node::Block(block) => self.nodes.extend(block.nodes),
            other => self.nodes.push(other),
        }
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// The unevaluated value expression.
    pub val: String,
    pub must_escape: bool,
    pub loc: Location,
}

/// An `&attributes(expr)` spread.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBlock {
    pub val: String,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub self_closing: bool,
    /// Body was written as a `.` verbatim block.
    pub text_only: bool,
    pub is_inline: bool,
    pub attrs: Vec<Attribute>,
    pub attribute_blocks: Vec<AttributeBlock>,
    pub block: Block,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolatedTag {
    /// Expression producing the element name.
    pub expr: String,
    pub self_closing: bool,
    pub text_only: bool,
    pub attrs: Vec<Attribute>,
    pub attribute_blocks: Vec<AttributeBlock>,
    pub block: Block,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub val: String,
    /// Literal HTML that must not be escaped.
    pub is_html: bool,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub val: String,
    /// The value of the expression is written to the output.
    pub buffer: bool,
    pub must_escape: bool,
    pub is_inline: bool,
    /// Only present on unbuffered code.
    pub block: Option<Block>,
    pub loc: Location,
}

/// What follows a failed conditional test.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alternate {
    #[cfg_attr(feature = "serde", serde(rename = "Conditional"))]
    ElseIf(Box<Conditional>),
    #[cfg_attr(feature = "serde", serde(rename = "Block"))]
    Else(Block),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub test: String,
    pub consequent: Block,
    pub alternate: Option<Alternate>,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct While {
    pub test: String,
    pub block: Block,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Each {
    /// The iterable expression.
    pub obj: String,
    /// Name bound to each element.
    pub val: String,
    /// Name bound to each index or key.
    pub key: Option<String>,
    pub block: Block,
    /// Rendered when the iterable is empty.
    pub alternate: Option<Block>,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub expr: String,
    /// Only ever holds `When` nodes.
    pub block: Block,
    pub loc: Location,
}

/// The `expr` of a `default` branch.
pub const DEFAULT_BRANCH: &str = "default";

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct When {
    /// The branch expression, or [`DEFAULT_BRANCH`].
    pub expr: String,
    /// `None` falls through to the next branch.
    pub block: Option<Block>,
    pub loc: Location,
}

impl When {
    pub fn is_default(&self) -> bool {
        self.expr == DEFAULT_BRANCH
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mixin {
    pub name: String,
    /// Raw parameter (definition) or argument (call) list.
    pub args: Option<String>,
    /// `None` for a call without content.
    pub block: Option<Block>,
    pub call: bool,
    pub attrs: Vec<Attribute>,
    pub attribute_blocks: Vec<AttributeBlock>,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub loc: Location,
}

/// How a named block combines with the block it overrides.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlockMode {
    #[default]
    Replace,
    Append,
    Prepend,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlock {
    pub name: String,
    pub mode: BlockMode,
    pub block: Block,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub block: Block,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeFilter {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub loc: Location,
}

/// A path referenced by `include` or `extends`, left unresolved.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub path: String,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub file: FileReference,
    /// Content overriding blocks of the included template.
    pub block: Option<Block>,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInclude {
    pub file: FileReference,
    pub filters: Vec<IncludeFilter>,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extends {
    pub file: FileReference,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub val: String,
    /// Written to the output as an HTML comment.
    pub buffer: bool,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment {
    pub val: String,
    pub buffer: bool,
    pub block: Block,
    pub loc: Location,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    /// Empty for the default doctype.
    pub val: String,
    pub loc: Location,
}
