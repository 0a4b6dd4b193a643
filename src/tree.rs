//! Document tree built from block tokens.
//!
//! The root is a [`Document`]; everything below it is a [`Node`]. Keeping
//! the root as its own type means a document can never be nested inside
//! another node.

use crate::block::BlockToken;
use crate::inline::{scan_inline, InlineToken};

/// Root of the document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level blocks in source order.
    pub children: Vec<Node>,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Node {
    /// Heading; `level` is clamped when rendered.
    Heading { level: u8, children: Vec<Node> },
    Paragraph { children: Vec<Node> },
    Image { alt: String, src: String },
    Link { href: String, children: Vec<Node> },
    /// Bullet list; children are [`Node::ListItem`]s.
    UnorderedList { children: Vec<Node> },
    /// Numbered list; children are [`Node::ListItem`]s.
    OrderedList { children: Vec<Node> },
    ListItem { children: Vec<Node> },
    CodeBlock { content: String, lang: Option<String> },
    /// Literal text, escaped when rendered.
    Text { content: String },
    Bold { children: Vec<Node> },
    Italic { children: Vec<Node> },
}

impl Node {
    /// Build a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Child nodes; empty for leaf nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Heading { children, .. }
            | Self::Paragraph { children }
            | Self::Link { children, .. }
            | Self::UnorderedList { children }
            | Self::OrderedList { children }
            | Self::ListItem { children }
            | Self::Bold { children }
            | Self::Italic { children } => children,
            Self::Image { .. } | Self::CodeBlock { .. } | Self::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants, without markup.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { content } | Self::CodeBlock { content, .. } => out.push_str(content),
            Self::Image { alt, .. } => out.push_str(alt),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Build the document tree from block tokens.
///
/// One top-level node per token, in order. List items are inline-scanned
/// here; heading and paragraph content was scanned by the tokenizer.
///
/// # Example
/// ```
/// use atommark::block::tokenize;
/// use atommark::tree::{build_tree, Node};
///
/// let doc = build_tree(tokenize("# Hi"));
/// assert_eq!(
///     doc.children,
///     vec![Node::Heading { level: 1, children: vec![Node::text("Hi")] }]
/// );
/// ```
pub fn build_tree(tokens: Vec<BlockToken>) -> Document {
    Document {
        children: tokens.into_iter().map(block_node).collect(),
    }
}

fn block_node(token: BlockToken) -> Node {
    match token {
        BlockToken::Heading { level, content } => Node::Heading {
            level,
            children: inline_nodes(content),
        },
        BlockToken::Paragraph { content } => Node::Paragraph {
            children: inline_nodes(content),
        },
        BlockToken::Image { alt, src } => Node::Image { alt, src },
        BlockToken::Link { href, text } => Node::Link {
            href,
            children: vec![Node::text(text)],
        },
        BlockToken::UnorderedList { items } => Node::UnorderedList {
            children: list_items(items),
        },
        BlockToken::OrderedList { items } => Node::OrderedList {
            children: list_items(items),
        },
        BlockToken::CodeBlock { content, lang } => Node::CodeBlock { content, lang },
    }
}

fn list_items(items: Vec<String>) -> Vec<Node> {
    items
        .iter()
        .map(|item| Node::ListItem {
            children: inline_nodes(scan_inline(item)),
        })
        .collect()
}

fn inline_nodes(tokens: Vec<InlineToken>) -> Vec<Node> {
    tokens.into_iter().map(inline_node).collect()
}

fn inline_node(token: InlineToken) -> Node {
    match token {
        InlineToken::Text(content) => Node::Text { content },
        InlineToken::Bold(children) => Node::Bold {
            children: inline_nodes(children),
        },
        InlineToken::Italic(children) => Node::Italic {
            children: inline_nodes(children),
        },
        InlineToken::Link { href, children } => Node::Link {
            href,
            children: inline_nodes(children),
        },
    }
}
