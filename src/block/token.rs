//! Block-level token types.

use crate::inline::InlineToken;

/// Kind of list currently being collected by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bullet list (`-`, `*`, `+`).
    Unordered,
    /// Numbered list (`1.`).
    Ordered,
}

/// Tokens emitted by the block tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockToken {
    /// ATX heading.
    Heading {
        /// Number of leading `#` characters.
        level: u8,
        /// Scanned heading text.
        content: Vec<InlineToken>,
    },

    /// Paragraph built from contiguous text lines.
    Paragraph {
        /// Scanned paragraph text.
        content: Vec<InlineToken>,
    },

    /// Image on a line of its own.
    Image {
        /// Alternative text.
        alt: String,
        /// Image source.
        src: String,
    },

    /// Link on a line of its own.
    Link {
        /// Link destination.
        href: String,
        /// Link text, not scanned for markup.
        text: String,
    },

    /// Run of bullet list items.
    UnorderedList {
        /// Item source text, not yet scanned.
        items: Vec<String>,
    },

    /// Run of numbered list items.
    OrderedList {
        /// Item source text, not yet scanned.
        items: Vec<String>,
    },

    /// Fenced code block.
    CodeBlock {
        /// Verbatim content, lines joined with `\n`.
        content: String,
        /// Language tag from the opening fence.
        lang: Option<String>,
    },
}

impl BlockToken {
    /// Build the list token for `kind`.
    pub fn list(kind: ListKind, items: Vec<String>) -> Self {
        match kind {
            ListKind::Unordered => Self::UnorderedList { items },
            ListKind::Ordered => Self::OrderedList { items },
        }
    }
}
