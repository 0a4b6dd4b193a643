//! Inline-level token types.

/// Character-level markup recognized within a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineToken {
    /// Literal text, not yet escaped.
    Text(String),

    /// Strong emphasis (`**bold**`).
    Bold(Vec<InlineToken>),

    /// Emphasis (`*em*`).
    Italic(Vec<InlineToken>),

    /// Inline link `[text](href)`.
    Link {
        /// Link destination, verbatim.
        href: String,
        /// Scanned link text.
        children: Vec<InlineToken>,
    },
}

impl InlineToken {
    /// Build a text token from a borrowed slice.
    #[inline]
    pub fn text(content: &str) -> Self {
        Self::Text(content.to_owned())
    }
}
