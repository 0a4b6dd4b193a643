//! Block-level tokenizer for Markdown.
//!
//! The tokenizer is line-oriented and handles:
//! - Fenced code blocks
//! - ATX headings
//! - Image and link lines
//! - Bullet and numbered lists
//! - Paragraphs

mod token;
mod tokenizer;

pub use token::{BlockToken, ListKind};
pub use tokenizer::BlockTokenizer;

/// Split `text` into block tokens.
///
/// Never fails: anything that is not recognized ends up as paragraph text.
///
/// # Example
/// ```
/// use atommark::block::{tokenize, BlockToken};
///
/// let tokens = tokenize("- a\n- b");
/// assert_eq!(
///     tokens,
///     vec![BlockToken::UnorderedList {
///         items: vec!["a".to_owned(), "b".to_owned()],
///     }]
/// );
/// ```
pub fn tokenize(text: &str) -> Vec<BlockToken> {
    let mut tokens = Vec::with_capacity((text.len() / 64).max(8));
    BlockTokenizer::new(text).tokenize(&mut tokens);
    tokens
}
