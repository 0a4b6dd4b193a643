//! HTML emitter for the document tree.
//!
//! [`HtmlWriter`] owns the output buffer and knows the tag shapes;
//! [`HtmlRenderer`] walks a [`Document`] and decides what to write.

use rustc_hash::FxHashSet;

use crate::escape;
use crate::tree::{Document, Node};
use crate::Options;

/// Slug used when a heading has no usable characters.
const FALLBACK_SLUG: &str = "section";

/// HTML output writer with pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use atommark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.paragraph_start();
/// writer.write_escaped_text("Hello <World>");
/// writer.paragraph_end();
///
/// assert_eq!(writer.into_string(), "<p>Hello &lt;World&gt;</p>");
/// ```
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Typical HTML is ~1.25x input size.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: String::with_capacity(input_len + input_len / 4),
        }
    }

    /// Write after the existing contents of `out`, reusing its allocation.
    ///
    /// Reserves room for ~1.25x `input_len` more bytes.
    #[inline]
    pub fn from_string(mut out: String, input_len: usize) -> Self {
        out.reserve(input_len + input_len / 4);
        Self { out }
    }

    /// Write a string without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Write text with HTML escaping (for text content).
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write an attribute value, escaped unless `raw` is set.
    #[inline]
    pub fn write_attr(&mut self, value: &str, raw: bool) {
        if raw {
            self.out.push_str(value);
        } else {
            escape::escape_attr_into(&mut self.out, value);
        }
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Check if output is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Clear output for reuse (keeps capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    /// Get output as str.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Take ownership as String.
    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    // --- Common HTML Elements ---

    /// Write paragraph start: `<p>`
    #[inline]
    pub fn paragraph_start(&mut self) {
        self.write_str("<p>");
    }

    /// Write paragraph end: `</p>`
    #[inline]
    pub fn paragraph_end(&mut self) {
        self.write_str("</p>");
    }

    /// Write heading start: `<hN>` or `<hN id="...">`
    #[inline]
    pub fn heading_start(&mut self, level: u8, id: Option<&str>) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("<h");
        self.out.push(char::from(b'0' + level));
        if let Some(id) = id {
            self.write_str(" id=\"");
            self.write_attr(id, false);
            self.write_str("\"");
        }
        self.write_str(">");
    }

    /// Write heading end: `</hN>`
    #[inline]
    pub fn heading_end(&mut self, level: u8) {
        debug_assert!((1..=6).contains(&level));
        self.write_str("</h");
        self.out.push(char::from(b'0' + level));
        self.write_str(">");
    }

    /// Write code block start with optional language class.
    #[inline]
    pub fn code_block_start(&mut self, lang: Option<&str>) {
        match lang {
            Some(l) if !l.is_empty() => {
                self.write_str("<pre><code class=\"language-");
                self.write_attr(l, false);
                self.write_str("\">");
            }
            _ => {
                self.write_str("<pre><code>");
            }
        }
    }

    /// Write code block end: `</code></pre>`
    #[inline]
    pub fn code_block_end(&mut self) {
        self.write_str("</code></pre>");
    }

    /// Write list start (unordered): `<ul>\n`
    #[inline]
    pub fn ul_start(&mut self) {
        self.write_str("<ul>\n");
    }

    /// Write list end (unordered): `</ul>`
    #[inline]
    pub fn ul_end(&mut self) {
        self.write_str("</ul>");
    }

    /// Write list start (ordered): `<ol>\n`
    #[inline]
    pub fn ol_start(&mut self) {
        self.write_str("<ol>\n");
    }

    /// Write list end (ordered): `</ol>`
    #[inline]
    pub fn ol_end(&mut self) {
        self.write_str("</ol>");
    }

    /// Write list item start: `<li>`
    #[inline]
    pub fn li_start(&mut self) {
        self.write_str("<li>");
    }

    /// Write list item end: `</li>`
    #[inline]
    pub fn li_end(&mut self) {
        self.write_str("</li>");
    }

    /// Write emphasis start: `<em>`
    #[inline]
    pub fn em_start(&mut self) {
        self.write_str("<em>");
    }

    /// Write emphasis end: `</em>`
    #[inline]
    pub fn em_end(&mut self) {
        self.write_str("</em>");
    }

    /// Write strong start: `<strong>`
    #[inline]
    pub fn strong_start(&mut self) {
        self.write_str("<strong>");
    }

    /// Write strong end: `</strong>`
    #[inline]
    pub fn strong_end(&mut self) {
        self.write_str("</strong>");
    }

    /// Write link start: `<a href="url">`
    #[inline]
    pub fn link_start(&mut self, href: &str, raw: bool) {
        self.write_str("<a href=\"");
        self.write_attr(href, raw);
        self.write_str("\">");
    }

    /// Write link end: `</a>`
    #[inline]
    pub fn link_end(&mut self) {
        self.write_str("</a>");
    }

    /// Write image: `<img src="..." alt="..." />`
    #[inline]
    pub fn image(&mut self, src: &str, alt: &str, raw: bool) {
        self.write_str("<img src=\"");
        self.write_attr(src, raw);
        self.write_str("\" alt=\"");
        self.write_attr(alt, raw);
        self.write_str("\" />");
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a document tree and writes HTML.
///
/// Heading ids are unique within one renderer; use a fresh renderer per
/// document.
pub struct HtmlRenderer {
    writer: HtmlWriter,
    options: Options,
    /// Heading ids handed out so far.
    used_ids: FxHashSet<String>,
}

impl HtmlRenderer {
    /// Create a renderer writing into `writer`.
    pub fn new(writer: HtmlWriter, options: Options) -> Self {
        Self {
            writer,
            options,
            used_ids: FxHashSet::default(),
        }
    }

    /// Render the top-level blocks, separated by newlines.
    pub fn document(&mut self, doc: &Document) {
        self.nodes_separated(&doc.children);
    }

    /// Render a single node and its descendants.
    pub fn node(&mut self, node: &Node) {
        let raw = !self.options.escape_attributes;
        match node {
            Node::Heading { level, children } => {
                let level = clamp_heading_level(*level);
                let id = self
                    .options
                    .heading_ids
                    .then(|| self.unique_id(&slugify(&node.plain_text())));
                self.writer.heading_start(level, id.as_deref());
                self.nodes(children);
                self.writer.heading_end(level);
            }
            Node::Paragraph { children } => {
                self.writer.paragraph_start();
                self.nodes(children);
                self.writer.paragraph_end();
            }
            Node::Image { alt, src } => self.writer.image(src, alt, raw),
            Node::Link { href, children } => {
                self.writer.link_start(href, raw);
                self.nodes(children);
                self.writer.link_end();
            }
            Node::UnorderedList { children } => {
                self.writer.ul_start();
                self.list_items(children);
                self.writer.ul_end();
            }
            Node::OrderedList { children } => {
                self.writer.ol_start();
                self.list_items(children);
                self.writer.ol_end();
            }
            Node::ListItem { children } => {
                self.writer.li_start();
                self.nodes(children);
                self.writer.li_end();
            }
            Node::CodeBlock { content, lang } => {
                self.writer.code_block_start(lang.as_deref());
                self.writer.write_escaped_text(content);
                self.writer.code_block_end();
            }
            Node::Text { content } => self.writer.write_escaped_text(content),
            Node::Bold { children } => {
                self.writer.strong_start();
                self.nodes(children);
                self.writer.strong_end();
            }
            Node::Italic { children } => {
                self.writer.em_start();
                self.nodes(children);
                self.writer.em_end();
            }
        }
    }

    /// Finish rendering and take the output.
    pub fn finish(self) -> HtmlWriter {
        self.writer
    }

    fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn nodes_separated(&mut self, nodes: &[Node]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.writer.newline();
            }
            self.node(node);
        }
    }

    /// `<li>` items, each on its own line.
    fn list_items(&mut self, items: &[Node]) {
        for item in items {
            self.node(item);
            self.writer.newline();
        }
    }

    fn unique_id(&mut self, base: &str) -> String {
        let mut candidate = base.to_owned();
        let mut n = 0;
        while self.used_ids.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.used_ids.insert(candidate.clone());
        candidate
    }
}

/// Clamp a heading level into the `<h1>`..`<h6>` range.
#[inline]
pub fn clamp_heading_level(level: u8) -> u8 {
    level.clamp(1, 6)
}

/// Turn heading text into an id.
///
/// Lowercases, keeps alphanumerics, `-` and `_`, turns whitespace runs
/// into a single `-` and drops everything else.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if !(ch.is_alphanumeric() || ch == '-' || ch == '_') {
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.extend(ch.to_lowercase());
    }
    if slug.is_empty() {
        slug.push_str(FALLBACK_SLUG);
    }
    slug
}

/// Render a document with default options.
///
/// # Example
/// ```
/// use atommark::tree::{Document, Node};
///
/// let doc = Document {
///     children: vec![Node::Paragraph { children: vec![Node::text("a < b")] }],
/// };
/// assert_eq!(atommark::render::render(&doc), "<p>a &lt; b</p>");
/// ```
pub fn render(doc: &Document) -> String {
    render_with_options(doc, &Options::default())
}

/// Render a document with options.
pub fn render_with_options(doc: &Document, options: &Options) -> String {
    let mut renderer = HtmlRenderer::new(HtmlWriter::new(), *options);
    renderer.document(doc);
    renderer.finish().into_string()
}

/// Render a single node with default options.
pub fn render_node(node: &Node) -> String {
    let mut renderer = HtmlRenderer::new(HtmlWriter::new(), Options::default());
    renderer.node(node);
    renderer.finish().into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(children: Vec<Node>) -> Node {
        Node::Paragraph { children }
    }

    #[test]
    fn test_writer_new() {
        let writer = HtmlWriter::new();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_writer_capacity() {
        let writer = HtmlWriter::with_capacity_for(1000);
        assert!(writer.out.capacity() >= 1250);
    }

    #[test]
    fn test_writer_escaped_text() {
        let mut writer = HtmlWriter::new();
        writer.write_escaped_text("<script>");
        assert_eq!(writer.as_str(), "&lt;script&gt;");
    }

    #[test]
    fn test_writer_heading_levels() {
        for level in 1..=6 {
            let mut writer = HtmlWriter::new();
            writer.heading_start(level, None);
            writer.heading_end(level);
            assert_eq!(writer.as_str(), format!("<h{level}></h{level}>"));
        }
    }

    #[test]
    fn test_writer_code_block_no_lang() {
        let mut writer = HtmlWriter::new();
        writer.code_block_start(None);
        writer.code_block_end();
        assert_eq!(writer.as_str(), "<pre><code></code></pre>");
    }

    #[test]
    fn test_writer_clear_reuse() {
        let mut writer = HtmlWriter::new();
        writer.write_str("first");
        writer.clear();
        writer.write_str("second");
        assert_eq!(writer.len(), 6);
        assert_eq!(writer.as_str(), "second");
    }

    #[test]
    fn test_heading_level_clamped() {
        let zero = Node::Heading {
            level: 0,
            children: vec![Node::text("a")],
        };
        let nine = Node::Heading {
            level: 9,
            children: vec![Node::text("b")],
        };
        assert_eq!(render_node(&zero), "<h1>a</h1>");
        assert_eq!(render_node(&nine), "<h6>b</h6>");
    }

    #[test]
    fn test_document_joined_with_newlines() {
        let doc = Document {
            children: vec![para(vec![Node::text("a")]), para(vec![Node::text("b")])],
        };
        assert_eq!(render(&doc), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(&Document::default()), "");
    }

    #[test]
    fn test_list() {
        let list = Node::OrderedList {
            children: vec![
                Node::ListItem {
                    children: vec![Node::text("a")],
                },
                Node::ListItem {
                    children: vec![Node::text("b")],
                },
            ],
        };
        assert_eq!(render_node(&list), "<ol>\n<li>a</li>\n<li>b</li>\n</ol>");
    }

    #[test]
    fn test_code_block_escaped() {
        let code = Node::CodeBlock {
            content: "a < b && c".to_owned(),
            lang: Some("c".to_owned()),
        };
        assert_eq!(
            render_node(&code),
            "<pre><code class=\"language-c\">a &lt; b &amp;&amp; c</code></pre>"
        );
    }

    #[test]
    fn test_image_attributes_escaped() {
        let image = Node::Image {
            alt: "\"quoted\"".to_owned(),
            src: "a.png?x=1&y=2".to_owned(),
        };
        assert_eq!(
            render_node(&image),
            "<img src=\"a.png?x=1&amp;y=2\" alt=\"&quot;quoted&quot;\" />"
        );
    }

    #[test]
    fn test_raw_attributes() {
        let options = Options {
            escape_attributes: false,
            ..Options::default()
        };
        let doc = Document {
            children: vec![Node::Link {
                href: "/a?b=1&c=2".to_owned(),
                children: vec![Node::text("x & y")],
            }],
        };
        assert_eq!(
            render_with_options(&doc, &options),
            "<a href=\"/a?b=1&c=2\">x &amp; y</a>"
        );
    }

    #[test]
    fn test_inline_nesting() {
        let node = para(vec![Node::Bold {
            children: vec![Node::Italic {
                children: vec![Node::text("x")],
            }],
        }]);
        assert_eq!(render_node(&node), "<p><strong><em>x</em></strong></p>");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("foo_bar-baz"), "foo_bar-baz");
        assert_eq!(slugify("Héllo Wörld"), "héllo-wörld");
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
    }

    #[test]
    fn test_heading_ids_unique() {
        let options = Options {
            heading_ids: true,
            ..Options::default()
        };
        let heading = Node::Heading {
            level: 2,
            children: vec![Node::text("Intro")],
        };
        let doc = Document {
            children: vec![heading.clone(), heading.clone(), heading],
        };
        assert_eq!(
            render_with_options(&doc, &options),
            "<h2 id=\"intro\">Intro</h2>\n<h2 id=\"intro-1\">Intro</h2>\n<h2 id=\"intro-2\">Intro</h2>"
        );
    }
}
