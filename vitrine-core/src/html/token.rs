//! Token types for the tolerant HTML scanner.

use std::ops::Range;

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Attributes of a start tag, in source order.
///
/// Names are lower-cased; values are kept raw (no entity decoding). A
/// valueless attribute (`defer`) has `None` as its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, Option<String>)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: String, value: Option<String>) {
        self.0.push((name, value));
    }

    /// Value of the first attribute called `name`. Valueless attributes
    /// yield `Some("")`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Keep only the named attributes.
    pub fn only(&self, names: &[&str]) -> Attributes {
        Attributes(
            self.0
                .iter()
                .filter(|(n, _)| names.contains(&n.as_str()))
                .cloned()
                .collect(),
        )
    }

    /// Serialize as ` name="value"` pairs, each preceded by a space.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.0 {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
        out
    }

    /// True when `rel` lists the `stylesheet` keyword.
    pub fn is_stylesheet_link(&self) -> bool {
        self.get("rel")
            .map(|rel| {
                rel.split_ascii_whitespace()
                    .any(|kw| kw.eq_ignore_ascii_case("stylesheet"))
            })
            .unwrap_or(false)
    }
}

// ============================================================================
// TOKENS
// ============================================================================

/// A start tag, or the start tag of a raw-text element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Lower-cased element name.
    pub name: String,
    pub attributes: Attributes,
    /// Raw attribute text between the name and the closing `>`, trimmed.
    pub attributes_raw: &'a str,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Character data between markup.
    Text,
    /// `<!-- ... -->`; opaque.
    Comment,
    /// `<!DOCTYPE ...>`, `<?...>` and other `<!...>` constructs.
    Declaration,
    StartTag(Tag<'a>),
    EndTag { name: String },
    /// `<script>` or `<style>` with its raw content. An unclosed element
    /// runs to the end of input.
    RawText { tag: Tag<'a>, content: Range<usize> },
}

/// A token and the byte range it covers in the scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    pub fn is_start_tag(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::StartTag(tag) if tag.name == name)
    }

    pub fn is_end_tag(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::EndTag { name: n } if n == name)
    }

    /// Start tag data for plain start tags and raw-text elements.
    pub fn tag(&self) -> Option<&Tag<'a>> {
        match &self.kind {
            TokenKind::StartTag(tag) | TokenKind::RawText { tag, .. } => Some(tag),
            _ => None,
        }
    }
}
