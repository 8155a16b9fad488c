//! Tolerant HTML scanning and document splitting.
//!
//! This is not a parser. It finds the first matching boundary for each
//! construct, keeps source order, and never fails on malformed input.

mod scanner;
mod token;

use std::borrow::Cow;
use std::ops::Range;

pub use scanner::Scanner;
pub use token::{Attributes, Tag, Token, TokenKind};

/// A document split into the pieces the assembler rebuilds from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentParts<'a> {
    /// Raw attribute text of the first `<html>` start tag.
    pub html_attributes: &'a str,
    /// Inner content of the first head element; empty when absent.
    pub head: &'a str,
    /// Raw attribute text of the first `<body>` start tag.
    pub body_attributes: &'a str,
    /// Inner content of the first body element, or the rest of the
    /// document when there is no body element.
    pub body: Cow<'a, str>,
}

/// Located element: full extent plus inner content range.
struct Located<'a> {
    outer: Range<usize>,
    inner: Range<usize>,
    attributes_raw: &'a str,
}

/// Split a document into head and body content.
///
/// The first `<head>` runs to its `</head>`, or to a `<body>` start tag if
/// unclosed. The first `<body>` runs to its `</body>`, or to `</html>` / end
/// of input if unclosed. Without a body element, the body is the whole
/// document minus the head element, doctype and `<html>` wrapper tags.
pub fn split_document(source: &str) -> DocumentParts<'_> {
    let tokens = Scanner::new(source).tokenize();

    let html_attributes = tokens
        .iter()
        .find(|t| t.is_start_tag("html"))
        .and_then(|t| t.tag())
        .map(|tag| tag.attributes_raw)
        .unwrap_or("");

    let head = locate(&tokens, source.len(), "head", |t| t.is_start_tag("body"));
    let body = locate(&tokens, source.len(), "body", |t| t.is_end_tag("html"));

    let head_content = head
        .as_ref()
        .map(|h| &source[h.inner.clone()])
        .unwrap_or("");

    match body {
        Some(body) => DocumentParts {
            html_attributes,
            head: head_content,
            body_attributes: body.attributes_raw,
            body: Cow::Borrowed(&source[body.inner]),
        },
        None => {
            let skip = head.map(|h| h.outer);
            let remainder: String = tokens
                .iter()
                .filter(|t| {
                    let inside_head = skip
                        .as_ref()
                        .is_some_and(|r| t.span.start >= r.start && t.span.end <= r.end);
                    !inside_head
                        && !matches!(t.kind, TokenKind::Declaration)
                        && !t.is_start_tag("html")
                        && !t.is_end_tag("html")
                })
                .map(|t| &source[t.span.clone()])
                .collect();
            DocumentParts {
                html_attributes,
                head: head_content,
                body_attributes: "",
                body: Cow::Owned(remainder),
            }
        }
    }
}

/// Find the first `name` element. An unclosed element ends where `stop`
/// first matches, else at end of input.
fn locate<'a>(
    tokens: &[Token<'a>],
    source_len: usize,
    name: &str,
    stop: impl Fn(&Token<'a>) -> bool,
) -> Option<Located<'a>> {
    let (index, open) = tokens.iter().enumerate().find(|(_, t)| t.is_start_tag(name))?;
    let attributes_raw = open.tag().map(|tag| tag.attributes_raw).unwrap_or("");
    let inner_start = open.span.end;

    for token in &tokens[index + 1..] {
        if token.is_end_tag(name) {
            return Some(Located {
                outer: open.span.start..token.span.end,
                inner: inner_start..token.span.start,
                attributes_raw,
            });
        }
        if stop(token) {
            return Some(Located {
                outer: open.span.start..token.span.start,
                inner: inner_start..token.span.start,
                attributes_raw,
            });
        }
    }

    Some(Located {
        outer: open.span.start..source_len,
        inner: inner_start..source_len,
        attributes_raw,
    })
}
