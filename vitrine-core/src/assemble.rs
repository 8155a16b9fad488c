//! HTML assembly.
//!
//! Turns a stored HTML document into a self-contained one: stylesheet links
//! and external scripts that live in the tenant are loaded and inlined, all
//! scripts are relocated to the end of the body, and every relative
//! reference they make is re-rooted under the tenant prefix.
//!
//! Sub-resources are fetched concurrently but always emitted in document
//! order. A sub-resource that fails to load is dropped; it never fails the
//! parent document.

use async_trait::async_trait;
use futures_util::future::{join, join_all};

use crate::asset::Tenant;
use crate::error::VitrineResult;
use crate::html::{split_document, Attributes, Scanner, Tag, TokenKind};
use crate::rewrite::{is_relative_reference, rewrite_css_urls, rewrite_fetch_calls};

/// Source of sub-resource text for the assembler.
#[async_trait]
pub trait SubResourceLoader: Send + Sync {
    /// Load a tenant-relative path as UTF-8 text.
    async fn load_text(&self, tenant: &Tenant, path: &str) -> VitrineResult<String>;
}

/// Normalize a relative `src`/`href` into a tenant-relative asset path.
///
/// Leading `./` and any query or fragment are dropped and the remainder is
/// percent-decoded. Returns `None` when nothing loadable is left or when a
/// segment would step outside the tenant.
pub fn sub_resource_path(reference: &str) -> Option<String> {
    let end = reference
        .find(|c: char| c == '?' || c == '#')
        .unwrap_or(reference.len());
    let decoded = urlencoding::decode(&reference[..end]).ok()?;

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains(|c: char| c == '\\' || c == '\0') => return None,
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Neutralize `</script` so inlined text cannot close its element early.
fn escape_script_close(text: &str) -> String {
    escape_close_tag(text, "script")
}

fn escape_style_close(text: &str) -> String {
    escape_close_tag(text, "style")
}

/// Replace every case-insensitive `</name` with `<\/name`, keeping the
/// original spelling of the name.
fn escape_close_tag(text: &str, name: &str) -> String {
    let needle = format!("</{}", name);
    let lower = text.to_ascii_lowercase();
    if !lower.contains(&needle) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for (at, _) in lower.match_indices(&needle) {
        out.push_str(&text[last..at]);
        out.push_str("<\\/");
        out.push_str(&text[at + 2..at + needle.len()]);
        last = at + needle.len();
    }
    out.push_str(&text[last..]);
    out
}

// ============================================================================
// PLAN
// ============================================================================

/// One entry in the emitted style block, in head order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StyleSource {
    /// A `<style>` element or absolute stylesheet link, emitted as-is.
    Verbatim(String),
    /// A tenant stylesheet to load and inline.
    Load { path: String, media: Option<String> },
}

/// One relocated script, in head-then-body order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptSource {
    Inline { attributes: Attributes, text: String },
    /// Absolute or rooted `src`, kept as a reference.
    Reference(String),
    /// A tenant script to load, rewrite and inline.
    Load { path: String, attributes: Attributes },
}

/// Everything extracted from the raw document before any I/O.
#[derive(Debug, Default)]
struct Plan {
    html_attributes: String,
    head: String,
    body_attributes: String,
    body: String,
    styles: Vec<StyleSource>,
    scripts: Vec<ScriptSource>,
}

impl Plan {
    fn build(raw_html: &str) -> Self {
        let parts = split_document(raw_html);
        let mut plan = Plan {
            html_attributes: parts.html_attributes.to_string(),
            body_attributes: parts.body_attributes.to_string(),
            ..Plan::default()
        };

        for token in Scanner::new(parts.head).tokenize() {
            let text = &parts.head[token.span.clone()];
            match &token.kind {
                TokenKind::RawText { tag, content } if tag.name == "script" => {
                    plan.scripts.push(classify_script(tag, &parts.head[content.clone()]));
                }
                TokenKind::RawText { tag, content } if tag.name == "style" => {
                    plan.styles.push(StyleSource::Verbatim(format!(
                        "<style{}>{}</style>",
                        tag.attributes.to_html(),
                        &parts.head[content.clone()]
                    )));
                }
                TokenKind::StartTag(tag) if tag.name == "link" && tag.attributes.is_stylesheet_link() => {
                    plan.styles.push(classify_stylesheet(tag, text));
                }
                _ => plan.head.push_str(text),
            }
        }

        let body = parts.body.as_ref();
        for token in Scanner::new(body).tokenize() {
            match &token.kind {
                TokenKind::RawText { tag, content } if tag.name == "script" => {
                    plan.scripts.push(classify_script(tag, &body[content.clone()]));
                }
                _ => plan.body.push_str(&body[token.span.clone()]),
            }
        }

        plan
    }
}

fn classify_stylesheet(tag: &Tag<'_>, text: &str) -> StyleSource {
    match tag.attributes.get("href") {
        Some(href) if is_relative_reference(href) => match sub_resource_path(href) {
            Some(path) => StyleSource::Load {
                path,
                media: tag.attributes.get("media").map(str::to_string),
            },
            None => StyleSource::Verbatim(text.to_string()),
        },
        _ => StyleSource::Verbatim(text.to_string()),
    }
}

fn classify_script(tag: &Tag<'_>, content: &str) -> ScriptSource {
    let attributes = tag.attributes.only(&["type"]);
    match tag.attributes.get("src") {
        None => ScriptSource::Inline {
            attributes,
            text: content.to_string(),
        },
        Some(src) if is_relative_reference(src) => match sub_resource_path(src) {
            Some(path) => ScriptSource::Load { path, attributes },
            None => ScriptSource::Reference(reference_script(&tag.attributes)),
        },
        Some(_) => ScriptSource::Reference(reference_script(&tag.attributes)),
    }
}

fn reference_script(attributes: &Attributes) -> String {
    format!("<script{}></script>", attributes.to_html())
}

// ============================================================================
// RENDERED DOCUMENT
// ============================================================================

/// An assembled document, ready to serialize in fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html_attributes: String,
    /// Head passthrough: everything except scripts, styles and stylesheet links.
    pub head: String,
    pub styles: Vec<String>,
    pub body_attributes: String,
    /// Body passthrough with scripts removed.
    pub body: String,
    pub scripts: Vec<String>,
}

impl RenderedDocument {
    pub fn render(&self) -> String {
        let capacity = self.head.len()
            + self.body.len()
            + self.styles.iter().map(String::len).sum::<usize>()
            + self.scripts.iter().map(String::len).sum::<usize>()
            + 96;
        let mut out = String::with_capacity(capacity);

        out.push_str("<!DOCTYPE html>\n<html");
        push_attributes(&mut out, &self.html_attributes);
        out.push_str("><head>");
        out.push_str(&self.head);
        for style in &self.styles {
            out.push_str(style);
        }
        out.push_str("</head><body");
        push_attributes(&mut out, &self.body_attributes);
        out.push('>');
        out.push_str(&self.body);
        for script in &self.scripts {
            out.push_str(script);
        }
        out.push_str("</body></html>");
        out
    }
}

fn push_attributes(out: &mut String, raw: &str) {
    if !raw.is_empty() {
        out.push(' ');
        out.push_str(raw);
    }
}

// ============================================================================
// ASSEMBLER
// ============================================================================

/// Assembles documents for one tenant.
pub struct Assembler<'a, L: SubResourceLoader + ?Sized> {
    tenant: &'a Tenant,
    loader: &'a L,
}

impl<'a, L: SubResourceLoader + ?Sized> Assembler<'a, L> {
    pub fn new(tenant: &'a Tenant, loader: &'a L) -> Self {
        Self { tenant, loader }
    }

    /// Assemble `raw_html` into a self-contained document.
    pub async fn assemble(&self, raw_html: &str) -> String {
        self.assemble_parts(raw_html).await.render()
    }

    /// Assemble without serializing.
    pub async fn assemble_parts(&self, raw_html: &str) -> RenderedDocument {
        let plan = Plan::build(raw_html);

        let styles = join_all(plan.styles.iter().map(|style| self.resolve_style(style)));
        let scripts = join_all(plan.scripts.iter().map(|script| self.resolve_script(script)));
        let (styles, scripts) = join(styles, scripts).await;

        RenderedDocument {
            html_attributes: plan.html_attributes,
            head: plan.head,
            styles: styles.into_iter().flatten().collect(),
            body_attributes: plan.body_attributes,
            body: plan.body,
            scripts: scripts.into_iter().flatten().collect(),
        }
    }

    async fn resolve_style(&self, style: &StyleSource) -> Option<String> {
        match style {
            StyleSource::Verbatim(text) => Some(text.clone()),
            StyleSource::Load { path, media } => {
                let css = self.load(path).await?;
                let media = media
                    .as_deref()
                    .map(|m| format!(" media=\"{}\"", m.replace('"', "&quot;")))
                    .unwrap_or_default();
                let css = rewrite_css_urls(&css, self.tenant);
                Some(format!("<style{}>{}</style>", media, escape_style_close(&css)))
            }
        }
    }

    async fn resolve_script(&self, script: &ScriptSource) -> Option<String> {
        match script {
            ScriptSource::Inline { attributes, text } => Some(format!(
                "<script{}>{}</script>",
                attributes.to_html(),
                escape_script_close(&rewrite_fetch_calls(text, self.tenant))
            )),
            ScriptSource::Reference(tag) => Some(tag.clone()),
            ScriptSource::Load { path, attributes } => {
                let js = self.load(path).await?;
                let js = rewrite_fetch_calls(&js, self.tenant);
                Some(format!(
                    "<script{}>{}</script>",
                    attributes.to_html(),
                    escape_script_close(&js)
                ))
            }
        }
    }

    async fn load(&self, path: &str) -> Option<String> {
        match self.loader.load_text(self.tenant, path).await {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!(
                    tenant = %self.tenant,
                    path = %path,
                    error = %err,
                    "Dropping sub-resource that failed to load"
                );
                None
            }
        }
    }
}
