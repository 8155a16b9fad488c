//! Reference rewriting.
//!
//! Bundles are authored as if deployed at the origin root, but each tenant is
//! served under `/{tenant}/`. These transforms re-root author-relative
//! references so a bundle works unchanged under its prefix. References that
//! are already absolute (`https://...`, `data:...`), protocol-relative
//! (`//cdn...`) or root-rooted (`/x`) are never touched.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::asset::Tenant;

/// `fetch(` followed by a static string literal as the first argument.
///
/// Groups: 1 = prefix up to the opening quote, 2/3/4 = double/single/backtick
/// literal body, 5 = whitespace plus the `,` or `)` that ends the argument.
/// Backtick literals containing `${` are dynamic and do not match.
static FETCH_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\bfetch\s*\(\s*)(?:"([^"\\\r\n]*)"|'([^'\\\r\n]*)'|`([^`\\$]*)`)(\s*[,)])"#)
        .expect("fetch call pattern is valid")
});

/// `url(...)` with a quoted or bare argument.
///
/// Groups: 1 = prefix, 2/3/4 = double/single/bare target, 5 = closing paren.
static CSS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(\burl\(\s*)(?:"([^"\r\n]*)"|'([^'\r\n]*)'|([^"'\s)]*))(\s*\))"#)
        .expect("css url pattern is valid")
});

/// True when `target` carries a URI scheme (`https:`, `data:`, `blob:`, ...).
pub fn has_scheme(target: &str) -> bool {
    let Some(colon) = target.find(':') else {
        return false;
    };
    let scheme = &target[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// True for references that must pass through untouched: absolute URLs,
/// protocol-relative URLs and root-rooted paths.
pub fn is_absolute_or_rooted(target: &str) -> bool {
    target.starts_with('/') || has_scheme(target)
}

/// True when `target` is an author-relative reference that needs re-rooting.
///
/// Empty and fragment-only targets (`#gradient`) are left alone.
pub fn is_relative_reference(target: &str) -> bool {
    !target.is_empty() && !target.starts_with('#') && !is_absolute_or_rooted(target)
}

/// Re-root `target` under the tenant prefix if it is relative.
pub fn reroot<'a>(target: &'a str, tenant: &Tenant) -> Cow<'a, str> {
    if is_relative_reference(target) {
        Cow::Owned(tenant.rooted(target))
    } else {
        Cow::Borrowed(target)
    }
}

/// Rewrite `fetch("relative")` call sites to `fetch("/{tenant}/relative")`.
///
/// Only a static string literal in first-argument position is rewritten;
/// quote style and any following arguments are preserved.
pub fn rewrite_fetch_calls<'a>(source: &'a str, tenant: &Tenant) -> Cow<'a, str> {
    FETCH_CALL.replace_all(source, |caps: &Captures<'_>| {
        let (quote, literal) = quoted_group(caps, "`");
        format!(
            "{}{quote}{}{quote}{}",
            &caps[1],
            reroot(literal, tenant),
            &caps[5],
        )
    })
}

/// Rewrite relative `url(...)` targets in CSS to `/{tenant}/target`.
pub fn rewrite_css_urls<'a>(source: &'a str, tenant: &Tenant) -> Cow<'a, str> {
    CSS_URL.replace_all(source, |caps: &Captures<'_>| {
        let (quote, target) = quoted_group(caps, "");
        format!(
            "{}{quote}{}{quote}{}",
            &caps[1],
            reroot(target, tenant),
            &caps[5],
        )
    })
}

/// Pick whichever of groups 2..=4 matched, with the quote it was wrapped in.
///
/// Group 4 is a backtick literal for `fetch` and a bare target for `url()`,
/// so its quote is supplied by the caller.
fn quoted_group<'c>(caps: &'c Captures<'_>, group4_quote: &'static str) -> (&'static str, &'c str) {
    if let Some(m) = caps.get(2) {
        ("\"", m.as_str())
    } else if let Some(m) = caps.get(3) {
        ("'", m.as_str())
    } else if let Some(m) = caps.get(4) {
        (group4_quote, m.as_str())
    } else {
        ("", "")
    }
}
