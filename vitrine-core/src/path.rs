//! Request path resolution.
//!
//! Maps a raw URL path onto a (tenant, relative path) pair in the flat
//! per-tenant key space:
//!
//! - `/acme/`            → `acme` + `index.html`
//! - `/acme/docs/`       → `acme` + `docs/index.html`
//! - `/acme/about`       → `acme` + `about.html`
//! - `/acme/app.js`      → `acme` + `app.js`
//! - `/acme`             → permanent redirect to `/acme/`
//! - `/`                 → client input error

use crate::asset::{AssetPath, Tenant};
use crate::error::{VitrineError, VitrineResult};

/// Implicit document served for directory paths.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Extension appended to extension-less final components.
pub const CLEAN_URL_SUFFIX: &str = ".html";

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Serve this asset.
    Asset(AssetPath),
    /// Permanently redirect to this location.
    Redirect(String),
}

/// Resolve a raw request path (and optional query string) against the
/// directory, implicit-index and implicit-extension conventions.
pub fn resolve(raw_path: &str, query: Option<&str>) -> VitrineResult<Resolution> {
    let raw_segments: Vec<&str> = raw_path.split('/').filter(|s| !s.is_empty()).collect();

    let Some((raw_tenant, raw_rest)) = raw_segments.split_first() else {
        return Err(VitrineError::client_input("missing tenant segment"));
    };

    let tenant = decode_segment(raw_tenant)?;
    let rest = raw_rest
        .iter()
        .map(|segment| decode_segment(segment))
        .collect::<VitrineResult<Vec<_>>>()?;

    let trailing_slash = raw_path.ends_with('/');

    if rest.is_empty() && !trailing_slash {
        let mut location = format!("/{}/", raw_tenant);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            location.push('?');
            location.push_str(query);
        }
        return Ok(Resolution::Redirect(location));
    }

    let mut candidate = if rest.is_empty() {
        INDEX_DOCUMENT.to_string()
    } else if trailing_slash {
        format!("{}/{}", rest.join("/"), INDEX_DOCUMENT)
    } else {
        rest.join("/")
    };

    let last = candidate.rsplit('/').next().unwrap_or(&candidate);
    if !last.contains('.') {
        candidate.push_str(CLEAN_URL_SUFFIX);
    }

    Ok(Resolution::Asset(AssetPath::new(Tenant::new(tenant), candidate)))
}

/// Percent-decode one segment and reject anything that could leave the
/// tenant's key prefix.
fn decode_segment(raw: &str) -> VitrineResult<String> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| VitrineError::client_input(format!("segment '{}' is not valid UTF-8", raw)))?
        .into_owned();

    if decoded == "." || decoded == ".." {
        return Err(VitrineError::client_input("relative segments are not allowed"));
    }
    if decoded.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
        return Err(VitrineError::client_input(format!(
            "segment '{}' contains a reserved character",
            raw
        )));
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(raw: &str) -> AssetPath {
        match resolve(raw, None) {
            Ok(Resolution::Asset(asset)) => asset,
            other => panic!("expected asset for {raw}, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_slash_serves_index() {
        let resolved = asset("/acme/");
        assert_eq!(resolved.tenant.as_str(), "acme");
        assert_eq!(resolved.path, "index.html");
        assert_eq!(resolved.extension, "html");
    }

    #[test]
    fn test_nested_directory_serves_index() {
        assert_eq!(asset("/acme/docs/").path, "docs/index.html");
        assert_eq!(asset("/acme/docs/guide/").path, "docs/guide/index.html");
    }

    #[test]
    fn test_clean_url_gets_html_extension() {
        assert_eq!(asset("/acme/about").path, "about.html");
        assert_eq!(asset("/acme/v1.2/notes").path, "v1.2/notes.html");
    }

    #[test]
    fn test_explicit_extension_is_kept() {
        let resolved = asset("/acme/js/App.JS");
        assert_eq!(resolved.path, "js/App.JS");
        assert_eq!(resolved.extension, "js");
    }

    #[test]
    fn test_bare_tenant_redirects() {
        assert_eq!(
            resolve("/acme", None),
            Ok(Resolution::Redirect("/acme/".to_string()))
        );
        assert_eq!(
            resolve("/acme", Some("ref=home")),
            Ok(Resolution::Redirect("/acme/?ref=home".to_string()))
        );
    }

    #[test]
    fn test_redirect_never_protocol_relative() {
        assert_eq!(
            resolve("//evil.example", None),
            Ok(Resolution::Redirect("/evil.example/".to_string()))
        );
    }

    #[test]
    fn test_repeated_slashes_collapse() {
        assert_eq!(asset("/acme//css//site.css").path, "css/site.css");
    }

    #[test]
    fn test_missing_tenant_is_client_input() {
        assert!(matches!(resolve("/", None), Err(VitrineError::ClientInput { .. })));
        assert!(matches!(resolve("", None), Err(VitrineError::ClientInput { .. })));
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(asset("/acme/my%20page.html").path, "my page.html");
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(resolve("/acme/../other/secret.html", None).is_err());
        assert!(resolve("/acme/%2e%2e/x.html", None).is_err());
        assert!(resolve("/acme/a%2Fb.html", None).is_err());
    }
}
