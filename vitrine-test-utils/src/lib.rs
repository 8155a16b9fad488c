//! Vitrine Test Utilities
//!
//! Shared test infrastructure for the Vitrine workspace:
//! - A sample tenant bundle and a store seeded with it
//! - Proptest generators for tenants, references and documents

use std::sync::Arc;

pub use vitrine_core::{AssetPath, Tenant};
pub use vitrine_storage::{AssetStore, InMemoryAssetStore};

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;

    /// Tenant every fixture asset lives under.
    pub const TENANT: &str = "acme";

    pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<title>Acme</title>
<link rel="stylesheet" href="css/site.css">
<script>window.boot = 1;</script>
</head>
<body class="home">
<h1>Acme</h1>
<script src="js/app.js"></script>
<script src="js/missing.js"></script>
<script src="https://cdn.example.com/lib.js"></script>
</body>
</html>"#;

    pub const SITE_CSS: &str = "body { background: url(\"img/bg.png\"); }";

    pub const APP_JS: &str = "fetch(\"data.json\").then(r => r.json());";

    pub const ERROR_HTML: &str =
        "<html><head><title>Lost</title></head><body><p>Nothing here</p></body></html>";

    pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    /// `(relative path, content)` for the sample bundle, without any
    /// tenant documents.
    pub fn sample_bundle() -> Vec<(&'static str, Vec<u8>)> {
        vec![
            ("index.html", INDEX_HTML.as_bytes().to_vec()),
            ("about.html", b"<p>About Acme</p>".to_vec()),
            ("docs/index.html", b"<p>Docs</p>".to_vec()),
            ("css/site.css", SITE_CSS.as_bytes().to_vec()),
            ("js/app.js", APP_JS.as_bytes().to_vec()),
            ("img/logo.png", PNG_BYTES.to_vec()),
            ("data.json", br#"{"ok":true}"#.to_vec()),
            ("notes.txt", b"plain text".to_vec()),
            ("error.html", ERROR_HTML.as_bytes().to_vec()),
        ]
    }

    /// Cache policy document used by the policy scenarios.
    pub fn cache_policy_document() -> Vec<u8> {
        serde_json::json!({ "js": "1y", "default": "30s" })
            .to_string()
            .into_bytes()
    }

    /// Fallback map naming `error.html` for 404.
    pub fn fallback_map_document() -> Vec<u8> {
        serde_json::json!({ "404": "error.html" })
            .to_string()
            .into_bytes()
    }

    /// In-memory store holding the sample bundle under [`TENANT`] plus any
    /// `extra` `(relative path, content)` pairs.
    pub fn seeded_store(extra: Vec<(&str, Vec<u8>)>) -> InMemoryAssetStore {
        let tenant = Tenant::new(TENANT);
        let bundle = sample_bundle()
            .into_iter()
            .map(|(path, content)| (tenant.key_for(path), content));
        let extra = extra
            .into_iter()
            .map(|(path, content)| (tenant.key_for(path), content));
        InMemoryAssetStore::with_assets(bundle.chain(extra))
    }

    /// [`seeded_store`] behind the trait object the server consumes.
    pub fn shared_store(extra: Vec<(&str, Vec<u8>)>) -> Arc<dyn AssetStore> {
        Arc::new(seeded_store(extra))
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    use proptest::prelude::*;

    use super::*;

    /// Tenant identifiers: lower-case, URL-safe, never a single dot segment.
    pub fn arb_tenant() -> impl Strategy<Value = Tenant> {
        "[a-z][a-z0-9-]{0,15}".prop_map(Tenant::new)
    }

    /// Author-relative references: no scheme, not rooted, no quotes.
    pub fn arb_relative_reference() -> impl Strategy<Value = String> {
        "[a-z0-9_-]{1,12}(/[a-z0-9_-]{1,12}){0,3}\\.(js|css|json|png|html)"
    }

    /// References rewriting must leave alone.
    pub fn arb_absolute_reference() -> impl Strategy<Value = String> {
        (
            prop_oneof![Just("/"), Just("http://"), Just("https://"), Just("//")],
            "[a-z0-9./_-]{0,24}",
        )
            .prop_map(|(prefix, rest)| format!("{}{}", prefix, rest))
    }

    /// Request paths under a tenant, as they arrive on the wire.
    pub fn arb_request_path() -> impl Strategy<Value = String> {
        (arb_tenant(), "[a-z0-9_-]{1,10}(/[a-z0-9_-]{1,10}){0,3}", any::<bool>()).prop_map(
            |(tenant, rest, trailing)| {
                let mut path = format!("/{}/{}", tenant, rest);
                if trailing {
                    path.push('/');
                }
                path
            },
        )
    }

    /// Arbitrary text that looks vaguely like markup; malformed on purpose.
    pub fn arb_markup() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("<head>".to_string()),
                Just("</head>".to_string()),
                Just("<body>".to_string()),
                Just("</body>".to_string()),
                Just("<script>".to_string()),
                Just("</script>".to_string()),
                Just("<script src=\"a.js\">".to_string()),
                Just("<style>".to_string()),
                Just("</style>".to_string()),
                Just("<link rel=stylesheet href=a.css>".to_string()),
                Just("<!--".to_string()),
                Just("-->".to_string()),
                Just("<".to_string()),
                "[a-zA-Z0-9 =\"'/.]{0,12}",
            ],
            0..24,
        )
        .prop_map(|parts| parts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_seeded_store_keys_are_tenant_scoped() {
        let store = seeded_store(vec![("_cache.json", cache_policy_document())]);
        assert_eq!(store.len(), sample_bundle().len() + 1);
    }
}
