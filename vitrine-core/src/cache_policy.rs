//! Cache policy engine.
//!
//! A tenant may publish a policy document mapping extensions (or `default`)
//! to a duration: `{"js": "1y", "html": "60s", "default": "30s"}`. Without a
//! usable document the built-in table applies.

use std::collections::HashMap;

use serde::Deserialize;

/// One year, in seconds.
pub const ONE_YEAR_SECS: u64 = 31_536_000;

/// Key consulted when the extension has no entry of its own.
pub const DEFAULT_KEY: &str = "default";

/// Extensions cached for a year when the tenant has no policy document.
pub const BUILTIN_LONG_LIVED: &[&str] = &["js", "css", "png", "jpg", "jpeg", "svg", "mp4"];

/// A `Cache-Control` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    /// `public, max-age=31536000, immutable`
    Immutable,
    /// `public, max-age=<n>`
    MaxAge(u64),
    /// `no-cache`
    NoCache,
}

impl CacheDirective {
    /// Interpret a policy value: `"1y"`, `"<n>s"`, anything else is no-cache.
    pub fn from_policy_value(value: &str) -> Self {
        let value = value.trim();
        if value == "1y" {
            return CacheDirective::Immutable;
        }
        value
            .strip_suffix('s')
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(CacheDirective::MaxAge)
            .unwrap_or(CacheDirective::NoCache)
    }

    /// Header value for `Cache-Control`.
    pub fn header_value(&self) -> String {
        match self {
            CacheDirective::Immutable => format!("public, max-age={}, immutable", ONE_YEAR_SECS),
            CacheDirective::MaxAge(secs) => format!("public, max-age={}", secs),
            CacheDirective::NoCache => "no-cache".to_string(),
        }
    }
}

/// Built-in directive for tenants without a usable policy document.
pub fn builtin_directive(extension: &str) -> CacheDirective {
    if BUILTIN_LONG_LIVED.contains(&extension) {
        CacheDirective::Immutable
    } else {
        CacheDirective::NoCache
    }
}

/// A parsed tenant policy document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CachePolicy(HashMap<String, serde_json::Value>);

impl CachePolicy {
    /// Parse a policy document. The top level must be a JSON object; keys
    /// are matched case-insensitively.
    pub fn parse(document: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_slice(document)?;
        Ok(Self(
            raw.into_iter()
                .map(|(key, value)| (key.to_ascii_lowercase(), value))
                .collect(),
        ))
    }

    /// Directive for `extension`, falling back to the `default` entry.
    ///
    /// Non-string values and a missing entry both mean no-cache.
    pub fn directive_for(&self, extension: &str) -> CacheDirective {
        match self.0.get(extension).or_else(|| self.0.get(DEFAULT_KEY)) {
            Some(serde_json::Value::String(value)) => CacheDirective::from_policy_value(value),
            _ => CacheDirective::NoCache,
        }
    }
}

/// Resolve the directive for `extension` given the tenant's raw policy
/// document, if any. Absent or unparseable documents use the built-in table.
pub fn policy_for(document: Option<&[u8]>, extension: &str) -> CacheDirective {
    let Some(document) = document else {
        return builtin_directive(extension);
    };
    match CachePolicy::parse(document) {
        Ok(policy) => policy.directive_for(extension),
        Err(err) => {
            tracing::warn!(error = %err, "Unparseable cache policy document, using defaults");
            builtin_directive(extension)
        }
    }
}
