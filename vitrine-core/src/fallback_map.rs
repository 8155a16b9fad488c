//! Per-tenant fallback maps.
//!
//! A tenant may publish `{"404": "error.html", "500": "oops.html"}` to serve
//! its own content for failed requests.

use std::collections::HashMap;

/// Status code → tenant-relative asset path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackMap(HashMap<u16, String>);

impl FallbackMap {
    /// Parse a fallback map document.
    ///
    /// Keys that are not status codes and values that are not non-empty
    /// strings are skipped; a document that is not a JSON object is an error.
    pub fn parse(document: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_slice(document)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let status = key.trim().parse::<u16>().ok()?;
                match value {
                    serde_json::Value::String(target) if !target.trim().is_empty() => {
                        Some((status, target.trim().trim_start_matches('/').to_string()))
                    }
                    _ => None,
                }
            })
            .collect();
        Ok(Self(entries))
    }

    /// Target path for `status`, if mapped.
    pub fn target(&self, status: u16) -> Option<&str> {
        self.0.get(&status).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
