//! Identity and content types for tenant assets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content_type::ContentType;

/// Namespace owning a set of assets, identified by the first path segment.
///
/// A tenant has no standalone record; it exists purely as a key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tenant(String);

impl Tenant {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backing-store key for a path inside this tenant: `"{tenant}/{path}"`.
    pub fn key_for(&self, path: &str) -> String {
        format!("{}/{}", self.0, path)
    }

    /// Absolute URL path rooted under this tenant: `"/{tenant}/{path}"`.
    pub fn rooted(&self, path: &str) -> String {
        format!("/{}/{}", self.0, path)
    }
}

impl fmt::Display for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tenant {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A resolved (tenant, relative path) pair with its lower-cased extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath {
    pub tenant: Tenant,
    pub path: String,
    pub extension: String,
}

impl AssetPath {
    /// Build from a tenant and relative path, deriving the extension.
    pub fn new(tenant: Tenant, path: impl Into<String>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            tenant,
            path,
            extension,
        }
    }

    pub fn key(&self) -> String {
        self.tenant.key_for(&self.path)
    }

    pub fn content_type(&self) -> ContentType {
        ContentType::from_extension(&self.extension)
    }
}

/// Lower-cased substring after the final `.` of the last path component.
///
/// Returns an empty string when the last component has no dot.
pub fn extension_of(path: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rfind('.') {
        Some(idx) => last[idx + 1..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// How the loader should hand content back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Text,
    Binary,
}

/// Content of a loaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetContent {
    Text(String),
    Binary(Vec<u8>),
}

impl AssetContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AssetContent::Text(text) => text.as_bytes(),
            AssetContent::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            AssetContent::Text(text) => text.into_bytes(),
            AssetContent::Binary(bytes) => bytes,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            AssetContent::Text(text) => Some(text),
            AssetContent::Binary(bytes) => String::from_utf8(bytes).ok(),
        }
    }
}
