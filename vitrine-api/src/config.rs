//! Origin Configuration
//!
//! Loaded from environment variables with development-friendly defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ServeError, ServeResult};

/// Which backing store the origin reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Lmdb,
    Fs,
}

impl FromStr for StoreKind {
    type Err = ServeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "lmdb" => Ok(StoreKind::Lmdb),
            "fs" => Ok(StoreKind::Fs),
            other => Err(ServeError::invalid_config(format!(
                "Unknown store '{}', expected memory, lmdb or fs",
                other
            ))),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Origin configuration.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: String,
    pub port: u16,

    pub store: StoreKind,
    /// Root directory for the fs store, environment directory for LMDB.
    pub store_path: PathBuf,
    pub lmdb_max_size_mb: usize,

    /// Deadline for serving one request, fallback included.
    pub request_timeout: Duration,

    /// Mount `/health/*` and `/metrics`.
    pub ops_routes_enabled: bool,

    pub log_format: LogFormat,

    /// Tenant-relative name of the cache policy document.
    pub cache_policy_file: String,
    /// Tenant-relative name of the fallback map document.
    pub fallback_map_file: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8787,
            store: StoreKind::Fs,
            store_path: PathBuf::from("./data"),
            lmdb_max_size_mb: 1024,
            request_timeout: Duration::from_millis(10_000),
            ops_routes_enabled: true,
            log_format: LogFormat::Json,
            cache_policy_file: "_cache.json".to_string(),
            fallback_map_file: "_fallback.json".to_string(),
        }
    }
}

impl ServeConfig {
    /// Create ServeConfig from environment variables.
    ///
    /// Environment variables:
    /// - `VITRINE_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` / `VITRINE_PORT`: Listen port (default: 8787)
    /// - `VITRINE_STORE`: memory, lmdb or fs (default: fs)
    /// - `VITRINE_STORE_PATH`: Store directory (default: ./data)
    /// - `VITRINE_LMDB_MAX_SIZE_MB`: LMDB map size (default: 1024)
    /// - `VITRINE_REQUEST_TIMEOUT_MS`: Per-request deadline (default: 10000)
    /// - `VITRINE_OPS_ROUTES_ENABLED`: "true" or "false" (default: true)
    /// - `VITRINE_LOG_FORMAT`: json or pretty (default: json)
    /// - `VITRINE_CACHE_POLICY_FILE`: Policy document name (default: _cache.json)
    /// - `VITRINE_FALLBACK_MAP_FILE`: Fallback map name (default: _fallback.json)
    pub fn from_env() -> ServeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ServeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT").or_else(|| lookup("VITRINE_PORT")) {
            Some(value) => value.trim().parse::<u16>().map_err(|_| {
                ServeError::invalid_config(format!("Invalid port value: {}", value))
            })?,
            None => defaults.port,
        };

        let store = match lookup("VITRINE_STORE") {
            Some(value) => value.parse()?,
            None => defaults.store,
        };

        let log_format = match lookup("VITRINE_LOG_FORMAT").map(|s| s.to_lowercase()) {
            Some(s) if s == "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        let config = Self {
            bind: lookup("VITRINE_BIND").unwrap_or(defaults.bind),
            port,
            store,
            store_path: lookup("VITRINE_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            lmdb_max_size_mb: lookup("VITRINE_LMDB_MAX_SIZE_MB")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.lmdb_max_size_mb),
            request_timeout: lookup("VITRINE_REQUEST_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            ops_routes_enabled: lookup("VITRINE_OPS_ROUTES_ENABLED")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(defaults.ops_routes_enabled),
            log_format,
            cache_policy_file: lookup("VITRINE_CACHE_POLICY_FILE")
                .unwrap_or(defaults.cache_policy_file),
            fallback_map_file: lookup("VITRINE_FALLBACK_MAP_FILE")
                .unwrap_or(defaults.fallback_map_file),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> ServeResult<()> {
        if self.request_timeout.is_zero() {
            return Err(ServeError::invalid_config("Request timeout must be non-zero"));
        }
        if self.cache_policy_file.trim().is_empty() || self.fallback_map_file.trim().is_empty() {
            return Err(ServeError::invalid_config("Document names must be non-empty"));
        }
        if self.lmdb_max_size_mb == 0 {
            return Err(ServeError::invalid_config("LMDB map size must be non-zero"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> ServeResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ServeError::invalid_config(format!("Invalid bind address {}: {}", addr, e))
        })
    }
}
