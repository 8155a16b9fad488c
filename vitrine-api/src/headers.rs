//! Static response headers.
//!
//! Every response leaving the origin, fallbacks and errors included, carries
//! the hardening headers and the permissive CORS headers.
//!
//! CORS is a fixed header set rather than `tower_http::cors::CorsLayer`: that
//! layer only decorates requests carrying an `Origin` header and answers
//! preflights itself, while these headers must appear unconditionally and
//! preflights go through the dispatcher's `204`.

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

/// Methods the origin answers.
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Header names are lower-case as `HeaderName::from_static` requires.
pub const HARDENING_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "no-referrer"),
    ("vary", "Accept-Encoding"),
    ("accept-ranges", "bytes"),
];

pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", ALLOWED_METHODS),
    ("access-control-allow-headers", "Content-Type, If-None-Match"),
];

/// Layer the static headers onto every response of `router`. Headers a
/// handler already set are left alone.
pub fn with_static_headers(router: Router) -> Router {
    HARDENING_HEADERS
        .iter()
        .chain(CORS_HEADERS)
        .fold(router, |router, &(name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names_are_valid() {
        for (name, value) in HARDENING_HEADERS.iter().chain(CORS_HEADERS) {
            assert!(HeaderName::from_bytes(name.as_bytes()).is_ok());
            assert!(HeaderValue::from_str(value).is_ok());
        }
    }
}
