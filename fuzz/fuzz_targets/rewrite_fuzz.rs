//! Fuzz target for reference rewriting.
//!
//! Both rewriters must accept arbitrary text, and sub-resource path
//! normalization must never yield a parent segment.
//!
//! Run with: cargo +nightly fuzz run rewrite_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use vitrine_core::{rewrite_css_urls, rewrite_fetch_calls, sub_resource_path, Tenant};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let tenant = Tenant::new("fuzz");

    let js = rewrite_fetch_calls(input, &tenant);
    assert!(js.len() >= input.len());

    let css = rewrite_css_urls(input, &tenant);
    assert!(css.len() >= input.len());

    if let Some(path) = sub_resource_path(input) {
        assert!(!path.split('/').any(|segment| segment == ".."));
    }
});
