//! Fuzz target for the tolerant HTML scanner and document splitter.
//!
//! Any UTF-8 input must scan without panicking, and the token spans must
//! tile the input exactly.
//!
//! Run with: cargo +nightly fuzz run scanner_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use vitrine_core::html::{split_document, Scanner};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let tokens = Scanner::new(input).tokenize();

    let mut expected_start = 0;
    for token in &tokens {
        assert_eq!(token.span.start, expected_start, "Spans must be contiguous");
        assert!(token.span.end > token.span.start, "Tokens must not be empty");
        assert!(input.is_char_boundary(token.span.end));
        expected_start = token.span.end;
    }
    assert_eq!(expected_start, input.len(), "Spans must cover the input");

    let parts = split_document(input);
    assert!(parts.head.len() <= input.len());
    assert!(parts.body.len() <= input.len());
});
