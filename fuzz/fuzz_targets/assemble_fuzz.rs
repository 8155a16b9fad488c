//! Fuzz target for HTML assembly.
//!
//! Assembly never fails: malformed markup and failing sub-resources must
//! still produce a well-framed document.
//!
//! Run with: cargo +nightly fuzz run assemble_fuzz -- -max_total_time=60

#![no_main]

use async_trait::async_trait;
use libfuzzer_sys::fuzz_target;
use vitrine_core::{Assembler, SubResourceLoader, Tenant, VitrineError, VitrineResult};

/// Serves `.css` and `.js` with fixed bodies that exercise the rewriters and
/// close-tag escaping; everything else is missing.
struct EchoLoader;

#[async_trait]
impl SubResourceLoader for EchoLoader {
    async fn load_text(&self, tenant: &Tenant, path: &str) -> VitrineResult<String> {
        if path.ends_with(".css") {
            Ok("a{background:url(x.png)}</style>".to_string())
        } else if path.ends_with(".js") {
            Ok("fetch('d.json');'</script>'".to_string())
        } else {
            Err(VitrineError::not_found(tenant.key_for(path)))
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };

    let tenant = Tenant::new("fuzz");
    let html = runtime.block_on(Assembler::new(&tenant, &EchoLoader).assemble(input));

    assert!(html.starts_with("<!DOCTYPE html>\n<html"));
    assert!(html.ends_with("</body></html>"));
});
