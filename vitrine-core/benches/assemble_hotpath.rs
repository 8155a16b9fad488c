use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use std::hint::black_box;
use vitrine_core::{rewrite_fetch_calls, Assembler, SubResourceLoader, Tenant, VitrineError, VitrineResult};

struct MapLoader(HashMap<String, String>);

#[async_trait]
impl SubResourceLoader for MapLoader {
    async fn load_text(&self, tenant: &Tenant, path: &str) -> VitrineResult<String> {
        let key = tenant.key_for(path);
        self.0.get(&key).cloned().ok_or_else(|| VitrineError::not_found(key))
    }
}

fn bench_document() -> String {
    let mut body = String::new();
    for i in 0..200 {
        body.push_str(&format!("<section id=\"s{i}\"><h2>Section {i}</h2><p>text</p></section>"));
    }
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><title>Bench</title>\
         <link rel=\"stylesheet\" href=\"site.css\"><script src=\"app.js\"></script></head>\
         <body>{body}<script>fetch(\"data.json\")</script></body></html>"
    )
}

fn bench_assemble(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("build runtime");
    let loader = MapLoader(HashMap::from([
        ("bench/site.css".to_string(), "body{background:url(bg.png)}".repeat(50)),
        ("bench/app.js".to_string(), "fetch('items.json');".repeat(50)),
    ]));
    let tenant = Tenant::new("bench");
    let document = bench_document();

    c.bench_function("assemble/document", |b| {
        b.iter(|| {
            let out = runtime.block_on(Assembler::new(&tenant, &loader).assemble(black_box(&document)));
            black_box(out.len());
        });
    });
}

fn bench_rewrite(c: &mut Criterion) {
    let tenant = Tenant::new("bench");
    let script = "fetch(\"a.json\").then(r => fetch('/abs.json'));".repeat(200);

    c.bench_function("rewrite/fetch_calls", |b| {
        b.iter(|| black_box(rewrite_fetch_calls(black_box(&script), &tenant).len()));
    });
}

criterion_group!(benches, bench_assemble, bench_rewrite);
criterion_main!(benches);
