use criterion::{criterion_group, criterion_main};

mod http;

criterion_group!(
    benches,
    http::bench_header_parse,
    http::bench_chunked_decode,
    http::bench_exchange
);
criterion_main!(benches);
