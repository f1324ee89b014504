use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use simple_webserver::{negotiate, parse_query, read_request, Response};

fn query_parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_parse");

    let paths = [
        ("no_query", "/path/to/resource"),
        ("simple", "/?nome=Ana&email=ana@x.com"),
        ("percent_encoded", "/?nome=Jo%C3%A3o%20da%20Silva&email=joao%40mail.com"),
        ("repeated_keys", "/?a=1&a=2&a=3&b=4&b=5&c&d=&&e=6"),
    ];

    for (name, path) in paths.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), path, |b, path| {
            b.iter(|| parse_query(black_box(path)));
        });
    }

    group.finish();
}

fn negotiate_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let mut group = c.benchmark_group("negotiate");

    let requests = [
        (
            "json",
            b"GET /?nome=Ana&email=ana@x.com HTTP/1.1\r\nHost: localhost\r\nAccept: application/json\r\n\r\n".as_slice(),
        ),
        (
            "html",
            b"GET /?nome=Ana&email=ana@x.com HTTP/1.1\r\nHost: localhost\r\nAccept: text/html,application/xhtml+xml\r\n\r\n".as_slice(),
        ),
    ];

    for (name, raw) in requests.iter() {
        let mut reader = *raw;
        let request = runtime.block_on(read_request(&mut reader, 0)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &request, |b, request| {
            b.iter(|| {
                let negotiation = negotiate(black_box(request));
                Response::from_negotiation(&negotiation, "Custom Server").as_bytes()
            });
        });
    }

    group.finish();
}

fn request_read_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let raw = b"POST /submit?nome=Ana HTTP/1.1\r\n\
                Host: localhost:8080\r\n\
                User-Agent: Mozilla/5.0 (Windows NT 10.0; Win64; x64)\r\n\
                Accept: application/json\r\n\
                Content-Length: 16\r\n\
                \r\n\
                nome=Ana&email=x";

    c.bench_function("request_read", |b| {
        b.iter(|| {
            let mut reader = black_box(&raw[..]);
            runtime.block_on(read_request(&mut reader, 0)).unwrap()
        });
    });
}

criterion_group!(
    benches,
    query_parse_benchmark,
    negotiate_benchmark,
    request_read_benchmark
);
criterion_main!(benches);
