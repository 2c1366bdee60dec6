use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use miniserver::config::Config;
use miniserver::endpoints::dispatch;
use miniserver::request::Request;

fn simple_request_parse_benchmark(c: &mut Criterion) {
    let request = b"GET / HTTP/1.1\r\nHost: localhost:4221\r\nUser-Agent: Test\r\n\r\n";

    c.bench_function("simple_request_parse", |b| {
        b.iter(|| {
            let buffer = black_box(&request[..]);
            let _ = Request::try_from(buffer, 0).unwrap();
        });
    });
}

fn complex_request_parse_benchmark(c: &mut Criterion) {
    let request = b"POST /files/upload.bin HTTP/1.1\r\n\
                    Host: localhost:4221\r\n\
                    User-Agent: Mozilla/5.0 (Windows NT 10.0; Win64; x64)\r\n\
                    Accept: text/html,application/xhtml+xml\r\n\
                    Accept-Language: en-US,en;q=0.9\r\n\
                    Accept-Encoding: gzip, deflate, br\r\n\
                    Content-Type: application/octet-stream\r\n\
                    Content-Length: 11\r\n\
                    \r\n\
                    hello world";

    c.bench_function("complex_request_parse", |b| {
        b.iter(|| {
            let buffer = black_box(&request[..]);
            let _ = Request::try_from(buffer, 0).unwrap();
        });
    });
}

fn dispatch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_echo");
    let config = Config::new();

    let requests = [
        (
            "plain",
            b"GET /echo/benchmark-payload HTTP/1.1\r\n\r\n".as_slice(),
        ),
        (
            "gzip",
            b"GET /echo/benchmark-payload HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n".as_slice(),
        ),
    ];

    for (name, raw) in requests.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), raw, |b, raw| {
            b.iter(|| {
                let request = Request::try_from(black_box(raw), 0).unwrap();
                let response = dispatch(&request, 0, &config);
                black_box(response.as_bytes());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    simple_request_parse_benchmark,
    complex_request_parse_benchmark,
    dispatch_benchmark
);
criterion_main!(benches);
