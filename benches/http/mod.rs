use criterion::{Criterion, Throughput, black_box};
use pollhttp::network::TlsParams;
use pollhttp::network::application::http::chunked::ChunkedDecoder;
use pollhttp::network::application::http::header::HeaderParser;
use pollhttp::network::application::http::{BufferSink, Client, State, StreamSink};
use pollhttp::network::error::Error;
use pollhttp::network::prelude::*;
use pollhttp::time::Clock;

const HEADERS: &[u8] = b"HTTP/1.1 200 OK\r\n\
Date: Mon, 19 Oct 2026 10:00:00 GMT\r\n\
Content-Type: application/json; charset=utf-8\r\n\
Cache-Control: no-cache\r\n\
Server: nginx\r\n\
Content-Length: 4096\r\n\r\n";

/// Replays one canned response in fixed-size pieces.
struct Replay {
    data: &'static [u8],
    pos: usize,
    piece: usize,
    open: bool,
}

impl ErrorType for Replay {
    type Error = Error;
}

impl Read for Replay {
    fn available(&mut self) -> usize {
        (self.data.len() - self.pos).min(self.piece)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let n = buf.len().min(self.available());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for Replay {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl Close for Replay {
    fn close(&mut self) {
        self.open = false;
    }
}

impl Connect for Replay {
    fn connect(&mut self, _host: &str, _port: u16) -> Result<(), Error> {
        self.open = true;
        Ok(())
    }

    fn connected(&self) -> bool {
        self.open && self.pos < self.data.len()
    }
}

impl Secure for Replay {
    fn set_trust_anchors(&mut self, _ca: &[u8]) -> Result<(), Error> {
        Ok(())
    }

    fn configure(&mut self, _params: &TlsParams) -> Result<(), Error> {
        Ok(())
    }
}

struct Frozen;

impl Clock for Frozen {
    fn now_ms(&self) -> u64 {
        0
    }
}

fn chunked_body() -> Vec<u8> {
    let mut body = Vec::new();
    for _ in 0..64 {
        body.extend_from_slice(b"40\r\n");
        body.extend_from_slice(&[b'x'; 64]);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(b"0\r\n\r\n");
    body
}

pub fn bench_header_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("http_header_parse");
    group.throughput(Throughput::Bytes(HEADERS.len() as u64));

    group.bench_function("whole", |b| {
        b.iter(|| {
            let mut parser = HeaderParser::new();
            parser.feed(black_box(HEADERS), 4096).unwrap();
            black_box(parser.content_length())
        })
    });

    group.bench_function("bytewise", |b| {
        b.iter(|| {
            let mut parser = HeaderParser::new();
            for byte in HEADERS {
                parser.feed(core::slice::from_ref(byte), 4096).unwrap();
            }
            black_box(parser.status())
        })
    });

    group.finish();
}

pub fn bench_chunked_decode(c: &mut Criterion) {
    let body = chunked_body();
    let mut group = c.benchmark_group("http_chunked_decode");
    group.throughput(Throughput::Bytes(body.len() as u64));

    for piece in [1usize, 64, 512] {
        group.bench_function(format!("piece_{}", piece), |b| {
            b.iter(|| {
                let mut decoder = ChunkedDecoder::new();
                let mut total = 0usize;
                let mut sink = StreamSink::new(|data: &[u8]| {
                    total += data.len();
                    true
                });
                for part in body.chunks(piece) {
                    decoder.feed(part, &mut sink).unwrap();
                }
                drop(sink);
                black_box(total)
            })
        });
    }

    group.finish();
}

pub fn bench_exchange(c: &mut Criterion) {
    let mut response = HEADERS.to_vec();
    response.extend_from_slice(&[b'y'; 4096]);
    let response: &'static [u8] = Box::leak(response.into_boxed_slice());

    let mut group = c.benchmark_group("http_exchange");
    group.throughput(Throughput::Bytes(response.len() as u64));

    group.bench_function("get_4k", |b| {
        b.iter(|| {
            let transport = Replay {
                data: response,
                pos: 0,
                piece: 512,
                open: false,
            };
            let mut client: Client<Replay, Frozen, BufferSink<8192>> =
                Client::new(transport, Frozen, BufferSink::new());
            client.set_ca_cert(b"ca").unwrap();
            client.set_unix_time(1_700_000_000);
            client.begin_get("bench.local", 443, "/data", "").unwrap();
            while client.state().is_active() {
                client.poll();
            }
            assert_eq!(client.state(), State::Done);
            black_box(client.body().len())
        })
    });

    group.finish();
}
