#![allow(dead_code)]

use pollhttp::network::application::http::{BufferSink, Client, State};
use pollhttp::network::error::Error;
use pollhttp::network::prelude::*;
use pollhttp::network::TlsParams;
use pollhttp::time::Clock;
use std::cell::Cell;
use std::collections::VecDeque;

pub const CA_PEM: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
pub const NOW: u64 = 1_700_000_000;

/// A scripted TLS transport.
///
/// Inbound data is a queue of segments; only the front segment is visible
/// through `available()`, so segment boundaries decide how the response is
/// split across reads.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub segments: VecDeque<Vec<u8>>,
    pub written: Vec<u8>,
    pub open: bool,
    /// The peer hangs up once every segment was read.
    pub peer_closes: bool,
    pub connect_error: Option<Error>,
    pub write_limit: Option<usize>,
    pub connect_calls: usize,
    pub close_calls: usize,
    pub trust: Option<Vec<u8>>,
    pub params: Option<TlsParams>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            peer_closes: true,
            ..Self::default()
        }
    }

    /// Respond with `response` delivered in pieces of `piece` bytes.
    pub fn split(response: &[u8], piece: usize) -> Self {
        let mut transport = Self::new();
        for part in response.chunks(piece) {
            transport.segments.push_back(part.to_vec());
        }
        transport
    }

    pub fn whole(response: &[u8]) -> Self {
        Self::split(response, response.len().max(1))
    }

    /// Respond with explicitly chosen segments.
    pub fn segments(parts: &[&[u8]]) -> Self {
        let mut transport = Self::new();
        for part in parts.iter().filter(|p| !p.is_empty()) {
            transport.segments.push_back(part.to_vec());
        }
        transport
    }

    pub fn written_str(&self) -> &str {
        std::str::from_utf8(&self.written).unwrap()
    }
}

impl ErrorType for MockTransport {
    type Error = Error;
}

impl Read for MockTransport {
    fn available(&mut self) -> usize {
        self.segments.front().map_or(0, Vec::len)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if !self.open {
            return Err(Error::NotOpen);
        }
        let Some(front) = self.segments.front_mut() else {
            return Ok(0);
        };
        let n = buf.len().min(front.len());
        buf[..n].copy_from_slice(&front[..n]);
        front.drain(..n);
        if front.is_empty() {
            self.segments.pop_front();
        }
        Ok(n)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if !self.open {
            return Err(Error::NotOpen);
        }
        let n = buf.len().min(self.write_limit.unwrap_or(usize::MAX));
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockTransport {
    fn close(&mut self) {
        self.open = false;
        self.close_calls += 1;
    }
}

impl Connect for MockTransport {
    fn connect(&mut self, _host: &str, _port: u16) -> Result<(), Self::Error> {
        self.connect_calls += 1;
        if let Some(e) = self.connect_error {
            return Err(e);
        }
        self.open = true;
        Ok(())
    }

    fn connected(&self) -> bool {
        self.open && !(self.peer_closes && self.segments.is_empty())
    }
}

impl Secure for MockTransport {
    fn set_trust_anchors(&mut self, ca: &[u8]) -> Result<(), Self::Error> {
        if ca.starts_with(b"garbage") {
            return Err(Error::TlsError);
        }
        self.trust = Some(ca.to_vec());
        Ok(())
    }

    fn configure(&mut self, params: &TlsParams) -> Result<(), Self::Error> {
        self.params = Some(*params);
        Ok(())
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

pub type TestClient<'a> = Client<MockTransport, &'a ManualClock, BufferSink<1024>>;

/// A client with trust material and time already configured.
pub fn ready_client(transport: MockTransport, clock: &ManualClock) -> TestClient<'_> {
    let mut client = Client::new(transport, clock, BufferSink::new());
    client.set_ca_cert(CA_PEM).unwrap();
    client.set_unix_time(NOW);
    client
}

/// Poll until the exchange leaves the active states. Returns the number of polls.
pub fn drive<T, S>(client: &mut Client<T, &ManualClock, S>) -> usize
where
    T: pollhttp::network::Transport,
    S: pollhttp::network::application::http::Sink,
{
    let mut polls = 0;
    while client.state().is_active() {
        client.poll();
        polls += 1;
        assert!(polls < 100_000, "exchange did not terminate");
    }
    polls
}

pub fn assert_terminal(client: &TestClient<'_>, state: State) {
    assert_eq!(client.state(), state, "error: {:?}", client.error());
    assert!(!client.transport().open, "transport left open");
}
