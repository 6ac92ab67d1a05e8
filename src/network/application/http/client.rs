//! The polling request state machine.
//!
//! A [`Client`] owns one transport and runs at most one exchange at a time.
//! Nothing in here blocks: [`Client::poll`] performs a single bounded step (one
//! connect attempt, one write, or one read burst) and returns, so it can be
//! called from a super-loop next to other work.
//!
//! ```text
//! Idle ──begin──▶ Connecting ──▶ Sending ──▶ ReadingHeaders ──▶ ReadingBody ──▶ Done
//!                      │             │              │                 │
//!                      └─────────────┴──────────────┴─────────────────┴──▶ Error
//! ```

use super::body::BodyReader;
use super::error::Error;
use super::header::{HeaderParser, Status};
use super::options::Options;
use super::request::{DEFAULT_CONTENT_TYPE, Request};
use super::sink::{BufferSink, Sink};
use crate::fmt::{debug, trace, warning};
use crate::network::error::TransportError;
use crate::network::{TlsParams, Transport};
use crate::time::{Clock, is_plausible_epoch};
use heapless::{String, Vec};

/// Default capacity of the serialised request, body included.
pub const REQUEST_CAPACITY: usize = 1024;

/// Default capacity of the buffering sink.
pub const DEFAULT_BODY_CAPACITY: usize = 16 * 1024;

/// Longest host name accepted.
pub const MAX_HOST_LEN: usize = 128;

/// Size of the receive staging buffer; caps a single read burst.
const RX_CAPACITY: usize = 768;

/// Progress of the current exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No request submitted, or the client was reset.
    Idle,
    /// Waiting for the transport to connect (TLS handshake included).
    Connecting,
    /// Writing the request.
    Sending,
    /// Parsing the response header block.
    ReadingHeaders,
    /// Delivering the body to the sink.
    ReadingBody,
    /// The exchange completed.
    Done,
    /// The exchange failed; see [`Client::error`].
    Error,
}

impl State {
    /// Whether an exchange is in flight.
    pub fn is_active(&self) -> bool {
        !matches!(self, State::Idle | State::Done | State::Error)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for State {
    fn format(&self, f: defmt::Formatter) {
        match self {
            State::Idle => defmt::write!(f, "Idle"),
            State::Connecting => defmt::write!(f, "Connecting"),
            State::Sending => defmt::write!(f, "Sending"),
            State::ReadingHeaders => defmt::write!(f, "ReadingHeaders"),
            State::ReadingBody => defmt::write!(f, "ReadingBody"),
            State::Done => defmt::write!(f, "Done"),
            State::Error => defmt::write!(f, "Error"),
        }
    }
}

/// Non-blocking HTTPS client.
///
/// * `T` is the TLS transport.
/// * `K` is the monotonic clock used for the overall timeout.
/// * `S` receives the body, a [`BufferSink`] unless another sink is supplied.
/// * `R` is the capacity of the serialised request.
///
/// ```rust,no_run
/// use pollhttp::network::application::http::{BufferSink, Client, State};
/// # use pollhttp::network::prelude::*;
/// # use pollhttp::network::{TlsParams, error::Error};
/// # use pollhttp::time::Clock;
/// # struct Tls;
/// # impl ErrorType for Tls { type Error = Error; }
/// # impl Read for Tls {
/// #     fn available(&mut self) -> usize { 0 }
/// #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Error> { Ok(0) }
/// # }
/// # impl Write for Tls {
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Error> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), Error> { Ok(()) }
/// # }
/// # impl Close for Tls { fn close(&mut self) {} }
/// # impl Connect for Tls {
/// #     fn connect(&mut self, _host: &str, _port: u16) -> Result<(), Error> { Ok(()) }
/// #     fn connected(&self) -> bool { true }
/// # }
/// # impl Secure for Tls {
/// #     fn set_trust_anchors(&mut self, _ca: &[u8]) -> Result<(), Error> { Ok(()) }
/// #     fn configure(&mut self, _params: &TlsParams) -> Result<(), Error> { Ok(()) }
/// # }
/// # struct Millis;
/// # impl Clock for Millis { fn now_ms(&self) -> u64 { 0 } }
/// # const CA_PEM: &[u8] = b"-----BEGIN CERTIFICATE-----";
///
/// let mut client: Client<Tls, Millis> = Client::new(Tls, Millis, BufferSink::new());
/// client.set_ca_cert(CA_PEM).unwrap();
/// client.set_unix_time(1_700_000_000);
/// client.begin_get("api.example.com", 443, "/v1/ping", "").unwrap();
///
/// loop {
///     client.poll();
///     match client.state() {
///         State::Done => break,
///         State::Error => break,
///         _ => { /* other work */ }
///     }
/// }
/// ```
pub struct Client<T, K, S = BufferSink<DEFAULT_BODY_CAPACITY>, const R: usize = REQUEST_CAPACITY> {
    transport: T,
    clock: K,
    sink: S,
    options: Options,
    has_ca: bool,
    unix_time: u64,

    // Exchange state
    state: State,
    active: Options,
    started_at: u64,
    host: String<MAX_HOST_LEN>,
    port: u16,
    request: Vec<u8, R>,
    sent: usize,
    headers: HeaderParser,
    body: BodyReader,
    rx: [u8; RX_CAPACITY],
    rx_start: usize,
    rx_end: usize,
    error: Option<Error>,
}

impl<T, K, S, const R: usize> core::fmt::Debug for Client<T, K, S, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("status", &self.headers.status())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T: Transport, K: Clock, S: Sink, const R: usize> Client<T, K, S, R> {
    pub fn new(transport: T, clock: K, sink: S) -> Self {
        Self::with_options(transport, clock, sink, Options::default())
    }

    pub fn with_options(transport: T, clock: K, sink: S, options: Options) -> Self {
        Self {
            transport,
            clock,
            sink,
            options,
            has_ca: false,
            unix_time: 0,
            state: State::Idle,
            active: options,
            started_at: 0,
            host: String::new(),
            port: 0,
            request: Vec::new(),
            sent: 0,
            headers: HeaderParser::new(),
            body: BodyReader::default(),
            rx: [0; RX_CAPACITY],
            rx_start: 0,
            rx_end: 0,
            error: None,
        }
    }

    /// Replace the options. An exchange already in flight keeps the options it
    /// was started with.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Install the certificate authority used to verify the server.
    ///
    /// The bytes are handed to the transport as-is. An empty slice clears the
    /// trust material, after which requests are refused.
    pub fn set_ca_cert(&mut self, ca: &[u8]) -> Result<(), Error> {
        if ca.is_empty() {
            self.has_ca = false;
            return Ok(());
        }
        self.transport
            .set_trust_anchors(ca)
            .map_err(|e| Error::TlsSetup(e.kind()))?;
        self.has_ca = true;
        Ok(())
    }

    /// Provide the current wall-clock time, in seconds since the Unix epoch.
    ///
    /// Certificate validity cannot be checked without it. Values at or below
    /// [`MIN_VALID_EPOCH`](crate::time::MIN_VALID_EPOCH) count as unset.
    pub fn set_unix_time(&mut self, epoch: u64) {
        self.unix_time = epoch;
    }

    pub fn begin_get(
        &mut self,
        host: &str,
        port: u16,
        path: &str,
        extra_headers: &str,
    ) -> Result<(), Error> {
        self.begin(&Request::get(host, port, path).with_headers(extra_headers))
    }

    /// Submit a POST. An empty `content_type` defaults to `application/json`.
    pub fn begin_post(
        &mut self,
        host: &str,
        port: u16,
        path: &str,
        body: &[u8],
        content_type: &str,
        extra_headers: &str,
    ) -> Result<(), Error> {
        let content_type = if content_type.is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            content_type
        };
        self.begin(
            &Request::post(host, port, path, body)
                .with_content_type(content_type)
                .with_headers(extra_headers),
        )
    }

    /// Submit a request, abandoning any exchange in flight.
    ///
    /// On failure the client stays [`State::Idle`] and the error is also
    /// available from [`Client::error`].
    pub fn begin(&mut self, request: &Request) -> Result<(), Error> {
        self.reset();

        if let Err(e) = self.prepare(request) {
            warning!("request rejected: {}", e);
            self.error = Some(e);
            return Err(e);
        }

        debug!("{} {}:{}{}", request.method, request.host, request.port, request.path);
        self.state = State::Connecting;
        Ok(())
    }

    fn prepare(&mut self, request: &Request) -> Result<(), Error> {
        if !self.has_ca {
            return Err(Error::MissingCaCert);
        }
        if !is_plausible_epoch(self.unix_time) {
            return Err(Error::ClockNotSet);
        }

        self.host = String::try_from(request.host).map_err(|_| Error::RequestTooLarge)?;
        self.port = request.port;
        request.write_to(&mut self.request)?;

        self.active = self.options;
        self.transport
            .configure(&TlsParams {
                now_epoch: self.unix_time,
                handshake_timeout_ms: self.active.tls_handshake_timeout_ms,
            })
            .map_err(|e| Error::TlsSetup(e.kind()))?;

        self.sink.begin(&self.active);
        self.started_at = self.clock.now_ms();
        Ok(())
    }

    /// Advance the exchange by one bounded step.
    ///
    /// Does nothing when no exchange is in flight.
    pub fn poll(&mut self) {
        if !self.state.is_active() {
            return;
        }

        let elapsed = self.clock.now_ms().saturating_sub(self.started_at);
        if elapsed > u64::from(self.active.timeout_ms) {
            self.fail(Error::Timeout);
            return;
        }

        let result = match self.state {
            State::Connecting => self.step_connect(),
            State::Sending => self.step_send(),
            State::ReadingHeaders => self.step_read_headers(),
            State::ReadingBody => self.step_read_body(),
            State::Idle | State::Done | State::Error => Ok(()),
        };

        if let Err(e) = result {
            self.fail(e);
        }
    }

    fn step_connect(&mut self) -> Result<(), Error> {
        if !self.transport.connected() {
            self.transport
                .connect(&self.host, self.port)
                .map_err(|e| Error::ConnectFailed(e.kind()))?;
        }
        self.enter(State::Sending);
        Ok(())
    }

    fn step_send(&mut self) -> Result<(), Error> {
        if !self.transport.connected() {
            return Err(Error::ClosedBeforeSend);
        }

        let written = self
            .transport
            .write(&self.request[self.sent..])
            .map_err(|_| Error::SendFailed)?;
        if written == 0 {
            return Err(Error::SendFailed);
        }
        self.sent += written;
        trace!("sent {}/{} bytes", self.sent, self.request.len());

        if self.sent >= self.request.len() {
            self.transport.flush().map_err(|_| Error::SendFailed)?;
            self.enter(State::ReadingHeaders);
        }
        Ok(())
    }

    fn step_read_headers(&mut self) -> Result<(), Error> {
        self.fill()?;

        if self.rx_start == self.rx_end {
            if self.peer_gone() {
                return Err(Error::ClosedDuringHeaders);
            }
            return Ok(());
        }

        let input = &self.rx[self.rx_start..self.rx_end];
        match self.headers.feed(input, self.active.max_header_bytes)? {
            Status::Partial => {
                self.rx_start = self.rx_end;
                Ok(())
            }
            Status::Complete(used) => {
                self.rx_start += used;
                self.body =
                    BodyReader::new(self.headers.content_length(), self.headers.is_chunked());
                debug!(
                    "status {}, {} header bytes",
                    self.headers.status().unwrap_or(0),
                    self.headers.header_bytes()
                );
                self.enter(State::ReadingBody);
                // Bytes after the blank line are already body; no further read.
                self.deliver_body()
            }
        }
    }

    fn step_read_body(&mut self) -> Result<(), Error> {
        self.fill()?;
        self.deliver_body()
    }

    /// Hand staged bytes to the body reader and detect completion.
    fn deliver_body(&mut self) -> Result<(), Error> {
        if self.rx_start < self.rx_end {
            let input = &self.rx[self.rx_start..self.rx_end];
            self.body.feed(input, &mut self.sink)?;
            self.rx_start = self.rx_end;
        }

        if self.body.is_complete() {
            self.finish();
        } else if self.peer_gone() {
            self.body.on_close(self.active.reject_truncated_body)?;
            self.finish();
        }
        Ok(())
    }

    /// Read one burst into the staging buffer if it is empty.
    fn fill(&mut self) -> Result<(), Error> {
        if self.rx_start < self.rx_end {
            return Ok(());
        }
        self.rx_start = 0;
        self.rx_end = 0;

        let available = self.transport.available();
        if available == 0 {
            return Ok(());
        }

        let want = available.min(self.active.io_chunk_size.max(1)).min(RX_CAPACITY);
        let read = self
            .transport
            .read(&mut self.rx[..want])
            .map_err(|e| Error::ReadFailed(e.kind()))?;
        self.rx_end = read.min(want);
        trace!("read {} bytes", self.rx_end);
        Ok(())
    }

    fn peer_gone(&mut self) -> bool {
        !self.transport.connected() && self.transport.available() == 0
    }

    fn enter(&mut self, state: State) {
        trace!("{} -> {}", self.state, state);
        self.state = state;
    }

    fn finish(&mut self) {
        self.transport.close();
        debug!("done: status {}", self.headers.status().unwrap_or(0));
        self.state = State::Done;
    }

    fn fail(&mut self, error: Error) {
        warning!("{} failed in {}", error, self.state);
        self.error = Some(error);
        self.state = State::Error;
        self.transport.close();
    }

    /// Close the transport and return to [`State::Idle`], keeping results.
    pub fn stop(&mut self) {
        self.transport.close();
        self.state = State::Idle;
    }

    /// Close the transport and clear all exchange state, the sink included.
    ///
    /// Configuration (options, trust material, time) is kept.
    pub fn reset(&mut self) {
        self.stop();
        self.sink.reset();
        self.started_at = 0;
        self.host.clear();
        self.port = 0;
        self.request.clear();
        self.sent = 0;
        self.headers.reset();
        self.body = BodyReader::default();
        self.rx_start = 0;
        self.rx_end = 0;
        self.error = None;
    }

    /// Drive the exchange until it reaches a terminal state, yielding to the
    /// executor between steps.
    #[cfg(feature = "async")]
    pub async fn wait(&mut self) -> Result<(), Error> {
        while self.state.is_active() {
            self.poll();
            if self.state.is_active() {
                YieldNow::default().await;
            }
        }
        match self.error {
            Some(e) if self.state == State::Error => Err(e),
            _ => Ok(()),
        }
    }
}

impl<T, K, S, const R: usize> Client<T, K, S, R> {
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn is_error(&self) -> bool {
        self.state == State::Error
    }

    /// Response status code, once the status line was parsed.
    pub fn status(&self) -> Option<u16> {
        self.headers.status()
    }

    /// Declared `Content-Length` of the response, if any.
    pub fn content_length(&self) -> Option<usize> {
        self.headers.content_length()
    }

    pub fn is_chunked(&self) -> bool {
        self.headers.is_chunked()
    }

    /// The failure that ended the last exchange or rejected the last request.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Human-readable form of [`Client::error`], empty if there is none.
    pub fn error_message(&self) -> &'static str {
        self.error.map_or("", |e| e.as_str())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Read-only access to the transport, e.g. for diagnostics.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Take the client apart.
    pub fn into_parts(self) -> (T, K, S) {
        (self.transport, self.clock, self.sink)
    }
}

impl<T, K, const N: usize, const R: usize> Client<T, K, BufferSink<N>, R> {
    /// The buffered body. After an overflow this holds what was accepted
    /// before the ceiling was hit.
    pub fn body(&self) -> &[u8] {
        self.sink.body()
    }

    /// Whether the body exceeded its ceiling.
    pub fn body_overflowed(&self) -> bool {
        self.sink.overflowed()
    }
}

#[cfg(feature = "async")]
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

#[cfg(feature = "async")]
impl core::future::Future for YieldNow {
    type Output = ();

    fn poll(
        mut self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<()> {
        if self.yielded {
            core::task::Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            core::task::Poll::Pending
        }
    }
}
