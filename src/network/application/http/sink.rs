//! Body consumers.
//!
//! A [`Sink`] receives decoded body bytes in order, one run at a time, and
//! decides whether the exchange may continue. The client does not care what
//! the sink does with the bytes.

use super::options::Options;
use heapless::Vec;

/// Why a sink declined a run of body bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Accepting the run would exceed the sink's byte ceiling.
    Overflow,
    /// The consumer asked to stop.
    Abort,
}

/// Consumer of response body bytes.
pub trait Sink {
    /// Called when a new request is submitted.
    fn begin(&mut self, _options: &Options) {}

    /// Called when the client is reset. Drop anything kept from the last
    /// exchange.
    fn reset(&mut self) {}

    /// Accept the next run of body bytes. Returning an error aborts the exchange.
    fn accept(&mut self, data: &[u8]) -> Result<(), Rejection>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn begin(&mut self, options: &Options) {
        (**self).begin(options)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn accept(&mut self, data: &[u8]) -> Result<(), Rejection> {
        (**self).accept(data)
    }
}

/// Buffers the body in a fixed-capacity vector.
///
/// The effective ceiling is the smaller of `N` and
/// [`Options::max_body_bytes`]. A run that would cross it is refused whole and
/// the overflow flag is raised; bytes accepted before that remain readable.
/// With [`Options::keep_body`] off, runs are accepted and dropped.
#[derive(Debug)]
pub struct BufferSink<const N: usize> {
    body: Vec<u8, N>,
    limit: usize,
    keep: bool,
    overflow: bool,
}

impl<const N: usize> Default for BufferSink<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BufferSink<N> {
    pub const fn new() -> Self {
        Self {
            body: Vec::new(),
            limit: N,
            keep: true,
            overflow: false,
        }
    }

    /// Bytes retained so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as UTF-8, if it is valid.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }

    /// Whether a run was refused for exceeding the ceiling.
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    pub fn clear(&mut self) {
        self.body.clear();
        self.overflow = false;
    }
}

impl<const N: usize> Sink for BufferSink<N> {
    fn begin(&mut self, options: &Options) {
        self.clear();
        self.limit = options.max_body_bytes.min(N);
        self.keep = options.keep_body;
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn accept(&mut self, data: &[u8]) -> Result<(), Rejection> {
        if !self.keep {
            return Ok(());
        }
        if self.body.len() + data.len() > self.limit {
            self.overflow = true;
            return Err(Rejection::Overflow);
        }
        self.body.extend_from_slice(data).map_err(|_| {
            self.overflow = true;
            Rejection::Overflow
        })
    }
}

/// Forwards every run to a closure without retaining anything.
///
/// The closure returns `false` to abort the exchange.
///
/// ```rust
/// use pollhttp::network::application::http::{Sink, StreamSink};
///
/// let mut total = 0;
/// let mut sink = StreamSink::new(|data: &[u8]| {
///     total += data.len();
///     total < 1024
/// });
/// assert!(sink.accept(b"hello").is_ok());
/// ```
pub struct StreamSink<F> {
    handler: F,
}

impl<F: FnMut(&[u8]) -> bool> StreamSink<F> {
    pub fn new(handler: F) -> Self {
        Self { handler }
    }

    pub fn into_inner(self) -> F {
        self.handler
    }
}

impl<F> core::fmt::Debug for StreamSink<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamSink").finish_non_exhaustive()
    }
}

impl<F: FnMut(&[u8]) -> bool> Sink for StreamSink<F> {
    fn accept(&mut self, data: &[u8]) -> Result<(), Rejection> {
        if (self.handler)(data) {
            Ok(())
        } else {
            Err(Rejection::Abort)
        }
    }
}
