//! HTTP/1.1-over-TLS client for cooperative polling loops.
//!
//! This module provides a non-blocking HTTP client designed for embedded
//! systems and `no_std` environments. Instead of blocking until a response
//! arrives, the [`Client`] is advanced by calling [`Client::poll`] from the
//! application's main loop; each call does a bounded slice of work.
//!
//! # Features
//!
//! - GET and POST, one exchange per connection (`Connection: close`)
//! - `Content-Length`, chunked and until-close response framing
//! - Fixed-size buffers and hard ceilings for headers and body
//! - Overall timeout measured from submission
//! - Pluggable body [`Sink`]: buffer with a ceiling, or stream to a closure
//! - Refuses to start without trust material and a synchronised clock
//!
//! # Components
//!
//! - [`request`]: serialises a [`Request`] into wire format
//! - [`header`]: incremental response header parser
//! - [`body`]: body framing and delivery
//! - [`chunked`]: chunked transfer-coding decoder
//! - [`sink`]: body consumers
//! - [`client`]: the state machine tying them together
//!
//! # Usage
//!
//! ```rust
//! use pollhttp::network::application::http::{BufferSink, Client, Error, State};
//! # use pollhttp::network::prelude::*;
//! # use pollhttp::network::TlsParams;
//! # struct Tls;
//! # impl ErrorType for Tls { type Error = pollhttp::network::error::Error; }
//! # impl Read for Tls {
//! #     fn available(&mut self) -> usize { 0 }
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for Tls {
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for Tls { fn close(&mut self) {} }
//! # impl Connect for Tls {
//! #     fn connect(&mut self, _host: &str, _port: u16) -> Result<(), Self::Error> { Ok(()) }
//! #     fn connected(&self) -> bool { false }
//! # }
//! # impl Secure for Tls {
//! #     fn set_trust_anchors(&mut self, _ca: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn configure(&mut self, _params: &TlsParams) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct Millis;
//! # impl pollhttp::time::Clock for Millis { fn now_ms(&self) -> u64 { 0 } }
//!
//! let mut client: Client<Tls, Millis, BufferSink<2048>> =
//!     Client::new(Tls, Millis, BufferSink::new());
//!
//! // Without trust material the request is refused up front.
//! assert_eq!(client.begin_get("example.com", 443, "/", ""), Err(Error::MissingCaCert));
//! assert_eq!(client.state(), State::Idle);
//! ```

/// The polling state machine.
pub mod client;

pub mod body;
pub mod chunked;
pub mod error;
pub mod header;
pub mod options;
pub mod request;
pub mod sink;

pub use client::{Client, State};
pub use error::Error;
pub use options::Options;
pub use request::{Method, Request};
pub use sink::{BufferSink, Rejection, Sink, StreamSink};
