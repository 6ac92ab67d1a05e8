//! A transport abstraction layer for embedded systems
//!
//! The HTTP client never touches sockets directly. It drives any type that
//! implements the traits in this module: a non-blocking byte stream with TLS
//! already applied underneath. Every method must return promptly; a transport
//! that has nothing to offer reports `0` from [`Read::available`] rather than
//! waiting for data.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for transport operations
pub mod error;

/// Application protocol implementations
pub mod application;

use error::TransportError;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, ErrorType, Read, Secure, Transport, Write};
}

/// Shared error type for all transport traits.
pub trait ErrorType {
    /// Associated error type
    type Error: TransportError;
}

pub trait Read: ErrorType {
    /// Number of bytes that can be read right now without blocking
    fn available(&mut self) -> usize;
    /// Read at most `buf.len()` already-available bytes
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write: ErrorType {
    /// Write data to the connection, returning how many bytes were accepted
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Close the connection. Closing an already closed connection is a no-op.
    fn close(&mut self);
}

/// Connection establishment, including any TLS handshake.
pub trait Connect: ErrorType {
    /// Open a connection to `host:port`
    fn connect(&mut self, host: &str, port: u16) -> Result<(), Self::Error>;
    /// Whether the peer is still connected
    fn connected(&self) -> bool;
}

/// Parameters handed to the TLS layer before each connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsParams {
    /// Current wall-clock time in seconds since the Unix epoch, for certificate
    /// validity checks.
    pub now_epoch: u64,
    /// Upper bound for the handshake and coarse socket operations.
    pub handshake_timeout_ms: u32,
}

/// TLS configuration hooks.
///
/// Trust material is opaque to the client; parsing and verification belong
/// to the implementation.
pub trait Secure: ErrorType {
    /// Install the certificate authority (PEM or DER) used for verification
    fn set_trust_anchors(&mut self, ca: &[u8]) -> Result<(), Self::Error>;
    /// Apply per-connection TLS parameters
    fn configure(&mut self, params: &TlsParams) -> Result<(), Self::Error>;
}

/// A non-blocking TLS byte stream usable by the HTTP client.
pub trait Transport: Read + Write + Close + Connect + Secure {}

impl<T: Read + Write + Close + Connect + Secure> Transport for T {}
