//! Exchange failure reasons

use super::sink::Rejection;
use crate::network::error::Error as TransportErrorKind;

/// Why an HTTP exchange ended in [`State::Error`](super::State::Error), or why
/// a request could not be submitted.
///
/// Every variant carries a fixed human-readable message (see [`Error::as_str`]),
/// so the client never allocates to report a failure.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No certificate authority was configured before submitting a request.
    MissingCaCert,
    /// The wall-clock time was never set or is implausibly old.
    ClockNotSet,
    /// The transport refused the TLS parameters or trust material.
    TlsSetup(TransportErrorKind),
    /// The serialised request (or its host name) does not fit the fixed buffers.
    RequestTooLarge,
    /// Connection establishment or the TLS handshake failed.
    ConnectFailed(TransportErrorKind),
    /// The socket dropped before the request could be written.
    ClosedBeforeSend,
    /// The transport accepted zero bytes or reported a write error.
    SendFailed,
    /// The peer closed the connection before the header block ended.
    ClosedDuringHeaders,
    /// A read on the transport failed.
    ReadFailed(TransportErrorKind),
    /// The header block exceeded `max_header_bytes`.
    HeadersTooLarge,
    /// A single header line exceeded the line buffer.
    HeaderLineTooLong,
    /// The status line did not carry a numeric status code, or was missing.
    MalformedStatusLine,
    /// A `Content-Length` value was not a decimal integer.
    InvalidContentLength,
    /// A chunk size line exceeded the chunk line buffer.
    ChunkLineTooLong,
    /// A chunk size was empty or not hexadecimal.
    InvalidChunkSize,
    /// The body would exceed the sink's byte ceiling.
    BodyTooLarge,
    /// The sink declined a body run.
    Aborted,
    /// The connection closed before the declared `Content-Length` arrived.
    TruncatedBody,
    /// The overall request timeout elapsed.
    Timeout,
}

impl Error {
    /// Human-readable description of the failure.
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::MissingCaCert => "TLS CA cert not set",
            Error::ClockNotSet => "system time not set",
            Error::TlsSetup(_) => "TLS configuration rejected",
            Error::RequestTooLarge => "request too large",
            Error::ConnectFailed(_) => "connect/TLS failed",
            Error::ClosedBeforeSend => "socket closed before send",
            Error::SendFailed => "send failed",
            Error::ClosedDuringHeaders => "closed during headers",
            Error::ReadFailed(_) => "read failed",
            Error::HeadersTooLarge => "headers too large",
            Error::HeaderLineTooLong => "header line too long",
            Error::MalformedStatusLine => "malformed status line",
            Error::InvalidContentLength => "invalid content-length",
            Error::ChunkLineTooLong => "chunk size line too long",
            Error::InvalidChunkSize => "invalid chunk size",
            Error::BodyTooLarge => "body exceeded max body bytes",
            Error::Aborted => "body handler aborted",
            Error::TruncatedBody => "body truncated",
            Error::Timeout => "timeout",
        }
    }

    /// Returns `true` for failures detected before any I/O took place.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingCaCert | Error::ClockNotSet | Error::TlsSetup(_) | Error::RequestTooLarge
        )
    }
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Overflow => Error::BodyTooLarge,
            Rejection::Abort => Error::Aborted,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::TlsSetup(kind) | Error::ConnectFailed(kind) | Error::ReadFailed(kind) => {
                write!(f, "{} ({:?})", self.as_str(), kind)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::TlsSetup(kind) | Error::ConnectFailed(kind) | Error::ReadFailed(kind) => {
                defmt::write!(f, "{} ({})", self.as_str(), kind)
            }
            _ => defmt::write!(f, "{}", self.as_str()),
        }
    }
}
