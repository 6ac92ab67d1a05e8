//! Common error types for transport operations

/// A common error kind for transport operations.
///
/// This enum defines a set of common errors that can occur when working with
/// a byte-stream transport. It is designed to be simple and portable for `no_std`
/// environments. Transport implementations map their native errors onto it via
/// [`TransportError`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A connection attempt was refused.
    ConnectionRefused,
    /// A timeout occurred.
    Timeout,
    /// The connection was closed.
    ConnectionClosed,
    /// An invalid address was provided.
    InvalidAddress,
    /// The TLS layer rejected the handshake or its configuration.
    TlsError,
    /// Any other transport failure.
    Other,
}

/// Transport-native errors that can be classified into an [`Error`] kind.
pub trait TransportError: core::fmt::Debug {
    /// The portable kind of this error.
    fn kind(&self) -> Error;
}

impl TransportError for Error {
    fn kind(&self) -> Error {
        *self
    }
}

impl TransportError for () {
    fn kind(&self) -> Error {
        Error::Other
    }
}

impl TransportError for core::convert::Infallible {
    fn kind(&self) -> Error {
        match *self {}
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::TlsError => defmt::write!(f, "TlsError"),
            Error::Other => defmt::write!(f, "Other"),
        }
    }
}
