//! # Application Layer Protocols
//!
//! Protocol clients built on top of the [`Transport`](crate::network::Transport)
//! traits. They share these principles:
//!
//! - **Connection Agnostic**: work with any type implementing the transport traits
//! - **No-std Compatible**: no heap allocation
//! - **Resource Conscious**: fixed-size buffers and explicit ceilings
//! - **Non-blocking**: progress is made by repeated polling, never by waiting

/// HTTP/1.1 client implementation.
///
/// Provides a polling HTTP/1.1 client for TLS transports, supporting GET and
/// POST with chunked and length-delimited responses.
pub mod http;
