//! # pollhttp - polling HTTPS client for embedded devices
//!
//! A non-blocking HTTP/1.1-over-TLS client that runs cooperatively inside a
//! single-threaded polling loop on a memory-constrained device. A request is
//! submitted once and then driven to completion by many short calls to
//! [`Client::poll`](network::application::http::Client::poll), none of which
//! block.
//!
//! ## Features
//!
//! - Explicit, resumable state machine: Connect → Send → Headers → Body
//! - Header and body size ceilings with fixed-capacity buffers
//! - `Content-Length`, chunked and until-close framing
//! - Overall timeout on a caller-supplied monotonic clock
//! - Injected body sink (buffer-and-cap or streaming)
//! - Transport agnostic: TLS, DNS and sockets stay behind small traits
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pollhttp = "0.1.0"
//! ```
//!
//! Implement the [`network`] traits for your TLS socket and a
//! [`time::Clock`] for your millisecond timer, then:
//!
//! ```rust,ignore
//! let mut client: Client<MyTls, MyMillis> = Client::new(tls, millis, BufferSink::new());
//! client.set_ca_cert(CA_PEM)?;
//! client.set_unix_time(sntp_epoch);
//! client.begin_post("api.example.com", 443, "/v1/telemetry", b"{\"t\":21.5}", "", "")?;
//!
//! loop {
//!     client.poll();
//!     if client.is_done() {
//!         handle(client.status(), client.body());
//!     }
//!     // ... other work ...
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `std`: `std::error::Error` impls and a `std` clock (default: disabled)
//! - `async`: `Client::wait`, driving an exchange from an executor
//! - `defmt`: `defmt` logging and `Format` impls

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

mod fmt;

/// Transport abstraction and protocol implementations.
///
/// The transport traits describe the non-blocking TLS byte stream the client
/// runs on; the HTTP client lives in [`network::application::http`].
pub mod network;

/// Clock abstractions for timeouts and certificate validity.
pub mod time;
