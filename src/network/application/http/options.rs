use serde::{Deserialize, Serialize};

/// Per-client configuration.
///
/// Options are read at the start of every exchange and may be replaced
/// between exchanges with [`Client::set_options`](super::Client::set_options).
/// They can also be loaded from a JSON configuration blob; missing fields keep
/// their defaults.
///
/// ```rust
/// use pollhttp::network::application::http::Options;
///
/// let opts = Options::from_json(br#"{"timeout_ms":5000,"keep_body":false}"#).unwrap();
/// assert_eq!(opts.timeout_ms, 5000);
/// assert!(!opts.keep_body);
/// assert_eq!(opts.max_header_bytes, 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Overall deadline for one exchange, measured from submission.
    pub timeout_ms: u32,
    /// Handshake and coarse socket timeout passed to the TLS layer.
    pub tls_handshake_timeout_ms: u32,
    /// Ceiling for the whole response header block, terminator included.
    pub max_header_bytes: usize,
    /// Ceiling for the retained body when buffering.
    pub max_body_bytes: usize,
    /// Largest single read from the transport.
    pub io_chunk_size: usize,
    /// Retain the body in the buffering sink. `false` streams and discards.
    pub keep_body: bool,
    /// Treat a close before `Content-Length` bytes arrived as an error instead
    /// of a short, successful body.
    pub reject_truncated_body: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            tls_handshake_timeout_ms: 12_000,
            max_header_bytes: 4096,
            max_body_bytes: 16 * 1024,
            io_chunk_size: 512,
            keep_body: true,
            reject_truncated_body: false,
        }
    }
}

impl Options {
    /// Parse options from a JSON object. Unspecified fields use their defaults.
    pub fn from_json(json: &[u8]) -> Result<Self, serde_json_core::de::Error> {
        serde_json_core::from_slice(json).map(|(options, _)| options)
    }
}
