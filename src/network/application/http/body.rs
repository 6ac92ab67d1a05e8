//! Response body framing and delivery to the sink.

use super::chunked::ChunkedDecoder;
use super::error::Error;
use super::sink::Sink;

/// How the response body is delimited, chosen once the headers are parsed.
#[derive(Debug)]
pub enum BodyReader {
    /// `Content-Length` was declared; this many bytes are still expected.
    Length { remaining: usize },
    /// No length was declared; the body runs until the peer closes.
    UntilClose,
    /// `Transfer-Encoding: chunked`.
    Chunked(ChunkedDecoder),
}

impl Default for BodyReader {
    fn default() -> Self {
        BodyReader::UntilClose
    }
}

impl BodyReader {
    /// Pick the framing for a response. Chunked coding overrides any declared
    /// length.
    pub fn new(content_length: Option<usize>, chunked: bool) -> Self {
        match (chunked, content_length) {
            (true, _) => BodyReader::Chunked(ChunkedDecoder::new()),
            (false, Some(remaining)) => BodyReader::Length { remaining },
            (false, None) => BodyReader::UntilClose,
        }
    }

    /// Whether the framing is satisfied without waiting for the peer to close.
    pub fn is_complete(&self) -> bool {
        match self {
            BodyReader::Length { remaining } => *remaining == 0,
            BodyReader::UntilClose => false,
            BodyReader::Chunked(decoder) => decoder.is_complete(),
        }
    }

    /// Deliver a burst of body bytes to `sink`.
    ///
    /// Bytes past the end of a length-delimited or chunked body are dropped.
    /// Returns `true` once the body is complete.
    pub fn feed<S: Sink + ?Sized>(&mut self, input: &[u8], sink: &mut S) -> Result<bool, Error> {
        match self {
            BodyReader::Length { remaining } => {
                let run = (*remaining).min(input.len());
                if run > 0 {
                    sink.accept(&input[..run])?;
                    *remaining -= run;
                }
                Ok(*remaining == 0)
            }
            BodyReader::UntilClose => {
                if !input.is_empty() {
                    sink.accept(input)?;
                }
                Ok(false)
            }
            BodyReader::Chunked(decoder) => decoder.feed(input, sink),
        }
    }

    /// The peer closed with nothing left to read.
    ///
    /// A short body is accepted unless `reject_truncated` is set, in which case
    /// a missing tail of a declared length or an unfinished chunk sequence is
    /// reported as [`Error::TruncatedBody`].
    pub fn on_close(&self, reject_truncated: bool) -> Result<(), Error> {
        let truncated = match self {
            BodyReader::Length { remaining } => *remaining > 0,
            BodyReader::UntilClose => false,
            BodyReader::Chunked(decoder) => !decoder.saw_last_chunk(),
        };
        if truncated && reject_truncated {
            Err(Error::TruncatedBody)
        } else {
            Ok(())
        }
    }
}
