//! Incremental response header parsing.
//!
//! The parser is fed whatever bytes happen to be available and keeps its
//! partial line between calls, so a header block split at any byte boundary
//! parses exactly like one delivered whole. Only the fields the exchange needs
//! are extracted; every other header is skipped.

use super::error::Error;
use heapless::Vec;

/// Longest header line accepted, terminator included.
pub const MAX_LINE_LEN: usize = 512;

const STATUS_PREFIX: &[u8] = b"HTTP/1.";
const STATUS_CODE_OFFSET: usize = 9;

/// Outcome of a [`HeaderParser::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// All input was consumed and the header block is still open.
    Partial,
    /// The blank line was reached after consuming this many bytes; the rest of
    /// the input belongs to the body.
    Complete(usize),
}

#[derive(Debug)]
pub struct HeaderParser {
    line: Vec<u8, MAX_LINE_LEN>,
    header_bytes: usize,
    status: Option<u16>,
    content_length: Option<usize>,
    chunked: bool,
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderParser {
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            header_bytes: 0,
            status: None,
            content_length: None,
            chunked: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Status code from the status line, once seen.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Declared `Content-Length`, if any.
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    /// Whether `Transfer-Encoding` announced chunked framing.
    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    /// Bytes of the header block consumed so far.
    pub fn header_bytes(&self) -> usize {
        self.header_bytes
    }

    /// Consume header bytes from `input`.
    ///
    /// Every byte counts against `max_header_bytes`. Parsing stops immediately
    /// after the blank line so the caller can hand the remainder to the body.
    pub fn feed(&mut self, input: &[u8], max_header_bytes: usize) -> Result<Status, Error> {
        for (i, &byte) in input.iter().enumerate() {
            self.header_bytes += 1;
            if self.header_bytes > max_header_bytes {
                return Err(Error::HeadersTooLarge);
            }

            self.line.push(byte).map_err(|_| Error::HeaderLineTooLong)?;

            if byte == b'\n' {
                let done = self.finish_line()?;
                self.line.clear();
                if done {
                    return Ok(Status::Complete(i + 1));
                }
            }
        }
        Ok(Status::Partial)
    }

    /// Interpret the buffered line. Returns `true` on the terminating blank line.
    fn finish_line(&mut self) -> Result<bool, Error> {
        let line = self.line.trim_ascii();

        if line.is_empty() {
            if self.status.is_none() {
                return Err(Error::MalformedStatusLine);
            }
            return Ok(true);
        }

        if line.starts_with(STATUS_PREFIX) {
            self.status = Some(parse_status_code(line)?);
            return Ok(false);
        }

        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return Ok(false);
        };
        let name = line[..colon].trim_ascii();
        let value = line[colon + 1..].trim_ascii();

        if name.eq_ignore_ascii_case(b"Content-Length") {
            self.content_length = Some(parse_decimal(value).ok_or(Error::InvalidContentLength)?);
        } else if name.eq_ignore_ascii_case(b"Transfer-Encoding")
            && contains_ignore_case(value, b"chunked")
        {
            self.chunked = true;
        }

        Ok(false)
    }
}

fn parse_status_code(line: &[u8]) -> Result<u16, Error> {
    let code = line
        .get(STATUS_CODE_OFFSET..STATUS_CODE_OFFSET + 3)
        .ok_or(Error::MalformedStatusLine)?;
    if !code.iter().all(u8::is_ascii_digit) {
        return Err(Error::MalformedStatusLine);
    }
    Ok(code.iter().fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0')))
}

fn parse_decimal(value: &[u8]) -> Option<usize> {
    if value.is_empty() {
        return None;
    }
    value.iter().try_fold(0usize, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
    })
}

fn contains_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
