//! Chunked transfer-coding decoder.
//!
//! ```text
//! chunked-body = *chunk last-chunk trailer-section CRLF
//! chunk        = chunk-size [ chunk-ext ] CRLF chunk-data CRLF
//! last-chunk   = 1*("0") [ chunk-ext ] CRLF
//! ```
//!
//! Decoding is resumable at every byte. Chunk data is handed to the sink as
//! contiguous runs straight out of the input slice, never copied. Trailer
//! fields after the last chunk are skipped unparsed.

use super::error::Error;
use super::sink::Sink;
use heapless::Vec;

/// Longest chunk size line accepted, extensions included, terminator excluded.
pub const MAX_CHUNK_LINE_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Reading a chunk size line.
    Size,
    /// Forwarding chunk data.
    Data,
    /// Skipping to the end of the line that closes a chunk's data.
    Trailer,
    /// The last chunk was seen; skipping the trailer section. `blank` is set
    /// while the current trailer line holds nothing but line terminators.
    Done { blank: bool },
    /// The trailer section ended. Any further input is ignored.
    End,
}

#[derive(Debug)]
pub struct ChunkedDecoder {
    state: ChunkState,
    remaining: usize,
    line: Vec<u8, MAX_CHUNK_LINE_LEN>,
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkedDecoder {
    pub const fn new() -> Self {
        Self {
            state: ChunkState::Size,
            remaining: 0,
            line: Vec::new(),
        }
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Bytes still expected for the current chunk.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Whether the last chunk was seen. Body content is complete from this
    /// point even if trailer lines are still arriving.
    pub fn saw_last_chunk(&self) -> bool {
        matches!(self.state, ChunkState::Done { .. } | ChunkState::End)
    }

    /// Whether the whole chunked body, trailer section included, was consumed.
    pub fn is_complete(&self) -> bool {
        self.state == ChunkState::End
    }

    /// Decode `input`, delivering chunk data to `sink`.
    ///
    /// All of `input` is consumed. Returns `true` once the body is complete.
    pub fn feed<S: Sink + ?Sized>(&mut self, input: &[u8], sink: &mut S) -> Result<bool, Error> {
        let mut pos = 0;

        while pos < input.len() {
            match self.state {
                ChunkState::Size => {
                    let byte = input[pos];
                    pos += 1;
                    if byte == b'\n' {
                        self.finish_size_line()?;
                    } else {
                        self.line.push(byte).map_err(|_| Error::ChunkLineTooLong)?;
                    }
                }
                ChunkState::Data => {
                    let run = self.remaining.min(input.len() - pos);
                    sink.accept(&input[pos..pos + run])?;
                    pos += run;
                    self.remaining -= run;
                    if self.remaining == 0 {
                        self.state = ChunkState::Trailer;
                    }
                }
                ChunkState::Trailer => {
                    if input[pos] == b'\n' {
                        self.state = ChunkState::Size;
                    }
                    pos += 1;
                }
                ChunkState::Done { blank } => {
                    self.state = match input[pos] {
                        b'\n' if blank => ChunkState::End,
                        b'\n' => ChunkState::Done { blank: true },
                        b'\r' => ChunkState::Done { blank },
                        _ => ChunkState::Done { blank: false },
                    };
                    pos += 1;
                }
                ChunkState::End => break,
            }
        }

        Ok(self.is_complete())
    }

    fn finish_size_line(&mut self) -> Result<(), Error> {
        let line = self.line.trim_ascii();
        let size = match line.iter().position(|&b| b == b';') {
            Some(semi) => line[..semi].trim_ascii(),
            None => line,
        };
        let size = parse_hex(size).ok_or(Error::InvalidChunkSize)?;
        self.line.clear();

        if size == 0 {
            self.state = ChunkState::Done { blank: true };
        } else {
            self.remaining = size;
            self.state = ChunkState::Data;
        }
        Ok(())
    }
}

fn parse_hex(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0usize, |acc, &b| {
        let digit = char::from(b).to_digit(16)?;
        acc.checked_mul(16)?.checked_add(digit as usize)
    })
}
