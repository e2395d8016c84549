//! Line codec for tokio.
//!
//! Reads and writes newline-terminated lines. Input is decoded lossily: bytes
//! that are not valid UTF-8 become U+FFFD instead of failing the connection.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ChatError;

/// Newline-delimited text codec
///
/// A trailing `\r` is stripped from every decoded line. Lines longer than
/// `max_len` bytes (terminator excluded) are an error.
#[derive(Debug, Clone)]
pub struct ChatLineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl ChatLineCodec {
    pub fn new(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    fn to_line(&self, raw: &[u8]) -> Result<String, ChatError> {
        let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.len() > self.max_len {
            return Err(ChatError::LineTooLong {
                actual: raw.len(),
                limit: self.max_len,
            });
        }
        Ok(String::from_utf8_lossy(raw).into_owned())
    }
}

impl Decoder for ChatLineCodec {
    type Item = String;
    type Error = ChatError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ChatError> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;
            return self.to_line(&line).map(Some);
        }

        // No complete line yet - remember where we stopped
        self.next_index = src.len();
        // Leave room for a `\r` still waiting on its `\n`
        if src.len() > self.max_len.saturating_add(1) {
            return Err(ChatError::LineTooLong {
                actual: src.len(),
                limit: self.max_len,
            });
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ChatError> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                // Unterminated last line
                let line = src.split_to(src.len());
                self.next_index = 0;
                self.to_line(&line).map(Some)
            }
        }
    }
}

impl Encoder<String> for ChatLineCodec {
    type Error = ChatError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ChatError> {
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
