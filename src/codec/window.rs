use std::io::{ErrorKind, Read};

use crate::error::{ParseError, Result};

const CHUNK_SIZE: usize = 4096; // 4KB reads

/// Growable window of decoded text over a byte stream.
///
/// Bytes are read in fixed-size chunks and decoded to UTF-8 eagerly. A partial
/// multi-byte sequence at the end of a chunk is held back in `bytes[..pending]`
/// until the next read completes it. Positions are byte offsets into `text`
/// and always fall on character boundaries.
///
/// The caller drops the consumed prefix with [`CharWindow::consume`]. The
/// prefix is only compacted away once it outweighs the live text, so consuming
/// many short records costs amortized constant time each.
pub(crate) struct CharWindow<R> {
    reader: R,
    text: String,
    /// Byte position in `text` of window position 0.
    start: usize,
    bytes: Box<[u8]>,
    pending: usize,
    /// Stream offset of `bytes[0]`, for error reporting.
    offset: u64,
    exhausted: bool,
}

impl<R: Read> CharWindow<R> {
    pub(crate) fn new(reader: R) -> Self {
        CharWindow {
            reader,
            text: String::new(),
            start: 0,
            bytes: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
            pending: 0,
            offset: 0,
            exhausted: false,
        }
    }

    /// Returns the character starting at byte position `pos`, reading more input
    /// as needed. `None` means end of input.
    pub(crate) fn char_at(&mut self, pos: usize) -> Result<Option<char>> {
        let pos = self.start + pos;
        while pos >= self.text.len() {
            if !self.fill()? {
                return Ok(None);
            }
        }
        Ok(self.text.get(pos..).and_then(|rest| rest.chars().next()))
    }

    /// Drops the first `len` bytes of the window.
    pub(crate) fn consume(&mut self, len: usize) {
        self.start = (self.start + len).min(self.text.len());
        if self.start >= CHUNK_SIZE && self.start * 2 >= self.text.len() {
            self.text.drain(..self.start);
            self.start = 0;
        }
    }

    /// Reads one chunk. Returns `false` once the stream is exhausted.
    fn fill(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }

        let read = loop {
            match self.reader.read(&mut self.bytes[self.pending..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            self.exhausted = true;
            if self.pending > 0 {
                // Stream ended inside a multi-byte sequence
                return Err(ParseError::InvalidEncoding {
                    offset: self.offset,
                }
                .into());
            }
            return Ok(false);
        }

        let available = self.pending + read;
        let valid = match std::str::from_utf8(&self.bytes[..available]) {
            Ok(decoded) => {
                self.text.push_str(decoded);
                available
            }
            Err(e) => {
                let valid = e.valid_up_to();
                if e.error_len().is_some() {
                    return Err(ParseError::InvalidEncoding {
                        offset: self.offset + valid as u64,
                    }
                    .into());
                }
                // Incomplete trailing sequence: decode the prefix, keep the tail
                let decoded = std::str::from_utf8(&self.bytes[..valid]).map_err(|_| {
                    ParseError::InvalidEncoding {
                        offset: self.offset,
                    }
                })?;
                self.text.push_str(decoded);
                valid
            }
        };

        self.bytes.copy_within(valid..available, 0);
        self.pending = available - valid;
        self.offset += valid as u64;
        Ok(true)
    }
}
