//! Byte cursor over a binary module.

use byteorder::{ByteOrder, LittleEndian};

/// Errors produced while decoding a binary module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("input too short to hold a module header")]
    TooShort,
    #[error("invalid magic number")]
    InvalidMagic,
    #[error("unsupported version")]
    InvalidVersion,
    #[error("truncated input: varint never terminated")]
    TruncatedInput,
    #[error("varint overflows u32")]
    VarintOverflow,
    #[error("truncated section: expected {expected} bytes, {remaining} remaining")]
    TruncatedSection { expected: usize, remaining: usize },
    #[error("code section not found")]
    CodeSectionNotFound,
}

/// A cursor over an owned byte buffer, with the primitive reads the binary
/// format is built from: single bytes, fixed-width little-endian integers,
/// unsigned LEB128 varints, and exact-length byte runs.
pub struct Reader {
    bytes: Vec<u8>,
    pos: usize,
}

impl Reader {
    pub fn new(bytes: Vec<u8>) -> Reader {
        Reader { bytes, pos: 0 }
    }

    /// Current byte offset into the buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn has_at_least(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        match self.next() {
            Some(byte) => Ok(byte),
            None => Err(DecodeError::TruncatedInput),
        }
    }

    /// Reads exactly `len` bytes, failing if the declared length exceeds
    /// what remains.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        if !self.has_at_least(len) {
            return Err(DecodeError::TruncatedSection {
                expected: len,
                remaining: self.remaining(),
            });
        }
        let bytes = self.bytes[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(bytes)
    }

    /// Reads a fixed-width little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4)?;
        Ok(LittleEndian::read_u32(&bytes))
    }

    /// Reads an unsigned LEB128 varint, accumulating 7-bit groups at bit
    /// offsets 0, 7, 14, ... until a byte without the continuation bit.
    ///
    /// A u32 fits in at most five groups; a sixth continuation byte, or a
    /// fifth group carrying bits past 32, is rejected rather than shifted
    /// off the end of the value.
    pub fn read_vu32(&mut self) -> Result<u32, DecodeError> {
        let mut result: u32 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_byte()?;
            let group = (byte & 0x7f) as u32;
            if shift == 28 && group > 0x0f {
                return Err(DecodeError::VarintOverflow);
            }
            result |= group << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(DecodeError::VarintOverflow);
            }
        }
        Ok(result)
    }
}

impl Iterator for Reader {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.bytes.len() {
            let byte = self.bytes[self.pos];
            self.pos += 1;
            Some(byte)
        } else {
            None
        }
    }
}
