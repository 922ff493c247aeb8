//! Binary format decoder.
//!
//! Validates the 8-byte module preamble and walks the section stream: one
//! section-id byte, a vu32 size, then exactly that many payload bytes.
//! Every section other than code is consumed and discarded; the first code
//! section's payload is handed back for execution and the walk stops there.

pub mod encoding;
pub mod module;
pub mod reader;

pub use reader::DecodeError;

use encoding::{MAGIC, SECTION_CODE, VERSION};
use reader::Reader;

/// Checks the module preamble: at least 8 bytes, the `\0asm` magic, then
/// version 1.
pub fn validate_header(bytes: &[u8]) -> Result<(), DecodeError> {
    if bytes.len() < 8 {
        return Err(DecodeError::TooShort);
    }
    let mut reader = Reader::new(bytes[..8].to_vec());
    if reader.read_u32()? != u32::from_le_bytes(MAGIC) {
        return Err(DecodeError::InvalidMagic);
    }
    if reader.read_u32()? != u32::from_le_bytes(VERSION) {
        return Err(DecodeError::InvalidVersion);
    }
    Ok(())
}

/// Validates the header, then walks sections until a code section is found,
/// returning its payload.
///
/// A section whose declared size exceeds the remaining input fails with
/// [`DecodeError::TruncatedSection`]; running out of sections without seeing
/// a code section fails with [`DecodeError::CodeSectionNotFound`].
pub fn locate_code_section(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    validate_header(bytes)?;

    let mut reader = Reader::new(bytes[8..].to_vec());
    while reader.has_at_least(1) {
        let sec_id = reader.read_byte()?;
        let sec_len = reader.read_vu32()?;
        let payload = reader.read_bytes(sec_len as usize)?;

        if sec_id == SECTION_CODE {
            return Ok(payload);
        }
    }

    Err(DecodeError::CodeSectionNotFound)
}
