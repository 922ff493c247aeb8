//! Binary encoding primitives and constants for the WebAssembly format.
//!
//! Provides unsigned LEB128 integer encoding, the section/type/opcode byte
//! constants used by both the encoder and the decoder, and the immutable
//! mnemonic lookup table consulted when serialising instructions.
//!
//! All write functions append directly to a caller-provided `&mut Vec<u8>`
//! buffer, avoiding intermediate allocations.

use once_cell::sync::Lazy;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// WebAssembly binary format constants (spec section 5)
// ---------------------------------------------------------------------------

/// Module preamble magic number: `\0asm`.
pub const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];

/// Module preamble version, little-endian 1.
pub const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

// Section IDs (§5.5.2)
pub const SECTION_CUSTOM: u8 = 0;
pub const SECTION_TYPE: u8 = 1;
pub const SECTION_IMPORT: u8 = 2;
pub const SECTION_FUNCTION: u8 = 3;
pub const SECTION_TABLE: u8 = 4;
pub const SECTION_MEMORY: u8 = 5;
pub const SECTION_GLOBAL: u8 = 6;
pub const SECTION_EXPORT: u8 = 7;
pub const SECTION_START: u8 = 8;
pub const SECTION_ELEMENT: u8 = 9;
pub const SECTION_CODE: u8 = 10;
pub const SECTION_DATA: u8 = 11;
pub const SECTION_DATA_COUNT: u8 = 12;

// Type constructors (§5.3.6)
pub const TYPE_FUNC: u8 = 0x60;

// Export descriptor kinds (§5.5.10)
pub const DESC_FUNC: u8 = 0x00;

// Expression terminator (§5.4.9)
pub const OP_END: u8 = 0x0B;

// Variable instructions (§5.4.4)
pub const OP_LOCAL_GET: u8 = 0x20;
pub const OP_LOCAL_SET: u8 = 0x21;
pub const OP_LOCAL_TEE: u8 = 0x22;
pub const OP_GLOBAL_GET: u8 = 0x23;
pub const OP_GLOBAL_SET: u8 = 0x24;

// Numeric instructions (§5.4.7), i32 arithmetic subset
pub const OP_I32_ADD: u8 = 0x6A;
pub const OP_I32_SUB: u8 = 0x6B;
pub const OP_I32_MUL: u8 = 0x6C;
pub const OP_I32_DIV_S: u8 = 0x6D;

// ---------------------------------------------------------------------------
// Mnemonic lookup table
// ---------------------------------------------------------------------------

/// How an instruction mnemonic is encoded: its opcode byte and whether it
/// carries a single immediate index operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub opcode: u8,
    pub has_immediate: bool,
}

/// Mnemonic to opcode lookup table, constructed once and treated as
/// read-only configuration.
pub static OPCODES: Lazy<HashMap<&'static str, OpcodeInfo>> = Lazy::new(|| {
    fn plain(opcode: u8) -> OpcodeInfo {
        OpcodeInfo {
            opcode,
            has_immediate: false,
        }
    }
    fn with_immediate(opcode: u8) -> OpcodeInfo {
        OpcodeInfo {
            opcode,
            has_immediate: true,
        }
    }

    let mut table = HashMap::new();
    table.insert("local.get", with_immediate(OP_LOCAL_GET));
    table.insert("local.set", with_immediate(OP_LOCAL_SET));
    table.insert("local.tee", with_immediate(OP_LOCAL_TEE));
    table.insert("global.get", with_immediate(OP_GLOBAL_GET));
    table.insert("global.set", with_immediate(OP_GLOBAL_SET));
    table.insert("i32.add", plain(OP_I32_ADD));
    table.insert("i32.sub", plain(OP_I32_SUB));
    table.insert("i32.mul", plain(OP_I32_MUL));
    table.insert("i32.div_s", plain(OP_I32_DIV_S));
    table
});

// ---------------------------------------------------------------------------
// Unsigned LEB128
// ---------------------------------------------------------------------------

/// Appends the unsigned LEB128 encoding of a u64 value to `buf`.
fn write_vu(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        byte |= 0x80;
        buf.push(byte);
    }
}

/// Appends the unsigned LEB128 encoding of a u32 value to `buf`.
///
/// Zero encodes as a single `0x00` byte; every byte except the last carries
/// the continuation bit.
pub fn write_vu32(buf: &mut Vec<u8>, v: u32) {
    write_vu(buf, v as u64);
}

/// Appends a length-prefixed byte vector (vu32 length + raw bytes) to `buf`.
pub fn write_u8vec(buf: &mut Vec<u8>, v: &[u8]) {
    write_vu32(buf, v.len() as u32);
    buf.extend_from_slice(v);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
