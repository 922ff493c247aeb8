//! Encodes a [`Module`] to WebAssembly binary format (`.wasm`).
//!
//! # Binary format overview
//!
//! A WebAssembly binary begins with a magic number (`\0asm`) and version (1),
//! followed by sections in a fixed order. Each section is encoded as:
//!
//! ```text
//! section_id: u8 | byte_length: vu32 | contents: byte*
//! ```
//!
//! Sections are emitted only when present (non-empty), and every size field
//! is computed from the contents it prefixes, never hard-coded. Encoding is
//! deterministic: the same module always yields byte-identical output.
//!
//! # Example
//!
//! ```
//! use watc::{encoder, wat};
//!
//! let module = wat::parse("(module\n(func (export \"f\")\ni32.add)").unwrap();
//! let bytes = encoder::encode(&module).unwrap();
//! assert_eq!(&bytes[0..4], b"\0asm");
//! ```

use crate::parser::encoding::{
    write_u8vec, write_vu32, DESC_FUNC, MAGIC, OPCODES, OP_END, SECTION_CODE, SECTION_EXPORT,
    SECTION_FUNCTION, SECTION_TYPE, TYPE_FUNC, VERSION,
};
use crate::parser::module::{FunctionBody, Module};

/// Errors that can occur during binary encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// An instruction that takes an immediate was given an argument token
    /// that is not a clean unsigned integer.
    #[error("invalid immediate for {mnemonic}: {arg:?}")]
    InvalidImmediate { mnemonic: String, arg: String },
}

/// Encodes a module to binary format.
///
/// Emits the 8-byte preamble, then the type, function, export, and code
/// sections, each skipped when its collection is empty. Instructions are
/// encoded in the order the parser recorded them; mnemonics missing from
/// the opcode table are skipped.
pub fn encode(module: &Module) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();

    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&VERSION);

    encode_type_section(&mut buf, module);
    encode_function_section(&mut buf, module);
    encode_export_section(&mut buf, module);
    encode_code_section(&mut buf, module)?;

    Ok(buf)
}

/// Appends one section: id byte, vu32 size, contents. Building every
/// section through this single point keeps the size field equal to the
/// contents length by construction.
fn emit_section(buf: &mut Vec<u8>, id: u8, contents: &[u8]) {
    buf.push(id);
    write_u8vec(buf, contents);
}

/// Type section (id 1): function signatures.
///
/// ```text
/// functype ::= 0x60 vec(valtype) vec(valtype)
/// ```
fn encode_type_section(buf: &mut Vec<u8>, module: &Module) {
    if module.types.is_empty() {
        return;
    }

    let mut contents = Vec::new();
    write_vu32(&mut contents, module.types.len() as u32);
    for ft in &module.types {
        contents.push(TYPE_FUNC);
        write_vu32(&mut contents, ft.parameters.len() as u32);
        for p in &ft.parameters {
            contents.push(p.emit_byte());
        }
        write_vu32(&mut contents, ft.return_types.len() as u32);
        for r in &ft.return_types {
            contents.push(r.emit_byte());
        }
    }
    emit_section(buf, SECTION_TYPE, &contents);
}

/// Function section (id 3): type index per function.
fn encode_function_section(buf: &mut Vec<u8>, module: &Module) {
    if module.functions.is_empty() {
        return;
    }

    let mut contents = Vec::new();
    write_vu32(&mut contents, module.functions.len() as u32);
    for func in &module.functions {
        write_vu32(&mut contents, func.ftype_index);
    }
    emit_section(buf, SECTION_FUNCTION, &contents);
}

/// Export section (id 7): name, kind byte, function index per export.
///
/// An export with an empty name still produces a structurally valid entry
/// (zero-length name vector); the encoder never fabricates or drops one.
fn encode_export_section(buf: &mut Vec<u8>, module: &Module) {
    if module.exports.is_empty() {
        return;
    }

    let mut contents = Vec::new();
    write_vu32(&mut contents, module.exports.len() as u32);
    for export in &module.exports {
        write_u8vec(&mut contents, export.name.as_bytes());
        contents.push(DESC_FUNC);
        write_vu32(&mut contents, export.function_index);
    }
    emit_section(buf, SECTION_EXPORT, &contents);
}

/// Code section (id 10): body count, then per body a vu32 size and the body
/// bytes (local-declaration count, instructions, end marker).
fn encode_code_section(buf: &mut Vec<u8>, module: &Module) -> Result<(), EncodeError> {
    if module.code.is_empty() {
        return Ok(());
    }

    let mut contents = Vec::new();
    write_vu32(&mut contents, module.code.len() as u32);
    for function_body in &module.code {
        let body = encode_function_body(function_body)?;
        write_u8vec(&mut contents, &body);
    }
    emit_section(buf, SECTION_CODE, &contents);
    Ok(())
}

fn encode_function_body(function_body: &FunctionBody) -> Result<Vec<u8>, EncodeError> {
    let mut body = Vec::new();
    // locals beyond parameters are unsupported: zero local declarations
    write_vu32(&mut body, 0);

    for instruction in &function_body.instructions {
        let info = match OPCODES.get(instruction.mnemonic.as_str()) {
            Some(info) => info,
            // unrecognized mnemonics are skipped, not fatal
            None => continue,
        };
        body.push(info.opcode);
        if info.has_immediate {
            let arg = instruction.arg.as_deref().unwrap_or("");
            let index: u32 = arg.parse().map_err(|_| EncodeError::InvalidImmediate {
                mnemonic: instruction.mnemonic.clone(),
                arg: arg.to_string(),
            })?;
            write_vu32(&mut body, index);
        }
    }

    body.push(OP_END);
    Ok(body)
}
