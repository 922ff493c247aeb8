//! A miniature WebAssembly toolchain: a text-format compiler and a binary
//! runtime.
//!
//! watc translates a restricted, line-oriented subset of the WebAssembly
//! text format into a valid binary module, and separately loads a binary
//! module, validates its preamble, locates its code section, and executes
//! the contained instructions on a stack-based virtual machine.
//!
//! # Modules
//!
//! - [`wat`] -- Text format parser. Reads source into a
//!   [`parser::module::Module`].
//! - [`encoder`] -- Binary encoder. Serialises a `Module` to `.wasm` bytes.
//! - [`parser`] -- Binary decoder. Validates the header and walks sections.
//! - [`runtime`] -- Stack-machine interpreter for code-section payloads.
//!
//! # Example
//!
//! Compile a module and execute its exported function with parameters
//! 20 and 10:
//!
//! ```
//! let source = "(module\n(func (export \"add\") (param i32 i32) (result i32)\nlocal.get 0\nlocal.get 1\ni32.add)";
//!
//! let bytes = watc::compile(source).unwrap();
//! assert_eq!(&bytes[0..4], b"\0asm");
//!
//! let execution = watc::run(&bytes, &[20, 10]).unwrap();
//! assert_eq!(execution.functions[0].stack, vec![30]);
//! assert_eq!(execution.functions[0].trace[0].to_string(), "20 + 10 = 30");
//! ```

pub mod encoder;
pub mod parser;
pub mod runtime;
pub mod wat;

use runtime::Execution;

/// Any error the pipeline can report. Each phase keeps its own error type;
/// this wraps them for callers driving the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] wat::ParseError),
    #[error(transparent)]
    Encode(#[from] encoder::EncodeError),
    #[error(transparent)]
    Decode(#[from] parser::DecodeError),
    #[error(transparent)]
    Runtime(#[from] runtime::RuntimeError),
}

/// Parses text-format source and encodes it to a binary module.
pub fn compile(source: &str) -> Result<Vec<u8>, Error> {
    let module = wat::parse(source)?;
    Ok(encoder::encode(&module)?)
}

/// Loads a binary module and executes its code section.
///
/// Validates the header, locates the code section, and executes every
/// function body with `params` as the locals, returning the final stack
/// contents and the arithmetic trace per function.
pub fn run(bytes: &[u8], params: &[i32]) -> Result<Execution, Error> {
    let payload = parser::locate_code_section(bytes)?;
    Ok(runtime::execute_code_section(&payload, params)?)
}
