//! The module intermediate representation.
//!
//! This is the pivot data structure between the text parser and the binary
//! encoder: the parser populates it, the encoder walks it read-only. It is
//! multi-function-shaped (ordered sequences of types, functions, exports and
//! bodies) so the encoder computes real indices from sequence position
//! rather than assuming a single function at index 0.

/// A WebAssembly value type with its one-byte binary code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    I32,
    I64,
    F32,
    F64,
}

impl ValueType {
    /// The binary encoding of this value type (§5.3.1).
    pub fn emit_byte(&self) -> u8 {
        match self {
            ValueType::I32 => 0x7F,
            ValueType::I64 => 0x7E,
            ValueType::F32 => 0x7D,
            ValueType::F64 => 0x7C,
        }
    }

    /// Decodes a binary value-type byte.
    pub fn decode(byte: u8) -> Option<ValueType> {
        match byte {
            0x7F => Some(ValueType::I32),
            0x7E => Some(ValueType::I64),
            0x7D => Some(ValueType::F32),
            0x7C => Some(ValueType::F64),
            _ => None,
        }
    }

    /// Resolves a text-format type token. Anything other than the four
    /// exact names is unresolvable.
    pub fn from_token(token: &str) -> Option<ValueType> {
        match token {
            "i32" => Some(ValueType::I32),
            "i64" => Some(ValueType::I64),
            "f32" => Some(ValueType::F32),
            "f64" => Some(ValueType::F64),
            _ => None,
        }
    }
}

/// A single instruction: a mnemonic plus an optional immediate argument
/// token, kept in source order.
///
/// The argument is stored as the raw token (trailing `)` and all); it is
/// validated when the encoder turns it into an immediate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub arg: Option<String>,
}

impl Instruction {
    pub fn new(mnemonic: impl Into<String>) -> Instruction {
        Instruction {
            mnemonic: mnemonic.into(),
            arg: None,
        }
    }

    pub fn with_arg(mnemonic: impl Into<String>, arg: impl Into<String>) -> Instruction {
        Instruction {
            mnemonic: mnemonic.into(),
            arg: Some(arg.into()),
        }
    }
}

/// A function signature: ordered parameters and ordered results.
///
/// The parser records at most one result, but the field stays a sequence so
/// the encoder handles 0..N results without a special case.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionType {
    pub parameters: Vec<ValueType>,
    pub return_types: Vec<ValueType>,
}

/// A function declaration: the index of its type in [`Module::types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Function {
    pub ftype_index: u32,
}

/// A named, externally visible handle to a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub name: String,
    pub function_index: u32,
}

/// A function body: its instruction sequence. Locals beyond parameters are
/// unsupported, so no local declarations are carried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionBody {
    pub instructions: Vec<Instruction>,
}

/// The in-memory module: everything the encoder needs to emit a binary.
///
/// Created empty, populated by [`crate::wat::parse`], then consumed
/// read-only by [`crate::encoder::encode`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    pub types: Vec<FunctionType>,
    pub functions: Vec<Function>,
    pub exports: Vec<Export>,
    pub code: Vec<FunctionBody>,
}

impl Module {
    pub fn new() -> Module {
        Module::default()
    }

    /// The export name of the function at `index`, if one exists.
    pub fn get_function_name(&self, index: u32) -> Option<&str> {
        self.exports
            .iter()
            .find(|e| e.function_index == index)
            .map(|e| e.name.as_str())
    }
}
