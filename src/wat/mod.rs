//! Text format parser.
//!
//! Recognizes the line-oriented subset of the WebAssembly text format this
//! crate compiles: line 0 declares the module, line 1 declares a single
//! function of the shape
//! `(func (export "name") (param TYPE...) (result TYPE...)` with the
//! parenthesized clauses in any order, and every following line is one
//! instruction, either a bare mnemonic or a mnemonic plus one argument.
//!
//! The grammar is deliberately scanned by splitting the declaration line on
//! `)` and whitespace rather than by a full s-expression reader; clause
//! content that is not recognized is ignored for forward compatibility.

use crate::parser::module::{
    Export, Function, FunctionBody, FunctionType, Instruction, Module, ValueType,
};

/// Errors produced while parsing text-format source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("missing module declaration on first line")]
    MalformedHeader,
    #[error("unresolved value type: {0}")]
    UnresolvedValueType(String),
}

/// Parses text-format source into a [`Module`].
///
/// # Example
///
/// ```
/// use watc::wat;
/// use watc::parser::module::ValueType;
///
/// let module = wat::parse(
///     "(module\n(func (export \"add\") (param i32 i32) (result i32)\nlocal.get 0\nlocal.get 1\ni32.add)",
/// ).unwrap();
///
/// assert_eq!(module.exports[0].name, "add");
/// assert_eq!(module.types[0].parameters, vec![ValueType::I32, ValueType::I32]);
/// assert_eq!(module.code[0].instructions.len(), 3);
/// ```
pub fn parse(source: &str) -> Result<Module, ParseError> {
    let mut module = Module::new();
    let mut declaration: Option<(String, FunctionType)> = None;
    let mut instructions: Vec<Instruction> = Vec::new();
    let mut saw_module = false;

    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        match index {
            0 => {
                if !line.contains("module") {
                    return Err(ParseError::MalformedHeader);
                }
                saw_module = true;
            }
            1 => {
                if line.starts_with("(func") {
                    declaration = Some(parse_declaration(line)?);
                }
            }
            _ => {
                if let Some(instruction) = parse_instruction(line) {
                    instructions.push(instruction);
                }
            }
        }
    }

    if !saw_module {
        return Err(ParseError::MalformedHeader);
    }

    if let Some((export_name, ftype)) = declaration {
        module.types.push(ftype);
        let ftype_index = (module.types.len() - 1) as u32;
        module.functions.push(Function { ftype_index });
        let function_index = (module.functions.len() - 1) as u32;
        module.exports.push(Export {
            name: export_name,
            function_index,
        });
        module.code.push(FunctionBody { instructions });
    }

    Ok(module)
}

/// Extracts the export name and signature from a `(func ...` declaration
/// line by splitting on `)` to isolate each clause.
fn parse_declaration(line: &str) -> Result<(String, FunctionType), ParseError> {
    let mut export_name = String::new();
    let mut ftype = FunctionType::default();

    for clause in line.split(')') {
        let tokens: Vec<&str> = clause.split_whitespace().collect();
        if clause.contains("export") {
            if let Some(last) = tokens.last() {
                export_name = last.replace('"', "");
            }
        } else if clause.contains("param") {
            ftype.parameters = resolve_types(&tokens)?;
        } else if clause.contains("result") {
            // exactly one result slot: only the first resolved token counts
            ftype.return_types = resolve_types(&tokens)?.into_iter().take(1).collect();
        }
    }

    Ok((export_name, ftype))
}

/// Resolves the candidate type tokens of a clause. A token is a candidate
/// when it mentions a bit width (`32`/`64`); every candidate must resolve
/// to one of the four value types.
fn resolve_types(tokens: &[&str]) -> Result<Vec<ValueType>, ParseError> {
    let mut types = Vec::new();
    for token in tokens {
        if token.contains("32") || token.contains("64") {
            match ValueType::from_token(token) {
                Some(vt) => types.push(vt),
                None => return Err(ParseError::UnresolvedValueType(token.to_string())),
            }
        }
    }
    Ok(types)
}

/// Classifies one instruction line. A line without internal whitespace is a
/// zero-argument instruction with trailing `)` stripped; otherwise the first
/// token is the mnemonic and the second is kept verbatim as the argument.
/// Lines that strip to nothing yield no instruction.
fn parse_instruction(line: &str) -> Option<Instruction> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    match tokens.next() {
        Some(arg) => Some(Instruction::with_arg(first, arg)),
        None => {
            let mnemonic = first.trim_end_matches(')');
            if mnemonic.is_empty() {
                None
            } else {
                Some(Instruction::new(mnemonic))
            }
        }
    }
}
