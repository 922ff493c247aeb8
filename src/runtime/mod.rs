//! Execution engine.
//!
//! A straight-line stack-machine interpreter over decoded code-section
//! bytes: no branches, loops, or calls, just local access and i32
//! arithmetic against an operand stack.

pub mod executor;
pub mod stack;

pub use executor::{
    execute_code_section, execute_function_body, ArithmeticOp, BinaryOp, Execution,
    FunctionOutcome,
};
pub use stack::Stack;

use crate::parser::DecodeError;

/// Errors raised while executing function bodies.
///
/// All variants abort the current function body and propagate to the
/// caller; none is silently absorbed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("local index out of bounds: {0}")]
    LocalIndexOutOfBounds(u32),
    #[error("truncated function body: {0}")]
    Truncated(#[from] DecodeError),
}
