//! Code-section execution.
//!
//! The code-section payload is a vu32 function count followed by one entry
//! per function: a vu32 body size and exactly that many body bytes. Each
//! body is executed independently: skip the one local-declaration-count
//! byte, then read opcodes until the end-of-body marker or the bytes run
//! out.
//!
//! Parameter values are the function's locals, supplied in declared order;
//! the operand stack starts empty and `local.get` pushes the addressed
//! parameter. Unknown opcodes are forward-compatible no-ops.

use std::fmt;

use super::stack::Stack;
use super::RuntimeError;
use crate::parser::encoding::{
    OP_END, OP_I32_ADD, OP_I32_DIV_S, OP_I32_MUL, OP_I32_SUB, OP_LOCAL_GET,
};
use crate::parser::reader::Reader;

/// The four binary arithmetic operations the interpreter executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    DivS,
}

impl BinaryOp {
    fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::DivS => '/',
        }
    }

    /// Applies the operation. Add/sub/mul wrap; division is truncating
    /// (toward zero) signed division.
    fn apply(&self, lhs: i32, rhs: i32) -> Result<i32, RuntimeError> {
        match self {
            BinaryOp::Add => Ok(lhs.wrapping_add(rhs)),
            BinaryOp::Sub => Ok(lhs.wrapping_sub(rhs)),
            BinaryOp::Mul => Ok(lhs.wrapping_mul(rhs)),
            BinaryOp::DivS => {
                if rhs == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                lhs.checked_div(rhs).ok_or(RuntimeError::IntegerOverflow)
            }
        }
    }
}

/// One recorded arithmetic step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticOp {
    pub op: BinaryOp,
    pub lhs: i32,
    pub rhs: i32,
    pub result: i32,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.lhs,
            self.op.symbol(),
            self.rhs,
            self.result
        )
    }
}

/// What executing one function body produced: the final operand-stack
/// contents (bottom first) and the trace of arithmetic steps taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionOutcome {
    pub stack: Vec<i32>,
    pub trace: Vec<ArithmeticOp>,
}

/// The outcomes of every function body in a code section, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Execution {
    pub functions: Vec<FunctionOutcome>,
}

/// Executes every function body in a code-section payload.
pub fn execute_code_section(payload: &[u8], params: &[i32]) -> Result<Execution, RuntimeError> {
    let mut reader = Reader::new(payload.to_vec());

    let function_count = reader.read_vu32()?;
    let mut functions = Vec::with_capacity(function_count as usize);
    for _ in 0..function_count {
        let body_size = reader.read_vu32()?;
        let body = reader.read_bytes(body_size as usize)?;
        functions.push(execute_function_body(&body, params)?);
    }

    Ok(Execution { functions })
}

/// Executes a single function body against a fresh operand stack.
pub fn execute_function_body(
    body: &[u8],
    params: &[i32],
) -> Result<FunctionOutcome, RuntimeError> {
    let mut reader = Reader::new(body.to_vec());
    // local declarations beyond parameters are unsupported; skip the count
    reader.read_byte()?;

    let mut stack = Stack::new();
    let mut trace = Vec::new();

    while reader.remaining() > 0 {
        let opcode = reader.read_byte()?;
        match opcode {
            OP_END => break,
            OP_LOCAL_GET => {
                // the immediate is a vu32, the same width the encoder emits
                let index = reader.read_vu32()?;
                let value = params
                    .get(index as usize)
                    .copied()
                    .ok_or(RuntimeError::LocalIndexOutOfBounds(index))?;
                stack.push(value);
            }
            OP_I32_ADD => apply_binary(&mut stack, &mut trace, BinaryOp::Add)?,
            OP_I32_SUB => apply_binary(&mut stack, &mut trace, BinaryOp::Sub)?,
            OP_I32_MUL => apply_binary(&mut stack, &mut trace, BinaryOp::Mul)?,
            OP_I32_DIV_S => apply_binary(&mut stack, &mut trace, BinaryOp::DivS)?,
            // unknown opcodes are ignored
            _ => {}
        }
    }

    Ok(FunctionOutcome {
        stack: stack.into_values(),
        trace,
    })
}

/// Pops the right-hand operand first, then the left-hand: the operand
/// pushed first is the left-hand side.
fn apply_binary(
    stack: &mut Stack,
    trace: &mut Vec<ArithmeticOp>,
    op: BinaryOp,
) -> Result<(), RuntimeError> {
    let rhs = stack.pop()?;
    let lhs = stack.pop()?;
    let result = op.apply(lhs, rhs)?;
    stack.push(result);
    trace.push(ArithmeticOp {
        op,
        lhs,
        rhs,
        result,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DecodeError;

    // local.get 0, local.get 1, <op>, end
    fn binop_body(op: u8) -> Vec<u8> {
        vec![0x00, OP_LOCAL_GET, 0x00, OP_LOCAL_GET, 0x01, op, OP_END]
    }

    #[test]
    fn test_add() {
        let outcome = execute_function_body(&binop_body(OP_I32_ADD), &[20, 10]).unwrap();
        assert_eq!(outcome.stack, vec![30]);
        assert_eq!(outcome.trace.len(), 1);
        assert_eq!(outcome.trace[0].to_string(), "20 + 10 = 30");
    }

    #[test]
    fn test_operand_order() {
        // first-pushed is the left-hand operand
        let outcome = execute_function_body(&binop_body(OP_I32_SUB), &[20, 10]).unwrap();
        assert_eq!(outcome.stack, vec![10]);
        assert_eq!(outcome.trace[0].to_string(), "20 - 10 = 10");

        let outcome = execute_function_body(&binop_body(OP_I32_DIV_S), &[20, 10]).unwrap();
        assert_eq!(outcome.stack, vec![2]);
    }

    #[test]
    fn test_mul() {
        let outcome = execute_function_body(&binop_body(OP_I32_MUL), &[20, 10]).unwrap();
        assert_eq!(outcome.stack, vec![200]);
        assert_eq!(outcome.trace[0].to_string(), "20 * 10 = 200");
    }

    #[test]
    fn test_div_truncates_toward_zero() {
        let outcome = execute_function_body(&binop_body(OP_I32_DIV_S), &[-7, 2]).unwrap();
        assert_eq!(outcome.stack, vec![-3]);

        let outcome = execute_function_body(&binop_body(OP_I32_DIV_S), &[7, -2]).unwrap();
        assert_eq!(outcome.stack, vec![-3]);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            execute_function_body(&binop_body(OP_I32_DIV_S), &[7, 0]),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn test_division_overflow() {
        assert_eq!(
            execute_function_body(&binop_body(OP_I32_DIV_S), &[i32::MIN, -1]),
            Err(RuntimeError::IntegerOverflow)
        );
    }

    #[test]
    fn test_stack_underflow_empty() {
        for op in [OP_I32_ADD, OP_I32_SUB, OP_I32_MUL, OP_I32_DIV_S] {
            assert_eq!(
                execute_function_body(&[0x00, op, OP_END], &[]),
                Err(RuntimeError::StackUnderflow)
            );
        }
    }

    #[test]
    fn test_stack_underflow_single_operand() {
        let body = vec![0x00, OP_LOCAL_GET, 0x00, OP_I32_ADD, OP_END];
        assert_eq!(
            execute_function_body(&body, &[5]),
            Err(RuntimeError::StackUnderflow)
        );
    }

    #[test]
    fn test_local_index_out_of_bounds() {
        let body = vec![0x00, OP_LOCAL_GET, 0x02, OP_END];
        assert_eq!(
            execute_function_body(&body, &[20, 10]),
            Err(RuntimeError::LocalIndexOutOfBounds(2))
        );
    }

    #[test]
    fn test_local_get_multibyte_immediate() {
        // index 256 encodes as the two-byte varint [0x80, 0x02]
        let body = vec![0x00, OP_LOCAL_GET, 0x80, 0x02, OP_END];
        let params: Vec<i32> = (0..300).collect();
        let outcome = execute_function_body(&body, &params).unwrap();
        assert_eq!(outcome.stack, vec![256]);
    }

    #[test]
    fn test_end_marker_stops_execution() {
        // the local.get after the end marker must never run
        let body = vec![0x00, OP_END, OP_LOCAL_GET, 0x07];
        let outcome = execute_function_body(&body, &[1]).unwrap();
        assert!(outcome.stack.is_empty());
    }

    #[test]
    fn test_unknown_opcode_ignored() {
        let body = vec![0x00, 0x45, OP_LOCAL_GET, 0x00, OP_END];
        let outcome = execute_function_body(&body, &[9]).unwrap();
        assert_eq!(outcome.stack, vec![9]);
    }

    #[test]
    fn test_body_without_end_marker_exhausts() {
        let body = vec![0x00, OP_LOCAL_GET, 0x00];
        let outcome = execute_function_body(&body, &[4]).unwrap();
        assert_eq!(outcome.stack, vec![4]);
    }

    #[test]
    fn test_code_section_multiple_bodies() {
        // two bodies: one pushes param 0, the other param 1
        let payload = vec![
            0x02, // function count
            0x03, 0x00, OP_LOCAL_GET, 0x00, // body 1
            0x03, 0x00, OP_LOCAL_GET, 0x01, // body 2
        ];
        let execution = execute_code_section(&payload, &[20, 10]).unwrap();
        assert_eq!(execution.functions.len(), 2);
        assert_eq!(execution.functions[0].stack, vec![20]);
        assert_eq!(execution.functions[1].stack, vec![10]);
    }

    #[test]
    fn test_code_section_truncated_body() {
        // declares a 9-byte body but provides 2
        let payload = vec![0x01, 0x09, 0x00, OP_END];
        assert_eq!(
            execute_code_section(&payload, &[]),
            Err(RuntimeError::Truncated(DecodeError::TruncatedSection {
                expected: 9,
                remaining: 2
            }))
        );
    }

    #[test]
    fn test_empty_body_is_truncated() {
        // not even a local-declaration count byte
        assert_eq!(
            execute_function_body(&[], &[]),
            Err(RuntimeError::Truncated(DecodeError::TruncatedInput))
        );
    }
}
