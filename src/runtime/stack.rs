//! The operand stack.

use super::RuntimeError;

/// An ordered, growable sequence of 32-bit signed integers with push/pop at
/// the tail.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stack {
    values: Vec<i32>,
}

impl Stack {
    /// Create a new empty stack.
    pub fn new() -> Self {
        Stack { values: Vec::new() }
    }

    /// Push a value onto the stack.
    pub fn push(&mut self, value: i32) {
        self.values.push(value);
    }

    /// Pop a value from the stack.
    ///
    /// Popping an empty stack is an error, never a panic and never a
    /// silently-returned zero.
    pub fn pop(&mut self) -> Result<i32, RuntimeError> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Get the current stack depth.
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The current contents, bottom first.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Consume the stack, returning its contents bottom first.
    pub fn into_values(self) -> Vec<i32> {
        self.values
    }
}
