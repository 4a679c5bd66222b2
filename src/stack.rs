//! Symbolic stack used by the block reconstructor.
//!
//! Holds the values a block has produced but not yet consumed, top last.
//! Popping past the bottom does not fail: it synthesises the next block
//! argument, i.e. a value some predecessor must have left on the stack.

use crate::value::Value;

/// Per-block registry of unconsumed values.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    items: Vec<Value>,
    args_needed: usize,
}

impl Stack {
    /// Create a new empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current number of live values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of arguments synthesised so far.
    pub fn args_needed(&self) -> usize {
        self.args_needed
    }

    /// Push a value onto the stack.
    pub fn push(&mut self, val: Value) {
        self.items.push(val);
    }

    /// Take the top value, synthesising `Arg(args_needed)` when empty.
    pub fn pop(&mut self) -> Value {
        self.items.pop().unwrap_or_else(|| {
            let arg = Value::Arg(self.args_needed);
            self.args_needed += 1;
            arg
        })
    }

    /// Take `n` values, top first.
    pub fn pop_n(&mut self, n: usize) -> Vec<Value> {
        (0..n).map(|_| self.pop()).collect()
    }

    /// Duplicate the n-th value from the top.
    ///
    /// Operands are the top `n` values (`ops[0]` on top).  The pushed slots,
    /// top first, are `ops[n-1], ops[0], .., ops[n-1]`: slot 0 aliases the
    /// last operand and slot i aliases operand i-1.
    pub fn dup(&mut self, n: usize) {
        let ops = self.pop_n(n);
        let Some(copied) = ops.last().cloned() else { return };
        for v in ops.into_iter().rev() {
            self.items.push(v);
        }
        self.items.push(copied);
    }

    /// Exchange the top value with the (n+1)-th.
    ///
    /// Operands are the top `n + 1` values; slot 0 aliases the last operand,
    /// slot n aliases the first, interior slots alias themselves.
    pub fn swap(&mut self, n: usize) {
        let mut ops = self.pop_n(n + 1);
        ops.swap(0, n);
        for v in ops.into_iter().rev() {
            self.items.push(v);
        }
    }

    /// The top `n` values, top first, without consuming them.
    ///
    /// Values missing below the bottom are synthesised as arguments, exactly
    /// as a consuming read would do.
    pub fn peek_n(&mut self, n: usize) -> Vec<Value> {
        let depth = self.items.len();
        let mut out: Vec<Value> = self.items.iter().rev().take(n).cloned().collect();
        for _ in depth..n {
            out.push(Value::Arg(self.args_needed));
            self.args_needed += 1;
        }
        out
    }

    /// All live values, top first, without consuming them.
    pub fn snapshot(&self) -> Vec<Value> {
        self.items.iter().rev().cloned().collect()
    }
}
