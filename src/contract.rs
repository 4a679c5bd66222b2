//! The decompiled program: every reconstructed block, in address order.

use crate::function::Function;
use serde_json::json;

/// Ordered list of functions, one per basic block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    pub fn new(functions: Vec<Function>) -> Self {
        Self { functions }
    }

    /// Function whose block starts at `offset`.
    pub fn by_offset(&self, offset: usize) -> Option<&Function> {
        self.functions
            .binary_search_by_key(&offset, |f| f.offset)
            .ok()
            .map(|idx| &self.functions[idx])
    }

    pub fn by_name(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Serialise the program to JSON.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "functions": self.functions.iter().map(Function::to_json).collect::<Vec<_>>(),
        })
    }
}
