//! Domain-specific error types.
//!
//! Uses `thiserror` for structured error definitions; the orchestrator wraps
//! them in `anyhow` with context.

use thiserror::Error;

/// Errors from the bytecode loader.  Raised before decoding starts.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    #[error("odd-length hex input ({0} digits)")]
    OddLength(usize),
}

/// Internal faults from per-block stack reconstruction.
#[derive(Debug, Error)]
pub enum ReconstructError {
    #[error("negative stack depth {depth} at end of block 0x{block:x}")]
    NegativeStackDepth { block: usize, depth: i64 },

    #[error("block 0x{block:x}: {actual} live stack values, expected {expected}")]
    StackImbalance { block: usize, expected: usize, actual: usize },
}

/// Internal faults from whole-program resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("var{var} referenced in {function} before any definition")]
    UndefinedVariable { function: String, var: usize },
}
