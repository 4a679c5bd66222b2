//! Opcode metadata and general helpers.

pub mod helpers;
pub mod opcodes;
