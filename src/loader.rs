//! Bytecode loading and decoding.
//!
//! Parses a hex string into raw bytes and walks them into an ordered sequence
//! of `(offset, opcode, operands)` instructions.

use crate::errors::LoaderError;
use crate::utils::opcodes::{self, OpClass, OpcodeInfo};
use primitive_types::U256;

/// A decoded instruction.
///
/// `args` holds the immediate of a push, or the constant operands fused into
/// the instruction by the peephole optimizer (top of stack first).  `None`
/// means the operands come from the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub offset: usize,
    pub op: &'static OpcodeInfo,
    pub args: Option<Vec<U256>>,
}

impl Instruction {
    pub fn new(offset: usize, op: &'static OpcodeInfo, args: Option<Vec<U256>>) -> Self {
        Self { offset, op, args }
    }

    /// The pushed constant, for a push carrying its immediate.
    pub fn push_value(&self) -> Option<U256> {
        if !self.op.is_push() {
            return None;
        }
        self.args.as_ref().and_then(|a| a.first().copied())
    }
}

/// The Loader holds the raw bytecode and its decoded instructions.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Raw bytecode as bytes.
    pub binary: Vec<u8>,
    /// Decoded instructions in order.
    pub instructions: Vec<Instruction>,
    /// Jump destination offsets.
    pub jump_dests: Vec<usize>,
}

impl Loader {
    /// Create a new, empty loader ready to accept bytecode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load bytecode from a hex string (with or without `0x` prefix).
    pub fn load_binary(&mut self, source: &str) -> Result<(), LoaderError> {
        self.binary = parse_hex(source)?;
        self.instructions = decode(&self.binary);
        self.jump_dests = self
            .instructions
            .iter()
            .filter(|inst| inst.op.class == OpClass::JumpDest)
            .map(|inst| inst.offset)
            .collect();
        log::debug!(
            "loaded {} bytes, {} instructions, {} jump destinations",
            self.binary.len(),
            self.instructions.len(),
            self.jump_dests.len()
        );
        Ok(())
    }
}

/// Parse a hex string into bytes.
///
/// Surrounding whitespace and a `0x`/`0X` prefix are ignored; odd length and
/// non-hex characters are rejected.
pub fn parse_hex(source: &str) -> Result<Vec<u8>, LoaderError> {
    let trimmed = source.trim();
    let hex_str = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex_str.len() % 2 != 0 {
        return Err(LoaderError::OddLength(hex_str.len()));
    }

    hex::decode(hex_str).map_err(|_| {
        let preview: String = hex_str.chars().take(40).collect();
        LoaderError::InvalidHex(if preview.len() < hex_str.len() {
            format!("{preview}...")
        } else {
            preview
        })
    })
}

/// Decode raw bytecode into instructions.
///
/// A push whose immediate runs past the end of the input becomes a single
/// `invalid` instruction at its own offset, and decoding stops there.
pub fn decode(bytes: &[u8]) -> Vec<Instruction> {
    let table = opcodes::table();
    let mut offset = 0usize;
    let mut parsed = Vec::new();

    while offset < bytes.len() {
        let info = table.get(bytes[offset]);
        let width = info.immediate_bytes as usize;

        let args = if info.is_push() {
            let start = offset + 1;
            let end = start + width;
            if end > bytes.len() {
                log::warn!(
                    "truncated {} at offset 0x{offset:x}: needs {width} bytes, {} left",
                    info.name,
                    bytes.len() - start
                );
                parsed.push(Instruction::new(offset, table.fault(), None));
                break;
            }
            Some(vec![U256::from_big_endian(&bytes[start..end])])
        } else {
            None
        };

        parsed.push(Instruction::new(offset, info, args));
        offset += 1 + width;
    }

    parsed
}
