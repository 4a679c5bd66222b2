//! Basic-block splitting.

use crate::loader::Instruction;
use crate::utils::opcodes::OpClass;

/// A straight-line run of instructions entered at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub offset: usize,
    pub instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(offset: usize) -> Self {
        Self { offset, instructions: Vec::new() }
    }
}

/// Partition `instructions` into blocks.
///
/// The first block always starts at the program entry, offset 0, even when
/// optimization removed the instructions there.  Every `jumpdest` opens a new
/// block starting at itself.  A boundary met
/// while the current block is still empty does not emit that empty block, so
/// the only way to get an empty block is empty input.
pub fn split_blocks(instructions: Vec<Instruction>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current = Block::new(0);

    for inst in instructions {
        if inst.op.class == OpClass::JumpDest && !current.instructions.is_empty() {
            blocks.push(std::mem::replace(&mut current, Block::new(inst.offset)));
        }
        current.instructions.push(inst);
    }
    blocks.push(current);

    log::debug!("split into {} blocks", blocks.len());
    blocks
}
