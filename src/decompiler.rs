//! Decompilation orchestrator.
//!
//! Ties together loading, peephole optimization, block splitting, stack
//! reconstruction, resolution and output generation.

use crate::blocks::{split_blocks, Block};
use crate::contract::Program;
use crate::loader::{Instruction, Loader};
use crate::peephole;
use crate::prettify::{render_disassembly, render_program};
use crate::reconstruct::{reconstruct_blocks, ReconstructContext};
use crate::resolver::resolve;
use anyhow::{Context, Result};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Decompiled listing.
    Text,
    /// Disassembly listing.
    Asm,
    /// Decompiled program as JSON.
    Json,
}

/// Result of a decompilation run.
#[derive(Debug, Clone)]
pub struct Decompilation {
    pub text: String,
    pub blocks: Vec<Block>,
    /// Empty for [`OutputFormat::Asm`].
    pub program: Program,
}

/// Configuration for the decompiler.
#[derive(Debug, Clone)]
pub struct DecompilerConfig {
    pub format: OutputFormat,
    pub color: bool,
    /// Run the peephole optimizer before splitting.
    pub optimize: bool,
}

impl Default for DecompilerConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            optimize: true,
        }
    }
}

/// Decode `hex_code` and, if configured, optimize the instruction stream.
pub fn load_instructions(hex_code: &str, config: &DecompilerConfig) -> Result<Vec<Instruction>> {
    let mut loader = Loader::new();
    loader
        .load_binary(hex_code)
        .context("failed to load bytecode")?;
    log::debug!(
        "decoded {} bytes into {} instructions ({} jumpdests)",
        loader.binary.len(),
        loader.instructions.len(),
        loader.jump_dests.len()
    );

    if config.optimize {
        Ok(peephole::optimize(loader.instructions))
    } else {
        Ok(loader.instructions)
    }
}

/// Decode and split into basic blocks.
pub fn disassemble(hex_code: &str, config: &DecompilerConfig) -> Result<Vec<Block>> {
    Ok(split_blocks(load_instructions(hex_code, config)?))
}

/// Reconstruct and resolve already-split blocks.
pub fn decompile_blocks(blocks: &[Block]) -> Result<Program> {
    let mut ctx = ReconstructContext::new();
    let mut functions =
        reconstruct_blocks(blocks, &mut ctx).context("stack reconstruction failed")?;
    resolve(&mut functions).context("function resolution failed")?;
    Ok(Program::new(functions))
}

/// Decompile raw bytecode (hex string) into the configured output.
pub fn decompile_bytecode(hex_code: &str, config: &DecompilerConfig) -> Result<Decompilation> {
    let blocks = disassemble(hex_code, config)?;

    if config.format == OutputFormat::Asm {
        let text = render_disassembly(&blocks, config.color);
        return Ok(Decompilation { text, blocks, program: Program::default() });
    }

    let program = decompile_blocks(&blocks)?;
    let text = match config.format {
        OutputFormat::Json => serde_json::to_string_pretty(&program.to_json())
            .context("serialise to JSON")?,
        _ => render_program(&program, config.color),
    };

    Ok(Decompilation { text, blocks, program })
}
