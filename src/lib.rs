//! Ostia: EVM bytecode decompiler
//!
//! Takes EVM bytecode as a hex string and produces either a disassembly
//! grouped by basic block, or block-structured pseudo-code in which every
//! block is a function with inferred parameters and return values.
//!
//! Pipeline: [`loader`] → [`peephole`] → [`blocks`] → [`reconstruct`] →
//! [`resolver`] → [`prettify`].  [`decompiler`] runs the whole thing.

pub mod core;
pub mod utils;

pub mod blocks;
pub mod contract;
pub mod decompiler;
pub mod errors;
pub mod function;
pub mod loader;
pub mod peephole;
pub mod prettify;
pub mod reconstruct;
pub mod resolver;
pub mod stack;
pub mod value;
