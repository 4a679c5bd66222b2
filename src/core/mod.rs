//! Core EVM semantics.

pub mod arithmetic;
