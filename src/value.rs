//! Values flowing between pseudo-code lines.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

// -- Serde helpers for U256 --------------------------------------------------

mod u256_serde {
    use primitive_types::U256;
    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize a U256 as a hex string (e.g. `"0x1a2b"`).
    pub fn serialize<S: Serializer>(val: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{val:x}"))
    }

    /// Deserialize a U256 from a hex string (with or without `0x` prefix).
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let hex_str = String::deserialize(d)?;
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(&hex_str);
        U256::from_str_radix(hex_str, 16).map_err(serde::de::Error::custom)
    }
}

/// A symbolic stack value.
///
/// Deliberately not `Copy`: taking a value off the block's stack moves it,
/// and the only place a value is duplicated is an explicit `dup`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// Concrete 256-bit constant.
    Const(#[serde(with = "u256_serde")] U256),
    /// Output of a pseudo-code line.
    Var(usize),
    /// Value the block expects from whoever transfers control to it.
    Arg(usize),
}

impl Value {
    pub fn constant(v: u64) -> Self {
        Value::Const(U256::from(v))
    }

    pub fn as_const(&self) -> Option<U256> {
        match self {
            Value::Const(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<usize> {
        match self {
            Value::Var(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(v) => write!(f, "0x{v:x}"),
            Value::Var(id) => write!(f, "var{id}"),
            Value::Arg(idx) => write!(f, "arg{idx}"),
        }
    }
}
