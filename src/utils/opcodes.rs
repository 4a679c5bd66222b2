//! EVM opcode definitions covering every hard-fork from Frontier through Cancun.
//!
//! Each opcode carries its byte value, mnemonic, the stack items it pops / pushes,
//! the hard-fork that introduced it, and the metadata the decompiler passes
//! dispatch on: an explicit [`OpClass`], an optional pure [`Evaluator`], an
//! optional infix symbol and the `terminates` tag.
//!
//! Every byte value maps to an entry.  Bytes that are not assigned in any
//! hard-fork resolve to a `throw` fault entry.

use std::sync::OnceLock;

/// EVM hard-fork versions (chronological order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvmVersion {
    Frontier,
    Homestead,
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Istanbul,
    Berlin,
    London,
    Paris,        // The Merge
    Shanghai,
    Cancun,
}

impl EvmVersion {
    /// Return all EVM versions in chronological order.
    pub fn all() -> &'static [EvmVersion] {
        &[
            EvmVersion::Frontier,
            EvmVersion::Homestead,
            EvmVersion::TangerineWhistle,
            EvmVersion::SpuriousDragon,
            EvmVersion::Byzantium,
            EvmVersion::Constantinople,
            EvmVersion::Istanbul,
            EvmVersion::Berlin,
            EvmVersion::London,
            EvmVersion::Paris,
            EvmVersion::Shanghai,
            EvmVersion::Cancun,
        ]
    }
}

/// Structural category of an opcode.  The optimizer, splitter and
/// reconstructor dispatch on this instead of inspecting mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpClass {
    Plain,
    /// `push0` .. `push32`.
    Push,
    /// `dupN`: duplicates the N-th stack item.
    Dup,
    /// `swapN`: exchanges the top with the (N+1)-th stack item.
    Swap,
    Jump,
    JumpIf,
    /// Block boundary; carries no stack effect.
    JumpDest,
    /// `invalid` and every unassigned byte.
    Fault,
}

/// Pure constant evaluators, one per foldable opcode.
///
/// See [`crate::core::arithmetic::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Evaluator {
    Add,
    Mul,
    Sub,
    Div,
    SDiv,
    Mod,
    SMod,
    AddMod,
    MulMod,
    Exp,
    SignExtend,
    Lt,
    Gt,
    Slt,
    Sgt,
    Eq,
    IsZero,
    And,
    Or,
    Xor,
    Not,
    Byte,
    Shl,
    Shr,
    Sar,
}

/// Information about a single opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub byte: u8,
    pub name: &'static str,
    /// Number of stack items consumed.
    pub pops: u8,
    /// Number of stack items produced.
    pub pushes: u8,
    /// The hard-fork that introduced this opcode.
    pub since: EvmVersion,
    /// If this is a `PUSHn`, the number of immediate bytes.
    pub immediate_bytes: u8,
    pub class: OpClass,
    pub eval: Option<Evaluator>,
    /// Operator used when rendering `a OP b`.
    pub infix: Option<&'static str>,
    /// Control never continues to the next instruction.
    pub terminates: bool,
}

impl OpcodeInfo {
    /// Stack diff = pushes − pops  (may be negative).
    pub fn stack_diff(&self) -> i16 {
        self.pushes as i16 - self.pops as i16
    }

    pub fn is_push(&self) -> bool {
        self.class == OpClass::Push
    }

    /// `dupN` / `swapN`: pure stack shuffles with no pseudo-code of their own.
    pub fn is_stack_shuffle(&self) -> bool {
        matches!(self.class, OpClass::Dup | OpClass::Swap)
    }

    pub fn is_jump(&self) -> bool {
        matches!(self.class, OpClass::Jump | OpClass::JumpIf)
    }

    /// Depth operand of `dupN` / `swapN`, `None` otherwise.
    pub fn shuffle_depth(&self) -> Option<usize> {
        match self.class {
            OpClass::Dup => Some(self.pops as usize),
            OpClass::Swap => Some(self.pops as usize - 1),
            _ => None,
        }
    }

    fn throw(byte: u8) -> Self {
        OpcodeInfo {
            byte,
            name: "throw",
            pops: 0,
            pushes: 0,
            since: EvmVersion::Frontier,
            immediate_bytes: 0,
            class: OpClass::Fault,
            eval: None,
            infix: None,
            terminates: true,
        }
    }
}

/// Byte value of the designated `invalid` instruction.
pub const INVALID: u8 = 0xFE;
/// Byte value of `push1`; `push<n>` lives at `PUSH1 + n - 1`.
pub const PUSH1: u8 = 0x60;

const PUSH_NAMES: [&str; 33] = [
    "push0", "push1", "push2", "push3", "push4", "push5", "push6", "push7", "push8",
    "push9", "push10", "push11", "push12", "push13", "push14", "push15", "push16",
    "push17", "push18", "push19", "push20", "push21", "push22", "push23", "push24",
    "push25", "push26", "push27", "push28", "push29", "push30", "push31", "push32",
];

const DUP_NAMES: [&str; 16] = [
    "dup1", "dup2", "dup3", "dup4", "dup5", "dup6", "dup7", "dup8",
    "dup9", "dup10", "dup11", "dup12", "dup13", "dup14", "dup15", "dup16",
];

const SWAP_NAMES: [&str; 16] = [
    "swap1", "swap2", "swap3", "swap4", "swap5", "swap6", "swap7", "swap8",
    "swap9", "swap10", "swap11", "swap12", "swap13", "swap14", "swap15", "swap16",
];

const LOG_NAMES: [&str; 5] = ["log0", "log1", "log2", "log3", "log4"];

/// Total byte → opcode registry.
#[derive(Debug, Clone)]
pub struct OpcodeTable {
    entries: Vec<OpcodeInfo>,
}

impl OpcodeTable {
    /// Look up the entry for `byte`.  Never fails.
    pub fn get(&self, byte: u8) -> &OpcodeInfo {
        &self.entries[byte as usize]
    }

    /// Look up an entry by mnemonic (case-insensitive, first match).
    pub fn by_name(&self, name: &str) -> Option<&OpcodeInfo> {
        let name = name.to_ascii_lowercase();
        self.entries.iter().find(|info| info.name == name)
    }

    /// The designated fault instruction (`invalid`).
    pub fn fault(&self) -> &OpcodeInfo {
        self.get(INVALID)
    }

    /// Smallest `push<n>` (n ≥ 1) able to carry `width` bytes.
    pub fn push_for_width(&self, width: usize) -> &OpcodeInfo {
        let n = width.clamp(1, 32) as u8;
        self.get(PUSH1 + n - 1)
    }
}

/// Build the full opcode table (byte → info).
pub fn build_opcode_table() -> OpcodeTable {
    use EvmVersion::*;

    let mut m: Vec<OpcodeInfo> = (0..=255u8).map(OpcodeInfo::throw).collect();

    macro_rules! op {
        ($byte:expr, $name:expr, $pops:expr, $pushes:expr, $since:expr) => {
            op!($byte, $name, $pops, $pushes, $since, OpClass::Plain, None, None, false)
        };
        ($byte:expr, $name:expr, $pops:expr, $pushes:expr, $since:expr, eval $eval:ident) => {
            op!($byte, $name, $pops, $pushes, $since, OpClass::Plain, Some(Evaluator::$eval), None, false)
        };
        ($byte:expr, $name:expr, $pops:expr, $pushes:expr, $since:expr, eval $eval:ident, infix $infix:expr) => {
            op!($byte, $name, $pops, $pushes, $since, OpClass::Plain, Some(Evaluator::$eval), Some($infix), false)
        };
        ($byte:expr, $name:expr, $pops:expr, $pushes:expr, $since:expr, terminates) => {
            op!($byte, $name, $pops, $pushes, $since, OpClass::Plain, None, None, true)
        };
        ($byte:expr, $name:expr, $pops:expr, $pushes:expr, $since:expr, $class:expr, $eval:expr, $infix:expr, $term:expr) => {
            m[$byte as usize] = OpcodeInfo {
                byte: $byte,
                name: $name,
                pops: $pops,
                pushes: $pushes,
                since: $since,
                immediate_bytes: 0,
                class: $class,
                eval: $eval,
                infix: $infix,
                terminates: $term,
            };
        };
    }

    // -- Stop and Arithmetic -----------------------------------------------
    op!(0x00, "stop",         0, 0, Frontier, terminates);
    op!(0x01, "add",          2, 1, Frontier, eval Add, infix "+");
    op!(0x02, "mul",          2, 1, Frontier, eval Mul, infix "*");
    op!(0x03, "sub",          2, 1, Frontier, eval Sub, infix "-");
    op!(0x04, "div",          2, 1, Frontier, eval Div, infix "//");
    op!(0x05, "sdiv",         2, 1, Frontier, eval SDiv, infix "//");
    op!(0x06, "mod",          2, 1, Frontier, eval Mod, infix "%");
    op!(0x07, "smod",         2, 1, Frontier, eval SMod, infix "%");
    op!(0x08, "addmod",       3, 1, Frontier, eval AddMod);
    op!(0x09, "mulmod",       3, 1, Frontier, eval MulMod);
    op!(0x0A, "exp",          2, 1, Frontier, eval Exp, infix "**");
    op!(0x0B, "signextend",   2, 1, Frontier, eval SignExtend);

    // -- Comparison and Bitwise Logic --------------------------------------
    op!(0x10, "lt",           2, 1, Frontier, eval Lt, infix "<");
    op!(0x11, "gt",           2, 1, Frontier, eval Gt, infix ">");
    op!(0x12, "slt",          2, 1, Frontier, eval Slt, infix "<");
    op!(0x13, "sgt",          2, 1, Frontier, eval Sgt, infix ">");
    op!(0x14, "eq",           2, 1, Frontier, eval Eq, infix "==");
    op!(0x15, "iszero",       1, 1, Frontier, eval IsZero);
    op!(0x16, "and",          2, 1, Frontier, eval And, infix "&");
    op!(0x17, "or",           2, 1, Frontier, eval Or, infix "|");
    op!(0x18, "xor",          2, 1, Frontier, eval Xor, infix "^");
    op!(0x19, "not",          1, 1, Frontier, eval Not);
    op!(0x1A, "byte",         2, 1, Frontier, eval Byte);
    // Constantinople
    op!(0x1B, "shl",          2, 1, Constantinople, eval Shl);
    op!(0x1C, "shr",          2, 1, Constantinople, eval Shr);
    op!(0x1D, "sar",          2, 1, Constantinople, eval Sar);

    // -- SHA3 --------------------------------------------------------------
    op!(0x20, "sha3",         2, 1, Frontier);

    // -- Environment Information -------------------------------------------
    op!(0x30, "address",      0, 1, Frontier);
    op!(0x31, "balance",      1, 1, Frontier);
    op!(0x32, "origin",       0, 1, Frontier);
    op!(0x33, "caller",       0, 1, Frontier);
    op!(0x34, "callvalue",    0, 1, Frontier);
    op!(0x35, "calldataload", 1, 1, Frontier);
    op!(0x36, "calldatasize", 0, 1, Frontier);
    op!(0x37, "calldatacopy", 3, 0, Frontier);
    op!(0x38, "codesize",     0, 1, Frontier);
    op!(0x39, "codecopy",     3, 0, Frontier);
    op!(0x3A, "gasprice",     0, 1, Frontier);
    op!(0x3B, "extcodesize",  1, 1, Frontier);
    op!(0x3C, "extcodecopy",  4, 0, Frontier);
    // Byzantium
    op!(0x3D, "returndatasize", 0, 1, Byzantium);
    op!(0x3E, "returndatacopy", 3, 0, Byzantium);
    // Constantinople
    op!(0x3F, "extcodehash",  1, 1, Constantinople);

    // -- Block Information -------------------------------------------------
    op!(0x40, "blockhash",    1, 1, Frontier);
    op!(0x41, "coinbase",     0, 1, Frontier);
    op!(0x42, "timestamp",    0, 1, Frontier);
    op!(0x43, "number",       0, 1, Frontier);
    op!(0x44, "difficulty",   0, 1, Frontier);  // prevrandao post-Paris
    op!(0x45, "gaslimit",     0, 1, Frontier);
    // Istanbul
    op!(0x46, "chainid",      0, 1, Istanbul);
    op!(0x47, "selfbalance",  0, 1, Istanbul);
    // London
    op!(0x48, "basefee",      0, 1, London);
    // Cancun
    op!(0x49, "blobhash",     1, 1, Cancun);
    op!(0x4A, "blobbasefee",  0, 1, Cancun);

    // -- Stack, Memory, Storage and Flow -----------------------------------
    op!(0x50, "pop",          1, 0, Frontier);
    op!(0x51, "mload",        1, 1, Frontier);
    op!(0x52, "mstore",       2, 0, Frontier);
    op!(0x53, "mstore8",      2, 0, Frontier);
    op!(0x54, "sload",        1, 1, Frontier);
    op!(0x55, "sstore",       2, 0, Frontier);
    op!(0x56, "jump",         1, 0, Frontier, OpClass::Jump, None, None, true);
    op!(0x57, "jumpi",        2, 0, Frontier, OpClass::JumpIf, None, None, false);
    op!(0x58, "pc",           0, 1, Frontier);
    op!(0x59, "msize",        0, 1, Frontier);
    op!(0x5A, "gas",          0, 1, Frontier);
    op!(0x5B, "jumpdest",     0, 0, Frontier, OpClass::JumpDest, None, None, false);
    // Cancun
    op!(0x5C, "tload",        1, 1, Cancun);
    op!(0x5D, "tstore",       2, 0, Cancun);
    op!(0x5E, "mcopy",        3, 0, Cancun);

    // -- PUSH0..PUSH32 -----------------------------------------------------
    for n in 0u8..=32 {
        let byte = 0x5F + n;
        m[byte as usize] = OpcodeInfo {
            byte,
            name: PUSH_NAMES[n as usize],
            pops: 0,
            pushes: 1,
            since: if n == 0 { Shanghai } else { Frontier },
            immediate_bytes: n,
            class: OpClass::Push,
            eval: None,
            infix: None,
            terminates: false,
        };
    }

    // -- DUP1..DUP16 -------------------------------------------------------
    for n in 1u8..=16 {
        let byte = 0x7F + n;
        m[byte as usize] = OpcodeInfo {
            byte,
            name: DUP_NAMES[n as usize - 1],
            pops: n,
            pushes: n + 1,
            since: Frontier,
            immediate_bytes: 0,
            class: OpClass::Dup,
            eval: None,
            infix: None,
            terminates: false,
        };
    }

    // -- SWAP1..SWAP16 -----------------------------------------------------
    for n in 1u8..=16 {
        let byte = 0x8F + n;
        m[byte as usize] = OpcodeInfo {
            byte,
            name: SWAP_NAMES[n as usize - 1],
            pops: n + 1,
            pushes: n + 1,
            since: Frontier,
            immediate_bytes: 0,
            class: OpClass::Swap,
            eval: None,
            infix: None,
            terminates: false,
        };
    }

    // -- LOG0..LOG4 ---------------------------------------------------------
    for n in 0u8..=4 {
        let byte = 0xA0 + n;
        op!(byte, LOG_NAMES[n as usize], n + 2, 0, Frontier);
    }

    // -- System operations -------------------------------------------------
    op!(0xF0, "create",       3, 1, Frontier);
    op!(0xF1, "call",         7, 1, Frontier);
    op!(0xF2, "callcode",     7, 1, Frontier);
    op!(0xF3, "return",       2, 0, Frontier, terminates);
    op!(0xF4, "delegatecall", 6, 1, Homestead);
    op!(0xF5, "create2",      4, 1, Constantinople);
    op!(0xFA, "staticcall",   6, 1, Byzantium);
    op!(0xFD, "revert",       2, 0, Byzantium, terminates);
    op!(0xFE, "invalid",      0, 0, Frontier, OpClass::Fault, None, None, true);
    op!(0xFF, "selfdestruct", 1, 0, Frontier, terminates);

    OpcodeTable { entries: m }
}

/// The process-wide opcode table.
pub fn table() -> &'static OpcodeTable {
    static TABLE: OnceLock<OpcodeTable> = OnceLock::new();
    TABLE.get_or_init(build_opcode_table)
}

/// Look up an opcode by byte value.
pub fn lookup(byte: u8) -> &'static OpcodeInfo {
    table().get(byte)
}

/// Look up an opcode by mnemonic.
pub fn lookup_name(name: &str) -> Option<&'static OpcodeInfo> {
    table().by_name(name)
}

/// Lookup opcode name by byte value.
pub fn opcode_name(byte: u8) -> &'static str {
    lookup(byte).name
}

/// Get the number of immediate bytes for a given opcode byte.
pub fn immediate_size(byte: u8) -> u8 {
    lookup(byte).immediate_bytes
}
