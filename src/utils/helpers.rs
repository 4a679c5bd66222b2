//! General helper utilities.

use primitive_types::U256;

/// ANSI colour codes.
pub mod colors {
    pub const BLUE: &str = "\x1b[94m";
    pub const OKGREEN: &str = "\x1b[92m";
    pub const FAIL: &str = "\x1b[91m";
    pub const ENDC: &str = "\x1b[0m";
    pub const GRAY: &str = "\x1b[38;5;8m";

    /// Wrap `text` in ANSI colour escape codes (no-op when `add_color` is false).
    pub fn colorize(text: &str, color: &str, add_color: bool) -> String {
        if add_color && !text.is_empty() {
            format!("{color}{text}{ENDC}")
        } else {
            text.to_string()
        }
    }
}

/// Pad a hex value to `len` hex digits, `0x`-prefixed.
pub fn padded_hex(value: U256, len: usize) -> String {
    let hex = format!("{value:x}");
    format!("0x{hex:0>len$}")
}

/// Join displayable items with `", "`.
pub fn comma_join<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
