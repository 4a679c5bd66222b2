//! Concrete EVM arithmetic operations.
//!
//! All functions operate on `U256` and mirror the EVM specification exactly,
//! including 256-bit two's complement for the signed operations.  Operand
//! order is top-of-stack first: `sub(a, b)` is `a - b` where `a` was on top.

use crate::utils::opcodes::Evaluator;
use primitive_types::{U256, U512};

const UINT_256_MAX: U256 = U256::MAX;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// True when the sign bit (bit 255) is set.
fn is_negative(value: U256) -> bool {
    value.bit(255)
}

/// Two's complement negation mod 2^256.
fn negate(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

/// Magnitude of a two's complement value.  `-2^255` maps to `2^255`.
fn magnitude(value: U256) -> U256 {
    if is_negative(value) { negate(value) } else { value }
}

fn from_bool(b: bool) -> U256 {
    if b { U256::one() } else { U256::zero() }
}

/// Take the low 256 bits of a U512.
fn u512_to_u256(v: U512) -> U256 {
    let limbs = v.0;
    U256([limbs[0], limbs[1], limbs[2], limbs[3]])
}

// ---------------------------------------------------------------------------
// Arithmetic operations
// ---------------------------------------------------------------------------

/// EVM ADD: wrapping addition mod 2^256.
pub fn add(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0
}

/// EVM SUB: wrapping subtraction mod 2^256.
pub fn sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

/// EVM MUL: wrapping multiplication mod 2^256.
pub fn mul(a: U256, b: U256) -> U256 {
    a.overflowing_mul(b).0
}

/// EVM DIV: unsigned integer division (returns 0 on divide-by-zero).
pub fn div(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        U256::zero()
    } else {
        a / b
    }
}

/// EVM SDIV: signed division truncating toward zero (returns 0 on divide-by-zero).
///
/// `-2^255 / -1` overflows back to `-2^255`, as on the EVM.
pub fn sdiv(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let q = magnitude(a) / magnitude(b);
    if is_negative(a) != is_negative(b) { negate(q) } else { q }
}

/// EVM MOD: unsigned modulo (returns 0 when modulus is zero).
pub fn modulo(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        U256::zero()
    } else {
        a % b
    }
}

/// EVM SMOD: signed modulo, result takes the sign of the dividend.
pub fn smod(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let r = magnitude(a) % magnitude(b);
    if is_negative(a) { negate(r) } else { r }
}

/// EVM ADDMOD: `(a + b) % m` using 512-bit intermediate to avoid overflow.
pub fn addmod(a: U256, b: U256, m: U256) -> U256 {
    if m.is_zero() {
        return U256::zero();
    }
    let result = (U512::from(a) + U512::from(b)) % U512::from(m);
    u512_to_u256(result)
}

/// EVM MULMOD: `(a * b) % m` using 512-bit intermediate to avoid overflow.
pub fn mulmod(a: U256, b: U256, m: U256) -> U256 {
    if m.is_zero() {
        return U256::zero();
    }
    let result = (U512::from(a) * U512::from(b)) % U512::from(m);
    u512_to_u256(result)
}

/// EVM EXP: modular exponentiation `base^exponent mod 2^256`.
pub fn exp(base: U256, exponent: U256) -> U256 {
    if exponent.is_zero() {
        return U256::one();
    }
    if base.is_zero() {
        return U256::zero();
    }
    let mut result = U256::one();
    let mut b = base;
    let mut e = exponent;
    while !e.is_zero() {
        if e.bit(0) {
            result = result.overflowing_mul(b).0;
        }
        e >>= 1;
        if !e.is_zero() {
            b = b.overflowing_mul(b).0;
        }
    }
    result
}

/// EVM SIGNEXTEND: extend the sign bit of byte `bytes` (0 = least significant).
pub fn signextend(bytes: U256, value: U256) -> U256 {
    if bytes >= U256::from(31u64) {
        return value;
    }
    let bit_index = bytes.low_u64() as usize * 8 + 7;
    let sign_bit = U256::one() << bit_index;
    let low_mask = sign_bit - U256::one();
    if value.bit(bit_index) {
        value | !low_mask
    } else {
        value & low_mask
    }
}

// -- Comparison operations -------------------------------------------------

/// EVM LT: unsigned less-than comparison.
pub fn lt(a: U256, b: U256) -> U256 {
    from_bool(a < b)
}

/// EVM GT: unsigned greater-than comparison.
pub fn gt(a: U256, b: U256) -> U256 {
    from_bool(a > b)
}

/// Signed `a < b` over two's complement values.
fn signed_lt(a: U256, b: U256) -> bool {
    match (is_negative(a), is_negative(b)) {
        (true, false) => true,
        (false, true) => false,
        // Same sign: the unsigned order matches the signed order.
        _ => a < b,
    }
}

/// EVM SLT: signed less-than comparison.
pub fn slt(a: U256, b: U256) -> U256 {
    from_bool(signed_lt(a, b))
}

/// EVM SGT: signed greater-than comparison.
pub fn sgt(a: U256, b: U256) -> U256 {
    from_bool(signed_lt(b, a))
}

/// EVM EQ: equality comparison.
pub fn eq(a: U256, b: U256) -> U256 {
    from_bool(a == b)
}

/// EVM ISZERO: returns 1 if the value is zero, 0 otherwise.
pub fn iszero(a: U256) -> U256 {
    from_bool(a.is_zero())
}

// -- Bitwise operations ----------------------------------------------------

/// EVM AND: bitwise AND.
pub fn and(a: U256, b: U256) -> U256 {
    a & b
}

/// EVM OR: bitwise OR.
pub fn or(a: U256, b: U256) -> U256 {
    a | b
}

/// EVM XOR: bitwise XOR.
pub fn xor(a: U256, b: U256) -> U256 {
    a ^ b
}

/// EVM NOT: bitwise complement.
pub fn not(a: U256) -> U256 {
    !a
}

/// EVM BYTE: extract a single byte from a 32-byte value at the given position.
pub fn byte_op(position: U256, value: U256) -> U256 {
    if position >= U256::from(32u64) {
        U256::zero()
    } else {
        let shift = (31 - position.low_u64()) * 8;
        (value >> shift as usize) & U256::from(0xFFu64)
    }
}

// -- Shift operations (Constantinople) -------------------------------------

/// EVM SHL: logical shift left.
pub fn shl(shift: U256, value: U256) -> U256 {
    if shift >= U256::from(256u64) {
        U256::zero()
    } else {
        value << shift.low_u64() as usize
    }
}

/// EVM SHR: logical shift right.
pub fn shr(shift: U256, value: U256) -> U256 {
    if shift >= U256::from(256u64) {
        U256::zero()
    } else {
        value >> shift.low_u64() as usize
    }
}

/// EVM SAR: arithmetic shift right, filling with the sign bit.
pub fn sar(shift: U256, value: U256) -> U256 {
    let negative = is_negative(value);
    if shift >= U256::from(256u64) {
        return if negative { UINT_256_MAX } else { U256::zero() };
    }
    let s = shift.low_u64() as usize;
    if negative && s > 0 {
        (value >> s) | !(UINT_256_MAX >> s)
    } else {
        value >> s
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Evaluate `kind` over constant operands (top of stack first).
///
/// Returns `None` when the operand count does not match the operator's arity.
pub fn evaluate(kind: Evaluator, args: &[U256]) -> Option<U256> {
    use Evaluator::*;
    let value = match (kind, args) {
        (Add, [a, b])           => add(*a, *b),
        (Sub, [a, b])           => sub(*a, *b),
        (Mul, [a, b])           => mul(*a, *b),
        (Div, [a, b])           => div(*a, *b),
        (SDiv, [a, b])          => sdiv(*a, *b),
        (Mod, [a, b])           => modulo(*a, *b),
        (SMod, [a, b])          => smod(*a, *b),
        (AddMod, [a, b, c])     => addmod(*a, *b, *c),
        (MulMod, [a, b, c])     => mulmod(*a, *b, *c),
        (Exp, [a, b])           => exp(*a, *b),
        (SignExtend, [a, b])    => signextend(*a, *b),
        (Lt, [a, b])            => lt(*a, *b),
        (Gt, [a, b])            => gt(*a, *b),
        (Slt, [a, b])           => slt(*a, *b),
        (Sgt, [a, b])           => sgt(*a, *b),
        (Eq, [a, b])            => eq(*a, *b),
        (IsZero, [a])           => iszero(*a),
        (And, [a, b])           => and(*a, *b),
        (Or, [a, b])            => or(*a, *b),
        (Xor, [a, b])           => xor(*a, *b),
        (Not, [a])              => not(*a),
        (Byte, [a, b])          => byte_op(*a, *b),
        (Shl, [a, b])           => shl(*a, *b),
        (Shr, [a, b])           => shr(*a, *b),
        (Sar, [a, b])           => sar(*a, *b),
        _ => return None,
    };
    Some(value)
}
