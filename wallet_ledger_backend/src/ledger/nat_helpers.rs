// Checked 256-bit arithmetic over candid Nat.
//
// Nat itself is unbounded; balances are capped at 2^256 - 1 so every
// addition is checked against that ceiling and every subtraction against zero.
use candid::Nat;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Width of a balance in bits.
pub const BALANCE_BITS: u64 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticError {
    Overflow,
    Underflow,
}

pub fn nat_zero() -> Nat {
    Nat(BigUint::zero())
}

pub fn nat_is_zero(n: &Nat) -> bool {
    n.0.is_zero()
}

/// Largest representable balance: 2^256 - 1.
pub fn u256_max() -> Nat {
    Nat((BigUint::one() << BALANCE_BITS) - BigUint::one())
}

pub fn fits_u256(n: &Nat) -> bool {
    n.0.bits() <= BALANCE_BITS
}

// Addition - fails if the sum leaves the 256-bit range
pub fn checked_add(n1: &Nat, n2: &Nat) -> Result<Nat, ArithmeticError> {
    let sum = Nat(&n1.0 + &n2.0);
    if fits_u256(&sum) {
        Ok(sum)
    } else {
        Err(ArithmeticError::Overflow)
    }
}

// Subtraction - fails instead of wrapping below zero
pub fn checked_sub(n1: &Nat, n2: &Nat) -> Result<Nat, ArithmeticError> {
    if n1 < n2 {
        Err(ArithmeticError::Underflow)
    } else {
        Ok(Nat(&n1.0 - &n2.0))
    }
}
