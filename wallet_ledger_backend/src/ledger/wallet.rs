use candid::{CandidType, Deserialize, Nat};

use super::nat_helpers::{checked_add, checked_sub, nat_is_zero, ArithmeticError};
use super::types::{LedgerError, Wallet};

/// A balance movement applied to a single `(user, asset)` wallet.
#[derive(CandidType, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerOp {
    /// free += amount
    AddFree,
    /// hold += amount
    AddHold,
    /// hold -> free
    ReleaseHold,
    /// free -> hold
    MakeHold,
    /// free -= amount, paid out of the ledger
    PayFree,
}

fn overflow(_: ArithmeticError) -> LedgerError {
    LedgerError::ArithmeticOverflow
}

impl Wallet {
    /// Computes the wallet after `op`. `self` is left untouched, so a failed
    /// check never leaves a half-written balance behind.
    pub fn apply(&self, op: LedgerOp, amount: &Nat) -> Result<Wallet, LedgerError> {
        match op {
            LedgerOp::AddFree => self.add_free(amount),
            LedgerOp::AddHold => self.add_hold(amount),
            LedgerOp::ReleaseHold => self.release_hold(amount),
            LedgerOp::MakeHold => self.make_hold(amount),
            LedgerOp::PayFree => self.pay_free(amount),
        }
    }

    pub fn add_free(&self, amount: &Nat) -> Result<Wallet, LedgerError> {
        Ok(Wallet {
            free: checked_add(&self.free, amount).map_err(overflow)?,
            hold: self.hold.clone(),
        })
    }

    pub fn add_hold(&self, amount: &Nat) -> Result<Wallet, LedgerError> {
        Ok(Wallet {
            free: self.free.clone(),
            hold: checked_add(&self.hold, amount).map_err(overflow)?,
        })
    }

    pub fn release_hold(&self, amount: &Nat) -> Result<Wallet, LedgerError> {
        let hold = self.debit_hold(amount)?;
        Ok(Wallet {
            free: checked_add(&self.free, amount).map_err(overflow)?,
            hold,
        })
    }

    pub fn make_hold(&self, amount: &Nat) -> Result<Wallet, LedgerError> {
        let free = self.debit_free(amount)?;
        Ok(Wallet {
            free,
            hold: checked_add(&self.hold, amount).map_err(overflow)?,
        })
    }

    pub fn pay_free(&self, amount: &Nat) -> Result<Wallet, LedgerError> {
        Ok(Wallet {
            free: self.debit_free(amount)?,
            hold: self.hold.clone(),
        })
    }

    pub fn is_empty(&self) -> bool {
        nat_is_zero(&self.free) && nat_is_zero(&self.hold)
    }

    fn debit_free(&self, amount: &Nat) -> Result<Nat, LedgerError> {
        checked_sub(&self.free, amount).map_err(|_| LedgerError::InsufficientFree {
            available: self.free.clone(),
            requested: amount.clone(),
        })
    }

    fn debit_hold(&self, amount: &Nat) -> Result<Nat, LedgerError> {
        checked_sub(&self.hold, amount).map_err(|_| LedgerError::InsufficientHold {
            available: self.hold.clone(),
            requested: amount.clone(),
        })
    }
}
