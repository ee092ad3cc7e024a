use candid::Principal;

use super::types::LedgerError;

/// Identity check consulted before every administrative operation.
pub trait AccessGate {
    fn is_admin(&self, caller: &Principal) -> bool;
}

/// Fails with `Unauthorized` unless `caller` passes the gate.
pub fn require_admin<G: AccessGate + ?Sized>(gate: &G, caller: &Principal) -> Result<(), LedgerError> {
    if !gate.is_admin(caller) {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

/// Gate with a fixed owner, for embedding the ledger without stable config.
pub struct FixedOwner(pub Principal);

impl AccessGate for FixedOwner {
    fn is_admin(&self, caller: &Principal) -> bool {
        *caller == self.0
    }
}
