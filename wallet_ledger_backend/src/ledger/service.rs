//! Administrative surface of the ledger.
//!
//! Every call checks the caller against the gate first. A rejected call
//! touches neither the registry nor the sink. Successful mutations emit exactly
//! one event after the registry write.

use candid::{Nat, Principal};
use ic_stable_structures::Memory;

use super::config::ConfigStore;
use super::events::{AuditLog, EventSink};
use super::guard::{require_admin, AccessGate};
use super::registry::Registry;
use super::types::{AuditEntry, EntryStatus, LedgerError, LedgerEvent, UserProfile, Wallet, WalletEntry};
use super::wallet::LedgerOp;

pub const MAX_PAGINATION_LIMIT: u64 = 100;

pub struct LedgerService<M: Memory, G: AccessGate, S: EventSink> {
    registry: Registry<M>,
    gate: G,
    sink: S,
}

impl<M: Memory, G: AccessGate, S: EventSink> LedgerService<M, G, S> {
    pub fn new(registry: Registry<M>, gate: G, sink: S) -> Self {
        Self { registry, gate, sink }
    }

    pub fn registry(&self) -> &Registry<M> {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    pub fn create_user(&mut self, caller: &Principal, id: String, email: String, name: String) -> Result<(), LedgerError> {
        require_admin(&self.gate, caller)?;
        self.registry.create_user(id.clone(), email, name)?;
        self.sink.emit(LedgerEvent::UserCreated { id });
        Ok(())
    }

    pub fn add_free_amount(&mut self, caller: &Principal, id: &str, asset: &str, amount: Nat) -> Result<EntryStatus, LedgerError> {
        self.run(caller, id, asset, LedgerOp::AddFree, amount)
    }

    pub fn add_hold_amount(&mut self, caller: &Principal, id: &str, asset: &str, amount: Nat) -> Result<EntryStatus, LedgerError> {
        self.run(caller, id, asset, LedgerOp::AddHold, amount)
    }

    pub fn release_hold(&mut self, caller: &Principal, id: &str, asset: &str, amount: Nat) -> Result<(), LedgerError> {
        self.run(caller, id, asset, LedgerOp::ReleaseHold, amount).map(|_| ())
    }

    pub fn make_hold(&mut self, caller: &Principal, id: &str, asset: &str, amount: Nat) -> Result<(), LedgerError> {
        self.run(caller, id, asset, LedgerOp::MakeHold, amount).map(|_| ())
    }

    pub fn pay_free(&mut self, caller: &Principal, id: &str, asset: &str, amount: Nat) -> Result<(), LedgerError> {
        self.run(caller, id, asset, LedgerOp::PayFree, amount).map(|_| ())
    }

    pub fn close_wallet(&mut self, caller: &Principal, id: &str, asset: &str) -> Result<(), LedgerError> {
        require_admin(&self.gate, caller)?;
        self.registry.close_wallet(id, asset)?;
        self.sink.emit(LedgerEvent::WalletClosed {
            id: id.to_string(),
            asset: asset.to_string(),
        });
        Ok(())
    }

    fn run(&mut self, caller: &Principal, id: &str, asset: &str, op: LedgerOp, amount: Nat) -> Result<EntryStatus, LedgerError> {
        require_admin(&self.gate, caller)?;
        let status = self.registry.apply(id, asset, op, &amount)?;

        let (id, asset) = (id.to_string(), asset.to_string());
        self.sink.emit(match op {
            LedgerOp::AddFree => LedgerEvent::FreeAdded { id, asset, amount },
            LedgerOp::AddHold => LedgerEvent::HoldAdded { id, asset, amount },
            LedgerOp::ReleaseHold => LedgerEvent::HoldReleased { id, asset, amount },
            LedgerOp::MakeHold => LedgerEvent::HoldMade { id, asset, amount },
            LedgerOp::PayFree => LedgerEvent::FreePaid { id, asset, amount },
        });
        Ok(status)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn get_user_name(&self, caller: &Principal, id: &str) -> Result<String, LedgerError> {
        require_admin(&self.gate, caller)?;
        self.registry.get_user_name(id)
    }

    pub fn get_user_profile(&self, caller: &Principal, id: &str) -> Result<UserProfile, LedgerError> {
        require_admin(&self.gate, caller)?;
        self.registry.get_user_profile(id)
    }

    pub fn get_wallet_size(&self, caller: &Principal, id: &str) -> Result<u64, LedgerError> {
        require_admin(&self.gate, caller)?;
        self.registry.get_wallet_size(id)
    }

    pub fn get_wallet(&self, caller: &Principal, id: &str, asset: &str) -> Result<Wallet, LedgerError> {
        require_admin(&self.gate, caller)?;
        self.registry.get_wallet(id, asset)
    }

    pub fn list_wallets(&self, caller: &Principal, id: &str) -> Result<Vec<WalletEntry>, LedgerError> {
        require_admin(&self.gate, caller)?;
        self.registry.list_wallets(id)
    }
}

// =============================================================================
// CANISTER WIRING
// =============================================================================

impl<M: Memory, C: Memory, S: EventSink> LedgerService<M, ConfigStore<C>, S> {
    pub fn config(&self) -> &ConfigStore<C> {
        &self.gate
    }

    pub fn config_mut(&mut self) -> &mut ConfigStore<C> {
        &mut self.gate
    }

    pub fn transfer_ownership(&mut self, caller: &Principal, new_owner: Principal) -> Result<(), LedgerError> {
        let previous = self.gate.transfer_ownership(caller, new_owner)?;
        self.sink.emit(LedgerEvent::OwnershipTransferred { previous, new: new_owner });
        Ok(())
    }
}

impl<M: Memory, G: AccessGate, A: Memory> LedgerService<M, G, AuditLog<A>> {
    pub fn audit_log(&self, caller: &Principal, offset: u64, limit: u64) -> Result<Vec<AuditEntry>, LedgerError> {
        require_admin(&self.gate, caller)?;
        Ok(self.sink.page(offset, limit.min(MAX_PAGINATION_LIMIT)))
    }
}
