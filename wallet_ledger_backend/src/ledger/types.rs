use candid::{CandidType, Deserialize, Nat, Principal};
use ic_stable_structures::storable::Bound;
use ic_stable_structures::Storable;
use std::borrow::Cow;

use super::iterable_map::InsertOutcome;
use super::nat_helpers::nat_zero;

pub fn sanitize_error(msg: &str) -> String {
    msg.chars().take(256).collect()
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Unauthorized: admin only")]
    Unauthorized,
    #[error("Not found: {what}")]
    NotFound { what: String },
    #[error("User {id} already exists")]
    AlreadyExists { id: String },
    #[error("Insufficient free balance: available {available}, requested {requested}")]
    InsufficientFree { available: Nat, requested: Nat },
    #[error("Insufficient hold balance: available {available}, requested {requested}")]
    InsufficientHold { available: Nat, requested: Nat },
    #[error("Arithmetic overflow: balance would exceed 256 bits")]
    ArithmeticOverflow,
    #[error("Wallet {asset} still carries a balance")]
    WalletNotEmpty { asset: String },
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl LedgerError {
    pub fn user_not_found(id: &str) -> Self {
        LedgerError::NotFound { what: format!("user {}", sanitize_error(id)) }
    }
}

// =============================================================================
// WALLET VIEWS
// =============================================================================

/// Whether a ledger call created the asset's wallet or found it in place.
#[derive(CandidType, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStatus {
    Created,
    AlreadyPresent,
}

impl From<InsertOutcome> for EntryStatus {
    fn from(outcome: InsertOutcome) -> Self {
        match outcome {
            InsertOutcome::Created => EntryStatus::Created,
            InsertOutcome::AlreadyPresent => EntryStatus::AlreadyPresent,
        }
    }
}

/// Two-bucket balance of one asset for one user.
#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    pub free: Nat,
    pub hold: Nat,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            free: nat_zero(),
            hold: nat_zero(),
        }
    }
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WalletEntry {
    pub asset: String,
    pub free: Nat,
    pub hold: Nat,
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub wallet_count: u64,
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerStats {
    pub user_count: u64,
    pub audit_entries: u64,
    pub owner: Principal,
    pub supported_assets: Vec<String>,
}

// =============================================================================
// AUDIT TRAIL
// =============================================================================

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    UserCreated { id: String },
    FreeAdded { id: String, asset: String, amount: Nat },
    HoldAdded { id: String, asset: String, amount: Nat },
    HoldReleased { id: String, asset: String, amount: Nat },
    HoldMade { id: String, asset: String, amount: Nat },
    FreePaid { id: String, asset: String, amount: Nat },
    WalletClosed { id: String, asset: String },
    OwnershipTransferred { previous: Principal, new: Principal },
}

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuditEntry {
    pub sequence: u64,
    pub timestamp: u64,
    pub event: LedgerEvent,
}

impl Storable for AuditEntry {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(
            candid::encode_one(self).expect(
                "CRITICAL: Failed to encode AuditEntry. \
                 This should never happen unless there's a bug in candid serialization. \
                 Audit logging is failing - system integrity may be compromised."
            )
        )
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        candid::decode_one(&bytes).expect(
            "CRITICAL: Failed to decode AuditEntry from stable storage. \
             This indicates audit log corruption or an incompatible upgrade. \
             Audit trail integrity cannot be guaranteed."
        )
    }

    const BOUND: Bound = Bound::Unbounded;
}
