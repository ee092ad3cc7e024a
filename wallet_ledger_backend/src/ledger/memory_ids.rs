//! Central registry for stable memory IDs.
//!
//! IMPORTANT: All memory IDs must be unique across the entire canister.
//!
//! Allocation strategy:
//! - 0-9: Configuration (owner, supported assets)
//! - 10-19: User records and wallets
//! - 20-29: Audit trail

// Configuration (0-9)
pub const CONFIG_MEMORY_ID: u8 = 0;

// Users (10-19)
pub const USERS_MEMORY_ID: u8 = 10;

// Audit (20-29)
pub const AUDIT_LOG_MAP_MEMORY_ID: u8 = 20;
pub const AUDIT_LOG_COUNTER_MEMORY_ID: u8 = 21;
