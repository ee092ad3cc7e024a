pub mod config;
pub mod events;
pub mod guard;
pub mod iterable_map;
pub mod memory_ids;
pub mod nat_helpers;
pub mod registry;
pub mod service;
pub mod types;
pub mod wallet;


pub use config::{ConfigStore, InitArgs, LedgerConfig};
pub use events::{AuditLog, EventSink, VecSink};
pub use guard::{require_admin, AccessGate, FixedOwner};
pub use iterable_map::{InsertOutcome, TombstonedOrderedMap};
pub use registry::{Registry, UserRecord};
pub use service::LedgerService;
pub use types::{
    AuditEntry, EntryStatus, LedgerError, LedgerEvent, LedgerStats, UserProfile, Wallet, WalletEntry,
};
pub use wallet::LedgerOp;
