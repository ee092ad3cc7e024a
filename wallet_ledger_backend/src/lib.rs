//! Wallet Ledger Backend
//!
//! **Design Philosophy:**
//! Single-owner ledger canister. Each registered user holds, per asset symbol,
//! a `free` (spendable) and a `hold` (reserved) balance.
//!
//! **Guarantees:**
//! - Every mutation is owner-gated and all-or-nothing
//! - Balances never go below zero and never exceed 256 bits
//! - Wallets enumerate in the order their assets were first touched
//! - Every successful mutation lands in the stable audit log

use candid::{Nat, Principal};
use ic_cdk::{init, post_upgrade, pre_upgrade, query, update};
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;
use std::fmt::Debug;

// =============================================================================
// MODULE DECLARATIONS
// =============================================================================

pub mod ledger;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use ledger::{
    AuditEntry, EntryStatus, InitArgs, LedgerError, LedgerStats, UserProfile, Wallet, WalletEntry,
};

use ledger::memory_ids::{
    AUDIT_LOG_COUNTER_MEMORY_ID, AUDIT_LOG_MAP_MEMORY_ID, CONFIG_MEMORY_ID, USERS_MEMORY_ID,
};
use ledger::{AuditLog, ConfigStore, LedgerConfig, LedgerService, Registry};

// =============================================================================
// MEMORY MANAGEMENT
// =============================================================================

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

type CanisterLedger = LedgerService<Memory, ConfigStore<Memory>, AuditLog<Memory>>;

thread_local! {
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> =
        RefCell::new(MemoryManager::init(DefaultMemoryImpl::default()));

    static LEDGER: RefCell<CanisterLedger> = RefCell::new(open_ledger());
}

fn memory(id: u8) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(MemoryId::new(id)))
}

fn open_ledger() -> CanisterLedger {
    LedgerService::new(
        Registry::init(memory(USERS_MEMORY_ID)),
        ConfigStore::init(memory(CONFIG_MEMORY_ID)),
        AuditLog::init(
            memory(AUDIT_LOG_MAP_MEMORY_ID),
            memory(AUDIT_LOG_COUNTER_MEMORY_ID),
            ic_cdk::api::time,
        ),
    )
}

fn with_ledger<R>(f: impl FnOnce(&CanisterLedger) -> R) -> R {
    LEDGER.with(|l| f(&l.borrow()))
}

fn with_ledger_mut<R>(f: impl FnOnce(&mut CanisterLedger) -> R) -> R {
    LEDGER.with(|l| f(&mut l.borrow_mut()))
}

fn log_outcome<T: Debug>(operation: &str, detail: String, result: &Result<T, LedgerError>) {
    match result {
        Ok(value) => ic_cdk::println!("{} ok: {} -> {:?}", operation, detail, value),
        Err(e) => ic_cdk::println!("{} rejected: {} ({})", operation, detail, e),
    }
}

// =============================================================================
// LIFECYCLE HOOKS
// =============================================================================

#[init]
fn init(args: Option<InitArgs>) {
    let config = LedgerConfig::from_init_args(args.unwrap_or_default(), ic_cdk::api::msg_caller());
    ic_cdk::println!(
        "Wallet Ledger Initialized: owner={} assets={:?}",
        config.owner,
        config.supported_assets
    );
    with_ledger_mut(|l| l.config_mut().install(config));
}

#[pre_upgrade]
fn pre_upgrade() {
    ic_cdk::println!("Pre-upgrade: state persists automatically");
}

#[post_upgrade]
fn post_upgrade() {
    // StableBTreeMap and StableCell restore on first access
    let (owner, users) = with_ledger(|l| (l.config().owner(), l.registry().user_count()));
    ic_cdk::println!("Post-upgrade: owner={} users={}", owner, users);
}

// =============================================================================
// USER ENDPOINTS
// =============================================================================

#[update]
fn create_user(id: String, email: String, name: String) -> Result<(), LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let result = with_ledger_mut(|l| l.create_user(&caller, id.clone(), email, name));
    log_outcome("create_user", format!("id={}", id), &result);
    result
}

#[query]
fn get_user_name(id: String) -> Result<String, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    with_ledger(|l| l.get_user_name(&caller, &id))
}

#[query]
fn get_user_profile(id: String) -> Result<UserProfile, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    with_ledger(|l| l.get_user_profile(&caller, &id))
}

// =============================================================================
// LEDGER ENDPOINTS
// =============================================================================

#[update]
fn add_free_amount(id: String, asset: String, amount: Nat) -> Result<EntryStatus, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let detail = format!("id={} asset={} amount={}", id, asset, amount);
    let result = with_ledger_mut(|l| l.add_free_amount(&caller, &id, &asset, amount));
    log_outcome("add_free_amount", detail, &result);
    result
}

#[update]
fn add_hold_amount(id: String, asset: String, amount: Nat) -> Result<EntryStatus, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let detail = format!("id={} asset={} amount={}", id, asset, amount);
    let result = with_ledger_mut(|l| l.add_hold_amount(&caller, &id, &asset, amount));
    log_outcome("add_hold_amount", detail, &result);
    result
}

#[update]
fn release_hold(id: String, asset: String, amount: Nat) -> Result<(), LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let detail = format!("id={} asset={} amount={}", id, asset, amount);
    let result = with_ledger_mut(|l| l.release_hold(&caller, &id, &asset, amount));
    log_outcome("release_hold", detail, &result);
    result
}

#[update]
fn make_hold(id: String, asset: String, amount: Nat) -> Result<(), LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let detail = format!("id={} asset={} amount={}", id, asset, amount);
    let result = with_ledger_mut(|l| l.make_hold(&caller, &id, &asset, amount));
    log_outcome("make_hold", detail, &result);
    result
}

#[update]
fn pay_free(id: String, asset: String, amount: Nat) -> Result<(), LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let detail = format!("id={} asset={} amount={}", id, asset, amount);
    let result = with_ledger_mut(|l| l.pay_free(&caller, &id, &asset, amount));
    log_outcome("pay_free", detail, &result);
    result
}

#[update]
fn close_wallet(id: String, asset: String) -> Result<(), LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let detail = format!("id={} asset={}", id, asset);
    let result = with_ledger_mut(|l| l.close_wallet(&caller, &id, &asset));
    log_outcome("close_wallet", detail, &result);
    result
}

#[query]
fn get_wallet_size(id: String) -> Result<u64, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    with_ledger(|l| l.get_wallet_size(&caller, &id))
}

#[query]
fn get_wallet(id: String, asset: String) -> Result<Wallet, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    with_ledger(|l| l.get_wallet(&caller, &id, &asset))
}

#[query]
fn list_wallets(id: String) -> Result<Vec<WalletEntry>, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    with_ledger(|l| l.list_wallets(&caller, &id))
}

// =============================================================================
// PUBLIC CONFIG ENDPOINTS
// =============================================================================

#[query]
fn list_supported_assets() -> Vec<String> {
    with_ledger(|l| l.config().supported_assets())
}

#[query]
fn get_owner() -> Principal {
    with_ledger(|l| l.config().owner())
}

#[query]
fn greet(name: String) -> String {
    format!("Wallet Ledger: free and held balances per asset. Hi {}!", name)
}

// =============================================================================
// ADMIN ENDPOINTS
// =============================================================================

#[update]
fn transfer_ownership(new_owner: Principal) -> Result<(), LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    let result = with_ledger_mut(|l| l.transfer_ownership(&caller, new_owner));
    log_outcome("transfer_ownership", format!("new_owner={}", new_owner), &result);
    result
}

#[query]
fn admin_get_audit_log(offset: u64, limit: u64) -> Result<Vec<AuditEntry>, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    with_ledger(|l| l.audit_log(&caller, offset, limit))
}

#[query]
fn admin_get_stats() -> Result<LedgerStats, LedgerError> {
    let caller = ic_cdk::api::msg_caller();
    with_ledger(|l| {
        ledger::require_admin(l.config(), &caller)?;
        Ok(LedgerStats {
            user_count: l.registry().user_count(),
            audit_entries: l.sink().len(),
            owner: l.config().owner(),
            supported_assets: l.config().supported_assets(),
        })
    })
}

ic_cdk::export_candid!();
