//! Privilege Escalation Attack Tests
//!
//! Non-owners try to mutate or read the ledger through the service surface,
//! including after an ownership hand-over.

use candid::{Nat, Principal};
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;

use crate::ledger::config::{ConfigStore, InitArgs, LedgerConfig};
use crate::ledger::events::VecSink;
use crate::ledger::registry::Registry;
use crate::ledger::service::LedgerService;
use crate::ledger::types::{LedgerError, LedgerEvent};

type Mem = VirtualMemory<DefaultMemoryImpl>;

fn principal(byte: u8) -> Principal {
    Principal::from_slice(&[byte; 29])
}

fn service(owner: Principal) -> LedgerService<Mem, ConfigStore<Mem>, VecSink> {
    let manager = MemoryManager::init(DefaultMemoryImpl::default());
    let mut config = ConfigStore::init(manager.get(MemoryId::new(0)));
    config.install(LedgerConfig::from_init_args(InitArgs::default(), owner));
    LedgerService::new(Registry::init(manager.get(MemoryId::new(1))), config, VecSink::default())
}

#[test]
fn attack_anonymous_caller() {
    println!("\n🔴 ATTACK: Anonymous caller mutates balances");

    let owner = principal(1);
    let mut s = service(owner);
    s.create_user(&owner, "u1".into(), "e".into(), "n".into()).unwrap();

    let anon = Principal::anonymous();
    assert_eq!(s.add_free_amount(&anon, "u1", "BTC", Nat::from(1u64)), Err(LedgerError::Unauthorized));
    assert_eq!(s.pay_free(&anon, "u1", "BTC", Nat::from(0u64)), Err(LedgerError::Unauthorized));
    assert_eq!(s.transfer_ownership(&anon, anon), Err(LedgerError::Unauthorized));
    assert_eq!(s.get_wallet_size(&owner, "u1").unwrap(), 0);

    println!("\n✅ ATTACK THWARTED");
}

#[test]
fn attack_previous_owner_after_transfer() {
    println!("\n🔴 ATTACK: Former owner keeps using the ledger");

    let (old, new) = (principal(1), principal(2));
    let mut s = service(old);
    s.transfer_ownership(&old, new).unwrap();

    assert_eq!(
        s.create_user(&old, "u1".into(), "e".into(), "n".into()),
        Err(LedgerError::Unauthorized)
    );
    s.create_user(&new, "u1".into(), "e".into(), "n".into()).unwrap();

    assert_eq!(
        s.sink().events,
        vec![
            LedgerEvent::OwnershipTransferred { previous: old, new },
            LedgerEvent::UserCreated { id: "u1".into() },
        ]
    );
    assert_eq!(s.config().owner(), new);

    println!("\n✅ ATTACK THWARTED: admin role moves with ownership");
}
