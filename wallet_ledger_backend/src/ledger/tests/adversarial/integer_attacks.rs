//! Integer Overflow/Underflow Attack Tests
//!
//! These run against the real registry because only it enforces the 256-bit
//! ceiling. Targets:
//! - checked_add in add_free / add_hold
//! - free increment inside release_hold
//! - hold increment inside make_hold
//! - amounts wider than 256 bits at the entry point

use candid::Nat;
use ic_stable_structures::DefaultMemoryImpl;

use crate::ledger::nat_helpers::u256_max;
use crate::ledger::registry::Registry;
use crate::ledger::types::{LedgerError, Wallet};
use crate::ledger::wallet::LedgerOp;

fn registry() -> Registry<DefaultMemoryImpl> {
    let mut r = Registry::init(DefaultMemoryImpl::default());
    r.create_user("whale".to_string(), "whale@example.com".to_string(), "Whale".to_string()).unwrap();
    r
}

#[test]
fn attack_add_free_past_ceiling() {
    println!("\n🔴 ATTACK: Wrap the free bucket past 2^256 - 1");

    let mut r = registry();
    r.apply("whale", "BTC", LedgerOp::AddFree, &u256_max()).unwrap();

    let result = r.apply("whale", "BTC", LedgerOp::AddFree, &Nat::from(1u64));
    assert_eq!(result, Err(LedgerError::ArithmeticOverflow));
    assert_eq!(r.get_wallet("whale", "BTC").unwrap().free, u256_max());

    println!("\n✅ ATTACK THWARTED: free bucket saturates with an error, not a wrap");
}

#[test]
fn attack_release_into_full_free_bucket() {
    println!("\n🔴 ATTACK: Overflow free through release_hold");

    let mut r = registry();
    r.apply("whale", "ETH", LedgerOp::AddFree, &u256_max()).unwrap();
    r.apply("whale", "ETH", LedgerOp::AddHold, &Nat::from(5u64)).unwrap();

    let before = r.get_wallet("whale", "ETH").unwrap();
    let result = r.apply("whale", "ETH", LedgerOp::ReleaseHold, &Nat::from(5u64));
    assert_eq!(result, Err(LedgerError::ArithmeticOverflow));
    assert_eq!(r.get_wallet("whale", "ETH").unwrap(), before, "hold must not be debited on failure");

    println!("\n✅ ATTACK THWARTED: release is all-or-nothing");
}

#[test]
fn attack_make_hold_into_full_hold_bucket() {
    println!("\n🔴 ATTACK: Overflow hold through make_hold");

    let mut r = registry();
    r.apply("whale", "ICP", LedgerOp::AddHold, &u256_max()).unwrap();
    r.apply("whale", "ICP", LedgerOp::AddFree, &Nat::from(1u64)).unwrap();

    let result = r.apply("whale", "ICP", LedgerOp::MakeHold, &Nat::from(1u64));
    assert_eq!(result, Err(LedgerError::ArithmeticOverflow));
    assert_eq!(
        r.get_wallet("whale", "ICP").unwrap(),
        Wallet { free: Nat::from(1u64), hold: u256_max() }
    );

    println!("\n✅ ATTACK THWARTED: make_hold is all-or-nothing");
}

#[test]
fn attack_oversized_amount() {
    println!("\n🔴 ATTACK: Pass an amount wider than 256 bits");

    let mut r = registry();
    let huge = Nat(u256_max().0 * 2u32);

    for op in [LedgerOp::AddFree, LedgerOp::AddHold, LedgerOp::PayFree] {
        assert_eq!(r.apply("whale", "USDT", op, &huge), Err(LedgerError::ArithmeticOverflow));
    }
    assert_eq!(r.get_wallet_size("whale").unwrap(), 0, "no wallet may be created");

    println!("\n✅ ATTACK THWARTED: oversized amounts rejected before any write");
}

#[test]
fn attack_underflow_by_one() {
    println!("\n🔴 ATTACK: Debit one unit more than available");

    let mut r = registry();
    r.apply("whale", "BTC", LedgerOp::AddFree, &Nat::from(10u64)).unwrap();
    r.apply("whale", "BTC", LedgerOp::MakeHold, &Nat::from(4u64)).unwrap();

    assert!(matches!(
        r.apply("whale", "BTC", LedgerOp::PayFree, &Nat::from(7u64)),
        Err(LedgerError::InsufficientFree { .. })
    ));
    assert!(matches!(
        r.apply("whale", "BTC", LedgerOp::ReleaseHold, &Nat::from(5u64)),
        Err(LedgerError::InsufficientHold { .. })
    ));
    assert_eq!(
        r.get_wallet("whale", "BTC").unwrap(),
        Wallet { free: Nat::from(6u64), hold: Nat::from(4u64) }
    );

    println!("\n✅ ATTACK THWARTED: balances never go negative");
}
