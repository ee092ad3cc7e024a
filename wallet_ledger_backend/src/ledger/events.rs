use ic_stable_structures::{Memory, StableBTreeMap, StableCell};

use super::types::{AuditEntry, LedgerEvent};

/// Receives one event per successful mutating call, in call order.
pub trait EventSink {
    fn emit(&mut self, event: LedgerEvent);
}

/// Collects events in memory.
#[derive(Default, Debug)]
pub struct VecSink {
    pub events: Vec<LedgerEvent>,
}

impl EventSink for VecSink {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

/// Append-only audit trail in stable memory.
///
/// Entries are keyed by a monotonically increasing sequence number kept in
/// its own cell, so the log can be paged without iterating the map.
pub struct AuditLog<M: Memory> {
    entries: StableBTreeMap<u64, AuditEntry, M>,
    counter: StableCell<u64, M>,
    clock: fn() -> u64,
}

impl<M: Memory> AuditLog<M> {
    /// `clock` returns the current time in nanoseconds.
    pub fn init(entries_memory: M, counter_memory: M, clock: fn() -> u64) -> Self {
        Self {
            entries: StableBTreeMap::init(entries_memory),
            counter: StableCell::init(counter_memory, 0u64),
            clock,
        }
    }

    pub fn len(&self) -> u64 {
        *self.counter.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, sequence: u64) -> Option<AuditEntry> {
        self.entries.get(&sequence)
    }

    /// Entries `offset..offset + limit` in sequence order.
    pub fn page(&self, offset: u64, limit: u64) -> Vec<AuditEntry> {
        let end = offset.saturating_add(limit).min(self.len());
        (offset..end).filter_map(|seq| self.entries.get(&seq)).collect()
    }
}

impl<M: Memory> EventSink for AuditLog<M> {
    fn emit(&mut self, event: LedgerEvent) {
        let sequence = *self.counter.get();
        let entry = AuditEntry {
            sequence,
            timestamp: (self.clock)(),
            event,
        };
        self.entries.insert(sequence, entry);
        self.counter.set(sequence + 1);
    }
}
