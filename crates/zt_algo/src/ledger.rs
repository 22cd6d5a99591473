//! Capacity ledger: remaining places per (slot, workshop).
//!
//! Contract:
//! - `remaining(slot, id)` → places left; unknown workshops count as 0.
//! - `consume(slot, id)` → fails if remaining == 0, else decrements by 1.
//!
//! Pool semantics follow `CapacityMode`: `PerSlot` seeds each of the
//! `num_assign` slots with the full capacity independently (total capacity
//! = capacity × num_assign); `SharedPool` keeps a single pool drawn down
//! across all slots. Created fresh per run; nothing persists.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use zt_core::config::CapacityMode;
use zt_core::entities::Workshop;
use zt_core::tokens::WorkshopId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LedgerError {
    /// No remaining capacity for this (slot, workshop) pair.
    Exhausted,
    /// Workshop id was never seeded into the ledger.
    UnknownWorkshop,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Exhausted => write!(f, "capacity exhausted"),
            LedgerError::UnknownWorkshop => write!(f, "unknown workshop"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CapacityLedger {
    mode: CapacityMode,
    /// One map per slot in `PerSlot` mode; a single map in `SharedPool` mode.
    pools: Vec<BTreeMap<WorkshopId, u32>>,
}

impl CapacityLedger {
    pub fn new(workshops: &[Workshop], num_assign: u32, mode: CapacityMode) -> Self {
        let pool: BTreeMap<WorkshopId, u32> =
            workshops.iter().map(|w| (w.id.clone(), w.capacity)).collect();
        let pools = match mode {
            CapacityMode::SharedPool => alloc::vec![pool],
            CapacityMode::PerSlot => {
                (0..num_assign.max(1)).map(|_| pool.clone()).collect()
            }
        };
        Self { mode, pools }
    }

    #[inline]
    fn pool_index(&self, slot: usize) -> usize {
        match self.mode {
            CapacityMode::SharedPool => 0,
            CapacityMode::PerSlot => slot,
        }
    }

    /// Remaining capacity for a workshop in a slot. Out-of-range slots and
    /// unknown workshops report 0.
    pub fn remaining(&self, slot: usize, id: &WorkshopId) -> u32 {
        self.pools
            .get(self.pool_index(slot))
            .and_then(|p| p.get(id))
            .copied()
            .unwrap_or(0)
    }

    /// Decrement remaining capacity by one place.
    pub fn consume(&mut self, slot: usize, id: &WorkshopId) -> Result<(), LedgerError> {
        let idx = self.pool_index(slot);
        let pool = self.pools.get_mut(idx).ok_or(LedgerError::Exhausted)?;
        let entry = pool.get_mut(id).ok_or(LedgerError::UnknownWorkshop)?;
        if *entry == 0 {
            return Err(LedgerError::Exhausted);
        }
        *entry -= 1;
        Ok(())
    }

    /// Total remaining places across all slots.
    pub fn total_remaining(&self) -> u64 {
        self.pools
            .iter()
            .flat_map(|p| p.values())
            .map(|&v| v as u64)
            .sum()
    }

    /// Remaining (workshop, places) pairs for a slot, in ascending id order.
    pub fn iter_remaining(&self, slot: usize) -> impl Iterator<Item = (&WorkshopId, u32)> {
        self.pools
            .get(self.pool_index(slot))
            .into_iter()
            .flat_map(|p| p.iter().map(|(id, &rem)| (id, rem)))
    }

    /// Per-workshop leftover capacity summed across slots, ascending by id.
    pub fn leftover(&self) -> BTreeMap<WorkshopId, u32> {
        let mut out: BTreeMap<WorkshopId, u32> = BTreeMap::new();
        for pool in &self.pools {
            for (id, &rem) in pool {
                *out.entry(id.clone()).or_insert(0) += rem;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn ws(id: &str, cap: u32) -> Workshop {
        Workshop {
            id: WorkshopId::from_str(id).unwrap(),
            title: alloc::string::String::from(id),
            capacity: cap,
        }
    }

    #[test]
    fn per_slot_replicates_capacity() {
        let w = [ws("a", 2)];
        let mut l = CapacityLedger::new(&w, 3, CapacityMode::PerSlot);
        let id = WorkshopId::from_str("a").unwrap();
        assert_eq!(l.total_remaining(), 6);
        for slot in 0..3 {
            assert_eq!(l.remaining(slot, &id), 2);
            l.consume(slot, &id).unwrap();
            l.consume(slot, &id).unwrap();
            assert_eq!(l.consume(slot, &id), Err(LedgerError::Exhausted));
        }
        assert_eq!(l.total_remaining(), 0);
    }

    #[test]
    fn shared_pool_spans_slots() {
        let w = [ws("a", 2)];
        let mut l = CapacityLedger::new(&w, 3, CapacityMode::SharedPool);
        let id = WorkshopId::from_str("a").unwrap();
        assert_eq!(l.total_remaining(), 2);
        l.consume(0, &id).unwrap();
        l.consume(2, &id).unwrap();
        assert_eq!(l.consume(1, &id), Err(LedgerError::Exhausted));
    }

    #[test]
    fn unknown_and_out_of_range() {
        let w = [ws("a", 1)];
        let mut l = CapacityLedger::new(&w, 1, CapacityMode::PerSlot);
        let other = WorkshopId::from_str("b").unwrap();
        assert_eq!(l.remaining(0, &other), 0);
        assert_eq!(l.consume(0, &other), Err(LedgerError::UnknownWorkshop));
        let id = WorkshopId::from_str("a").unwrap();
        assert_eq!(l.remaining(5, &id), 0);
    }

    #[test]
    fn leftover_sums_across_slots() {
        let w = [ws("a", 2), ws("b", 1)];
        let mut l = CapacityLedger::new(&w, 2, CapacityMode::PerSlot);
        let a = WorkshopId::from_str("a").unwrap();
        l.consume(0, &a).unwrap();
        let left = l.leftover();
        assert_eq!(left.get(&a), Some(&3));
        assert_eq!(left.get(&WorkshopId::from_str("b").unwrap()), Some(&2));
    }
}
