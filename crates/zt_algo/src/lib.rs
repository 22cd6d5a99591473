// crates/zt_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

// Core IDs, entities and configuration
pub use zt_core::{
    config::{ConfigError, MatchConfig, Objective, Strategy},
    entities::{Participant, Workshop},
    tokens::{ParticipantId, WorkshopId},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use metrics::FairnessReport;

// ----------------------------- Shared result shape -----------------------------

/// A workshop with leftover capacity after allocation (summed across slots).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnfilledWorkshop {
    pub id: WorkshopId,
    pub title: String,
    pub remaining: u32,
}

/// Aggregate run summary. Capacity shortfall is reported here, never as an
/// error: strategies leave participants under-filled rather than failing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    pub participants_total: u32,
    pub assignments_total: u32,
    pub participants_no_wishes: u32,
    /// Priority rank (1-based) → number of assignments at that rank.
    pub per_priority_fulfilled: BTreeMap<u32, u32>,
    /// Assignments made into each slot, index 0 = first slot.
    pub per_slot_filled: Vec<u32>,
    /// Slots filled (0..=num_assign) → number of participants holding that many.
    pub assignment_distribution: BTreeMap<u32, u32>,
    pub all_filled_to_slots: bool,
    pub warning_capacity_deficit: bool,
    pub unfilled_workshops: Vec<UnfilledWorkshop>,
    pub seed: u64,
    pub strategy: Strategy,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub objective: Option<Objective>,
    pub metrics: FairnessReport,
}

/// Per-participant slot assignments plus the aggregate summary. All three
/// strategies return this shape.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Outcome {
    /// Participant → per-slot assignment, one entry per slot in slot order;
    /// `None` marks a slot that could not be served. A blocked earlier slot
    /// never forfeits capacity remaining in later slots.
    pub assignments: BTreeMap<ParticipantId, Vec<Option<WorkshopId>>>,
    pub summary: Summary,
}

// ----------------------------- Modules (public surface) -----------------------------

pub mod ledger;
pub mod metrics;

pub mod strategy {
    pub(crate) mod common;

    pub mod fair;
    pub mod greedy;
    pub mod solver;

    pub use fair::allocate_fair;
    pub use greedy::allocate_greedy;
    pub use solver::allocate_solver;
}

pub use ledger::{CapacityLedger, LedgerError};
pub use strategy::{allocate_fair, allocate_greedy, allocate_solver};

// ----------------------------- Strategy selector -----------------------------

/// Dispatch on `config.strategy` after validating the configuration.
///
/// Invalid configuration (non-positive counts, out-of-range percentages) is
/// the only failure; empty participant or workshop sets yield a trivially
/// empty/unfilled outcome.
pub fn allocate(
    cfg: &MatchConfig,
    workshops: &[Workshop],
    participants: &[Participant],
    seed: u64,
) -> Result<Outcome, ConfigError> {
    cfg.validate()?;
    Ok(match cfg.strategy {
        Strategy::Greedy => allocate_greedy(cfg, workshops, participants, seed),
        Strategy::Fair => allocate_fair(cfg, workshops, participants, seed),
        Strategy::Solver => allocate_solver(cfg, workshops, participants, seed),
    })
}
