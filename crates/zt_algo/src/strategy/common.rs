//! Shared working state for the allocation strategies.
//!
//! Owns the capacity ledger and per-participant slot holdings for the
//! lifetime of one run. Participants are held in ascending id order; every
//! scan that matters for determinism runs over that order (or an explicit
//! permutation of it derived from the seeded hash stream).
//!
//! Slot accounting: each participant carries one `Option<WorkshopId>` per
//! slot. A slot the participant could not be served in stays `None` and
//! later slots remain reachable, so capacity left in slot s can always be
//! consumed by a participant whose slot s is still empty, regardless of
//! what happened in earlier slots.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use zt_core::config::{MatchConfig, Objective, Strategy};
use zt_core::entities::{Participant, Workshop};
use zt_core::rng::HashStream;
use zt_core::tokens::WorkshopId;

use crate::ledger::CapacityLedger;
use crate::metrics;
use crate::{Outcome, Summary, UnfilledWorkshop};

pub(crate) struct Pstate<'a> {
    pub p: &'a Participant,
    /// One entry per slot; `None` = slot left empty.
    pub slots: Vec<Option<WorkshopId>>,
    pub held: BTreeSet<WorkshopId>,
    pub tie: u32,
}

impl Pstate<'_> {
    #[inline]
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }
}

pub(crate) struct Working<'a> {
    pub cfg: &'a MatchConfig,
    pub workshops: &'a [Workshop],
    /// Ascending by participant id.
    pub parts: Vec<Pstate<'a>>,
    pub ledger: CapacityLedger,
    pub topk: usize,
    per_priority: BTreeMap<u32, u32>,
    per_slot_filled: Vec<u32>,
}

impl<'a> Working<'a> {
    pub fn new(cfg: &'a MatchConfig, workshops: &'a [Workshop], participants: &'a [Participant]) -> Self {
        let num_assign = cfg.num_assign as usize;
        let mut parts: Vec<Pstate<'a>> = participants
            .iter()
            .map(|p| Pstate {
                p,
                slots: alloc::vec![None; num_assign],
                held: BTreeSet::new(),
                tie: 0,
            })
            .collect();
        parts.sort_by(|a, b| a.p.id.cmp(&b.p.id));
        Self {
            cfg,
            workshops,
            parts,
            ledger: CapacityLedger::new(workshops, cfg.num_assign, cfg.capacity_mode),
            topk: cfg.topk() as usize,
            per_priority: BTreeMap::new(),
            per_slot_filled: alloc::vec![0; num_assign],
        }
    }

    /// Draw a fresh tie-break word per participant, in id order.
    pub fn draw_ties(&mut self, stream: &mut HashStream) {
        for part in &mut self.parts {
            part.tie = stream.next_u32();
        }
    }

    #[inline]
    pub fn num_assign(&self) -> usize {
        self.cfg.num_assign as usize
    }

    /// Record an assignment into an empty slot. `rank` is the 1-based wish
    /// priority, `None` for fillers.
    pub fn record(&mut self, i: usize, slot: usize, id: WorkshopId, rank: Option<u32>) {
        debug_assert!(self.parts[i].slots[slot].is_none());
        self.ledger
            .consume(slot, &id)
            .expect("capacity checked before record");
        self.per_slot_filled[slot] += 1;
        if let Some(r) = rank {
            *self.per_priority.entry(r).or_insert(0) += 1;
        }
        self.parts[i].held.insert(id.clone());
        self.parts[i].slots[slot] = Some(id);
    }

    /// Try the participant's unused wishes up to `depth` (capped at
    /// `num_wishes`) against slot `slot`, assigning the first with
    /// remaining capacity there. Returns true on assignment.
    pub fn try_assign_wish_at(&mut self, i: usize, slot: usize, depth: usize) -> bool {
        if slot >= self.num_assign() || self.parts[i].slots[slot].is_some() {
            return false;
        }
        let depth = depth.min(self.cfg.num_wishes as usize);
        let mut pick: Option<(WorkshopId, u32)> = None;
        for (idx, wish) in self.parts[i].p.wishes.iter().take(depth).enumerate() {
            if self.parts[i].held.contains(wish) {
                continue;
            }
            if self.ledger.remaining(slot, wish) > 0 {
                pick = Some((wish.clone(), idx as u32 + 1));
                break;
            }
        }
        match pick {
            Some((id, rank)) => {
                self.record(i, slot, id, Some(rank));
                true
            }
            None => false,
        }
    }

    /// Like `try_assign_wish_at`, but each wish (rank order) is tried
    /// against the participant's lowest empty slot with capacity for it.
    pub fn try_assign_wish_any(&mut self, i: usize, depth: usize) -> bool {
        if self.parts[i].is_full() {
            return false;
        }
        let depth = depth.min(self.cfg.num_wishes as usize);
        let mut pick: Option<(WorkshopId, usize, u32)> = None;
        'wishes: for (idx, wish) in self.parts[i].p.wishes.iter().take(depth).enumerate() {
            if self.parts[i].held.contains(wish) {
                continue;
            }
            for slot in 0..self.parts[i].slots.len() {
                if self.parts[i].slots[slot].is_none() && self.ledger.remaining(slot, wish) > 0 {
                    pick = Some((wish.clone(), slot, idx as u32 + 1));
                    break 'wishes;
                }
            }
        }
        match pick {
            Some((id, slot, rank)) => {
                self.record(i, slot, id, Some(rank));
                true
            }
            None => false,
        }
    }

    /// Filler assignment into slot `slot`: any workshop with remaining
    /// capacity there that the participant does not already hold. Picks the
    /// most remaining capacity, ties by ascending workshop id.
    pub fn try_assign_filler_at(&mut self, i: usize, slot: usize) -> bool {
        if slot >= self.num_assign() || self.parts[i].slots[slot].is_some() {
            return false;
        }
        let mut best: Option<(WorkshopId, u32)> = None;
        for (id, rem) in self.ledger.iter_remaining(slot) {
            if rem == 0 || self.parts[i].held.contains(id) {
                continue;
            }
            match &best {
                Some((_, best_rem)) if rem <= *best_rem => {}
                _ => best = Some((id.clone(), rem)),
            }
        }
        match best {
            Some((id, _)) => {
                self.record(i, slot, id, None);
                true
            }
            None => false,
        }
    }

    /// Filler into the lowest empty slot that still has any capacity.
    pub fn try_assign_filler_any(&mut self, i: usize) -> bool {
        for slot in 0..self.num_assign() {
            if self.parts[i].slots[slot].is_none() && self.try_assign_filler_at(i, slot) {
                return true;
            }
        }
        false
    }

    /// Current satisfaction for one participant.
    pub fn satisfaction(&self, i: usize) -> f64 {
        metrics::satisfaction(self.cfg, self.topk as u32, &self.parts[i].p.wishes, &self.parts[i].held)
    }

    /// Consume the working state into the shared result shape.
    pub fn finish(self, seed: u64, strategy: Strategy, objective: Option<Objective>) -> Outcome {
        let num_assign = self.cfg.num_assign;

        let mut assignments = BTreeMap::new();
        let mut scores = Vec::with_capacity(self.parts.len());
        let mut distribution: BTreeMap<u32, u32> = (0..=num_assign).map(|k| (k, 0)).collect();
        let mut assignments_total: u32 = 0;
        let mut no_wishes: u32 = 0;

        for part in &self.parts {
            let filled = part.filled() as u32;
            assignments_total += filled;
            *distribution.entry(filled).or_insert(0) += 1;
            if !part.p.has_wishes() {
                no_wishes += 1;
            }
            scores.push(metrics::score(self.cfg, self.topk as u32, &part.p.wishes, &part.held));
            assignments.insert(part.p.id.clone(), part.slots.clone());
        }

        let all_filled = self.parts.iter().all(|p| p.is_full());
        let deficit = self.parts.iter().any(|p| !p.is_full());

        let titles: BTreeMap<&WorkshopId, &str> =
            self.workshops.iter().map(|w| (&w.id, w.title.as_str())).collect();
        let unfilled: Vec<UnfilledWorkshop> = self
            .ledger
            .leftover()
            .into_iter()
            .filter(|(_, rem)| *rem > 0)
            .map(|(id, remaining)| UnfilledWorkshop {
                title: titles.get(&id).map(|t| alloc::string::String::from(*t)).unwrap_or_default(),
                id,
                remaining,
            })
            .collect();

        let summary = Summary {
            participants_total: self.parts.len() as u32,
            assignments_total,
            participants_no_wishes: no_wishes,
            per_priority_fulfilled: self.per_priority,
            per_slot_filled: self.per_slot_filled,
            assignment_distribution: distribution,
            all_filled_to_slots: all_filled,
            warning_capacity_deficit: deficit,
            unfilled_workshops: unfilled,
            seed,
            strategy,
            objective,
            metrics: metrics::aggregate(&scores),
        };

        Outcome { assignments, summary }
    }
}
