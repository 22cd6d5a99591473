//! Solver strategy: iterative most-unhappy-first best-fit allocation.
//!
//! Per slot, repeated passes process the participants whose entry for that
//! slot is still empty, in ascending current-satisfaction order (ties:
//! fewest slots filled, then the seeded tie-break stream). Each tries
//! top-k wishes, then the full wish list, then a filler, all against that
//! slot's pool. A pass with no progress ends the slot (capacity exhausted
//! for all remaining candidates). Tie-breaks are redrawn between slots.
//!
//! This greedily approximates a leximin allocation without guaranteeing
//! global optimality.

use alloc::vec::Vec;

use zt_core::config::{MatchConfig, Strategy};
use zt_core::entities::{Participant, Workshop};
use zt_core::rng::HashStream;

use crate::strategy::common::Working;
use crate::Outcome;

pub fn allocate_solver(
    cfg: &MatchConfig,
    workshops: &[Workshop],
    participants: &[Participant],
    seed: u64,
) -> Outcome {
    let mut w = Working::new(cfg, workshops, participants);
    let mut stream = HashStream::from_seed_u64(seed);

    for s in 0..w.num_assign() {
        w.draw_ties(&mut stream);
        loop {
            let mut cands: Vec<usize> = (0..w.parts.len())
                .filter(|&i| w.parts[i].slots[s].is_none())
                .collect();
            if cands.is_empty() {
                break;
            }
            let satisfaction: Vec<f64> = (0..w.parts.len()).map(|i| w.satisfaction(i)).collect();
            cands.sort_by(|&a, &b| {
                satisfaction[a]
                    .total_cmp(&satisfaction[b])
                    .then_with(|| w.parts[a].filled().cmp(&w.parts[b].filled()))
                    .then_with(|| w.parts[a].tie.cmp(&w.parts[b].tie))
                    .then_with(|| w.parts[a].p.id.cmp(&w.parts[b].p.id))
            });

            let mut progressed = false;
            for i in cands {
                let full_depth = w.parts[i].p.wishes.len();
                if w.try_assign_wish_at(i, s, w.topk)
                    || w.try_assign_wish_at(i, s, full_depth)
                    || w.try_assign_filler_at(i, s)
                {
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
    }

    w.finish(seed, Strategy::Solver, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    use zt_core::tokens::{ParticipantId, WorkshopId};

    fn ws(id: &str, cap: u32) -> Workshop {
        Workshop {
            id: WorkshopId::from_str(id).unwrap(),
            title: alloc::string::String::from(id),
            capacity: cap,
        }
    }

    fn pt(id: &str, wishes: &[&str]) -> Participant {
        Participant {
            id: ParticipantId::from_str(id).unwrap(),
            wishes: wishes.iter().map(|s| WorkshopId::from_str(s).unwrap()).collect(),
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let mut cfg = MatchConfig::default();
        cfg.num_wishes = 3;
        cfg.num_assign = 2;
        let workshops = [ws("a", 1), ws("b", 2), ws("c", 3)];
        let parts = [
            pt("p1", &["a", "b", "c"]),
            pt("p2", &["a", "c", "b"]),
            pt("p3", &["b", "a", "c"]),
        ];
        let x = allocate_solver(&cfg, &workshops, &parts, 21);
        let y = allocate_solver(&cfg, &workshops, &parts, 21);
        assert_eq!(x, y);
        assert_eq!(x.summary.strategy, Strategy::Solver);
    }

    #[test]
    fn least_happy_gets_served_first() {
        // One seat in "a" per slot; after slot 0, the participant who
        // missed out is least satisfied and must win the slot-1 seat.
        let mut cfg = MatchConfig::default();
        cfg.num_wishes = 2;
        cfg.num_assign = 2;
        let workshops = [ws("a", 1), ws("b", 2)];
        let parts = [pt("p1", &["a", "b"]), pt("p2", &["a", "b"])];
        let out = allocate_solver(&cfg, &workshops, &parts, 5);
        let a = WorkshopId::from_str("a").unwrap();
        let holders = out
            .assignments
            .values()
            .filter(|v| v.iter().flatten().any(|id| *id == a))
            .count();
        // Per-slot capacity 1 twice over; both participants end up with
        // "a" in one of their slots.
        assert_eq!(holders, 2);
        assert!(out.summary.all_filled_to_slots);
    }

    #[test]
    fn empty_slot_does_not_block_later_slots() {
        // "a" is the only workshop, one seat per slot over two slots. The
        // participant who loses slot 0 keeps it empty but must still take
        // the slot-1 seat.
        let mut cfg = MatchConfig::default();
        cfg.num_wishes = 1;
        cfg.num_assign = 2;
        let workshops = [ws("a", 1)];
        let parts = [pt("p1", &["a"]), pt("p2", &["a"])];
        let out = allocate_solver(&cfg, &workshops, &parts, 17);
        assert_eq!(out.summary.assignments_total, 2);
        assert!(out.summary.unfilled_workshops.is_empty());
        for assigned in out.assignments.values() {
            assert_eq!(assigned.iter().flatten().count(), 1);
        }
    }

    #[test]
    fn stops_when_capacity_is_exhausted() {
        let mut cfg = MatchConfig::default();
        cfg.num_wishes = 1;
        cfg.num_assign = 3;
        let workshops = [ws("a", 1)];
        let parts = [pt("p1", &["a"]), pt("p2", &["a"])];
        let out = allocate_solver(&cfg, &workshops, &parts, 9);
        // Shared wish, one seat per slot, no repeat assignments: each
        // participant can hold "a" at most once.
        assert!(out.summary.assignments_total <= 2);
        assert!(out.summary.warning_capacity_deficit);
        assert!(!out.summary.all_filled_to_slots);
    }
}
