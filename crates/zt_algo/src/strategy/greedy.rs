//! Greedy strategy: single deterministic pass, slot by slot.
//!
//! Contract:
//! - Base participant order: ascending (tie_break, id), tie-breaks drawn
//!   once from the seeded hash stream.
//! - For each slot, the order is rotated (cyclic shift) by the slot index
//!   so the same participants are not always served first.
//! - Each participant takes their first unused wish with remaining
//!   capacity in that slot, else a filler there; no backtracking. A slot
//!   with nothing available stays empty and later slots are still tried.
//!
//! O(slots × participants × wishlist-depth).

use alloc::vec::Vec;

use zt_core::config::{MatchConfig, Strategy};
use zt_core::entities::{Participant, Workshop};
use zt_core::rng::HashStream;

use crate::strategy::common::Working;
use crate::Outcome;

pub fn allocate_greedy(
    cfg: &MatchConfig,
    workshops: &[Workshop],
    participants: &[Participant],
    seed: u64,
) -> Outcome {
    let mut w = Working::new(cfg, workshops, participants);
    let mut stream = HashStream::from_seed_u64(seed);
    w.draw_ties(&mut stream);

    let mut base: Vec<usize> = (0..w.parts.len()).collect();
    base.sort_by(|&a, &b| {
        w.parts[a]
            .tie
            .cmp(&w.parts[b].tie)
            .then_with(|| w.parts[a].p.id.cmp(&w.parts[b].p.id))
    });

    let n = base.len();
    if n > 0 {
        for s in 0..w.num_assign() {
            let rot = s % n;
            for k in 0..n {
                let i = base[(k + rot) % n];
                if w.parts[i].slots[s].is_some() {
                    continue;
                }
                let full_depth = w.parts[i].p.wishes.len();
                if !w.try_assign_wish_at(i, s, full_depth) {
                    w.try_assign_filler_at(i, s);
                }
            }
        }
    }

    w.finish(seed, Strategy::Greedy, None)
}
