//! Quality and fairness metrics.
//!
//! Pure functions of an allocation: recomputing on a fixed allocation
//! always returns the same values. Used both for reporting and for the
//! Fair strategy's candidate-seed comparison.
//!
//! Determinism notes:
//! - Callers pass participants in ascending id order; all sums run in that
//!   fixed order.
//! - Float comparisons go through `f64::total_cmp`.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use zt_core::config::MatchConfig;
use zt_core::tokens::WorkshopId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate fairness statistics over all participants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FairnessReport {
    /// Mean satisfaction.
    pub happy_index: f64,
    pub min_satisfaction: f64,
    pub median_satisfaction: f64,
    /// Gini index over dissatisfaction (1 − satisfaction); 0 = equal.
    pub gini_dissatisfaction: f64,
    /// Jain fairness index (Σs)²/(n·Σs²) in [0,1]; 1 = perfectly equal.
    pub fairness_index: f64,
    /// Fraction whose first-choice workshop appears in their assignment.
    pub top1_coverage: f64,
    /// Fraction receiving none of their top-k choices.
    pub topk_none_share: f64,
}

impl Default for FairnessReport {
    fn default() -> Self {
        Self {
            happy_index: 0.0,
            min_satisfaction: 0.0,
            median_satisfaction: 0.0,
            gini_dissatisfaction: 0.0,
            fairness_index: 1.0,
            top1_coverage: 0.0,
            topk_none_share: 0.0,
        }
    }
}

/// Per-participant scoring input for `aggregate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticipantScore {
    pub satisfaction: f64,
    pub first_choice_met: bool,
    pub any_topk_met: bool,
}

/// Normalized satisfaction: sum of weights of top-k ranks whose workshop
/// was assigned, over the sum of weights for ranks 1..=k. Zero when k == 0
/// or the weight window sums to zero.
pub fn satisfaction(
    cfg: &MatchConfig,
    topk: u32,
    wishes: &[WorkshopId],
    held: &BTreeSet<WorkshopId>,
) -> f64 {
    if topk == 0 {
        return 0.0;
    }
    let denom: f64 = (1..=topk).map(|r| cfg.weight(r)).sum();
    if denom <= 0.0 {
        return 0.0;
    }
    let window = (topk as usize).min(wishes.len());
    let num: f64 = wishes[..window]
        .iter()
        .enumerate()
        .filter(|(_, w)| held.contains(w))
        .map(|(i, _)| cfg.weight(i as u32 + 1))
        .sum();
    num / denom
}

/// Score one participant (satisfaction + coverage flags).
pub fn score(
    cfg: &MatchConfig,
    topk: u32,
    wishes: &[WorkshopId],
    held: &BTreeSet<WorkshopId>,
) -> ParticipantScore {
    let window = (topk as usize).min(wishes.len());
    let first_choice_met = wishes.first().map(|w| held.contains(w)).unwrap_or(false);
    // An empty top-k window cannot be "missed"; wishless participants do not
    // count towards topk_none_share.
    let any_topk_met = window == 0 || wishes[..window].iter().any(|w| held.contains(w));
    ParticipantScore {
        satisfaction: satisfaction(cfg, topk, wishes, held),
        first_choice_met,
        any_topk_met,
    }
}

/// Gini index over the given values (ascending-sort formula). Zero when the
/// values sum to zero or the slice is empty.
fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let total: f64 = sorted.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let nf = n as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| (2.0 * (i as f64 + 1.0) - nf - 1.0) * x)
        .sum();
    weighted / (nf * total)
}

/// Aggregate per-participant scores into a `FairnessReport`.
pub fn aggregate(scores: &[ParticipantScore]) -> FairnessReport {
    let n = scores.len();
    if n == 0 {
        return FairnessReport::default();
    }
    let nf = n as f64;

    let mut sats: Vec<f64> = scores.iter().map(|s| s.satisfaction).collect();
    let sum: f64 = sats.iter().sum();
    let sum_sq: f64 = sats.iter().map(|s| s * s).sum();
    let min = sats
        .iter()
        .copied()
        .fold(f64::INFINITY, |acc, s| if s.total_cmp(&acc).is_lt() { s } else { acc });

    sats.sort_by(|a, b| a.total_cmp(b));
    let median = if n % 2 == 1 {
        sats[n / 2]
    } else {
        (sats[n / 2 - 1] + sats[n / 2]) / 2.0
    };

    let dissat: Vec<f64> = sats.iter().map(|s| 1.0 - s).collect();
    let fairness_index = if sum_sq <= 0.0 { 1.0 } else { (sum * sum) / (nf * sum_sq) };

    let top1 = scores.iter().filter(|s| s.first_choice_met).count() as f64;
    let none = scores.iter().filter(|s| !s.any_topk_met).count() as f64;

    FairnessReport {
        happy_index: sum / nf,
        min_satisfaction: min,
        median_satisfaction: median,
        gini_dissatisfaction: gini(&dissat),
        fairness_index,
        top1_coverage: top1 / nf,
        topk_none_share: none / nf,
    }
}
