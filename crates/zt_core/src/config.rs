//! config.rs — Strongly-typed allocation configuration with safe defaults.
//!
//! Replaces the legacy service's ad-hoc, dict-shaped configuration: every
//! tunable is a named, validated field, and `validate()` rejects invalid
//! values before any strategy runs. Wire tokens are explicit.

use alloc::collections::BTreeMap;
use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

/// Allocation strategy selector.
///
/// Unknown wire tokens fall back to `Greedy` (see `parse_lenient`): the
/// dispatch contract is total, so a misspelled strategy degrades to the
/// single-pass baseline instead of aborting a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Strategy {
    #[cfg_attr(feature = "serde", serde(rename = "greedy"))]
    Greedy,
    #[cfg_attr(feature = "serde", serde(rename = "fair"))]
    Fair,
    #[cfg_attr(feature = "serde", serde(rename = "solver"))]
    Solver,
}

impl Strategy {
    /// Lenient parse: unrecognized tokens map to `Greedy`.
    pub fn parse_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Strategy::Greedy)
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::Fair => "fair",
            Strategy::Solver => "solver",
        }
    }
}

impl FromStr for Strategy {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Strategy::Greedy),
            "fair" => Ok(Strategy::Fair),
            "solver" => Ok(Strategy::Solver),
            _ => Err(CoreError::UnknownStrategy),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = alloc::string::String::deserialize(d)?;
        Ok(Strategy::parse_lenient(&s))
    }
}

/// Objective used by the Fair strategy to pick the best candidate seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Objective {
    #[cfg_attr(feature = "serde", serde(rename = "fair_maxmin"))]
    FairMaxmin,
    #[cfg_attr(feature = "serde", serde(rename = "happy_mean"))]
    HappyMean,
    #[cfg_attr(feature = "serde", serde(rename = "leximin"))]
    Leximin,
}

impl Objective {
    pub fn as_token(self) -> &'static str {
        match self {
            Objective::FairMaxmin => "fair_maxmin",
            Objective::HappyMean => "happy_mean",
            Objective::Leximin => "leximin",
        }
    }
}

impl FromStr for Objective {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fair_maxmin" => Ok(Objective::FairMaxmin),
            "happy_mean" => Ok(Objective::HappyMean),
            "leximin" => Ok(Objective::Leximin),
            _ => Err(CoreError::UnknownObjective),
        }
    }
}

/// Capacity pool semantics for the ledger.
///
/// `PerSlot` replicates a workshop's full capacity independently into each
/// of the `num_assign` slots (total = capacity × num_assign). `SharedPool`
/// keeps one pool drawn down across all slots (legacy service behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CapacityMode {
    #[cfg_attr(feature = "serde", serde(rename = "per_slot"))]
    PerSlot,
    #[cfg_attr(feature = "serde", serde(rename = "shared_pool"))]
    SharedPool,
}

impl FromStr for CapacityMode {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_slot" => Ok(CapacityMode::PerSlot),
            "shared_pool" => Ok(CapacityMode::SharedPool),
            _ => Err(CoreError::UnknownCapacityMode),
        }
    }
}

/// Validation failures; all fatal before allocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    NonPositive(&'static str),
    PctOutOfRange(u8),
    ZeroSeeds,
    BadAlpha,
    BadWeight(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive(k) => write!(f, "{k} must be positive"),
            ConfigError::PctOutOfRange(v) => write!(f, "round_cap_pct out of range: {v}"),
            ConfigError::ZeroSeeds => write!(f, "seeds must be >= 1"),
            ConfigError::BadAlpha => write!(f, "alpha_fairness must be finite and >= 0"),
            ConfigError::BadWeight(r) => write!(f, "weight for rank {r} must be finite and >= 0"),
        }
    }
}

/// Allocation configuration. All strategies are deterministic given the
/// same config, inputs and seed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchConfig {
    /// Maximum preference-list depth considered (priority 1..N).
    pub num_wishes: u32,
    /// Number of slots to fill per participant.
    pub num_assign: u32,
    pub strategy: Strategy,
    pub objective: Objective,
    /// Rank → satisfaction weight. Missing ranks default to 0.5^(rank-1).
    pub weights: BTreeMap<u32, f64>,
    /// Phase-1 cap (percent of per-slot capacity) on popular workshops.
    pub round_cap_pct: u8,
    /// Penalty weight prioritizing underserved participants (Fair phase 2).
    pub alpha_fairness: f64,
    /// Candidate seeds evaluated by the Fair strategy.
    pub seeds: u32,
    /// Fairness window: `num_assign` when set, else min(num_assign, num_wishes).
    pub topk_equals_slots: bool,
    pub capacity_mode: CapacityMode,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_wishes: 5,
            num_assign: 3,
            strategy: Strategy::Fair,
            objective: Objective::FairMaxmin,
            weights: BTreeMap::new(),
            round_cap_pct: 60,
            alpha_fairness: 0.5,
            seeds: 5,
            topk_equals_slots: false,
            capacity_mode: CapacityMode::PerSlot,
        }
    }
}

impl MatchConfig {
    /// Reject invalid values before any strategy runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_wishes == 0 {
            return Err(ConfigError::NonPositive("num_wishes"));
        }
        if self.num_assign == 0 {
            return Err(ConfigError::NonPositive("num_assign"));
        }
        if self.round_cap_pct > 100 {
            return Err(ConfigError::PctOutOfRange(self.round_cap_pct));
        }
        if self.seeds == 0 {
            return Err(ConfigError::ZeroSeeds);
        }
        if !self.alpha_fairness.is_finite() || self.alpha_fairness < 0.0 {
            return Err(ConfigError::BadAlpha);
        }
        for (&rank, &w) in &self.weights {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::BadWeight(rank));
            }
        }
        Ok(())
    }

    /// Satisfaction weight for a 1-based rank. Configured weights win;
    /// unconfigured ranks halve geometrically (1, 0.5, 0.25, ...).
    pub fn weight(&self, rank: u32) -> f64 {
        if rank == 0 {
            return 0.0;
        }
        if let Some(&w) = self.weights.get(&rank) {
            return w;
        }
        let mut w = 1.0;
        let mut r = 1;
        while r < rank {
            w *= 0.5;
            r += 1;
        }
        w
    }

    /// Preference depth treated as "preferred" for fairness scoring.
    pub fn topk(&self) -> u32 {
        if self.topk_equals_slots {
            self.num_assign
        } else {
            self.num_assign.min(self.num_wishes)
        }
    }
}
