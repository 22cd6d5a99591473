// crates/zt_core/src/seed.rs
//
// Stable seed derivation.
//
// When no explicit seed is supplied, the seed is a SHA-256 hash over every
// semantically relevant input in a fixed canonical order (workshops and
// participants sorted by id), truncated to the first 8 digest bytes read
// big-endian. The same logical input therefore always yields the same seed,
// independent of map/iteration order in the caller.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use sha2::{Digest, Sha256};

use crate::config::MatchConfig;
use crate::entities::{Participant, Workshop};

/// How the run seed is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSpec {
    /// Derive from the inputs (default).
    Auto,
    /// Use this value verbatim.
    Fixed(u64),
    /// Numeric strings parse as `u64`; anything else is hashed.
    Phrase(String),
}

impl Default for SeedSpec {
    fn default() -> Self {
        SeedSpec::Auto
    }
}

fn digest_prefix_u64(digest: &[u8]) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(b)
}

/// Resolve a `SeedSpec` against the run inputs.
pub fn derive_seed(
    spec: &SeedSpec,
    cfg: &MatchConfig,
    workshops: &[Workshop],
    participants: &[Participant],
) -> u64 {
    match spec {
        SeedSpec::Fixed(v) => *v,
        SeedSpec::Phrase(s) => match s.trim().parse::<u64>() {
            Ok(v) => v,
            Err(_) => digest_prefix_u64(&Sha256::digest(s.as_bytes())),
        },
        SeedSpec::Auto => input_seed(cfg, workshops, participants),
    }
}

/// Canonical input hash: depth/slot counts, then each workshop's
/// id/capacity/title sorted by id, then each participant's id and wish
/// list sorted by participant id. Byte-compatible with the legacy service.
pub fn input_seed(cfg: &MatchConfig, workshops: &[Workshop], participants: &[Participant]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(cfg.num_wishes.to_string().as_bytes());
    hasher.update(cfg.num_assign.to_string().as_bytes());

    let mut ws: Vec<&Workshop> = workshops.iter().collect();
    ws.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    for w in ws {
        hasher.update(w.id.as_str().as_bytes());
        hasher.update(w.capacity.to_string().as_bytes());
        hasher.update(w.title.as_bytes());
    }

    let mut ps: Vec<&Participant> = participants.iter().collect();
    ps.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    for p in ps {
        hasher.update(p.id.as_str().as_bytes());
        for wish in &p.wishes {
            hasher.update(wish.as_str().as_bytes());
        }
    }

    digest_prefix_u64(&hasher.finalize())
}

/// Candidate seed for multi-seed objective selection. Candidate 0 is the
/// base seed itself; candidate i is derived from the label `"{base}#{i}"`.
pub fn candidate_seed(base: u64, index: u32) -> u64 {
    if index == 0 {
        return base;
    }
    let label = alloc::format!("{base}#{index}");
    digest_prefix_u64(&Sha256::digest(label.as_bytes()))
}
