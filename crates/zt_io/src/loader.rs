//! Loader: read a local JSON input document (config + workshops +
//! participants with wish lists), apply upstream hygiene, and return a
//! typed `LoadedInput` for the pipeline. No network I/O.
//!
//! Hygiene applied here so the engine can rely on clean inputs:
//! - duplicate wishes collapsed (first occurrence wins)
//! - wishes referencing unknown workshops dropped
//! - wish lists truncated to `num_wishes`
//! - duplicate workshop/participant ids rejected
//!
//! Zero-capacity workshops are kept: they stay visible in reports but the
//! ledger never assigns to them.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use zt_core::config::MatchConfig;
use zt_core::entities::{Participant, Workshop};
use zt_core::tokens::{ParticipantId, WorkshopId};

use crate::{hasher, IoError};

// ----------------------------- Wire-facing types -----------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkshop {
    pub id: WorkshopId,
    #[serde(default)]
    pub title: Option<String>,
    pub capacity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParticipant {
    pub id: ParticipantId,
    #[serde(default)]
    pub wishes: Vec<WorkshopId>,
}

/// The input document as fetched from the external data source.
#[derive(Debug, Clone, Deserialize)]
pub struct InputDoc {
    #[serde(default)]
    pub config: MatchConfig,
    pub workshops: Vec<RawWorkshop>,
    pub participants: Vec<RawParticipant>,
}

/// Loaded, validated, hygienic input for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub config: MatchConfig,
    pub workshops: Vec<Workshop>,
    pub participants: Vec<Participant>,
    /// SHA-256 (canonical bytes) of the raw document, for the run record.
    pub input_sha256: String,
    /// Wish references dropped because they named no known workshop.
    pub dropped_wish_refs: u32,
}

// ----------------------------- Orchestration -----------------------------

/// Load and normalize an input document from a file path.
pub fn load_input(path: &Path) -> Result<LoadedInput, IoError> {
    let bytes = fs::read(path)?;
    parse_input(&bytes)
}

/// Parse and normalize an input document from raw bytes.
pub fn parse_input(bytes: &[u8]) -> Result<LoadedInput, IoError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let input_sha256 = hasher::sha256_canonical_value(&value);
    let doc: InputDoc = serde_json::from_value(value)?;
    normalize(doc, input_sha256)
}

fn normalize(doc: InputDoc, input_sha256: String) -> Result<LoadedInput, IoError> {
    doc.config
        .validate()
        .map_err(|e| IoError::Expect(e.to_string()))?;

    let mut seen_ws = BTreeSet::new();
    let mut workshops = Vec::with_capacity(doc.workshops.len());
    for raw in doc.workshops {
        if !seen_ws.insert(raw.id.clone()) {
            return Err(IoError::Expect(format!("duplicate workshop id: {}", raw.id)));
        }
        let title = raw.title.filter(|t| !t.is_empty()).unwrap_or_else(|| {
            let s = raw.id.as_str();
            format!("Workshop {}", &s[..s.len().min(8)])
        });
        workshops.push(Workshop { id: raw.id, title, capacity: raw.capacity });
    }

    let known: BTreeSet<&WorkshopId> = workshops.iter().map(|w| &w.id).collect();
    let mut seen_pt = BTreeSet::new();
    let mut dropped: u32 = 0;
    let mut participants = Vec::with_capacity(doc.participants.len());
    for raw in doc.participants {
        if !seen_pt.insert(raw.id.clone()) {
            return Err(IoError::Expect(format!("duplicate participant id: {}", raw.id)));
        }
        let mut seen_wish = BTreeSet::new();
        let mut wishes = Vec::new();
        for wish in raw.wishes {
            if wishes.len() >= doc.config.num_wishes as usize {
                break;
            }
            if !known.contains(&wish) {
                dropped += 1;
                continue;
            }
            if seen_wish.insert(wish.clone()) {
                wishes.push(wish);
            }
        }
        participants.push(Participant { id: raw.id, wishes });
    }

    Ok(LoadedInput {
        config: doc.config,
        workshops,
        participants,
        input_sha256,
        dropped_wish_refs: dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_bytes(v: &serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(v).unwrap()
    }

    #[test]
    fn parses_and_cleans_wishes() {
        let v = json!({
            "config": {"num_wishes": 2, "num_assign": 1, "strategy": "greedy"},
            "workshops": [
                {"id": "w1", "title": "Crafts", "capacity": 3},
                {"id": "w2", "capacity": 0}
            ],
            "participants": [
                {"id": "p1", "wishes": ["w1", "w1", "ghost", "w2"]},
                {"id": "p2"}
            ]
        });
        let loaded = parse_input(&doc_bytes(&v)).unwrap();
        assert_eq!(loaded.config.num_wishes, 2);
        assert_eq!(loaded.workshops.len(), 2);
        // default title derived from the id
        assert_eq!(loaded.workshops[1].title, "Workshop w2");
        // dup collapsed, ghost dropped, truncated to num_wishes
        assert_eq!(
            loaded.participants[0].wishes,
            vec!["w1".parse::<WorkshopId>().unwrap(), "w2".parse().unwrap()]
        );
        assert_eq!(loaded.participants[1].wishes.len(), 0);
        assert_eq!(loaded.dropped_wish_refs, 1);
        assert_eq!(loaded.input_sha256.len(), 64);
    }

    #[test]
    fn rejects_invalid_config() {
        let v = json!({
            "config": {"num_wishes": 0, "num_assign": 1},
            "workshops": [],
            "participants": []
        });
        assert!(matches!(parse_input(&doc_bytes(&v)), Err(IoError::Expect(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let v = json!({
            "config": {"num_wishes": 1, "num_assign": 1},
            "workshops": [
                {"id": "w1", "capacity": 1},
                {"id": "w1", "capacity": 2}
            ],
            "participants": []
        });
        assert!(parse_input(&doc_bytes(&v)).is_err());
    }

    #[test]
    fn unknown_strategy_token_falls_back_to_greedy() {
        let v = json!({
            "config": {"num_wishes": 1, "num_assign": 1, "strategy": "mystery"},
            "workshops": [],
            "participants": []
        });
        let loaded = parse_input(&doc_bytes(&v)).unwrap();
        assert_eq!(loaded.config.strategy, zt_core::Strategy::Greedy);
    }

    #[test]
    fn same_document_same_digest() {
        let v = json!({
            "config": {"num_wishes": 1, "num_assign": 1},
            "workshops": [{"id": "w1", "capacity": 1}],
            "participants": [{"id": "p1", "wishes": ["w1"]}]
        });
        let a = parse_input(&doc_bytes(&v)).unwrap();
        let b = parse_input(&doc_bytes(&v)).unwrap();
        assert_eq!(a.input_sha256, b.input_sha256);
    }
}
