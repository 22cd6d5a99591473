//! Result document assembly.
//!
//! The result ID is content-derived: `RES:<hex64>` over the canonical JSON
//! bytes of the outcome payload. Two runs that produce the same assignments
//! and summary therefore share an ID regardless of when or where they ran.

use serde::{Deserialize, Serialize};
use zt_algo::Outcome;

use crate::PipelineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDoc {
    /// `RES:<hex64>` over the canonical outcome payload.
    pub id: String,
    pub outcome: Outcome,
}

pub fn build_result(outcome: Outcome) -> Result<ResultDoc, PipelineError> {
    let id = zt_io::hasher::res_id_from_canonical(&outcome)
        .map_err(|e| PipelineError::Build(e.to_string()))?;
    Ok(ResultDoc { id, outcome })
}
