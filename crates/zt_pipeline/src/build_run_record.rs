//! Run record assembly.
//!
//! The run record ties a result back to its inputs: engine identifiers,
//! the input document digest, the seed actually used, the strategy and
//! objective echoes, and the result's own ID and digest.

use serde::{Deserialize, Serialize};
use zt_io::loader::LoadedInput;

use crate::{EngineMeta, PipelineError, ResultDoc};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecordDoc {
    pub engine: EngineMeta,
    /// SHA-256 (canonical bytes) of the raw input document.
    pub input_sha256: String,
    /// Seed the run actually used, after overrides and derivation.
    pub seed: u64,
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub result_id: String,
    pub result_sha256: String,
}

pub fn build_run_record(
    engine: &EngineMeta,
    loaded: &LoadedInput,
    seed: u64,
    result: &ResultDoc,
) -> Result<RunRecordDoc, PipelineError> {
    let result_sha256 = zt_io::hasher::sha256_canonical(result)
        .map_err(|e| PipelineError::Build(e.to_string()))?;
    Ok(RunRecordDoc {
        engine: engine.clone(),
        input_sha256: loaded.input_sha256.clone(),
        seed,
        strategy: result.outcome.summary.strategy.as_token().into(),
        objective: result
            .outcome
            .summary
            .objective
            .map(|o| o.as_token().into()),
        result_id: result.id.clone(),
        result_sha256,
    })
}
