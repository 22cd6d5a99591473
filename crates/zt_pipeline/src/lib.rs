//! zt_pipeline — deterministic run orchestration
//! (load → derive seed → allocate → build result → build run record).
//!
//! The pipeline delegates JSON parsing/canonicalization/hashing to `zt_io`
//! and the allocation math to `zt_algo`; this crate only sequences the
//! stages and assembles the output artifacts. Stage boundaries emit
//! `tracing` diagnostics; the algorithm layer below stays log-free.

#![forbid(unsafe_code)]

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use zt_core::{SeedSpec, Strategy};
use zt_io::loader::LoadedInput;

pub mod build_result;
pub mod build_run_record;

pub use build_result::ResultDoc;
pub use build_run_record::RunRecordDoc;

/// Engine identifiers recorded verbatim in every run record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMeta {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl Default for EngineMeta {
    fn default() -> Self {
        Self {
            name: "zuteilung".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            build: "local".into(),
        }
    }
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Validate(String),
    Allocate(String),
    Build(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PipelineError::*;
        match self {
            Io(m) => write!(f, "io error: {m}"),
            Validate(m) => write!(f, "validation error: {m}"),
            Allocate(m) => write!(f, "allocation error: {m}"),
            Build(m) => write!(f, "build error: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<zt_io::IoError> for PipelineError {
    fn from(e: zt_io::IoError) -> Self {
        match e {
            zt_io::IoError::Read(e) => PipelineError::Io(format!("read: {e}")),
            zt_io::IoError::Json(e) => PipelineError::Validate(format!("json: {e}")),
            zt_io::IoError::Expect(m) => PipelineError::Validate(m),
        }
    }
}

/// Top-level pipeline outputs: the result document and its run record.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutputs {
    pub result: ResultDoc,
    pub run_record: RunRecordDoc,
}

/// Per-run overrides applied on top of the input document's config.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub seed: SeedSpec,
    pub strategy_override: Option<Strategy>,
}

/// Full run from an input document on disk.
pub fn run_from_path(
    path: &Path,
    engine: &EngineMeta,
    opts: &RunOptions,
) -> Result<PipelineOutputs, PipelineError> {
    info!(path = %path.display(), "loading input document");
    let loaded = zt_io::load_input(path)?;
    run_loaded(loaded, engine, opts)
}

/// Full run from an already-loaded input (the CLI's dry-run path reuses this).
pub fn run_loaded(
    mut loaded: LoadedInput,
    engine: &EngineMeta,
    opts: &RunOptions,
) -> Result<PipelineOutputs, PipelineError> {
    if let Some(s) = opts.strategy_override {
        loaded.config.strategy = s;
    }
    if loaded.dropped_wish_refs > 0 {
        debug!(dropped = loaded.dropped_wish_refs, "dropped unknown wish references");
    }

    let seed = zt_core::seed::derive_seed(
        &opts.seed,
        &loaded.config,
        &loaded.workshops,
        &loaded.participants,
    );
    info!(
        seed,
        strategy = loaded.config.strategy.as_token(),
        workshops = loaded.workshops.len(),
        participants = loaded.participants.len(),
        "derived run seed"
    );

    let outcome = zt_algo::allocate(&loaded.config, &loaded.workshops, &loaded.participants, seed)
        .map_err(|e| PipelineError::Allocate(e.to_string()))?;
    info!(
        assignments = outcome.summary.assignments_total,
        all_filled = outcome.summary.all_filled_to_slots,
        deficit = outcome.summary.warning_capacity_deficit,
        "allocation complete"
    );

    let result = build_result::build_result(outcome)?;
    let run_record = build_run_record::build_run_record(engine, &loaded, seed, &result)?;
    debug!(result_id = %result.id, "artifacts built");

    Ok(PipelineOutputs { result, run_record })
}
