//! zt_io — local JSON input parsing, canonical JSON bytes, and SHA-256
//! hashing for the zuteilung engine. No network I/O: retrieval from a
//! remote content source is a collaborator's job, this crate only consumes
//! its already-fetched document form.

#![forbid(unsafe_code)]

pub mod canonical_json;
pub mod hasher;
pub mod loader;

use thiserror::Error;

/// Single error surface for this crate.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    Expect(String),
}

pub use loader::{load_input, parse_input, InputDoc, LoadedInput};
