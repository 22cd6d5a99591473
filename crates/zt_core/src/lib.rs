//! zt_core — Core types, validated configuration, and deterministic randomness.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`zt_io`, `zt_algo`, `zt_pipeline`, `zt_cli`).
//!
//! - Registry tokens: `WorkshopId`, `ParticipantId`
//! - Entities: `Workshop`, `Participant`
//! - Validated configuration: `MatchConfig` and its enums
//! - Seed derivation from inputs (`seed`)
//! - Hash-stream RNG for tie-breaking and shuffles (`rng`)
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        UnknownStrategy,
        UnknownObjective,
        UnknownCapacityMode,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::UnknownStrategy => write!(f, "unknown strategy"),
                CoreError::UnknownObjective => write!(f, "unknown objective"),
                CoreError::UnknownCapacityMode => write!(f, "unknown capacity mode"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }
}

pub mod tokens {
    //! Registry token types (`WorkshopId`, `ParticipantId`) with strict charset.

    use crate::errors::CoreError;
    use alloc::string::{String, ToString};
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    fn is_token(s: &str) -> bool {
        let len = s.len();
        if !(1..=64).contains(&len) { return false; }
        s.bytes().all(|b| matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
            b'_' | b'-' | b':' | b'.'
        ))
    }

    macro_rules! def_token {
        ($name:ident) => {
            #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
            pub struct $name(String);

            impl $name {
                pub fn as_str(&self) -> &str { &self.0 }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
            }

            impl FromStr for $name {
                type Err = CoreError;
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    if is_token(s) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidToken) }
                }
            }
        }
    }

    def_token!(WorkshopId);
    def_token!(ParticipantId);
}

pub mod entities;
pub mod config;
pub mod rng;
pub mod seed;

pub use config::{CapacityMode, ConfigError, MatchConfig, Objective, Strategy};
pub use entities::{Participant, Workshop};
pub use rng::HashStream;
pub use seed::{candidate_seed, derive_seed, SeedSpec};
pub use tokens::{ParticipantId, WorkshopId};
