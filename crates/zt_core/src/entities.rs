//! Registry entities: workshops and participants.
//!
//! Both are read-only inputs for an allocation run. Upstream hygiene
//! (`zt_io`) guarantees wish lists are de-duplicated, reference known
//! workshops only, and are truncated to `num_wishes`.

use alloc::string::String;
use alloc::vec::Vec;

use crate::tokens::{ParticipantId, WorkshopId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A workshop with a per-slot capacity. `capacity == 0` is valid: the
/// workshop stays visible in reports but never receives assignments.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Workshop {
    pub id: WorkshopId,
    pub title: String,
    pub capacity: u32,
}

/// A participant with an ordered wish list (priority 1..N, most-wanted
/// first). An empty wish list is valid; such participants are eligible
/// for filler assignment only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wishes: Vec<WorkshopId>,
}

impl Participant {
    pub fn has_wishes(&self) -> bool {
        !self.wishes.is_empty()
    }
}
