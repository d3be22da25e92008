// ── Snapshot type ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::facility::{Facility, FacilityId};

/// An immutable, timestamped view of all facilities as of one successful
/// sync cycle.
///
/// A snapshot is only ever replaced wholesale by the engine's single
/// publication point — never mutated in place. That is what makes
/// concurrent reads safe without locking the contents: readers hold an
/// `Arc<Snapshot>` and the engine swaps in a fresh one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Facilities in feed order.
    pub facilities: Vec<Arc<Facility>>,
    /// When this snapshot's fetch completed. Published snapshots form a
    /// non-decreasing sequence by this field.
    pub fetched_at: DateTime<Utc>,
    /// Records rejected during batch decode (missing or invalid required
    /// fields). Siblings still decode; the count is surfaced, not hidden.
    pub dropped_records: usize,
}

impl Snapshot {
    /// An empty snapshot stamped with the given time.
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            facilities: Vec::new(),
            fetched_at,
            dropped_records: 0,
        }
    }

    /// Look up a facility by id.
    pub fn facility(&self, id: FacilityId) -> Option<&Arc<Facility>> {
        self.facilities.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}
