//! Canonical domain types, normalized from the feed's wire records.

pub mod facility;
pub mod snapshot;

pub use facility::{AvailabilityTier, Facility, FacilityCategory, FacilityId, GeoPoint, Spot};
pub use snapshot::Snapshot;
