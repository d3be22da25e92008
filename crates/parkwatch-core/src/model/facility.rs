// ── Facility domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable facility identifier, unique within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(pub u64);

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for FacilityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Geographic position. Always within valid coordinate ranges — the
/// decoder rejects records outside [-90, 90] / [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Canonical facility category -- closed enumeration. Unrecognized
/// upstream strings fall back to [`FacilityCategory::Lot`], the default,
/// rather than failing the record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FacilityCategory {
    /// Structured multi-level garage.
    Garage,
    /// On-street parking segment.
    Street,
    /// Open surface lot.
    #[default]
    Lot,
}

/// Coarse availability category derived from the availability ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityTier {
    /// Ratio above 0.5.
    Plentiful,
    /// Ratio above 0.2, up to and including 0.5.
    Limited,
    /// Ratio at or below 0.2.
    Scarce,
}

impl AvailabilityTier {
    /// Classify a ratio in [0.0, 1.0].
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 0.5 {
            Self::Plentiful
        } else if ratio > 0.2 {
            Self::Limited
        } else {
            Self::Scarce
        }
    }
}

/// One physical parking space with detected occupancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    /// Unique within the owning facility.
    pub id: u64,
    /// Display label; not unique across facilities.
    pub number: String,
    pub occupied: bool,
    /// Detector certainty, clamped into [0.0, 1.0] at decode time.
    pub confidence: f64,
    /// Time of the detection. Falls back to decode time when the upstream
    /// timestamp is unparsable (the record is flagged degraded).
    pub observed_at: DateTime<Utc>,
}

/// The canonical facility type. Immutable once constructed for a given
/// snapshot; derived metrics are computed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
    pub total_spots: u32,
    /// Invariant: `available_spots <= total_spots`.
    pub available_spots: u32,
    pub price_per_hour: f64,
    pub rating: f64,
    pub distance: f64,
    pub category: FacilityCategory,
    /// Per-spot detail, in feed order. Empty on the list endpoint for
    /// feeds that defer spot data to the detail endpoint.
    pub spots: Vec<Spot>,
    /// True when any field was substituted or clamped during decode
    /// (timestamp fallback, confidence clamp, over-count clamp).
    pub degraded: bool,
}

impl Facility {
    /// Fraction of spots currently available. `0.0` when the facility
    /// reports no spots at all — never divides by zero.
    pub fn availability_ratio(&self) -> f64 {
        if self.total_spots == 0 {
            return 0.0;
        }
        f64::from(self.available_spots) / f64::from(self.total_spots)
    }

    /// Availability tier from the ratio thresholds.
    pub fn availability_tier(&self) -> AvailabilityTier {
        AvailabilityTier::from_ratio(self.availability_ratio())
    }

    /// Case-insensitive substring match against name and address.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.name.to_lowercase().contains(needle_lower)
            || self.address.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn facility(total: u32, available: u32) -> Facility {
        Facility {
            id: FacilityId(1),
            name: "Market Street Garage".into(),
            address: "123 Main St".into(),
            location: GeoPoint {
                latitude: 37.78,
                longitude: -122.40,
            },
            total_spots: total,
            available_spots: available,
            price_per_hour: 3.5,
            rating: 4.2,
            distance: 0.8,
            category: FacilityCategory::Garage,
            spots: Vec::new(),
            degraded: false,
        }
    }

    #[test]
    fn ratio_is_zero_for_empty_facility() {
        let f = facility(0, 0);
        assert_eq!(f.availability_ratio(), 0.0);
        assert!(!f.availability_ratio().is_nan());
        assert_eq!(f.availability_tier(), AvailabilityTier::Scarce);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(
            AvailabilityTier::from_ratio(0.51),
            AvailabilityTier::Plentiful
        );
        assert_eq!(AvailabilityTier::from_ratio(0.5), AvailabilityTier::Limited);
        assert_eq!(
            AvailabilityTier::from_ratio(0.21),
            AvailabilityTier::Limited
        );
        assert_eq!(AvailabilityTier::from_ratio(0.2), AvailabilityTier::Scarce);
        assert_eq!(AvailabilityTier::from_ratio(0.0), AvailabilityTier::Scarce);
    }

    #[test]
    fn tier_from_counts() {
        assert_eq!(
            facility(10, 6).availability_tier(),
            AvailabilityTier::Plentiful
        );
        assert_eq!(
            facility(10, 2).availability_tier(),
            AvailabilityTier::Scarce
        );
    }

    #[test]
    fn text_match_is_case_insensitive() {
        let f = facility(10, 5);
        assert!(f.matches_text("market"));
        assert!(f.matches_text("main st"));
        assert!(!f.matches_text("airport"));
        assert!(f.matches_text(""));
    }

    #[test]
    fn category_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(
            FacilityCategory::from_str("Garage").unwrap(),
            FacilityCategory::Garage
        );
        assert_eq!(
            FacilityCategory::from_str("STREET").unwrap(),
            FacilityCategory::Street
        );
        assert!(FacilityCategory::from_str("heliport").is_err());
    }
}
