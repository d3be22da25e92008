// ── Wire-to-domain conversion ──
//
// Validates raw `parkwatch_api` records into canonical `model` types.
// Field-name translation is pure renaming; the real work is enforcing
// ranges and the degradation policy:
//
//   - required identity/count fields missing or invalid -> record dropped
//   - malformed optional data -> field substituted/clamped, record flagged
//     `degraded`
//   - unrecognized category -> default category (forward compatibility,
//     not flagged)

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use parkwatch_api::{FacilityRecord, SpotRecord};

use crate::error::DecodeError;
use crate::model::{Facility, FacilityCategory, FacilityId, GeoPoint, Spot};

// ── Helpers ────────────────────────────────────────────────────────

/// Require a count field: present and non-negative.
fn require_count(raw: Option<i64>, field: &'static str) -> Result<u32, DecodeError> {
    let value = raw.ok_or(DecodeError::MissingField(field))?;
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    let reported = value as f64;
    u32::try_from(value).map_err(|_| DecodeError::OutOfRange {
        field,
        value: reported,
    })
}

/// Require a coordinate within the given inclusive range.
fn require_coordinate(
    raw: Option<f64>,
    field: &'static str,
    range: std::ops::RangeInclusive<f64>,
) -> Result<f64, DecodeError> {
    let value = raw.ok_or(DecodeError::MissingField(field))?;
    if !value.is_finite() || !range.contains(&value) {
        return Err(DecodeError::OutOfRange { field, value });
    }
    Ok(value)
}

/// Clamp an optional non-negative float, reporting whether it needed help.
fn clamp_non_negative(raw: Option<f64>) -> (f64, bool) {
    match raw {
        Some(v) if v >= 0.0 && v.is_finite() => (v, false),
        Some(_) => (0.0, true),
        None => (0.0, false),
    }
}

// ── Single-record decode ───────────────────────────────────────────

/// Decode one facility record, applying the validation and degradation
/// policy above. `decoded_at` is the substitute for unparsable spot
/// timestamps.
pub fn facility_from_record(
    record: FacilityRecord,
    decoded_at: DateTime<Utc>,
) -> Result<Facility, DecodeError> {
    let id = record.id.ok_or(DecodeError::MissingField("id"))?;
    let name = record.name.ok_or(DecodeError::MissingField("name"))?;

    let latitude = require_coordinate(record.latitude, "latitude", -90.0..=90.0)?;
    let longitude = require_coordinate(record.longitude, "longitude", -180.0..=180.0)?;

    let total_spots = require_count(record.total_spots, "total_spots")?;
    let available_spots = require_count(record.available_spots, "available_spots")?;

    let mut degraded = false;

    // An available count above the total is an upstream off-by-one, not a
    // reason to drop an otherwise-usable record. Clamp down and flag.
    let available_spots = if available_spots > total_spots {
        degraded = true;
        total_spots
    } else {
        available_spots
    };

    let (price_per_hour, price_clamped) = clamp_non_negative(record.price_per_hour);
    let (distance, distance_clamped) = clamp_non_negative(record.distance);
    degraded |= price_clamped || distance_clamped;

    let category = record
        .category
        .as_deref()
        .and_then(|raw| FacilityCategory::from_str(raw).ok())
        .unwrap_or_default();

    let mut spots = Vec::with_capacity(record.spots.len());
    for spot in record.spots {
        match spot_from_record(spot, decoded_at) {
            Some((spot, spot_degraded)) => {
                degraded |= spot_degraded;
                spots.push(spot);
            }
            // A spot without an id can't be addressed at all — drop it
            // and flag the facility.
            None => degraded = true,
        }
    }

    Ok(Facility {
        id: FacilityId(id),
        name,
        address: record.address.unwrap_or_default(),
        location: GeoPoint {
            latitude,
            longitude,
        },
        total_spots,
        available_spots,
        price_per_hour,
        rating: record.rating.unwrap_or(0.0),
        distance,
        category,
        spots,
        degraded,
    })
}

/// Decode one spot. Returns `None` when the spot has no id; otherwise the
/// spot plus whether any field was substituted or clamped.
fn spot_from_record(record: SpotRecord, decoded_at: DateTime<Utc>) -> Option<(Spot, bool)> {
    let id = record.id?;
    let mut degraded = false;

    let occupied = match record.occupied {
        Some(v) => v,
        None => {
            degraded = true;
            false
        }
    };

    let confidence = match record.confidence {
        Some(v) if (0.0..=1.0).contains(&v) => v,
        Some(v) => {
            degraded = true;
            v.clamp(0.0, 1.0)
        }
        None => {
            degraded = true;
            0.0
        }
    };

    let observed_at = match record.observed_at.as_deref() {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(_) => {
                degraded = true;
                decoded_at
            }
        },
        None => {
            degraded = true;
            decoded_at
        }
    };

    Some((
        Spot {
            id,
            number: record.number.unwrap_or_else(|| id.to_string()),
            occupied,
            confidence,
            observed_at,
        },
        degraded,
    ))
}

// ── Batch decode ───────────────────────────────────────────────────

/// Decode a batch of records. Invalid records are dropped and counted,
/// never silently fabricated; valid siblings are unaffected.
pub fn decode_batch(
    records: Vec<FacilityRecord>,
    decoded_at: DateTime<Utc>,
) -> (Vec<Arc<Facility>>, usize) {
    let mut facilities = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for record in records {
        let record_id = record.id;
        match facility_from_record(record, decoded_at) {
            Ok(facility) => facilities.push(Arc::new(facility)),
            Err(e) => {
                dropped += 1;
                warn!(record_id = ?record_id, error = %e, "dropping undecodable facility record");
            }
        }
    }

    (facilities, dropped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn record(id: u64) -> FacilityRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Market Street Garage",
            "address": "123 Main St",
            "latitude": 37.78,
            "longitude": -122.40,
            "total_spots": 10,
            "available_spots": 6,
            "price_per_hour": 3.5,
            "rating": 4.2,
            "distance": 0.8,
            "category": "garage",
            "spots": []
        }))
        .unwrap()
    }

    #[test]
    fn valid_record_decodes_cleanly() {
        let f = facility_from_record(record(1), now()).unwrap();
        assert_eq!(f.id, FacilityId(1));
        assert_eq!(f.total_spots, 10);
        assert_eq!(f.available_spots, 6);
        assert_eq!(f.category, FacilityCategory::Garage);
        assert!(!f.degraded);
    }

    #[test]
    fn missing_total_spots_is_named() {
        let mut r = record(1);
        r.total_spots = None;
        assert_eq!(
            facility_from_record(r, now()).unwrap_err(),
            DecodeError::MissingField("total_spots")
        );
    }

    #[test]
    fn negative_counts_are_rejected_not_clamped() {
        let mut r = record(1);
        r.available_spots = Some(-3);
        assert_eq!(
            facility_from_record(r, now()).unwrap_err(),
            DecodeError::OutOfRange {
                field: "available_spots",
                value: -3.0
            }
        );
    }

    #[test]
    fn over_count_is_clamped_and_flagged() {
        let mut r = record(1);
        r.available_spots = Some(14);
        let f = facility_from_record(r, now()).unwrap();
        assert_eq!(f.available_spots, 10);
        assert!(f.degraded);
    }

    #[test]
    fn coordinates_off_the_globe_are_rejected() {
        let mut r = record(1);
        r.latitude = Some(95.0);
        assert!(matches!(
            facility_from_record(r, now()).unwrap_err(),
            DecodeError::OutOfRange {
                field: "latitude",
                ..
            }
        ));
    }

    #[test]
    fn unknown_category_defaults_without_degrading() {
        let mut r = record(1);
        r.category = Some("rooftop-drone-pad".into());
        let f = facility_from_record(r, now()).unwrap();
        assert_eq!(f.category, FacilityCategory::Lot);
        assert!(!f.degraded);
    }

    #[test]
    fn confidence_is_clamped_and_flagged() {
        let mut r = record(1);
        r.spots = vec![serde_json::from_value(serde_json::json!({
            "id": 1,
            "number": "A-01",
            "occupied": true,
            "confidence": 1.7,
            "observed_at": "2026-08-26T10:15:00Z"
        }))
        .unwrap()];

        let f = facility_from_record(r, now()).unwrap();
        assert_eq!(f.spots[0].confidence, 1.0);
        assert!(f.degraded);
    }

    #[test]
    fn unparsable_timestamp_falls_back_to_decode_time() {
        let decoded_at = now();
        let mut r = record(1);
        r.spots = vec![serde_json::from_value(serde_json::json!({
            "id": 1,
            "number": "A-01",
            "occupied": false,
            "confidence": 0.9,
            "observed_at": "yesterday-ish"
        }))
        .unwrap()];

        let f = facility_from_record(r, decoded_at).unwrap();
        assert_eq!(f.spots[0].observed_at, decoded_at);
        assert!(f.degraded);
    }

    #[test]
    fn batch_drops_bad_records_and_keeps_siblings() {
        let mut bad = record(2);
        bad.total_spots = None;

        let (facilities, dropped) = decode_batch(vec![record(1), bad, record(3)], now());

        assert_eq!(dropped, 1);
        let ids: Vec<u64> = facilities.iter().map(|f| f.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
