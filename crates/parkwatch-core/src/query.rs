// ── Query layer ──
//
// Pure functions over a snapshot. No I/O, no suspension, no dependence on
// fetch timing: same inputs, same output, in the snapshot's original
// facility order. Presentation filters on read; the engine never filters.

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{FacilityCategory, Snapshot};

/// Case-insensitive substring search against facility name and address.
/// Empty text matches everything.
pub fn search(snapshot: &Snapshot, text: &str) -> Snapshot {
    filter(snapshot, text, &HashSet::new())
}

/// Keep facilities whose category is in `categories`. An empty set means
/// no filter is applied.
pub fn filter_by_category(snapshot: &Snapshot, categories: &HashSet<FacilityCategory>) -> Snapshot {
    filter(snapshot, "", categories)
}

/// Logical AND of [`search`] and [`filter_by_category`], preserving
/// relative order and the snapshot's `fetched_at`. Idempotent.
pub fn query(snapshot: &Snapshot, text: &str, categories: &HashSet<FacilityCategory>) -> Snapshot {
    filter(snapshot, text, categories)
}

fn filter(snapshot: &Snapshot, text: &str, categories: &HashSet<FacilityCategory>) -> Snapshot {
    let needle = text.to_lowercase();
    let facilities = snapshot
        .facilities
        .iter()
        .filter(|f| f.matches_text(&needle))
        .filter(|f| categories.is_empty() || categories.contains(&f.category))
        .map(Arc::clone)
        .collect();

    Snapshot {
        facilities,
        fetched_at: snapshot.fetched_at,
        dropped_records: snapshot.dropped_records,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Facility, FacilityId, GeoPoint};
    use chrono::Utc;

    fn facility(id: u64, name: &str, category: FacilityCategory) -> Arc<Facility> {
        Arc::new(Facility {
            id: FacilityId(id),
            name: name.into(),
            address: format!("{id} Example Ave"),
            location: GeoPoint {
                latitude: 37.78,
                longitude: -122.40,
            },
            total_spots: 10,
            available_spots: 6,
            price_per_hour: 2.0,
            rating: 4.0,
            distance: 1.0,
            category,
            spots: Vec::new(),
            degraded: false,
        })
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            facilities: vec![
                facility(1, "Market Street Garage", FacilityCategory::Garage),
                facility(2, "Pier Lot", FacilityCategory::Lot),
                facility(3, "Mission Street Parking", FacilityCategory::Street),
                facility(4, "Ferry Building Lot", FacilityCategory::Lot),
            ],
            fetched_at: Utc::now(),
            dropped_records: 0,
        }
    }

    fn ids(s: &Snapshot) -> Vec<u64> {
        s.facilities.iter().map(|f| f.id.0).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let s = snapshot();
        let result = query(&s, "", &HashSet::new());
        assert_eq!(ids(&result), vec![1, 2, 3, 4]);
        assert_eq!(result.fetched_at, s.fetched_at);
    }

    #[test]
    fn search_matches_name_and_address_case_insensitively() {
        let s = snapshot();
        assert_eq!(ids(&search(&s, "STREET")), vec![1, 3]);
        assert_eq!(ids(&search(&s, "example ave")), vec![1, 2, 3, 4]);
        assert!(search(&s, "airport").is_empty());
    }

    #[test]
    fn category_filter_preserves_relative_order() {
        let s = snapshot();
        let lots: HashSet<_> = [FacilityCategory::Lot].into();
        assert_eq!(ids(&filter_by_category(&s, &lots)), vec![2, 4]);
    }

    #[test]
    fn query_is_logical_and() {
        let s = snapshot();
        let lots: HashSet<_> = [FacilityCategory::Lot].into();
        assert_eq!(ids(&query(&s, "ferry", &lots)), vec![4]);
        assert!(query(&s, "market", &lots).is_empty());
    }

    #[test]
    fn query_is_idempotent() {
        let s = snapshot();
        let cats: HashSet<_> = [FacilityCategory::Lot, FacilityCategory::Garage].into();

        let once = query(&s, "lot", &cats);
        let twice = query(&once, "lot", &cats);

        assert_eq!(ids(&once), ids(&twice));
        assert_eq!(once.fetched_at, twice.fetched_at);
    }
}
