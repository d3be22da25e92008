// Wire record shapes for the occupancy feed.
//
// Deliberately permissive: almost every field is optional and unknown
// fields are ignored, so that a single malformed record (or a newer feed
// version) never fails a whole response at the serde layer. Record-level
// validation lives in parkwatch-core's convert module, where it can name
// the offending field precisely.

use serde::Deserialize;

/// One parking facility as reported by the feed.
///
/// `total_spots` / `available_spots` are signed on the wire — the upstream
/// pipeline has been observed emitting `-1` for "unknown" — so the decoder,
/// not serde, decides whether a count is acceptable.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub total_spots: Option<i64>,
    #[serde(default)]
    pub available_spots: Option<i64>,
    #[serde(default)]
    pub price_per_hour: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    /// Free-form category string (e.g. `"garage"`, `"street"`, `"lot"`).
    /// Unrecognized values map to a default category downstream.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub spots: Vec<SpotRecord>,
}

/// One physical spot with detected occupancy.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotRecord {
    #[serde(default)]
    pub id: Option<u64>,
    /// Display label; not unique across facilities.
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub occupied: Option<bool>,
    /// Detector certainty. Nominally [0.0, 1.0] but not trusted raw.
    #[serde(default)]
    pub confidence: Option<f64>,
    /// RFC 3339 timestamp of the detection; left as text so the decoder
    /// can substitute decode time for unparsable values.
    #[serde(default)]
    pub observed_at: Option<String>,
}
