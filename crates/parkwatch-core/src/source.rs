// ── Feed source abstraction ──
//
// The engine depends on an abstract "fetch list / fetch by id" capability,
// not on a concrete HTTP client. Transport, TLS, auth, and base-URL
// configuration stay in parkwatch-api; tests inject scripted sources.

use async_trait::async_trait;

use parkwatch_api::{Error as ApiError, FacilityRecord, FeedClient};

/// Read-only access to the upstream occupancy feed.
#[async_trait]
pub trait ParkingSource: Send + Sync {
    /// Fetch the full facility list.
    async fn fetch_facilities(&self) -> Result<Vec<FacilityRecord>, ApiError>;

    /// Fetch one facility with full per-spot detail.
    async fn fetch_facility(&self, id: u64) -> Result<FacilityRecord, ApiError>;
}

#[async_trait]
impl ParkingSource for FeedClient {
    async fn fetch_facilities(&self) -> Result<Vec<FacilityRecord>, ApiError> {
        self.list_facilities().await
    }

    async fn fetch_facility(&self, id: u64) -> Result<FacilityRecord, ApiError> {
        self.get_facility(id).await
    }
}
