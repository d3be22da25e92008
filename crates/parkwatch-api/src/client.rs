// Async HTTP client for the occupancy feed.
//
// Base path: /v1/
// Auth: optional X-API-KEY header (injected by TransportConfig)

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::FacilityRecord;

/// Async client for the parkwatch occupancy feed.
///
/// Read-only: the feed exposes a facility list endpoint and a per-id detail
/// endpoint, both returning JSON matching [`FacilityRecord`].
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FeedClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the given feed base URL.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Normalize the base URL so relative joins of `v1/…` always work:
    /// the stored URL ends with a single trailing slash.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch the full facility list (summary records with live counts).
    pub async fn list_facilities(&self) -> Result<Vec<FacilityRecord>, Error> {
        self.get("v1/facilities").await
    }

    /// Fetch one facility by id, with full per-spot detail.
    pub async fn get_facility(&self, id: u64) -> Result<FacilityRecord, Error> {
        self.get(&format!("v1/facilities/{id}")).await
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v1/facilities"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_owned()
                } else {
                    message
                },
            })
        }
    }
}
