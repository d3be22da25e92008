//! Async HTTP client for the parkwatch occupancy feed.
//!
//! The upstream service exposes a read-only JSON API over the output of a
//! camera/CNN occupancy pipeline: a list endpoint with every facility and a
//! per-id detail endpoint with full per-spot data. This crate owns transport
//! concerns only — TLS, timeouts, auth headers, URL handling, and the raw
//! wire record shapes. Validation and normalization into domain types happen
//! in `parkwatch-core`.
//!
//! - **[`FeedClient`]** — the HTTP client (`list_facilities` /
//!   `get_facility`).
//! - **[`TransportConfig`]** — shared TLS / timeout / API-key settings for
//!   building the underlying `reqwest::Client`.
//! - **Wire types** ([`types`]) — permissive serde structs mirroring the
//!   upstream snake_case JSON. Unknown fields are ignored; most fields are
//!   optional so that record-level validation can produce precise errors.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::FeedClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{FacilityRecord, SpotRecord};
