//! Data synchronization and derived-state layer between `parkwatch-api`
//! and UI consumers.
//!
//! This crate owns the domain model, the sync lifecycle, and the read-side
//! query surface for the parkwatch workspace:
//!
//! - **[`SyncEngine`]** — Owns the authoritative current [`Snapshot`].
//!   [`refresh_now()`](SyncEngine::refresh_now) runs one fetch-decode-publish
//!   cycle with at-most-one in-flight fetch;
//!   [`start_periodic()`](SyncEngine::start_periodic) drives the same cycle
//!   on a fixed cadence. Failed cycles publish an error while the last good
//!   snapshot stays visible.
//!
//! - **[`SyncObserver`]** — Subscription handle vended by the engine.
//!   Exposes `current()` / `latest()` / `changed()` so consumers react to
//!   every `Idle → Fetching → Succeeded | Failed` transition without
//!   polling.
//!
//! - **Domain model** ([`model`]) — Immutable [`Facility`] / [`Spot`] values
//!   with derived availability metrics ([`AvailabilityTier`]) computed on
//!   read, never stored.
//!
//! - **Query layer** ([`query`]) — Pure search/filter functions over a
//!   snapshot; deterministic and independent of fetch timing.
//!
//! - **Fault taxonomy** ([`error`]) — [`DecodeError`] at the record level,
//!   [`SyncError`] at the engine level. Consumers never see raw transport
//!   errors.

pub mod convert;
pub mod engine;
pub mod error;
pub mod model;
pub mod observe;
pub mod query;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use engine::{EngineConfig, SyncEngine, SyncPhase, SyncState};
pub use error::{DecodeError, SyncError};
pub use observe::SyncObserver;
pub use query::{filter_by_category, query, search};
pub use source::ParkingSource;

// Re-export model types at the crate root for ergonomics.
pub use model::{AvailabilityTier, Facility, FacilityCategory, FacilityId, GeoPoint, Snapshot, Spot};
