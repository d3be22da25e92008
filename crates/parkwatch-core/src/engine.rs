// ── Sync engine ──
//
// Owns the authoritative current Snapshot and the sync lifecycle:
// on-demand and interval-based refresh, at-most-one in-flight fetch,
// and serialized state publication through a single watch channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::convert::{decode_batch, facility_from_record};
use crate::error::SyncError;
use crate::model::{Facility, FacilityId, Snapshot};
use crate::observe::SyncObserver;
use crate::source::ParkingSource;

/// Default cadence for periodic refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

// ── Engine configuration ─────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed cadence for [`SyncEngine::start_periodic`]. The interval never
    /// shrinks or grows on success/failure — the next tick is the retry.
    pub refresh_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

// ── Published state ──────────────────────────────────────────────────

/// Sync lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Succeeded,
    Failed,
}

/// The state observable by consumers. Replaced atomically as a whole —
/// readers never see a half-updated snapshot or a stale error next to a
/// fresh snapshot.
#[derive(Debug, Clone)]
pub struct SyncState {
    pub phase: SyncPhase,
    /// Last good snapshot. Survives failed cycles ("fail soft").
    pub snapshot: Option<Arc<Snapshot>>,
    /// Classification of the most recent failure; cleared on success.
    pub error: Option<SyncError>,
}

impl SyncState {
    fn initial() -> Self {
        Self {
            phase: SyncPhase::Idle,
            snapshot: None,
            error: None,
        }
    }
}

// ── Engine ───────────────────────────────────────────────────────────

/// The sync engine. Cheaply cloneable via `Arc`; all clones share one
/// state machine, one timer, and one in-flight-fetch guard.
///
/// An engine is single-use: after [`stop()`](Self::stop) it never
/// publishes again. Construct a fresh engine to resume syncing.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: EngineConfig,
    source: Arc<dyn ParkingSource>,
    /// Single publication point for all state transitions.
    state: watch::Sender<SyncState>,
    /// Held for the duration of one fetch-decode-publish cycle. `try_lock`
    /// failure means a fetch is in flight — callers attach or skip, they
    /// never start a second fetch.
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
    periodic: Mutex<Option<JoinHandle<()>>>,
}

impl SyncEngine {
    /// Create an engine over the given source. Does not fetch — call
    /// [`refresh_now()`](Self::refresh_now) or
    /// [`start_periodic()`](Self::start_periodic).
    pub fn new(source: Arc<dyn ParkingSource>, config: EngineConfig) -> Self {
        let (state, _) = watch::channel(SyncState::initial());
        Self {
            inner: Arc::new(EngineInner {
                config,
                source,
                state,
                refresh_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                periodic: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The latest published state. Never suspends, never blocks on a
    /// running fetch.
    pub fn current(&self) -> SyncState {
        self.inner.state.borrow().clone()
    }

    /// The last good snapshot, if any cycle has succeeded yet.
    pub fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.state.borrow().snapshot.clone()
    }

    /// Subscribe to every state transition
    /// (`Idle → Fetching → Succeeded | Failed`).
    pub fn subscribe(&self) -> SyncObserver {
        SyncObserver::new(self.inner.state.subscribe())
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Run one fetch-decode-publish cycle now.
    ///
    /// If a cycle is already in flight this does not start a second
    /// network fetch — it attaches to the in-flight cycle and returns
    /// when that cycle completes.
    pub async fn refresh_now(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }

        let Ok(_guard) = self.inner.refresh_lock.try_lock() else {
            self.await_in_flight().await;
            return;
        };
        self.run_cycle().await;
    }

    /// Wait until the in-flight cycle leaves `Fetching`.
    async fn await_in_flight(&self) {
        let mut rx = self.inner.state.subscribe();
        while rx.borrow_and_update().phase == SyncPhase::Fetching {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    /// One fetch-decode-publish cycle. Caller must hold `refresh_lock`.
    async fn run_cycle(&self) {
        self.publish(|state| {
            state.phase = SyncPhase::Fetching;
        });

        let result = self.inner.source.fetch_facilities().await;

        // Results that land after stop() complete silently.
        if self.inner.cancel.is_cancelled() {
            debug!("discarding fetch result: engine stopped");
            return;
        }

        match result {
            Ok(records) => {
                let fetched_at = Utc::now();
                let record_count = records.len();
                let (facilities, dropped) = decode_batch(records, fetched_at);

                // Total decode failure is a failed cycle, not an empty
                // snapshot — the last good view must stay visible.
                if facilities.is_empty() && dropped > 0 {
                    self.publish(move |state| {
                        state.phase = SyncPhase::Failed;
                        state.error = Some(SyncError::DecodeFailure {
                            reason: format!("all {dropped} facility records were invalid"),
                        });
                    });
                    return;
                }

                let snapshot = Arc::new(Snapshot {
                    facilities,
                    fetched_at,
                    dropped_records: dropped,
                });

                let mut discarded = false;
                self.publish(|state| {
                    state.phase = SyncPhase::Succeeded;
                    state.error = None;
                    // Published snapshots are monotonic by fetched_at. A
                    // result that lost a race to a fresher one is dropped.
                    let stale = state
                        .snapshot
                        .as_ref()
                        .is_some_and(|cur| cur.fetched_at > snapshot.fetched_at);
                    if stale {
                        discarded = true;
                    } else {
                        state.snapshot = Some(snapshot);
                    }
                });
                if discarded {
                    debug!("discarding stale snapshot: newer one already published");
                } else {
                    info!(
                        facilities = record_count - dropped,
                        dropped, "sync cycle succeeded"
                    );
                }
            }
            Err(e) => {
                let error = SyncError::from(e);
                warn!(error = %error, "sync cycle failed; keeping last good snapshot");
                self.publish(|state| {
                    state.phase = SyncPhase::Failed;
                    state.error = Some(error);
                });
            }
        }
    }

    /// Apply a transition through the single publication point, unless the
    /// engine has been stopped.
    fn publish(&self, apply: impl FnOnce(&mut SyncState)) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        self.inner.state.send_modify(apply);
    }

    // ── Periodic sync ────────────────────────────────────────────────

    /// Start the periodic refresh timer at the configured cadence.
    ///
    /// Idempotent: a second call while the timer runs is a no-op. Ticks
    /// that fire while a fetch is in flight are skipped, never queued, so
    /// a slow fetch can't cause overlapping fetches. The first refresh
    /// happens one interval after this call — pair with
    /// [`refresh_now()`](Self::refresh_now) for an immediate initial load.
    pub async fn start_periodic(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }

        let mut guard = self.inner.periodic.lock().await;
        if guard.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("periodic sync already running");
            return;
        }

        let engine = self.clone();
        let cancel = self.inner.cancel.clone();
        let period = self.inner.config.refresh_interval;
        *guard = Some(tokio::spawn(refresh_task(engine, period, cancel)));
        info!(interval_secs = period.as_secs(), "periodic sync started");
    }

    /// Stop the engine: cancel the timer and suppress all further
    /// publication. An in-flight fetch completes silently and its result
    /// is discarded.
    pub async fn stop(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.periodic.lock().await.take() {
            let _ = handle.await;
        }
        debug!("sync engine stopped");
    }

    // ── On-demand detail ─────────────────────────────────────────────

    /// Fetch one facility with full per-spot detail.
    ///
    /// Independent of the periodic snapshot: uses the same decode and
    /// error path but never publishes. Used for drill-down views.
    pub async fn fetch_details(&self, id: FacilityId) -> Result<Facility, SyncError> {
        let record = self.inner.source.fetch_facility(id.0).await.map_err(|e| {
            if e.is_not_found() {
                SyncError::NotFound { id }
            } else {
                SyncError::from(e)
            }
        })?;
        Ok(facility_from_record(record, Utc::now())?)
    }
}

// ── Periodic refresh task ────────────────────────────────────────────

async fn refresh_task(engine: SyncEngine, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    // Skip, don't queue, overdue ticks — together with the refresh lock
    // this guarantees the periodic path has at most one fetch in flight.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let Ok(_guard) = engine.inner.refresh_lock.try_lock() else {
                    debug!("refresh tick skipped: fetch in flight");
                    continue;
                };
                engine.run_cycle().await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parkwatch_api::{Error as ApiError, FacilityRecord};

    struct StaticSource(serde_json::Value);

    #[async_trait]
    impl ParkingSource for StaticSource {
        async fn fetch_facilities(&self) -> Result<Vec<FacilityRecord>, ApiError> {
            Ok(serde_json::from_value(self.0.clone()).unwrap())
        }

        async fn fetch_facility(&self, _id: u64) -> Result<FacilityRecord, ApiError> {
            Err(ApiError::Api {
                status: 404,
                message: "not found".into(),
            })
        }
    }

    fn list_json() -> serde_json::Value {
        serde_json::json!([{
            "id": 1,
            "name": "Market Street Garage",
            "address": "123 Main St",
            "latitude": 37.78,
            "longitude": -122.40,
            "total_spots": 10,
            "available_spots": 6
        }])
    }

    #[tokio::test]
    async fn stale_result_never_overwrites_fresher_snapshot() {
        let engine = SyncEngine::new(Arc::new(StaticSource(list_json())), EngineConfig::default());

        // Simulate a fresher snapshot having won the race: pre-publish one
        // stamped in the future.
        let future = Utc::now() + chrono::Duration::hours(1);
        let fresher = Arc::new(Snapshot::empty(future));
        engine.inner.state.send_modify(|state| {
            state.snapshot = Some(Arc::clone(&fresher));
        });

        engine.refresh_now().await;

        let state = engine.current();
        assert_eq!(state.phase, SyncPhase::Succeeded);
        let current = state.snapshot.unwrap();
        assert_eq!(current.fetched_at, future);
        assert!(current.is_empty());
    }

    #[tokio::test]
    async fn detail_404_maps_to_not_found() {
        let engine = SyncEngine::new(Arc::new(StaticSource(list_json())), EngineConfig::default());

        let err = engine.fetch_details(FacilityId(42)).await.unwrap_err();
        assert_eq!(err, SyncError::NotFound { id: FacilityId(42) });
    }

    #[tokio::test]
    async fn total_decode_failure_is_a_failed_cycle() {
        // Every record is missing required fields.
        let engine = SyncEngine::new(
            Arc::new(StaticSource(serde_json::json!([{"id": 1}, {"id": 2}]))),
            EngineConfig::default(),
        );

        engine.refresh_now().await;

        let state = engine.current();
        assert_eq!(state.phase, SyncPhase::Failed);
        assert!(matches!(state.error, Some(SyncError::DecodeFailure { .. })));
        assert!(state.snapshot.is_none());
    }
}
