// ── Sync state subscriptions ──
//
// Subscription handle for consuming engine state transitions without
// polling.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::engine::SyncState;

/// A subscription to the engine's published state.
///
/// Provides both point-in-time access and reactive change notification:
/// every `Idle → Fetching → Succeeded | Failed` transition is delivered,
/// and a late subscriber sees the current state immediately via
/// [`current()`](Self::current).
pub struct SyncObserver {
    current: SyncState,
    receiver: watch::Receiver<SyncState>,
}

impl SyncObserver {
    pub(crate) fn new(receiver: watch::Receiver<SyncState>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The state captured at creation time.
    pub fn current(&self) -> &SyncState {
        &self.current
    }

    /// The latest state (may have changed since creation).
    pub fn latest(&self) -> SyncState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next transition, returning the new state.
    /// Returns `None` once the engine has been dropped.
    pub async fn changed(&mut self) -> Option<SyncState> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> SyncStateStream {
        SyncStateStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the full [`SyncState`] after each transition.
pub struct SyncStateStream {
    inner: WatchStream<SyncState>,
}

impl Stream for SyncStateStream {
    type Item = SyncState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream<SyncState> is Unpin, so projecting through Pin is fine.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
