//! Latest-input-wins bookkeeping for comparison passes.
//!
//! Each input change starts a new pass and takes a [`PassToken`]. A pass may
//! only publish its result while its token is still the newest one; results
//! from superseded passes are dropped and never become visible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::obs;

/// Lifecycle of the matrix held by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No points entered.
    Empty,
    /// A pass is in flight.
    Pending,
    /// The newest pass has committed.
    Ready,
}

/// Identifies one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassToken {
    generation: u64,
}

impl PassToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    phase: Phase,
    committed: Option<Arc<T>>,
}

/// Holds the most recent committed matrix of one comparison view.
#[derive(Debug)]
pub struct ComparisonSession<T> {
    generation: AtomicU64,
    slot: Mutex<Slot<T>>,
}

impl<T> Default for ComparisonSession<T> {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            slot: Mutex::new(Slot {
                phase: Phase::Empty,
                committed: None,
            }),
        }
    }
}

impl<T> ComparisonSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a pass, superseding any pass still in flight.
    pub fn begin(&self) -> PassToken {
        let mut slot = self.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        slot.phase = Phase::Pending;
        obs::emit_pass_started(generation);
        PassToken { generation }
    }

    /// Points were cleared: drop the matrix and supersede any pass in flight.
    pub fn clear(&self) {
        let mut slot = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        slot.phase = Phase::Empty;
        slot.committed = None;
    }

    /// Publish `result` if `token` is still current.
    ///
    /// Returns the published matrix, or `None` when the pass was superseded.
    pub fn commit(&self, token: PassToken, result: T) -> Option<Arc<T>> {
        let mut slot = self.lock();
        let current = self.generation.load(Ordering::SeqCst);
        if token.generation != current {
            obs::emit_pass_superseded(token.generation, current);
            return None;
        }
        let result = Arc::new(result);
        slot.committed = Some(Arc::clone(&result));
        slot.phase = Phase::Ready;
        obs::emit_pass_committed(token.generation);
        Some(result)
    }

    pub fn is_current(&self, token: PassToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.generation
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Last committed matrix, if any.
    pub fn current(&self) -> Option<Arc<T>> {
        self.lock().committed.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    // A panic while holding the lock cannot leave the slot half-written.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
