//! Reentrancy guard for monitor-originated writes
//!
//! Writing a replayed value into a store triggers the store's own change
//! notification synchronously, in-line, before the write call returns.
//! Without a guard that notification would be forwarded straight back to
//! the monitor that caused it. `ReplayGuard` is the per-tracked-unit
//! state machine that suppresses the echo: forwarding callbacks check it
//! before sending, and the replay path holds it for exactly the duration
//! of the store write.

use parking_lot::Mutex;

/// What the tracked unit is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Local writes flow outward to the monitor
    Idle,
    /// A monitor-originated value is being written into the store(s);
    /// change notifications must not be forwarded back
    ApplyingRemoteUpdate,
}

/// Per-tracked-unit guard. Units never share one, so unrelated bridges
/// cannot suppress each other.
#[derive(Debug)]
pub(crate) struct ReplayGuard {
    phase: Mutex<Phase>,
}

impl ReplayGuard {
    pub(crate) fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::Idle),
        }
    }

    /// True while a remote value is being applied.
    pub(crate) fn is_applying(&self) -> bool {
        *self.phase.lock() == Phase::ApplyingRemoteUpdate
    }

    /// Enter the applying phase. The returned scope transitions back to
    /// idle when dropped, on every exit path.
    pub(crate) fn enter(&self) -> ReplayScope<'_> {
        *self.phase.lock() = Phase::ApplyingRemoteUpdate;
        ReplayScope { guard: self }
    }
}

/// RAII scope holding a [`ReplayGuard`] in the applying phase.
pub(crate) struct ReplayScope<'a> {
    guard: &'a ReplayGuard,
}

impl Drop for ReplayScope<'_> {
    fn drop(&mut self) {
        *self.guard.phase.lock() = Phase::Idle;
    }
}
