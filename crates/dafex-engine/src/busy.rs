//! Submission serialization for a workflow instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Busy flag owned by one workflow.
///
/// `try_acquire` fails while a submission is outstanding, so a second submit
/// cannot be issued with one in flight. The guard re-enables the controls on
/// every exit path (early return, error, panic) via `Drop`.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Takes the flag, or returns `None` while it is held elsewhere.
    #[must_use]
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Scoped hold on a [`BusyFlag`]; releases on drop.
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
