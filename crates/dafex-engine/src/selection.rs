//! Selected-municipality state shared between a search box and its workflow.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct SelectionState {
    codigo: Option<i64>,
    uf: Option<String>,
    epoch: u64,
}

/// Handle to the selection owned by one workflow instance.
///
/// Set only when the user picks a suggestion; cleared whenever the search
/// text changes. `epoch` increments on every mutation so affordances that
/// depend on a confirmed selection (the INEX download step) can detect that
/// typing invalidated it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    inner: Arc<Mutex<SelectionState>>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a confirmed pick.
    pub fn set(&self, codigo: i64, uf: &str) {
        let mut state = self.lock();
        state.codigo = Some(codigo);
        state.uf = Some(uf.to_owned());
        state.epoch += 1;
    }

    /// Invalidates the selection (any further typing does this).
    pub fn clear(&self) {
        let mut state = self.lock();
        state.codigo = None;
        state.uf = None;
        state.epoch += 1;
    }

    #[must_use]
    pub fn codigo(&self) -> Option<i64> {
        self.lock().codigo
    }

    #[must_use]
    pub fn uf(&self) -> Option<String> {
        self.lock().uf.clone()
    }

    /// Whether a municipality pick is currently confirmed.
    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.lock().codigo.is_some()
    }

    /// Mutation counter; compare snapshots to detect invalidation.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    fn lock(&self) -> MutexGuard<'_, SelectionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
