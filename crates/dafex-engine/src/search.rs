//! Debounced municipality suggestion search.
//!
//! One instance per form. Keystrokes arrive through [`MunicipioSearch::on_input`];
//! a lookup is only issued after the configured quiet period with no newer
//! keystroke, and only the most recently scheduled lookup may publish its
//! result: responses belonging to a superseded keystroke are discarded on
//! arrival rather than applied. In-flight requests are not aborted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dafex_client::{Municipio, ServiceClient};
use tokio::task::JoinHandle;

use crate::selection::Selection;

/// Minimum trimmed query length that triggers a lookup.
const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Default)]
struct SearchState {
    input: String,
    suggestions: Vec<Municipio>,
    open: bool,
}

/// Debounced suggestion box over the municipality lookup endpoint.
///
/// The request token and pending-task handle are instance state, so several
/// instances can coexist without interference.
pub struct MunicipioSearch {
    client: Arc<ServiceClient>,
    selection: Selection,
    debounce: Duration,
    /// Monotone token; a lookup may only publish while it still holds the
    /// latest value.
    token: Arc<AtomicU64>,
    state: Arc<Mutex<SearchState>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl MunicipioSearch {
    #[must_use]
    pub fn new(client: Arc<ServiceClient>, selection: Selection, debounce: Duration) -> Self {
        Self {
            client,
            selection,
            debounce,
            token: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(SearchState::default())),
            pending: Mutex::new(None),
        }
    }

    /// Records a keystroke.
    ///
    /// Typing always invalidates the current selection. Trimmed queries
    /// shorter than two characters clear and hide the list without any
    /// network traffic; anything longer schedules a lookup after the quiet
    /// period. Only the newest keystroke's lookup survives: older scheduled
    /// lookups give up when they wake and see a newer token, and older
    /// in-flight responses are dropped at publish time.
    pub fn on_input(&self, text: &str) {
        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
        self.selection.clear();

        let query = text.trim().to_owned();
        {
            let mut state = lock(&self.state);
            state.input = text.to_owned();
            if query.chars().count() < MIN_QUERY_LEN {
                state.suggestions.clear();
                state.open = false;
                return;
            }
        }

        let client = Arc::clone(&self.client);
        let latest = Arc::clone(&self.token);
        let shared = Arc::clone(&self.state);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // A newer keystroke arrived during the quiet period; this lookup
            // never reaches the network.
            if latest.load(Ordering::SeqCst) != token {
                return;
            }

            let result = client.search_municipios(&query).await;

            let mut state = lock(&shared);
            if latest.load(Ordering::SeqCst) != token {
                tracing::debug!(query = %query, "discarding superseded lookup result");
                return;
            }
            match result {
                Ok(municipios) => {
                    state.open = !municipios.is_empty();
                    state.suggestions = municipios;
                }
                Err(err) => {
                    tracing::warn!(query = %query, error = %err, "municipality lookup failed");
                    state.suggestions.clear();
                    state.open = false;
                }
            }
        });

        *lock_pending(&self.pending) = Some(handle);
    }

    /// Applies a picked suggestion: fills the selection, rewrites the input
    /// as `"{municipio} / {uf}"` and closes the list. Returns the pick, or
    /// `None` when `index` is out of range.
    pub fn select(&self, index: usize) -> Option<Municipio> {
        // Disqualify any in-flight lookup so it cannot reopen the list.
        self.token.fetch_add(1, Ordering::SeqCst);
        let picked = {
            let mut state = lock(&self.state);
            let picked = state.suggestions.get(index)?.clone();
            state.input = format!("{} / {}", picked.municipio, picked.uf);
            state.suggestions.clear();
            state.open = false;
            picked
        };
        self.selection.set(picked.codigo, &picked.uf);
        Some(picked)
    }

    /// Outside-click dismissal: closes the list, selection untouched.
    pub fn dismiss(&self) {
        self.token.fetch_add(1, Ordering::SeqCst);
        let mut state = lock(&self.state);
        state.suggestions.clear();
        state.open = false;
    }

    /// Current suggestion rows, in service order.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Municipio> {
        lock(&self.state).suggestions.clone()
    }

    /// Current text of the search input.
    #[must_use]
    pub fn input(&self) -> String {
        lock(&self.state).input.clone()
    }

    /// Whether the suggestion list is showing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Handle to the selection this search writes into.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.clone()
    }

    /// Waits for the most recently scheduled lookup, if any, to finish,
    /// whether it published or gave up.
    pub async fn settle(&self) {
        let handle = lock_pending(&self.pending).take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_pending(
    pending: &Mutex<Option<JoinHandle<()>>>,
) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}
