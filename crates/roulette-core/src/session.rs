use roulette_models::{FilterCriteria, PendingAuthRequest, PickResult};

/// Mutable state of one interactive session.
///
/// Nothing here outlives the process: a pending login attempt, the filter
/// settings carried between spins, and the latest spin's results (the pool
/// the watchlist-add flow offers).
#[derive(Debug, Default)]
pub struct SessionState {
    pub pending_auth: Option<PendingAuthRequest>,
    pub filters: FilterCriteria,
    pub last_results: Vec<PickResult>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            filters: FilterCriteria::new(),
            ..Default::default()
        }
    }

    /// Back to defaults. Drops the last results too, since they no longer
    /// correspond to the active criteria; a pending auth request survives.
    pub fn reset_filters(&mut self) {
        self.filters = FilterCriteria::new();
        self.last_results.clear();
    }
}
