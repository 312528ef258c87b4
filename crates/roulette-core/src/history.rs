use anyhow::Result;
use roulette_config::DocumentStore;
use roulette_models::PickResult;
use std::collections::HashMap;
use tracing::debug;

const HISTORY_DOCUMENT: &str = "pick_history";

/// Rolling cap per user; trimmed on every write, oldest entries first.
pub const HISTORY_LIMIT: usize = 20;

type HistoryDocument = HashMap<String, Vec<PickResult>>;

/// Per-user pick history over the flat-file document store.
///
/// All users share one document keyed by username, so switching the
/// configured username switches history namespaces without touching other
/// users' entries.
#[derive(Clone)]
pub struct HistoryRepository {
    store: DocumentStore,
}

impl HistoryRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self, user: &str) -> Result<Vec<PickResult>> {
        let document: HistoryDocument = self.store.load(HISTORY_DOCUMENT)?;
        Ok(document.get(user).cloned().unwrap_or_default())
    }

    /// Append picks to a user's history and trim to the most recent
    /// [`HISTORY_LIMIT`] entries.
    pub fn append(&self, user: &str, picks: &[PickResult]) -> Result<()> {
        if picks.is_empty() {
            return Ok(());
        }

        self.store
            .update(HISTORY_DOCUMENT, |document: &mut HistoryDocument| {
                let entries = document.entry(user.to_string()).or_default();
                entries.extend_from_slice(picks);
                if entries.len() > HISTORY_LIMIT {
                    let excess = entries.len() - HISTORY_LIMIT;
                    entries.drain(..excess);
                }
            })?;

        debug!("Appended {} picks to history for {}", picks.len(), user);
        Ok(())
    }

    /// Drop one user's history; other users' entries are untouched.
    pub fn clear(&self, user: &str) -> Result<()> {
        self.store
            .update(HISTORY_DOCUMENT, |document: &mut HistoryDocument| {
                document.remove(user);
            })?;
        Ok(())
    }
}
