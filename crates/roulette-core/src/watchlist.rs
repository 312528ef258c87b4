use anyhow::Result;
use roulette_config::DocumentStore;
use roulette_models::PickResult;
use tracing::debug;

const WATCHLIST_DOCUMENT: &str = "watchlist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Saved-for-later picks, shared across users.
///
/// Membership is keyed by `(title, year)`: adding an already-present pick
/// is a no-op, and removal of an absent pair is equally silent.
#[derive(Clone)]
pub struct WatchlistRepository {
    store: DocumentStore,
}

impl WatchlistRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<PickResult>> {
        self.store.load(WATCHLIST_DOCUMENT)
    }

    /// Add a pick unless an entry with the same title and year exists.
    /// Returns whether the pick was actually added.
    pub fn add(&self, pick: PickResult) -> Result<bool> {
        let mut added = false;
        self.store
            .update(WATCHLIST_DOCUMENT, |entries: &mut Vec<PickResult>| {
                if !entries
                    .iter()
                    .any(|e| e.same_title_and_year(&pick.title, pick.year))
                {
                    entries.push(pick);
                    added = true;
                }
            })?;

        if added {
            debug!("Watchlist entry added");
        } else {
            debug!("Watchlist entry already present, skipping");
        }
        Ok(added)
    }

    /// Remove an entry. With a year the match is the exact `(title, year)`
    /// pair; without one the title alone matches, erroring when several
    /// entries share the title so the wrong year is never removed silently.
    /// Returns whether an entry was removed.
    pub fn remove(&self, title: &str, year: Option<u32>) -> Result<bool> {
        let mut removed = false;
        let mut ambiguous = false;
        self.store
            .update(WATCHLIST_DOCUMENT, |entries: &mut Vec<PickResult>| {
                let matches = |e: &PickResult| match year {
                    Some(_) => e.same_title_and_year(title, year),
                    None => e.title == title,
                };
                if year.is_none() && entries.iter().filter(|e| matches(e)).count() > 1 {
                    ambiguous = true;
                    return;
                }
                let before = entries.len();
                entries.retain(|e| !matches(e));
                removed = entries.len() < before;
            })?;

        if ambiguous {
            anyhow::bail!(
                "several watchlist entries are titled \"{}\"; pass the year to pick one",
                title
            );
        }
        Ok(removed)
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let entries = self.list()?;
        match format {
            ExportFormat::Csv => export_csv(&entries),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
        }
    }
}

fn export_csv(entries: &[PickResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "title",
        "year",
        "summary",
        "genres",
        "poster",
        "link",
        "rating",
        "runtime",
        "audience_rating",
    ])?;

    for entry in entries {
        writer.write_record([
            entry.title.as_str(),
            &entry.year.map(|y| y.to_string()).unwrap_or_default(),
            entry.summary.as_str(),
            entry.genres.as_str(),
            entry.poster.as_str(),
            entry.link.as_str(),
            entry.rating.as_str(),
            entry.runtime.as_str(),
            entry.audience_rating.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
