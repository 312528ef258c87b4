use serde::{Deserialize, Serialize};

/// Display-shaped projection of a catalog item.
///
/// Produced only by the selection pipeline and immutable from then on: a
/// pick stored in history or the watchlist is a value copy, independent of
/// whatever happens to the source item on the server later. Watchlist
/// membership is keyed by `(title, year)` rather than any server-assigned
/// id so entries survive a library re-scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickResult {
    pub title: String,
    pub year: Option<u32>,
    pub summary: String,
    /// Genre tags joined with ", ".
    pub genres: String,
    /// Poster URL with the access token embedded as a query parameter.
    pub poster: String,
    /// Deep link into the server's web UI.
    pub link: String,
    pub rating: String,
    /// Runtime in whole minutes as text, or "N/A".
    pub runtime: String,
    /// Audience rating formatted to one decimal place; omitted when the
    /// source value is absent or zero.
    pub audience_rating: Option<String>,
    pub media_kind: String,
}

impl PickResult {
    /// Watchlist identity: `(title, year)` compared as strings, matching
    /// how entries round-trip through the document store.
    pub fn same_title_and_year(&self, title: &str, year: Option<u32>) -> bool {
        self.title == title && self.year == year
    }
}
