use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    /// Display label used in shaped results.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Show => "TV Show",
        }
    }
}

/// One media title's raw metadata as returned by the server.
///
/// Sourced fresh on every fetch and never persisted; anything that outlives
/// the request is projected into a [`crate::PickResult`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub rating_key: String,
    pub title: String,
    pub year: Option<u32>,
    pub summary: Option<String>,
    pub genres: Vec<String>,
    pub content_rating: Option<String>,
    /// Runtime in milliseconds, as reported by the server.
    pub duration_ms: Option<u64>,
    pub audience_rating: Option<f64>,
    /// Library-relative poster path, e.g. `/library/metadata/42/thumb/1`.
    pub thumb: Option<String>,
    /// Times a movie has been played.
    pub view_count: Option<u32>,
    /// Watched-episode counter for show aggregates.
    pub viewed_leaf_count: Option<u32>,
    pub kind: MediaKind,
    pub originally_available_at: Option<String>,
}

impl CatalogItem {
    /// An item with zero recorded prior views. Shows go by the aggregate
    /// watched-episode counter, movies by the play counter; an absent
    /// counter counts as unwatched.
    pub fn is_unwatched(&self) -> bool {
        match self.kind {
            MediaKind::Show => self.viewed_leaf_count.unwrap_or(0) == 0,
            MediaKind::Movie => self.view_count.unwrap_or(0) == 0,
        }
    }

    /// Original-release date, when it parses as a calendar date.
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.originally_available_at
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }
}
