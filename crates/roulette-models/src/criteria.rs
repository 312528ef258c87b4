use serde::{Deserialize, Serialize};

/// Content-rating codes accepted by the exact-match rating filter.
pub const RATING_OPTIONS: &[&str] = &[
    "G", "PG", "PG-13", "R", "NC-17", "Not Rated", "Unrated", "TV-Y", "TV-Y7", "TV-G", "TV-PG",
    "TV-14", "TV-MA",
];

/// Which catalog kinds a spin draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaKindFilter {
    Movie,
    Show,
    #[default]
    Both,
}

/// One selection request's filter settings.
///
/// Transient: built per spin and optionally remembered in session state for
/// the duration of the interactive session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub media_kind: MediaKindFilter,
    /// Genre label; may be a compound label like "Action/Adventure".
    pub genre: Option<String>,
    /// Exact content-rating code, one of [`RATING_OPTIONS`].
    pub rating: Option<String>,
    /// Case-insensitive substring to look for in summaries.
    pub keyword: Option<String>,
    pub unwatched_only: bool,
    pub recent_only: bool,
    /// Number of picks to draw: 1 or 3.
    pub sample_size: usize,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self {
            sample_size: 1,
            ..Default::default()
        }
    }
}
