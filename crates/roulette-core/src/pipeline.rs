use crate::filter::apply_filters;
use crate::history::HistoryRepository;
use crate::project::build_pick;
use crate::sample::sample_without_replacement;
use anyhow::Result;
use chrono::Local;
use roulette_models::{CatalogItem, FilterCriteria, MediaKindFilter, PickResult, ServerDescriptor};
use roulette_plex::discovery::machine_identifier;
use roulette_plex::fetch_items;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The fetch → filter → sample → project pipeline behind every spin.
pub struct RouletteEngine {
    server: ServerDescriptor,
    history: HistoryRepository,
    enable_history: bool,
    history_user: String,
}

impl RouletteEngine {
    pub fn new(
        server: ServerDescriptor,
        history: HistoryRepository,
        enable_history: bool,
        history_user: impl Into<String>,
    ) -> Self {
        Self {
            server,
            history,
            enable_history,
            history_user: history_user.into(),
        }
    }

    /// Run one spin. An empty result is a normal outcome, not an error:
    /// it means nothing in the selected libraries survived the filters.
    pub async fn spin(
        &self,
        criteria: &FilterCriteria,
        movie_key: Option<&str>,
        show_key: Option<&str>,
    ) -> Result<Vec<PickResult>> {
        let pool = self
            .fetch_union(criteria, movie_key, show_key)
            .await;
        let filtered = apply_filters(pool, criteria, Local::now().date_naive());
        debug!("{} items eligible after filtering", filtered.len());

        let drawn = sample_without_replacement(&filtered, criteria.sample_size);
        if drawn.is_empty() {
            info!("Spin produced no results");
            return Ok(Vec::new());
        }

        let machine_id = machine_identifier(&self.server).await;
        let picks: Vec<PickResult> = drawn
            .iter()
            .map(|item| build_pick(item, &self.server, &machine_id))
            .collect();

        if self.enable_history {
            self.history.append(&self.history_user, &picks)?;
        }

        info!("Spin drew {} of {} eligible items", picks.len(), filtered.len());
        Ok(picks)
    }

    /// Fetch the item union for the requested kinds. Only libraries that
    /// are both requested and configured contribute; both fetches run
    /// concurrently when both kinds are in play.
    async fn fetch_union(
        &self,
        criteria: &FilterCriteria,
        movie_key: Option<&str>,
        show_key: Option<&str>,
    ) -> Vec<CatalogItem> {
        let hint = criteria.unwatched_only;
        let want_movies = criteria.media_kind != MediaKindFilter::Show;
        let want_shows = criteria.media_kind != MediaKindFilter::Movie;

        match (
            movie_key.filter(|_| want_movies),
            show_key.filter(|_| want_shows),
        ) {
            (Some(movies), Some(shows)) => {
                let (mut movie_items, show_items) = futures::join!(
                    fetch_items(&self.server, movies, hint),
                    fetch_items(&self.server, shows, hint),
                );
                movie_items.extend(show_items);
                movie_items
            }
            (Some(movies), None) => fetch_items(&self.server, movies, hint).await,
            (None, Some(shows)) => fetch_items(&self.server, shows, hint).await,
            (None, None) => Vec::new(),
        }
    }

    /// Distinct genre tags across the configured libraries, for building
    /// the genre filter's option list.
    pub async fn available_genres(
        &self,
        movie_key: Option<&str>,
        show_key: Option<&str>,
    ) -> Vec<String> {
        let criteria = FilterCriteria::new();
        let pool = self.fetch_union(&criteria, movie_key, show_key).await;
        collect_genres(&pool)
    }
}

/// Sorted, de-duplicated genre tags of an item set.
pub fn collect_genres(items: &[CatalogItem]) -> Vec<String> {
    let set: BTreeSet<String> = items
        .iter()
        .flat_map(|item| item.genres.iter().cloned())
        .collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roulette_models::MediaKind;

    fn item(key: &str, genres: &[&str]) -> CatalogItem {
        CatalogItem {
            rating_key: key.to_string(),
            title: key.to_string(),
            year: Some(2020),
            summary: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            content_rating: None,
            duration_ms: None,
            audience_rating: None,
            thumb: None,
            view_count: None,
            viewed_leaf_count: None,
            kind: MediaKind::Movie,
            originally_available_at: None,
        }
    }

    #[test]
    fn test_collect_genres_is_sorted_and_distinct() {
        let items = vec![
            item("a", &["Drama", "Crime"]),
            item("b", &["Crime", "Action"]),
            item("c", &[]),
        ];

        assert_eq!(
            collect_genres(&items),
            vec![
                "Action".to_string(),
                "Crime".to_string(),
                "Drama".to_string()
            ]
        );
    }

    #[test]
    fn test_collect_genres_empty_input() {
        assert!(collect_genres(&[]).is_empty());
    }
}
