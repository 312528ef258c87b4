use chrono::{Days, NaiveDate};
use roulette_models::{CatalogItem, FilterCriteria, MediaKind, MediaKindFilter};
use tracing::debug;

/// How far back the recency filter reaches: five years, approximated as
/// 365-day years.
const RECENT_WINDOW_DAYS: u64 = 5 * 365;

/// Apply every active predicate of `criteria` to the item union.
///
/// The unwatched predicate is always applied client-side when requested,
/// independent of whether the server honored the fetch-time hint.
pub fn apply_filters(
    items: Vec<CatalogItem>,
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Vec<CatalogItem> {
    let before = items.len();
    let cutoff = recency_cutoff(today);

    let filtered: Vec<CatalogItem> = items
        .into_iter()
        .filter(|item| matches_kind(item, criteria.media_kind))
        .filter(|item| !criteria.unwatched_only || item.is_unwatched())
        .filter(|item| match criteria.genre.as_deref() {
            Some(genre) if !genre.is_empty() => matches_genre(item, genre),
            _ => true,
        })
        .filter(|item| match criteria.rating.as_deref() {
            Some(rating) if !rating.is_empty() => matches_rating(item, rating),
            _ => true,
        })
        .filter(|item| match criteria.keyword.as_deref() {
            Some(keyword) if !keyword.is_empty() => matches_keyword(item, keyword),
            _ => true,
        })
        .filter(|item| !criteria.recent_only || matches_recency(item, cutoff))
        .collect();

    debug!("Filtered {} items down to {}", before, filtered.len());
    filtered
}

fn matches_kind(item: &CatalogItem, kind: MediaKindFilter) -> bool {
    match kind {
        MediaKindFilter::Movie => item.kind == MediaKind::Movie,
        MediaKindFilter::Show => item.kind == MediaKind::Show,
        MediaKindFilter::Both => true,
    }
}

/// Genre matching tolerates combined taxonomy labels: the selected label is
/// split on `/` and an item matches when any part is a case-insensitive
/// substring of any of its genre tags.
pub fn matches_genre(item: &CatalogItem, selected: &str) -> bool {
    let parts: Vec<String> = selected
        .split('/')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return true;
    }

    item.genres.iter().any(|tag| {
        let tag = tag.to_lowercase();
        parts.iter().any(|part| tag.contains(part.as_str()))
    })
}

/// Exact, case-sensitive equality against a content-rating code.
pub fn matches_rating(item: &CatalogItem, rating: &str) -> bool {
    item.content_rating.as_deref() == Some(rating)
}

/// Case-insensitive substring match against the summary. An item with no
/// summary never matches a non-empty keyword.
pub fn matches_keyword(item: &CatalogItem, keyword: &str) -> bool {
    match item.summary.as_deref() {
        Some(summary) => summary.to_lowercase().contains(&keyword.to_lowercase()),
        None => false,
    }
}

pub fn recency_cutoff(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

/// An item is recent when its release date parses and falls strictly after
/// the cutoff; unparseable or missing dates are excluded.
pub fn matches_recency(item: &CatalogItem, cutoff: NaiveDate) -> bool {
    match item.release_date() {
        Some(date) => date > cutoff,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn item(kind: MediaKind) -> CatalogItem {
        CatalogItem {
            rating_key: "1".to_string(),
            title: "Test".to_string(),
            year: Some(2020),
            summary: None,
            genres: Vec::new(),
            content_rating: None,
            duration_ms: None,
            audience_rating: None,
            thumb: None,
            view_count: None,
            viewed_leaf_count: None,
            kind,
            originally_available_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
    }

    #[test]
    fn test_genre_slash_label_matches_any_part() {
        let mut movie = item(MediaKind::Movie);
        movie.genres = vec!["Adventure".to_string(), "Sci-Fi".to_string()];

        assert!(matches_genre(&movie, "Action/Adventure"));
        assert!(matches_genre(&movie, "action/adventure"));
        assert!(!matches_genre(&movie, "Action/Comedy"));
    }

    #[test]
    fn test_genre_substring_containment() {
        let mut movie = item(MediaKind::Movie);
        movie.genres = vec!["Action/Adventure".to_string()];

        // Tag itself carries the combined label; a single part still matches
        assert!(matches_genre(&movie, "Adventure"));
        assert!(matches_genre(&movie, "action"));
    }

    #[test]
    fn test_genre_no_tags_never_matches() {
        let movie = item(MediaKind::Movie);
        assert!(!matches_genre(&movie, "Drama"));
    }

    #[test]
    fn test_rating_is_exact_and_case_sensitive() {
        let mut movie = item(MediaKind::Movie);
        movie.content_rating = Some("PG-13".to_string());

        assert!(matches_rating(&movie, "PG-13"));
        assert!(!matches_rating(&movie, "pg-13"));
        assert!(!matches_rating(&movie, "PG"));
    }

    #[test]
    fn test_keyword_requires_summary() {
        let mut movie = item(MediaKind::Movie);
        assert!(!matches_keyword(&movie, "heist"));

        movie.summary = Some("A daring Heist goes wrong.".to_string());
        assert!(matches_keyword(&movie, "heist"));
        assert!(matches_keyword(&movie, "HEIST"));
        assert!(!matches_keyword(&movie, "romance"));
    }

    #[test]
    fn test_recency_boundary() {
        let today = today();
        let cutoff = recency_cutoff(today);

        // Exactly 5 years (1825 days) and 1 day ago: excluded
        let mut old = item(MediaKind::Movie);
        let too_old = today.checked_sub_days(Days::new(1826)).unwrap();
        old.originally_available_at = Some(too_old.format("%Y-%m-%d").to_string());
        assert!(!matches_recency(&old, cutoff));

        // Exactly at the cutoff: excluded (strictly after)
        let mut edge = item(MediaKind::Movie);
        edge.originally_available_at = Some(cutoff.format("%Y-%m-%d").to_string());
        assert!(!matches_recency(&edge, cutoff));

        // 4 years ago: included
        let mut recent = item(MediaKind::Movie);
        let four_years = today.checked_sub_days(Days::new(4 * 365)).unwrap();
        recent.originally_available_at = Some(four_years.format("%Y-%m-%d").to_string());
        assert!(matches_recency(&recent, cutoff));
    }

    #[test]
    fn test_recency_unparseable_date_is_excluded() {
        let cutoff = recency_cutoff(today());

        let mut movie = item(MediaKind::Movie);
        assert!(!matches_recency(&movie, cutoff));

        movie.originally_available_at = Some("sometime in June".to_string());
        assert!(!matches_recency(&movie, cutoff));
    }

    #[test]
    fn test_unwatched_filter_is_idempotent() {
        let mut watched = item(MediaKind::Movie);
        watched.rating_key = "w".to_string();
        watched.view_count = Some(3);
        let mut unwatched = item(MediaKind::Movie);
        unwatched.rating_key = "u".to_string();

        let criteria = FilterCriteria {
            unwatched_only: true,
            sample_size: 1,
            ..Default::default()
        };

        let once = apply_filters(vec![watched, unwatched], &criteria, today());
        assert_eq!(once.len(), 1);
        let twice = apply_filters(once.clone(), &criteria, today());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_media_kind_selection_is_a_filter() {
        let movie = item(MediaKind::Movie);
        let mut show = item(MediaKind::Show);
        show.rating_key = "2".to_string();

        let mut criteria = FilterCriteria::new();
        criteria.media_kind = MediaKindFilter::Show;
        let filtered = apply_filters(vec![movie.clone(), show.clone()], &criteria, today());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].kind, MediaKind::Show);

        criteria.media_kind = MediaKindFilter::Both;
        let filtered = apply_filters(vec![movie, show], &criteria, today());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filters_compose() {
        let mut a = item(MediaKind::Movie);
        a.rating_key = "a".to_string();
        a.genres = vec!["Action".to_string()];
        a.content_rating = Some("R".to_string());
        a.summary = Some("A relentless chase.".to_string());

        let mut b = item(MediaKind::Movie);
        b.rating_key = "b".to_string();
        b.genres = vec!["Action".to_string()];
        b.content_rating = Some("PG".to_string());
        b.summary = Some("A relentless chase.".to_string());

        let criteria = FilterCriteria {
            genre: Some("Action".to_string()),
            rating: Some("R".to_string()),
            keyword: Some("chase".to_string()),
            sample_size: 1,
            ..Default::default()
        };

        let filtered = apply_filters(vec![a, b], &criteria, today());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].rating_key, "a");
    }
}
