use crate::{build_client, CATALOG_TIMEOUT};
use roulette_models::{CatalogItem, MediaKind, ServerDescriptor};
use serde_json::Value;
use tracing::{debug, warn};

/// Upper page size requested in one call. An accepted scale limit rather
/// than a hard constraint; libraries past this size would need true
/// pagination.
const CONTAINER_PAGE_SIZE: u32 = 10_000;

/// Fetch all items of a library section.
///
/// The `unwatched_hint` pushes the filter to the server, but the server's
/// answer is unreliable for aggregated show records, so the selection
/// pipeline re-applies its own unwatched predicate regardless. Any
/// transport or parse failure is logged and yields an empty list: one
/// unreachable library must never block the other of movies/shows.
pub async fn fetch_items(
    server: &ServerDescriptor,
    section_key: &str,
    unwatched_hint: bool,
) -> Vec<CatalogItem> {
    let client = match build_client() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to build catalog client: {}", e);
            return Vec::new();
        }
    };

    let url = format!("{}/library/sections/{}/all", server.base_uri, section_key);
    let mut query: Vec<(&str, String)> = vec![
        ("X-Plex-Token", server.access_token.clone()),
        ("X-Plex-Container-Start", "0".to_string()),
        ("X-Plex-Container-Size", CONTAINER_PAGE_SIZE.to_string()),
    ];
    if unwatched_hint {
        query.push(("unwatched", "1".to_string()));
    }

    let response = match client
        .get(&url)
        .query(&query)
        .timeout(CATALOG_TIMEOUT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch library {}: {}", section_key, e);
            return Vec::new();
        }
    };

    if !response.status().is_success() {
        warn!(
            "Library {} fetch returned {}",
            section_key,
            response.status()
        );
        return Vec::new();
    }

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to parse library {} response: {}", section_key, e);
            return Vec::new();
        }
    };

    let items = parse_catalog_json(&body);
    debug!(
        "Library {}: fetched {} items (unwatched hint={})",
        section_key,
        items.len(),
        unwatched_hint
    );
    items
}

/// Parse the `MediaContainer.Metadata` item listing.
pub fn parse_catalog_json(body: &Value) -> Vec<CatalogItem> {
    body.get("MediaContainer")
        .and_then(|mc| mc.get("Metadata"))
        .and_then(|m| m.as_array())
        .map(|items| items.iter().filter_map(parse_catalog_item).collect())
        .unwrap_or_default()
}

fn parse_catalog_item(item: &Value) -> Option<CatalogItem> {
    let rating_key = item.get("ratingKey")?.as_str()?.to_string();
    let title = item.get("title")?.as_str()?.to_string();

    let kind = match item.get("type").and_then(|t| t.as_str()) {
        Some("show") => MediaKind::Show,
        _ => MediaKind::Movie,
    };

    let genres = item
        .get("Genre")
        .and_then(|g| g.as_array())
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| tag.get("tag").and_then(|t| t.as_str()))
                .map(|t| t.to_string())
                .collect()
        })
        .unwrap_or_default();

    Some(CatalogItem {
        rating_key,
        title,
        year: item.get("year").and_then(|y| y.as_u64()).map(|y| y as u32),
        summary: item
            .get("summary")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
        genres,
        content_rating: item
            .get("contentRating")
            .and_then(|r| r.as_str())
            .map(|r| r.to_string()),
        duration_ms: item.get("duration").and_then(|d| d.as_u64()),
        audience_rating: item.get("audienceRating").and_then(|r| r.as_f64()),
        thumb: item
            .get("thumb")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string()),
        view_count: item
            .get("viewCount")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32),
        viewed_leaf_count: item
            .get("viewedLeafCount")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32),
        kind,
        originally_available_at: item
            .get("originallyAvailableAt")
            .and_then(|d| d.as_str())
            .map(|d| d.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_catalog_json_movie() {
        let body = json!({
            "MediaContainer": {
                "Metadata": [{
                    "ratingKey": "101",
                    "title": "Heat",
                    "year": 1995,
                    "summary": "A crew of career criminals.",
                    "type": "movie",
                    "duration": 10200000u64,
                    "contentRating": "R",
                    "audienceRating": 8.6,
                    "thumb": "/library/metadata/101/thumb/1",
                    "viewCount": 2,
                    "Genre": [{"tag": "Crime"}, {"tag": "Drama"}],
                    "originallyAvailableAt": "1995-12-15"
                }]
            }
        });

        let items = parse_catalog_json(&body);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.rating_key, "101");
        assert_eq!(item.title, "Heat");
        assert_eq!(item.year, Some(1995));
        assert_eq!(item.kind, MediaKind::Movie);
        assert_eq!(item.genres, vec!["Crime".to_string(), "Drama".to_string()]);
        assert_eq!(item.duration_ms, Some(10200000));
        assert_eq!(item.view_count, Some(2));
        assert_eq!(item.viewed_leaf_count, None);
        assert_eq!(item.originally_available_at.as_deref(), Some("1995-12-15"));
    }

    #[test]
    fn test_parse_catalog_json_show_with_sparse_fields() {
        let body = json!({
            "MediaContainer": {
                "Metadata": [{
                    "ratingKey": "202",
                    "title": "Severance",
                    "type": "show",
                    "viewedLeafCount": 0
                }]
            }
        });

        let items = parse_catalog_json(&body);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.kind, MediaKind::Show);
        assert_eq!(item.viewed_leaf_count, Some(0));
        assert!(item.genres.is_empty());
        assert!(item.summary.is_none());
        assert!(item.is_unwatched());
    }

    #[test]
    fn test_parse_catalog_json_skips_malformed_entries() {
        let body = json!({
            "MediaContainer": {
                "Metadata": [
                    {"title": "No rating key"},
                    {"ratingKey": "301", "title": "Valid", "type": "movie"}
                ]
            }
        });

        let items = parse_catalog_json(&body);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].rating_key, "301");
    }

    #[test]
    fn test_parse_catalog_json_missing_metadata_is_empty() {
        assert!(parse_catalog_json(&json!({})).is_empty());
        assert!(parse_catalog_json(&json!({"MediaContainer": {}})).is_empty());
    }
}
