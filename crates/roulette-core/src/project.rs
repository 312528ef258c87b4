use roulette_models::{CatalogItem, PickResult, ServerDescriptor};

const NO_SUMMARY: &str = "No summary available.";
const NO_RATING: &str = "Unrated";
const NO_RUNTIME: &str = "N/A";

/// Project a catalog item into its display shape.
///
/// The poster URL embeds the access token so the image is fetchable without
/// further auth; the deep link targets the server's web UI and needs the
/// machine identifier, degrading to a link that at least lands on the right
/// host when only "unknown" is available.
pub fn build_pick(item: &CatalogItem, server: &ServerDescriptor, machine_id: &str) -> PickResult {
    let poster = item
        .thumb
        .as_deref()
        .map(|thumb| {
            format!(
                "{}{}?X-Plex-Token={}",
                server.base_uri, thumb, server.access_token
            )
        })
        .unwrap_or_default();

    let metadata_key = format!("/library/metadata/{}", item.rating_key);
    let link = format!(
        "{}/web/index.html#!/server/{}/details?key={}",
        server.base_uri,
        machine_id,
        urlencoding::encode(&metadata_key)
    );

    PickResult {
        title: item.title.clone(),
        year: item.year,
        summary: item
            .summary
            .clone()
            .unwrap_or_else(|| NO_SUMMARY.to_string()),
        genres: item.genres.join(", "),
        poster,
        link,
        rating: item
            .content_rating
            .clone()
            .unwrap_or_else(|| NO_RATING.to_string()),
        runtime: format_runtime(item.duration_ms),
        audience_rating: format_audience_rating(item.audience_rating),
        media_kind: item.kind.label().to_string(),
    }
}

/// Milliseconds to whole minutes, or "N/A" when the source has no duration.
fn format_runtime(duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) => format!("{}", ms / 60_000),
        None => NO_RUNTIME.to_string(),
    }
}

/// One decimal place; absent or zero ratings are omitted entirely rather
/// than rendered as "0.0".
fn format_audience_rating(rating: Option<f64>) -> Option<String> {
    match rating {
        Some(r) if r > 0.0 => Some(format!("{:.1}", r)),
        _ => None,
    }
}
