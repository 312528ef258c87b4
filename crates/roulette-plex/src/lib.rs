pub mod auth;
pub mod catalog;
pub mod discovery;
pub mod error;

pub use auth::{PinClient, PollStatus};
pub use catalog::fetch_items;
pub use discovery::{discover_servers, list_library_sections, machine_identifier};
pub use error::PlexError;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use std::time::Duration;

pub(crate) const PLEX_TV_BASE_URL: &str = "https://plex.tv";

// Client identification headers the identity service requires on every call
pub(crate) const PLEX_PRODUCT: &str = "MediaRoulette";
pub(crate) const PLEX_CLIENT_IDENTIFIER: &str = "mediaroulette-client-001";
pub(crate) const PLEX_PLATFORM: &str = "Web";
pub(crate) const PLEX_DEVICE: &str = "RustApp";
pub(crate) const PLEX_DEVICE_NAME: &str = "MediaRoulette";
pub(crate) const PLEX_VERSION: &str = "1.0";

// Short timeouts so one slow upstream never blocks the whole request;
// scaled to expected payload size
pub(crate) const IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const SECTIONS_TIMEOUT: Duration = Duration::from_secs(15);
pub(crate) const CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a reqwest client carrying the X-Plex identification headers.
pub(crate) fn build_client() -> anyhow::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-plex-product"),
        HeaderValue::from_static(PLEX_PRODUCT),
    );
    headers.insert(
        HeaderName::from_static("x-plex-client-identifier"),
        HeaderValue::from_static(PLEX_CLIENT_IDENTIFIER),
    );
    headers.insert(
        HeaderName::from_static("x-plex-platform"),
        HeaderValue::from_static(PLEX_PLATFORM),
    );
    headers.insert(
        HeaderName::from_static("x-plex-device"),
        HeaderValue::from_static(PLEX_DEVICE),
    );
    headers.insert(
        HeaderName::from_static("x-plex-device-name"),
        HeaderValue::from_static(PLEX_DEVICE_NAME),
    );
    headers.insert(
        HeaderName::from_static("x-plex-version"),
        HeaderValue::from_static(PLEX_VERSION),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to create HTTP client")
}
