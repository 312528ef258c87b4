use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlexError {
    /// The identity service could not be reached or refused the request.
    #[error("Plex identity service unavailable: {0}")]
    AuthServiceUnavailable(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("failed to parse upstream payload: {0}")]
    Parse(String),
}
