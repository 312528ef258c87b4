use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Long-lived opaque token authorizing Plex API calls.
///
/// Obtained once through the PIN handshake and persisted until the user
/// signs out. There is no expiry tracking; a rejected token surfaces as a
/// failed downstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An in-flight device-pairing code awaiting user confirmation.
///
/// Lives only for the duration of the polling window; the caller holds it
/// across poll calls and discards it on success, expiry, or cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAuthRequest {
    pub id: u64,
    pub code: String,
    pub expires_in: u64,
    pub created_at: DateTime<Utc>,
}

impl PendingAuthRequest {
    /// Whether the local expiry window has elapsed. The identity service is
    /// still the authority on expiry; this only lets a caller stop polling
    /// early.
    pub fn is_stale(&self) -> bool {
        let age = Utc::now().signed_duration_since(self.created_at);
        age.num_seconds() >= self.expires_in as i64
    }
}
