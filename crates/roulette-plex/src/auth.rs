use crate::error::PlexError;
use crate::{build_client, IDENTITY_TIMEOUT, PLEX_TV_BASE_URL};
use chrono::Utc;
use reqwest::Client;
use roulette_models::{Credential, PendingAuthRequest};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Outcome of one pairing-status poll.
///
/// `Authorized` and `Expired` are terminal; a fresh `initiate` starts a new
/// pairing from scratch.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus {
    Pending,
    Authorized(Credential),
    Expired,
}

/// Client for the Plex device-pairing (PIN) handshake.
///
/// The client never loops or sleeps internally: `poll` queries the pairing
/// status exactly once per call and the caller re-invokes it on its own
/// interval (typically every 1-2 seconds), which keeps cancellation as
/// simple as not polling again.
pub struct PinClient {
    client: Client,
    base_url: String,
}

impl PinClient {
    pub fn new() -> Result<Self, PlexError> {
        let client = build_client()
            .map_err(|e| PlexError::AuthServiceUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: PLEX_TV_BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(base_url: String) -> Result<Self, PlexError> {
        let mut client = Self::new()?;
        client.base_url = base_url;
        Ok(client)
    }

    /// Allocate a short pairing code and request id from the identity
    /// service. The returned request must be retained by the caller across
    /// poll calls.
    pub async fn initiate(&self) -> Result<PendingAuthRequest, PlexError> {
        let url = format!("{}/api/v2/pins", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(IDENTITY_TIMEOUT)
            .send()
            .await
            .map_err(|e| PlexError::AuthServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED && !status.is_success() {
            return Err(PlexError::AuthServiceUnavailable(format!(
                "pin allocation returned {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PlexError::AuthServiceUnavailable(e.to_string()))?;

        let request = parse_pin_response(&body)
            .ok_or_else(|| PlexError::Parse("pin response missing id or code".to_string()))?;

        info!(
            "Allocated pairing code {} (pin id {}, expires in {}s)",
            request.code, request.id, request.expires_in
        );
        Ok(request)
    }

    /// Query the pairing status once.
    ///
    /// Transient transport failures are soft: they come back as `Pending`
    /// so the caller keeps polling. Only the service itself can report the
    /// terminal `Expired` state, which it does with an `errors` body.
    pub async fn poll(&self, pin_id: u64) -> Result<PollStatus, PlexError> {
        let url = format!("{}/api/v2/pins/{}", self.base_url, pin_id);
        let response = match self
            .client
            .get(&url)
            .timeout(IDENTITY_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Pairing poll transport error (will retry): {}", e);
                return Ok(PollStatus::Pending);
            }
        };

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Pairing poll returned unparseable body (will retry): {}", e);
                return Ok(PollStatus::Pending);
            }
        };

        let status = classify_pin_status(&body);
        debug!("Pairing poll for pin {}: {:?}", pin_id, status);
        Ok(status)
    }
}

fn parse_pin_response(body: &Value) -> Option<PendingAuthRequest> {
    let id = body.get("id").and_then(|v| v.as_u64())?;
    let code = body.get("code").and_then(|v| v.as_str())?.to_string();
    let expires_in = body
        .get("expires_in")
        .or_else(|| body.get("expiresIn"))
        .and_then(|v| v.as_u64())
        .unwrap_or(900);

    Some(PendingAuthRequest {
        id,
        code,
        expires_in,
        created_at: Utc::now(),
    })
}

/// Classify one pairing-status payload. An `errors` array means the code is
/// invalid or expired (terminal); a non-empty `authToken` means the user
/// approved the pairing; anything else is still pending.
fn classify_pin_status(body: &Value) -> PollStatus {
    if body.get("errors").is_some() {
        return PollStatus::Expired;
    }

    match body.get("authToken").and_then(|v| v.as_str()) {
        Some(token) if !token.is_empty() => PollStatus::Authorized(Credential::new(token)),
        _ => PollStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_pin_response() {
        let body = json!({"id": 123456, "code": "ABCD", "expires_in": 900});
        let request = parse_pin_response(&body).unwrap();
        assert_eq!(request.id, 123456);
        assert_eq!(request.code, "ABCD");
        assert_eq!(request.expires_in, 900);
    }

    #[test]
    fn test_parse_pin_response_missing_code() {
        let body = json!({"id": 123456});
        assert!(parse_pin_response(&body).is_none());
    }

    #[test]
    fn test_classify_errors_body_is_expired() {
        let body = json!({"errors": [{"code": 1020, "message": "Code not found or expired"}]});
        assert_eq!(classify_pin_status(&body), PollStatus::Expired);
    }

    #[test]
    fn test_classify_auth_token_is_authorized() {
        let body = json!({"id": 1, "authToken": "tok-xyz"});
        assert_eq!(
            classify_pin_status(&body),
            PollStatus::Authorized(Credential::new("tok-xyz"))
        );
    }

    #[test]
    fn test_classify_null_token_is_pending() {
        let body = json!({"id": 1, "authToken": null});
        assert_eq!(classify_pin_status(&body), PollStatus::Pending);

        let body = json!({"id": 1, "authToken": ""});
        assert_eq!(classify_pin_status(&body), PollStatus::Pending);

        let body = json!({"id": 1});
        assert_eq!(classify_pin_status(&body), PollStatus::Pending);
    }

    #[test]
    fn test_with_base_url_builds() {
        let client = PinClient::with_base_url("http://127.0.0.1:1".to_string()).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:1");
    }
}
