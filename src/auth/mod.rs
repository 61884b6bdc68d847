//! OAuth client-credentials token acquisition and refresh.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{ColloquyError, Result};

/// Renew this long before the reported expiry to avoid using a token that
/// dies mid-request.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Exchanges client credentials for bearer tokens and caches the result.
///
/// The cache lives behind an async mutex: a caller observing an expiring
/// token waits for the in-flight refresh instead of duplicating it.
pub struct TokenProvider {
    http: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: auth_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        }
    }

    /// Get a valid bearer token, refreshing if missing or near expiry.
    pub async fn bearer(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) {
                return Ok(token.access_token.clone());
            }
        }

        tracing::debug!(auth_url = %self.auth_url, "requesting new access token");
        let fresh = self.request_token().await?;
        let access = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let resp = self
            .http
            .post(&self.auth_url)
            .header("accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| ColloquyError::Authentication(format!("token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ColloquyError::Authentication(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let payload: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ColloquyError::Authentication(format!("malformed token response: {e}")))?;

        Ok(CachedToken {
            access_token: payload.access_token,
            expires_at: Utc::now() + Duration::seconds(payload.expires_in),
        })
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
