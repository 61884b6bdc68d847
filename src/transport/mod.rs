//! Authenticated JSON transport against the Agent Service API.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::TokenProvider;
use crate::error::{ColloquyError, Result};

/// All service routes hang off this prefix.
const API_PREFIX: &str = "/api/v1";

/// Issues bearer-authenticated calls and maps non-2xx responses onto the
/// error taxonomy. Holds the only `reqwest::Client` used for API traffic.
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenProvider,
}

impl Transport {
    pub fn new(base_url: impl Into<String>, tokens: TokenProvider) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(Method::GET, path, None, &[]).await
    }

    pub async fn get_with_query(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.execute(Method::GET, path, None, query).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(Method::POST, path, Some(body), &[]).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(Method::PATCH, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, None, &[]).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        let token = self.tokens.bearer().await?;

        tracing::debug!(%method, %url, "api request");
        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header("accept", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        tracing::debug!(%status, %url, "api response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for(status, &body));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let text = resp.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Map a non-2xx response to the taxonomy, folding the service's
/// `{error, message}` body into the message when present.
fn error_for(status: StatusCode, body: &str) -> ColloquyError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            let code = error
                .as_str()
                .map(str::to_string)
                .or_else(|| error.get("code").and_then(Value::as_str).map(str::to_string));
            let message = v
                .get("message")
                .or_else(|| error.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match (code, message) {
                (Some(c), Some(m)) => Some(format!("{c}: {m}")),
                (Some(c), None) => Some(c),
                (None, Some(m)) => Some(m),
                (None, None) => None,
            }
        })
        .unwrap_or_else(|| body.to_string());

    match status.as_u16() {
        401 | 403 => ColloquyError::Authentication(detail),
        code => ColloquyError::api(code, detail),
    }
}

/// Unwrap the service's OData-style collection envelope `{"value": [...]}`.
pub fn collection<T: DeserializeOwned>(payload: Value) -> Result<Vec<T>> {
    let items = match payload {
        Value::Object(mut map) => map.remove("value").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    Ok(serde_json::from_value(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_unwraps_value_envelope() {
        let payload = json!({ "value": [ { "ID": "c1", "name": "s" } ] });
        let chats: Vec<crate::types::Chat> = collection(payload).unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, "c1");
    }

    #[test]
    fn collection_tolerates_missing_envelope() {
        let chats: Vec<crate::types::Chat> = collection(json!({})).unwrap();
        assert!(chats.is_empty());
    }

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err = error_for(StatusCode::UNAUTHORIZED, "expired token");
        assert!(matches!(err, ColloquyError::Authentication(_)));
    }

    #[test]
    fn structured_error_body_is_folded_into_message() {
        let err = error_for(
            StatusCode::BAD_REQUEST,
            r#"{"error": "invalidHistoryId", "message": "already answered"}"#,
        );
        match err {
            ColloquyError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalidHistoryId: already answered");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn nested_odata_error_body_is_folded() {
        let err = error_for(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": {"code": "500", "message": "boom"}}"#,
        );
        match err {
            ColloquyError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "500: boom");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_body_is_passed_through() {
        let err = error_for(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        match err {
            ColloquyError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>oops</html>");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
