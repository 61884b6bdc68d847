//! Shared wiremock helpers for integration tests.
#![allow(dead_code)]

use std::time::Duration;

use colloquy::{Client, Credentials, PollConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-access-token";

/// Mount a token endpoint that always succeeds with a long-lived token.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TEST_TOKEN,
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

/// Build a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> Client {
    Client::new(Credentials::new(
        "test-id",
        "test-secret",
        format!("{}/oauth/token", server.uri()),
        server.uri(),
    ))
}

/// Mount an empty tools listing so the readiness gate passes trivially.
pub async fn mount_no_tools(server: &MockServer, agent_id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/Agents({agent_id})/tools")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(server)
        .await;
}

/// Fast polling so tests never sleep for real intervals.
pub fn fast_poll(max_attempts: u32) -> PollConfig {
    PollConfig::new(max_attempts, Duration::from_millis(10))
}
