//! Shared helpers for integration tests.

#![allow(dead_code)]

use bixo_client::core::{ApiClient, Session};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::{MockServer, ResponseTemplate};

pub const FAR_FUTURE: &str = "2099-01-01T00:00:00Z";

/// Client against `server` with an in-memory session.
pub fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(format!("{}/api", server.uri()), Arc::new(Session::in_memory())).unwrap()
}

/// Client with an access/refresh pair already stored.
pub fn signed_in_client(server: &MockServer, access: &str, refresh: &str) -> ApiClient {
    let api = client(server);
    api.set_tokens(access, refresh, FAR_FUTURE).unwrap();
    api
}

/// `{success: true, data}` with status 200.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

pub fn auth_response(access: &str, refresh: &str) -> Value {
    json!({
        "userId": "user-1",
        "email": "ada@example.com",
        "userType": 0,
        "accessToken": access,
        "refreshToken": refresh,
        "expiresAt": FAR_FUTURE,
        "candidateId": "cand-1"
    })
}

pub fn user_response() -> Value {
    json!({
        "id": "user-1",
        "email": "ada@example.com",
        "userType": 0,
        "isActive": true,
        "createdAt": "2025-01-01T00:00:00Z",
        "lastActiveAt": "2025-06-01T00:00:00Z",
        "candidateId": "cand-1"
    })
}
