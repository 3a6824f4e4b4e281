//! Integration tests for sign-in, registration and sign-out.

mod fixtures;

use bixo_client::core::{AuthSession, CompanyRegistration};
use bixo_client::types::UserType;
use fixtures::{auth_response, client, ok, user_response};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_stores_tokens_and_loads_user() {
    let server = MockServer::start().await;
    let auth = AuthSession::new(Arc::new(client(&server)));

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter22" })))
        .respond_with(ok(auth_response("a1", "r1")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ok(user_response()))
        .expect(1)
        .mount(&server)
        .await;

    let response = auth.login("ada@example.com", "hunter22").await;
    assert!(response.success);
    assert_eq!(response.data.unwrap().candidate_id.as_deref(), Some("cand-1"));

    assert!(auth.is_authenticated());
    assert_eq!(auth.user_type(), Some(UserType::Candidate));
    assert_eq!(auth.api().session().access_token().as_deref(), Some("a1"));
    assert_eq!(auth.api().session().refresh_token().as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_login_failure_gets_default_message() {
    let server = MockServer::start().await;
    let auth = AuthSession::new(Arc::new(client(&server)));

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let response = auth.login("ada@example.com", "wrong").await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Login failed"));
    assert!(!auth.is_authenticated());
    assert!(!auth.api().session().is_signed_in());
}

#[tokio::test]
async fn test_login_success_without_tokens_is_a_failure() {
    let server = MockServer::start().await;
    let auth = AuthSession::new(Arc::new(client(&server)));

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ok(user_response()))
        .expect(0)
        .mount(&server)
        .await;

    let response = auth.login("ada@example.com", "hunter22").await;
    assert!(!response.success);
    assert!(response.data.is_none());
    assert_eq!(response.error.as_deref(), Some("Login failed"));
    assert!(!auth.is_authenticated());
    assert!(!auth.api().session().is_signed_in());
}

#[tokio::test]
async fn test_register_company_surfaces_server_error() {
    let server = MockServer::start().await;
    let auth = AuthSession::new(Arc::new(client(&server)));

    Mock::given(method("POST"))
        .and(path("/api/auth/register/company"))
        .and(body_json(json!({
            "email": "hr@acme.test",
            "password": "secret123",
            "companyName": "Acme",
            "industry": "Fintech"
        })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "Email already registered"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = auth
        .register_company(&CompanyRegistration {
            email: "hr@acme.test".to_string(),
            password: "secret123".to_string(),
            company_name: "Acme".to_string(),
            industry: "Fintech".to_string(),
        })
        .await;

    assert_eq!(response.error.as_deref(), Some("Email already registered"));
}

#[tokio::test]
async fn test_logout_clears_tokens_and_user() {
    let server = MockServer::start().await;
    let auth = AuthSession::new(Arc::new(client(&server)));

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ok(auth_response("a1", "r1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ok(user_response()))
        .mount(&server)
        .await;

    assert!(auth.login("ada@example.com", "hunter22").await.success);

    auth.logout().unwrap();
    assert!(!auth.is_authenticated());
    assert_eq!(auth.user(), None);
    assert_eq!(auth.api().session().access_token(), None);
    assert_eq!(auth.api().session().refresh_token(), None);
}
