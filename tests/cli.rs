//! Integration tests for the `bixo` binary.

mod fixtures;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{auth_response, ok, user_response};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_skills_categorize_works_offline() {
    let temp = TempDir::new().unwrap();

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .args(["skills", "categorize", "React,Rust", "Kubernetes", "Swift"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Frontend: React"))
        .stdout(predicate::str::contains("Backend: Rust"))
        .stdout(predicate::str::contains("Infrastructure: Kubernetes"))
        .stdout(predicate::str::contains("Mobile: Swift"));
}

#[test]
fn test_rejection_reasons_are_listed() {
    let temp = TempDir::new().unwrap();

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .args(["admin", "rejection-reasons"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Potential conflict of interest"));
}

#[tokio::test]
async fn test_login_persists_session_file() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ok(auth_response("a1", "r1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ok(user_response()))
        .mount(&server)
        .await;

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .env("BIXO_API_URL", format!("{}/api", server.uri()))
        .env("BIXO_PASSWORD", "hunter22")
        .args(["login", "ada@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as ada@example.com"));

    let session = fs::read_to_string(temp.path().join("session.json")).unwrap();
    let session: serde_json::Value = serde_json::from_str(&session).unwrap();
    assert_eq!(session["cookies"]["accessToken"]["value"], "a1");
    assert_eq!(session["cookies"]["refreshToken"]["value"], "r1");

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .args(["session", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set-Cookie: accessToken=a1; Path=/"));

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .arg("logout")
        .assert()
        .success();

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .args(["session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in:     no"));
}

#[tokio::test]
async fn test_failed_request_exits_non_zero() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(serde_json::json!({ "message": "Forbidden" })),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .args(["whoami", "--api-url", &format!("{}/api", server.uri())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Forbidden"));
}

#[test]
fn test_short_recommendation_fails_before_sending() {
    let temp = TempDir::new().unwrap();

    cargo_bin_cmd!("bixo")
        .env("BIXO_HOME", temp.path())
        .args([
            "recommendation",
            "submit",
            "tok-1",
            "--content",
            "Too short",
            "--api-url",
            "http://127.0.0.1:1/api",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Recommendation should be at least 50 characters",
        ));
}
