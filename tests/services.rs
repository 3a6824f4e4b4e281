//! Integration tests for the typed endpoint services.

mod fixtures;

use bixo_client::services::{CandidateFilter, TalentQuery};
use bixo_client::types::{
    HiringLocation, NewShortlist, SeniorityLevel, ShortlistStatus, SubmitRecommendation,
};
use fixtures::{ok, signed_in_client};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_talent_search_sends_filters() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("GET"))
        .and(path("/api/companies/talent"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "20"))
        .and(query_param("skills", "Rust, Go"))
        .and(query_param("seniority", "3"))
        .respond_with(ok(json!({
            "candidates": [{
                "candidateId": "c1",
                "firstName": "Grace",
                "lastName": "Hopper",
                "availability": 0,
                "topSkills": ["Rust"],
                "matchScore": 0.92
            }],
            "totalCount": 21,
            "page": 2,
            "pageSize": 20,
            "totalPages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = TalentQuery {
        page: 2,
        skills: Some("Rust, Go".to_string()),
        seniority: Some(SeniorityLevel::Lead),
        ..Default::default()
    };
    let result = api.companies().search_talent(&query).await;

    let result = result.data.unwrap();
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.candidates[0].display_name(), "Grace Hopper");
}

#[tokio::test]
async fn test_blank_message_is_rejected_locally() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = api.companies().send_message("c1", Some("Hi"), "   ").await;
    assert_eq!(response.error.as_deref(), Some("Message content is required"));
}

#[tokio::test]
async fn test_send_message() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("POST"))
        .and(path("/api/companies/talent/c1/message"))
        .and(body_json(json!({ "content": "Would you like to chat?" })))
        .respond_with(ok(json!({ "messageId": "m1", "messagesRemaining": 4 })))
        .expect(1)
        .mount(&server)
        .await;

    let response = api
        .companies()
        .send_message("c1", None, " Would you like to chat? ")
        .await;
    assert_eq!(response.data.unwrap().messages_remaining, Some(4));
}

#[tokio::test]
async fn test_shortlist_request_body() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("POST"))
        .and(path("/api/shortlists/request"))
        .and(body_json(json!({
            "roleTitle": "Platform Engineer",
            "techStackRequired": ["Kubernetes", "Terraform"],
            "seniorityRequired": null,
            "hiringLocation": { "isRemote": true },
            "locationPreference": null,
            "remoteAllowed": true,
            "additionalNotes": null
        })))
        .respond_with(ok(json!({ "id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = NewShortlist {
        role_title: "Platform Engineer".to_string(),
        tech_stack: "Kubernetes,,Terraform ".to_string(),
        hiring_location: HiringLocation::remote(),
        ..Default::default()
    };
    let created = api.shortlists().request(&request).await;
    assert_eq!(created.data.unwrap().id, "s1");
}

#[tokio::test]
async fn test_short_recommendation_is_not_sent() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let submission = SubmitRecommendation {
        content: "Solid engineer.".to_string(),
        ..Default::default()
    };
    let response = api.recommendations().submit("tok-1", &submission).await;
    assert_eq!(
        response.error.as_deref(),
        Some("Recommendation should be at least 50 characters")
    );
}

#[tokio::test]
async fn test_admin_candidates_page() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("GET"))
        .and(path("/api/admin/candidates"))
        .and(query_param("search", "hopper"))
        .and(query_param("visible", "true"))
        .respond_with(ok(json!({
            "items": [{
                "id": "c1",
                "userId": "u1",
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "grace@example.com",
                "availability": 2,
                "seniorityEstimate": 4,
                "profileVisible": true,
                "skillsCount": 12
            }],
            "totalCount": 1,
            "page": 1,
            "pageSize": 20,
            "totalPages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = CandidateFilter {
        search: Some("hopper".to_string()),
        visible: Some(true),
        ..Default::default()
    };
    let page = api.admin().candidates(&filter).await.data.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].seniority_estimate, Some(SeniorityLevel::Principal));
}

#[tokio::test]
async fn test_admin_shortlist_status_uses_name() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("PUT"))
        .and(path("/api/admin/shortlists/s1/status"))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let response = api
        .admin()
        .update_shortlist_status("s1", ShortlistStatus::Completed)
        .await;
    assert!(response.success);
}

#[tokio::test]
async fn test_admin_reject_recommendation() {
    let server = MockServer::start().await;
    let api = signed_in_client(&server, "a1", "r1");

    Mock::given(method("POST"))
        .and(path("/api/admin/recommendations/rec-1/reject"))
        .and(body_json(json!({ "reason": "Unprofessional language" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let response = api
        .admin()
        .reject_recommendation("rec-1", "Unprofessional language")
        .await;
    assert!(response.success);
}
