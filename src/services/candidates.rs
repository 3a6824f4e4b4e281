// src/services/candidates.rs
use serde_json::{json, Value};

use super::encode_body;
use crate::core::ApiClient;
use crate::types::{
    ApiResponse, CandidateProfile, CandidateProfileUpdate, CandidateRecommendation, Notification,
};
use crate::utils::encode_segment;

const PROFILE_ENDPOINT: &str = "/candidates/profile";
const NOTIFICATIONS_ENDPOINT: &str = "/candidates/notifications";
const RECOMMENDATIONS_ENDPOINT: &str = "/candidates/me/recommendations";

/// Endpoints for the signed-in candidate.
pub struct CandidateService<'a> {
    api: &'a ApiClient,
}

impl<'a> CandidateService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn profile(&self) -> ApiResponse<CandidateProfile> {
        self.api.get(PROFILE_ENDPOINT).await
    }

    pub async fn update_profile(&self, update: &CandidateProfileUpdate) -> ApiResponse<Value> {
        let body = match encode_body(update) {
            Ok(body) => body,
            Err(failure) => return failure,
        };
        self.api.put(PROFILE_ENDPOINT, Some(body)).await
    }

    pub async fn set_visibility(&self, visible: bool) -> ApiResponse<Value> {
        self.api
            .put(PROFILE_ENDPOINT, Some(json!({ "profileVisible": visible })))
            .await
    }

    pub async fn notifications(&self) -> ApiResponse<Vec<Notification>> {
        self.api.get(NOTIFICATIONS_ENDPOINT).await
    }

    pub async fn recommendations(&self) -> ApiResponse<Vec<CandidateRecommendation>> {
        self.api.get(RECOMMENDATIONS_ENDPOINT).await
    }

    pub async fn approve_recommendation(&self, id: &str) -> ApiResponse<Value> {
        let path = format!("{}/{}/approve", RECOMMENDATIONS_ENDPOINT, encode_segment(id));
        self.api.post(&path, None).await
    }

    pub async fn delete_recommendation(&self, id: &str) -> ApiResponse<Value> {
        let path = format!("{}/{}", RECOMMENDATIONS_ENDPOINT, encode_segment(id));
        self.api.delete(&path).await
    }
}
