// src/services/recommendations.rs
//! Public recommendation form, reached through an emailed token.

use serde_json::Value;

use super::encode_body;
use crate::core::ApiClient;
use crate::types::{ApiResponse, RecommenderFormData, SubmitRecommendation};
use crate::utils::{encode_segment, non_empty};

const RECOMMENDATIONS_ENDPOINT: &str = "/recommendations";

pub const MIN_RECOMMENDATION_CHARS: usize = 50;

pub struct RecommendationService<'a> {
    api: &'a ApiClient,
}

impl<'a> RecommendationService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn form(&self, token: &str) -> ApiResponse<RecommenderFormData> {
        let path = format!("{}/{}", RECOMMENDATIONS_ENDPOINT, encode_segment(token));
        self.api.get(&path).await
    }

    /// Validates and submits. Nothing is sent when validation fails.
    pub async fn submit(&self, token: &str, submission: &SubmitRecommendation) -> ApiResponse<Value> {
        let submission = match prepare_submission(submission) {
            Ok(submission) => submission,
            Err(error) => return ApiResponse::failure(error),
        };
        let body = match encode_body(&submission) {
            Ok(body) => body,
            Err(failure) => return failure,
        };

        let path = format!("{}/{}/submit", RECOMMENDATIONS_ENDPOINT, encode_segment(token));
        self.api.post(&path, Some(body)).await
    }
}

/// Trims the submission and checks the content length.
pub fn prepare_submission(
    submission: &SubmitRecommendation,
) -> Result<SubmitRecommendation, &'static str> {
    let content = submission.content.trim();
    if content.is_empty() {
        return Err("Please write your recommendation");
    }
    if content.chars().count() < MIN_RECOMMENDATION_CHARS {
        return Err("Recommendation should be at least 50 characters");
    }

    Ok(SubmitRecommendation {
        content: content.to_string(),
        recommender_role: non_empty(submission.recommender_role.as_deref()),
        recommender_company: non_empty(submission.recommender_company.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(content: &str) -> SubmitRecommendation {
        SubmitRecommendation {
            content: content.to_string(),
            recommender_role: Some("  ".to_string()),
            recommender_company: Some(" Acme ".to_string()),
        }
    }

    #[test]
    fn test_rejects_blank_and_short_content() {
        assert_eq!(
            prepare_submission(&submission("   ")),
            Err("Please write your recommendation")
        );
        assert_eq!(
            prepare_submission(&submission("Great engineer.")),
            Err("Recommendation should be at least 50 characters")
        );
    }

    #[test]
    fn test_trims_and_drops_empty_fields() {
        let content = "She rebuilt our billing pipeline and mentored three juniors.";
        let prepared = prepare_submission(&submission(&format!("  {content}  "))).unwrap();

        assert_eq!(prepared.content, content);
        assert_eq!(
            serde_json::to_value(&prepared).unwrap(),
            json!({ "content": content, "recommenderCompany": "Acme" })
        );
    }

    #[test]
    fn test_length_counts_characters_after_trim() {
        let exactly_fifty = "é".repeat(50);
        assert!(prepare_submission(&submission(&format!("  {exactly_fifty} "))).is_ok());
        assert!(prepare_submission(&submission(&"é".repeat(49))).is_err());
    }
}
