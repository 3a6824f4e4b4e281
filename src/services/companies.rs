// src/services/companies.rs
use serde_json::{json, Map, Value};

use super::DEFAULT_PAGE_SIZE;
use crate::core::ApiClient;
use crate::types::{ApiResponse, Availability, SendMessageResponse, SeniorityLevel, TalentSearchResult};
use crate::utils::{encode_segment, non_empty, Query};

const TALENT_ENDPOINT: &str = "/companies/talent";
const SAVED_CANDIDATES_ENDPOINT: &str = "/companies/candidates/save";

/// Talent search filters. Empty filters are left out of the query string.
#[derive(Debug, Clone, PartialEq)]
pub struct TalentQuery {
    pub page: u32,
    pub page_size: u32,
    pub skills: Option<String>,
    pub seniority: Option<SeniorityLevel>,
    pub availability: Option<Availability>,
}

impl Default for TalentQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            skills: None,
            seniority: None,
            availability: None,
        }
    }
}

impl TalentQuery {
    pub fn to_path(&self) -> String {
        Query::new()
            .param("page", self.page)
            .param("pageSize", self.page_size)
            .opt("skills", non_empty(self.skills.as_deref()))
            .opt("seniority", self.seniority.map(|s| s.code()))
            .opt("availability", self.availability.map(|a| a.code()))
            .apply(TALENT_ENDPOINT)
    }
}

/// Company-side endpoints: talent search, saved candidates, messaging.
pub struct CompanyService<'a> {
    api: &'a ApiClient,
}

impl<'a> CompanyService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn search_talent(&self, query: &TalentQuery) -> ApiResponse<TalentSearchResult> {
        self.api.get(&query.to_path()).await
    }

    pub async fn save_candidate(&self, candidate_id: &str) -> ApiResponse<Value> {
        self.api
            .post(
                SAVED_CANDIDATES_ENDPOINT,
                Some(json!({ "candidateId": candidate_id })),
            )
            .await
    }

    pub async fn unsave_candidate(&self, candidate_id: &str) -> ApiResponse<Value> {
        let path = format!("{}/{}", SAVED_CANDIDATES_ENDPOINT, encode_segment(candidate_id));
        self.api.delete(&path).await
    }

    /// Sends a message to a candidate. Blank content is rejected locally.
    pub async fn send_message(
        &self,
        candidate_id: &str,
        subject: Option<&str>,
        content: &str,
    ) -> ApiResponse<SendMessageResponse> {
        let body = match message_body(subject, content) {
            Ok(body) => body,
            Err(error) => return ApiResponse::failure(error),
        };

        let path = format!("{}/{}/message", TALENT_ENDPOINT, encode_segment(candidate_id));
        self.api.post(&path, Some(body)).await
    }
}

fn message_body(subject: Option<&str>, content: &str) -> Result<Value, &'static str> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Message content is required");
    }

    let mut body = Map::new();
    if let Some(subject) = non_empty(subject) {
        body.insert("subject".to_string(), Value::String(subject));
    }
    body.insert("content".to_string(), Value::String(content.to_string()));
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_talent_query() {
        assert_eq!(
            TalentQuery::default().to_path(),
            "/companies/talent?page=1&pageSize=20"
        );
    }

    #[test]
    fn test_talent_query_filters() {
        let query = TalentQuery {
            page: 3,
            skills: Some("C#, .NET".to_string()),
            seniority: Some(SeniorityLevel::Senior),
            availability: Some(Availability::Open),
            ..Default::default()
        };
        assert_eq!(
            query.to_path(),
            "/companies/talent?page=3&pageSize=20&skills=C%23%2C%20.NET&seniority=2&availability=0"
        );
    }

    #[test]
    fn test_blank_skills_are_omitted() {
        let query = TalentQuery {
            skills: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!query.to_path().contains("skills"));
    }

    #[test]
    fn test_message_body() {
        assert_eq!(
            message_body(Some("  "), "  Hello there  ").unwrap(),
            json!({ "content": "Hello there" })
        );
        assert_eq!(
            message_body(Some("Role"), "Hi").unwrap(),
            json!({ "subject": "Role", "content": "Hi" })
        );
        assert_eq!(message_body(None, " \n "), Err("Message content is required"));
    }
}
