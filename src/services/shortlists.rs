// src/services/shortlists.rs
use serde_json::{json, Value};

use crate::core::ApiClient;
use crate::types::{ApiResponse, CreatedId, NewShortlist, ShortlistDetail, ShortlistRequest};
use crate::utils::{encode_segment, non_empty, split_list};

const SHORTLISTS_ENDPOINT: &str = "/shortlists";
const REQUEST_ENDPOINT: &str = "/shortlists/request";

pub struct ShortlistService<'a> {
    api: &'a ApiClient,
}

impl<'a> ShortlistService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResponse<Vec<ShortlistRequest>> {
        self.api.get(SHORTLISTS_ENDPOINT).await
    }

    pub async fn get(&self, id: &str) -> ApiResponse<ShortlistDetail> {
        let path = format!("{}/{}", SHORTLISTS_ENDPOINT, encode_segment(id));
        self.api.get(&path).await
    }

    pub async fn request(&self, shortlist: &NewShortlist) -> ApiResponse<CreatedId> {
        self.api
            .post(REQUEST_ENDPOINT, Some(request_body(shortlist)))
            .await
    }
}

/// Wire body for a shortlist request.
pub fn request_body(shortlist: &NewShortlist) -> Value {
    let location = &shortlist.hiring_location;
    json!({
        "roleTitle": shortlist.role_title.trim(),
        "techStackRequired": split_list(&shortlist.tech_stack),
        "seniorityRequired": shortlist.seniority.map(|s| s.code()),
        "hiringLocation": location,
        "locationPreference": location.summary(),
        "remoteAllowed": location.is_remote,
        "additionalNotes": non_empty(shortlist.notes.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HiringLocation, SeniorityLevel};

    #[test]
    fn test_request_body_full() {
        let shortlist = NewShortlist {
            role_title: "Backend Engineer".to_string(),
            tech_stack: " Rust, , PostgreSQL ,Kafka".to_string(),
            seniority: Some(SeniorityLevel::Senior),
            hiring_location: HiringLocation {
                is_remote: false,
                city: Some("Lisbon".to_string()),
                country: Some("Portugal".to_string()),
                ..Default::default()
            },
            notes: Some("Fintech experience".to_string()),
        };

        let body = request_body(&shortlist);
        assert_eq!(body["techStackRequired"], json!(["Rust", "PostgreSQL", "Kafka"]));
        assert_eq!(body["seniorityRequired"], json!(2));
        assert_eq!(body["locationPreference"], json!("Lisbon, Portugal"));
        assert_eq!(body["remoteAllowed"], json!(false));
        assert_eq!(body["hiringLocation"]["city"], json!("Lisbon"));
        assert_eq!(body["additionalNotes"], json!("Fintech experience"));
    }

    #[test]
    fn test_request_body_remote_without_extras() {
        let shortlist = NewShortlist {
            role_title: "Data Engineer".to_string(),
            tech_stack: "Python".to_string(),
            hiring_location: HiringLocation::remote(),
            notes: Some("   ".to_string()),
            ..Default::default()
        };

        let body = request_body(&shortlist);
        assert_eq!(body["seniorityRequired"], Value::Null);
        assert_eq!(body["locationPreference"], Value::Null);
        assert_eq!(body["remoteAllowed"], json!(true));
        assert_eq!(body["additionalNotes"], Value::Null);
        assert_eq!(body["hiringLocation"], json!({ "isRemote": true }));
    }
}
