// src/services/admin.rs
//! Admin review endpoints.

use serde_json::{json, Value};

use super::DEFAULT_PAGE_SIZE;
use crate::core::ApiClient;
use crate::types::{
    AdminCandidate, AdminCompany, AdminRecommendation, AdminShortlist, ApiResponse, Paginated,
    ShortlistStatus, SubscriptionTier,
};
use crate::utils::{encode_segment, non_empty, Query};

const CANDIDATES_ENDPOINT: &str = "/admin/candidates";
const COMPANIES_ENDPOINT: &str = "/admin/companies";
const SHORTLISTS_ENDPOINT: &str = "/admin/shortlists";
const RECOMMENDATIONS_ENDPOINT: &str = "/admin/recommendations";

/// Reasons offered when rejecting a recommendation.
pub const REJECTION_REASONS: &[&str] = &[
    "Low quality / lacks substance",
    "Appears exaggerated or false",
    "Unprofessional language",
    "Generic / not specific to candidate",
    "Potential conflict of interest",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFilter {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub visible: Option<bool>,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            visible: None,
        }
    }
}

impl CandidateFilter {
    pub fn to_path(&self) -> String {
        Query::new()
            .param("page", self.page)
            .param("pageSize", self.page_size)
            .opt("search", non_empty(self.search.as_deref()))
            .opt("visible", self.visible)
            .apply(CANDIDATES_ENDPOINT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyFilter {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub tier: Option<SubscriptionTier>,
}

impl Default for CompanyFilter {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            tier: None,
        }
    }
}

impl CompanyFilter {
    pub fn to_path(&self) -> String {
        Query::new()
            .param("page", self.page)
            .param("pageSize", self.page_size)
            .opt("search", non_empty(self.search.as_deref()))
            .opt("tier", self.tier.map(|t| t.code()))
            .apply(COMPANIES_ENDPOINT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortlistFilter {
    pub page: u32,
    pub page_size: u32,
    pub status: Option<ShortlistStatus>,
}

impl Default for ShortlistFilter {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            status: None,
        }
    }
}

impl ShortlistFilter {
    pub fn to_path(&self) -> String {
        Query::new()
            .param("page", self.page)
            .param("pageSize", self.page_size)
            .opt("status", self.status.map(|s| s.code()))
            .apply(SHORTLISTS_ENDPOINT)
    }
}

pub struct AdminService<'a> {
    api: &'a ApiClient,
}

impl<'a> AdminService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    // ===== Candidates =====

    pub async fn candidates(&self, filter: &CandidateFilter) -> ApiResponse<Paginated<AdminCandidate>> {
        self.api.get(&filter.to_path()).await
    }

    pub async fn set_candidate_visibility(&self, id: &str, visible: bool) -> ApiResponse<Value> {
        let path = format!("{}/{}/visibility", CANDIDATES_ENDPOINT, encode_segment(id));
        self.api.put(&path, Some(json!({ "visible": visible }))).await
    }

    // ===== Companies =====

    pub async fn companies(&self, filter: &CompanyFilter) -> ApiResponse<Paginated<AdminCompany>> {
        self.api.get(&filter.to_path()).await
    }

    pub async fn set_company_messages(&self, id: &str, messages_remaining: i64) -> ApiResponse<Value> {
        let path = format!("{}/{}/messages", COMPANIES_ENDPOINT, encode_segment(id));
        self.api
            .put(&path, Some(json!({ "messagesRemaining": messages_remaining })))
            .await
    }

    // ===== Shortlists =====

    pub async fn shortlists(&self, filter: &ShortlistFilter) -> ApiResponse<Vec<AdminShortlist>> {
        self.api.get(&filter.to_path()).await
    }

    /// The status endpoint takes the lowercase status name, not the code.
    pub async fn update_shortlist_status(&self, id: &str, status: ShortlistStatus) -> ApiResponse<Value> {
        let path = format!("{}/{}/status", SHORTLISTS_ENDPOINT, encode_segment(id));
        self.api
            .put(&path, Some(json!({ "status": status.slug() })))
            .await
    }

    // ===== Recommendations =====

    pub async fn recommendations(&self) -> ApiResponse<Vec<AdminRecommendation>> {
        self.api.get(RECOMMENDATIONS_ENDPOINT).await
    }

    pub async fn approve_recommendation(&self, id: &str) -> ApiResponse<Value> {
        let path = format!("{}/{}/approve", RECOMMENDATIONS_ENDPOINT, encode_segment(id));
        self.api.post(&path, None).await
    }

    pub async fn reject_recommendation(&self, id: &str, reason: &str) -> ApiResponse<Value> {
        let path = format!("{}/{}/reject", RECOMMENDATIONS_ENDPOINT, encode_segment(id));
        self.api
            .post(&path, Some(json!({ "reason": reason.trim() })))
            .await
    }
}
