// src/services/mod.rs
//! Typed endpoint groups. Each service borrows the shared [`ApiClient`].

pub mod admin;
pub mod candidates;
pub mod companies;
pub mod recommendations;
pub mod shortlists;

pub use admin::{AdminService, CandidateFilter, CompanyFilter, ShortlistFilter, REJECTION_REASONS};
pub use candidates::CandidateService;
pub use companies::{CompanyService, TalentQuery};
pub use recommendations::RecommendationService;
pub use shortlists::ShortlistService;

use serde::Serialize;
use serde_json::Value;

use crate::core::ApiClient;
use crate::types::ApiResponse;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

impl ApiClient {
    pub fn candidates(&self) -> CandidateService<'_> {
        CandidateService::new(self)
    }

    pub fn companies(&self) -> CompanyService<'_> {
        CompanyService::new(self)
    }

    pub fn shortlists(&self) -> ShortlistService<'_> {
        ShortlistService::new(self)
    }

    pub fn recommendations(&self) -> RecommendationService<'_> {
        RecommendationService::new(self)
    }

    pub fn admin(&self) -> AdminService<'_> {
        AdminService::new(self)
    }
}

/// Serializes a request DTO, or yields the failure to return instead.
fn encode_body<B: Serialize, T>(body: &B) -> Result<Value, ApiResponse<T>> {
    serde_json::to_value(body)
        .map_err(|e| ApiResponse::failure(format!("Failed to encode request: {e}")))
}
