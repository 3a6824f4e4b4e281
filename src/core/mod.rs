// src/core/mod.rs
//! Session handling and the authenticated HTTP client

pub mod api_client;
pub mod auth;
pub mod session;
pub mod token_store;

pub use api_client::{ApiClient, MultipartBody};
pub use auth::{AuthSession, CandidateRegistration, CompanyRegistration};
pub use session::{Session, TokenClaims, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoredCookie, TokenStore};
