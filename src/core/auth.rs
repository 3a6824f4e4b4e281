// src/core/auth.rs
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::api_client::ApiClient;
use crate::types::{ApiResponse, AuthResponse, UserResponse, UserType};

const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_CANDIDATE_ENDPOINT: &str = "/auth/register/candidate";
const REGISTER_COMPANY_ENDPOINT: &str = "/auth/register/company";
const CURRENT_USER_ENDPOINT: &str = "/auth/me";

#[derive(Debug, Clone)]
pub struct CandidateRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct CompanyRegistration {
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub industry: String,
}

/// Signed-in user state on top of an [`ApiClient`].
pub struct AuthSession {
    api: Arc<ApiClient>,
    user: RwLock<Option<UserResponse>>,
}

impl AuthSession {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            user: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn user(&self) -> Option<UserResponse> {
        self.user.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some()
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.user.read().as_ref().map(|u| u.user_type)
    }

    /// Looks up the current user; keeps the cached user on failure.
    pub async fn check_auth(&self) -> ApiResponse<UserResponse> {
        let response: ApiResponse<UserResponse> = self.api.get(CURRENT_USER_ENDPOINT).await;
        if let (true, Some(user)) = (response.success, response.data.as_ref()) {
            *self.user.write() = Some(user.clone());
        }
        response
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResponse<AuthResponse> {
        let response = self
            .api
            .post(
                LOGIN_ENDPOINT,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        self.complete_sign_in(response, "Login failed").await
    }

    pub async fn register_candidate(
        &self,
        registration: &CandidateRegistration,
    ) -> ApiResponse<AuthResponse> {
        let response = self
            .api
            .post(
                REGISTER_CANDIDATE_ENDPOINT,
                Some(json!({
                    "email": registration.email,
                    "password": registration.password,
                    "firstName": registration.first_name,
                    "lastName": registration.last_name,
                })),
            )
            .await;
        self.complete_sign_in(response, "Registration failed").await
    }

    pub async fn register_company(
        &self,
        registration: &CompanyRegistration,
    ) -> ApiResponse<AuthResponse> {
        let response = self
            .api
            .post(
                REGISTER_COMPANY_ENDPOINT,
                Some(json!({
                    "email": registration.email,
                    "password": registration.password,
                    "companyName": registration.company_name,
                    "industry": registration.industry,
                })),
            )
            .await;
        self.complete_sign_in(response, "Registration failed").await
    }

    pub fn logout(&self) -> anyhow::Result<()> {
        *self.user.write() = None;
        self.api.clear_tokens()?;
        info!("Signed out");
        Ok(())
    }

    async fn complete_sign_in(
        &self,
        response: ApiResponse<AuthResponse>,
        fallback_error: &str,
    ) -> ApiResponse<AuthResponse> {
        let auth = match (response.success, response.data.as_ref()) {
            (true, Some(auth)) => auth,
            _ => return ApiResponse::failure(response.error_or(fallback_error)),
        };

        if let Err(e) = self
            .api
            .set_tokens(&auth.access_token, &auth.refresh_token, &auth.expires_at)
        {
            return ApiResponse::failure(format!("{fallback_error}: {e:#}"));
        }

        info!("Signed in as {} ({})", auth.email, auth.user_type);

        let me = self.check_auth().await;
        if !me.success {
            warn!(
                "Signed in but current user lookup failed: {}",
                me.error_or("unknown error")
            );
        }

        response
    }
}
