// src/core/api_client.rs
//! Authenticated HTTP client for the Bixo API.
//!
//! Every call returns an [`ApiResponse`]; transport errors, 401s and
//! malformed bodies are folded into it rather than returned as `Err`.

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::session::Session;
use crate::environment::ClientConfig;
use crate::types::{normalize_response, ApiResponse};
use crate::utils;

const REFRESH_ENDPOINT: &str = "/auth/refresh";

/// Token pair returned by the refresh endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshedTokens {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_at: String,
}

// ===== Multipart Bodies =====

#[derive(Debug, Clone)]
enum UploadPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// Multipart body that can be rebuilt, so an upload can be replayed after a
/// token refresh.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    parts: Vec<UploadPart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(UploadPart::Text {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    /// Adds a file part; the content type is guessed from `file_name`.
    pub fn file(self, name: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        let content_type = utils::content_type_for(file_name);
        self.file_with_type(name, file_name, content_type, bytes)
    }

    pub fn file_with_type(
        mut self,
        name: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(UploadPart::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        self
    }

    /// Reads `path` into a single file part named `field`.
    pub async fn from_path(field: &str, path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self::new().file(field, &file_name, bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn to_form(&self) -> Result<Form> {
        let mut form = Form::new();
        for part in &self.parts {
            form = match part {
                UploadPart::Text { name, value } => form.text(name.clone(), value.clone()),
                UploadPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => form.part(
                    name.clone(),
                    Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(content_type)
                        .context("Failed to create multipart")?,
                ),
            };
        }
        Ok(form)
    }
}

// ===== Client =====

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Result<Self> {
        Self::build(base_url.into(), session, None)
    }

    /// Client with a file-backed session, as configured.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let session = Arc::new(Session::from_file(&config.session_path));
        Self::build(config.api_url.clone(), session, config.timeout_seconds)
    }

    fn build(base_url: String, session: Arc<Session>, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn set_tokens(&self, access: &str, refresh: &str, expires_at: &str) -> Result<()> {
        self.session.set_tokens(access, refresh, expires_at)
    }

    pub fn clear_tokens(&self) -> Result<()> {
        self.session.clear_tokens()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> ApiResponse<T> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> ApiResponse<T> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        self.request(Method::DELETE, path, None).await
    }

    /// POSTs a multipart body. No JSON content type is set; reqwest supplies
    /// the multipart boundary header.
    pub async fn upload_file<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &MultipartBody,
    ) -> ApiResponse<T> {
        let url = self.url(path);
        self.execute(path, |token| {
            let mut request = self.client.post(&url).multipart(body.to_form()?);
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
            Ok(request)
        })
        .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResponse<T> {
        let url = self.url(path);
        let payload = body.map(|b| b.to_string());

        self.execute(path, |token| {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .header(CONTENT_TYPE, "application/json");
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
            if let Some(payload) = &payload {
                request = request.body(payload.clone());
            }
            Ok(request)
        })
        .await
    }

    async fn execute<T, F>(&self, path: &str, build: F) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        F: Fn(Option<&str>) -> Result<RequestBuilder>,
    {
        match self.send_with_refresh(path, build).await {
            Ok((status, body)) => {
                debug!("Response from {}: {}", path, status);
                normalize_response(status, &body).into_typed()
            }
            Err(e) => {
                error!("API request error for {}: {:#}", path, e);
                ApiResponse::failure(e.to_string())
            }
        }
    }

    /// Sends once; on 401 with a refresh token, refreshes and retries once.
    async fn send_with_refresh<F>(&self, path: &str, build: F) -> Result<(StatusCode, String)>
    where
        F: Fn(Option<&str>) -> Result<RequestBuilder>,
    {
        let token = self.session.access_token();
        debug!("Request to {} - auth header set: {}", path, token.is_some());

        let mut response = build(token.as_deref())?.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.session.refresh_token().is_some() {
            match self.refresh_access_token().await {
                Some(new_token) => {
                    response = build(Some(new_token.as_str()))?.send().await?;
                    if response.status() == StatusCode::UNAUTHORIZED {
                        warn!("Request to {} still unauthorized after token refresh", path);
                    }
                }
                None => info!("Token refresh failed, returning 401 for {}", path),
            }
        }

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Single refresh attempt; `None` on any failure.
    async fn refresh_access_token(&self) -> Option<String> {
        let refresh_token = self.session.refresh_token()?;
        let url = self.url(REFRESH_ENDPOINT);

        let response = match self
            .client
            .post(&url)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Token refresh request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Token refresh rejected with status {}", status);
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read token refresh response: {}", e);
                return None;
            }
        };

        let refreshed: ApiResponse<RefreshedTokens> = normalize_response(status, &body).into_typed();
        let tokens = match refreshed {
            ApiResponse {
                success: true,
                data: Some(tokens),
                ..
            } => tokens,
            other => {
                warn!(
                    "Token refresh returned no usable tokens: {}",
                    other.error_or("empty payload")
                );
                return None;
            }
        };

        if let Err(e) = self
            .session
            .set_tokens(&tokens.access_token, &tokens.refresh_token, &tokens.expires_at)
        {
            warn!("Failed to persist refreshed tokens: {:#}", e);
        }

        info!("Access token refreshed");
        Some(tokens.access_token)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
