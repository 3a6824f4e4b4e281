// src/core/session.rs
//! Explicit session object shared by the API client and its callers.
//!
//! The durable [`TokenStore`] is the source of truth. The in-memory copy is
//! refreshed or invalidated on every read and is only consulted when the
//! store cannot be read.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::token_store::{FileTokenStore, MemoryTokenStore, StoredCookie, TokenStore};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

const ACCESS_TOKEN_FALLBACK_HOURS: i64 = 24;
const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Debug, Default, Clone)]
struct CachedTokens {
    access: Option<String>,
    refresh: Option<String>,
}

impl CachedTokens {
    fn slot(&mut self, name: &str) -> &mut Option<String> {
        if name == ACCESS_TOKEN_COOKIE {
            &mut self.access
        } else {
            &mut self.refresh
        }
    }
}

pub struct Session {
    store: Arc<dyn TokenStore>,
    cache: RwLock<CachedTokens>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let session = Self {
            store,
            cache: RwLock::new(CachedTokens::default()),
        };
        session.access_token();
        session.refresh_token();
        session
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileTokenStore::new(path)))
    }

    pub fn access_token(&self) -> Option<String> {
        self.read_through(ACCESS_TOKEN_COOKIE)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read_through(REFRESH_TOKEN_COOKIE)
    }

    pub fn is_signed_in(&self) -> bool {
        self.access_token().is_some() || self.refresh_token().is_some()
    }

    /// Persists a new token pair.
    ///
    /// The access token expires at `expires_at`; an unparseable value falls
    /// back to 24 hours from now. The refresh token always lasts 7 days.
    pub fn set_tokens(&self, access: &str, refresh: &str, expires_at: &str) -> Result<()> {
        debug!(
            "Setting tokens, access token length: {}, expiresAt: {}",
            access.len(),
            expires_at
        );

        let now = Utc::now();
        let access_expiry = parse_expires_at(expires_at).unwrap_or_else(|| {
            warn!(
                "Invalid expiresAt '{}', using {}h fallback",
                expires_at, ACCESS_TOKEN_FALLBACK_HOURS
            );
            now + Duration::hours(ACCESS_TOKEN_FALLBACK_HOURS)
        });

        {
            let mut cache = self.cache.write();
            cache.access = Some(access.to_string());
            cache.refresh = Some(refresh.to_string());
        }

        self.store
            .save(StoredCookie::new(ACCESS_TOKEN_COOKIE, access, access_expiry))
            .context("Failed to store access token")?;
        self.store
            .save(StoredCookie::new(
                REFRESH_TOKEN_COOKIE,
                refresh,
                now + Duration::days(REFRESH_TOKEN_DAYS),
            ))
            .context("Failed to store refresh token")?;

        Ok(())
    }

    pub fn clear_tokens(&self) -> Result<()> {
        *self.cache.write() = CachedTokens::default();

        self.store
            .remove(ACCESS_TOKEN_COOKIE)
            .context("Failed to remove access token")?;
        self.store
            .remove(REFRESH_TOKEN_COOKIE)
            .context("Failed to remove refresh token")?;
        Ok(())
    }

    /// Live session cookies, for export to other HTTP tools.
    pub fn cookies(&self) -> Result<Vec<StoredCookie>> {
        self.store.all()
    }

    /// Unverified claims of the current access token.
    pub fn token_claims(&self) -> Option<TokenClaims> {
        let token = self.access_token()?;
        match decode_claims(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Access token claims unavailable: {:#}", e);
                None
            }
        }
    }

    fn read_through(&self, name: &str) -> Option<String> {
        let mut cache = self.cache.write();
        let slot = cache.slot(name);
        match self.store.load(name) {
            Ok(Some(cookie)) => {
                *slot = Some(cookie.value.clone());
                Some(cookie.value)
            }
            Ok(None) => {
                if slot.take().is_some() {
                    debug!("{} no longer stored, dropping cached copy", name);
                }
                None
            }
            Err(e) => {
                warn!("Token store unreadable, using cached {}: {:#}", name, e);
                slot.clone()
            }
        }
    }
}

/// Parses the server's `expiresAt`: RFC 3339, or a naive ISO timestamp taken
/// as UTC.
pub fn parse_expires_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Reads JWT claims without checking the signature; display only.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .context("Access token is not a readable JWT")?;
    Ok(data.claims)
}
