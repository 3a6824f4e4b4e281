// src/core/token_store.rs
//! Durable token storage.
//!
//! Tokens are kept as cookie-like records (name, value, expiry, path) so the
//! session can be handed to a browser or `curl` unchanged. The file store is
//! re-read on every access: another process logging in or out is observed on
//! the next request. Token values are never logged.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const COOKIE_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

fn default_cookie_path() -> String {
    COOKIE_PATH.to_string()
}

impl StoredCookie {
    pub fn new(name: &str, value: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            expires_at,
            path: default_cookie_path(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `Set-Cookie` header value, site-wide and `SameSite=Lax`.
    pub fn set_cookie_header(&self) -> String {
        format!(
            "{}={}; Path={}; Expires={}; SameSite=Lax",
            self.name,
            self.value,
            self.path,
            self.expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
        )
    }
}

/// Durable storage behind a [`crate::core::Session`].
pub trait TokenStore: Send + Sync {
    /// Returns the cookie if present and not expired.
    fn load(&self, name: &str) -> Result<Option<StoredCookie>>;

    fn save(&self, cookie: StoredCookie) -> Result<()>;

    fn remove(&self, name: &str) -> Result<()>;

    /// All live cookies.
    fn all(&self) -> Result<Vec<StoredCookie>>;
}

// ===== File Store =====

#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieJar {
    #[serde(default)]
    cookies: BTreeMap<String, StoredCookie>,
}

/// JSON cookie jar on disk, written with owner-only permissions.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_jar(&self) -> Result<CookieJar> {
        if !self.path.exists() {
            return Ok(CookieJar::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        if contents.trim().is_empty() {
            return Ok(CookieJar::default());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    fn write_jar(&self, jar: &CookieJar) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(jar).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, name: &str) -> Result<Option<StoredCookie>> {
        let jar = self.read_jar()?;
        let now = Utc::now();
        Ok(jar
            .cookies
            .get(name)
            .filter(|c| !c.is_expired(now))
            .cloned())
    }

    fn save(&self, cookie: StoredCookie) -> Result<()> {
        // An unreadable jar is replaced rather than blocking a fresh login.
        let mut jar = self.read_jar().unwrap_or_default();
        jar.cookies.insert(cookie.name.clone(), cookie);
        self.write_jar(&jar)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let mut jar = self.read_jar().unwrap_or_default();
        if jar.cookies.remove(name).is_some() {
            self.write_jar(&jar)?;
        }
        Ok(())
    }

    fn all(&self) -> Result<Vec<StoredCookie>> {
        let now = Utc::now();
        Ok(self
            .read_jar()?
            .cookies
            .into_values()
            .filter(|c| !c.is_expired(now))
            .collect())
    }
}

// ===== Memory Store =====

/// Process-local store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    cookies: Mutex<BTreeMap<String, StoredCookie>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, name: &str) -> Result<Option<StoredCookie>> {
        let now = Utc::now();
        Ok(self
            .cookies
            .lock()
            .get(name)
            .filter(|c| !c.is_expired(now))
            .cloned())
    }

    fn save(&self, cookie: StoredCookie) -> Result<()> {
        self.cookies.lock().insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.cookies.lock().remove(name);
        Ok(())
    }

    fn all(&self) -> Result<Vec<StoredCookie>> {
        let now = Utc::now();
        Ok(self
            .cookies
            .lock()
            .values()
            .filter(|c| !c.is_expired(now))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn cookie(name: &str, value: &str, ttl: Duration) -> StoredCookie {
        StoredCookie::new(name, value, Utc::now() + ttl)
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileTokenStore::new(&path)
            .save(cookie("accessToken", "abc", Duration::hours(1)))
            .unwrap();

        let reopened = FileTokenStore::new(&path);
        let loaded = reopened.load("accessToken").unwrap().unwrap();
        assert_eq!(loaded.value, "abc");
        assert_eq!(loaded.path, "/");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        store
            .save(cookie("refreshToken", "r", Duration::days(7)))
            .unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_expired_cookie_reads_as_absent() {
        let store = MemoryTokenStore::new();
        store
            .save(cookie("accessToken", "old", -Duration::minutes(1)))
            .unwrap();

        assert!(store.load("accessToken").unwrap().is_none());
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert!(store.load("accessToken").unwrap().is_none());

        store
            .save(cookie("accessToken", "abc", Duration::hours(1)))
            .unwrap();
        store.remove("accessToken").unwrap();
        assert!(store.load("accessToken").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        assert!(FileTokenStore::new(&path).load("accessToken").is_err());
    }

    #[test]
    fn test_set_cookie_header() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let header = StoredCookie::new("accessToken", "abc", expires).set_cookie_header();
        assert_eq!(
            header,
            "accessToken=abc; Path=/; Expires=Wed, 02 Jan 2030 03:04:05 GMT; SameSite=Lax"
        );
    }
}
