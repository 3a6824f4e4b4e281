// src/environment.rs
//! Client configuration: environment variables, then an optional YAML file,
//! then built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const CONFIG_FILE: &str = "config.yaml";
const SESSION_FILE: &str = "session.json";
const LOG_FILE: &str = "bixo.log";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_path: PathBuf,
    pub log_path: PathBuf,
    /// Per-request timeout; requests run to completion when unset.
    pub timeout_seconds: Option<u64>,
}

/// One environment section of `config.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
struct EnvironmentSection {
    api_url: Option<String>,
    session_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentSection,
    #[serde(default)]
    production: EnvironmentSection,
}

impl ClientConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let config_path = std::env::var("BIXO_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| bixo_home().join(CONFIG_FILE));

        info!(
            "Loading client configuration for environment: {}",
            environment
        );

        let section = Self::load_section(&config_path, &environment)?;
        let mut config = Self::from_section(section, &bixo_home());

        if let Ok(url) = std::env::var("BIXO_API_URL") {
            config.api_url = url;
        }
        config.api_url = trim_base_url(&config.api_url);

        Ok(config)
    }

    /// Defaults rooted at `home`, without reading files or variables.
    pub fn with_home(home: &Path) -> Self {
        Self::from_section(EnvironmentSection::default(), home)
    }

    pub fn with_api_url(mut self, url: impl AsRef<str>) -> Self {
        self.api_url = trim_base_url(url.as_ref());
        self
    }

    pub fn with_session_path(mut self, path: PathBuf) -> Self {
        self.session_path = path;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Active config section: `BIXO_ENV`, then `ENVIRONMENT`, then `local`.
    pub fn get_environment() -> String {
        resolve_environment(
            std::env::var("BIXO_ENV").ok(),
            std::env::var("ENVIRONMENT").ok(),
        )
    }

    fn load_section(path: &Path, environment: &str) -> Result<EnvironmentSection> {
        if !path.exists() {
            return Ok(EnvironmentSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    fn from_section(section: EnvironmentSection, home: &Path) -> Self {
        Self {
            api_url: trim_base_url(section.api_url.as_deref().unwrap_or(DEFAULT_API_URL)),
            session_path: section
                .session_path
                .unwrap_or_else(|| home.join(SESSION_FILE)),
            log_path: section.log_path.unwrap_or_else(|| home.join(LOG_FILE)),
            timeout_seconds: section.timeout_seconds,
        }
    }
}

/// Returns the Bixo home directory: `BIXO_HOME`, else `~/.bixo`.
pub fn bixo_home() -> PathBuf {
    if let Ok(home) = std::env::var("BIXO_HOME") {
        return PathBuf::from(home);
    }

    dirs::home_dir()
        .map(|h| h.join(".bixo"))
        .unwrap_or_else(|| PathBuf::from(".bixo"))
}

fn resolve_environment(bixo_env: Option<String>, environment: Option<String>) -> String {
    bixo_env
        .or(environment)
        .unwrap_or_else(|| "local".to_string())
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
