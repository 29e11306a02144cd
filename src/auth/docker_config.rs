//! Docker config file parsing and discovery

use crate::constants::docker_config as locations;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Docker config file structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DockerConfig {
    /// Registry authentication entries
    #[serde(default)]
    pub auths: HashMap<String, DockerAuthEntry>,
    /// Registry-specific credential helpers
    #[serde(rename = "credHelpers", default)]
    pub cred_helpers: HashMap<String, String>,
    /// Default credential store to use
    #[serde(rename = "credsStore", skip_serializing_if = "Option::is_none")]
    pub creds_store: Option<String>,
}

/// Entry in the Docker config auths section
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct DockerAuthEntry {
    /// Base64-encoded username:password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Identity token for token-based login
    #[serde(rename = "identitytoken", skip_serializing_if = "Option::is_none")]
    pub identity_token: Option<String>,
}

impl DockerAuthEntry {
    /// True when the entry carries no secret of its own
    pub fn has_no_secret(&self) -> bool {
        is_blank(&self.auth) && is_blank(&self.password) && is_blank(&self.identity_token)
    }
}

impl std::fmt::Debug for DockerAuthEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("DockerAuthEntry")
            .field("auth", &redact(&self.auth))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("identity_token", &redact(&self.identity_token))
            .finish()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl DockerConfig {
    /// Parse a Docker config from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse Docker config")
    }

    /// Read and parse a Docker config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Docker config at {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid Docker config at {}", path.display()))?;
        debug!("Loaded Docker config from: {}", path.display());
        Ok(config)
    }
}

/// Get paths to check for Docker config, most specific first
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(docker_config) = std::env::var(locations::DOCKER_CONFIG) {
        paths.push(PathBuf::from(docker_config).join(locations::FILE_NAME));
    }

    if let Ok(auth_file) = std::env::var(locations::REGISTRY_AUTH_FILE) {
        paths.push(PathBuf::from(auth_file));
    }

    if let Ok(xdg_runtime) = std::env::var(locations::XDG_RUNTIME_DIR) {
        paths.push(PathBuf::from(xdg_runtime).join("containers/auth.json"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".docker").join(locations::FILE_NAME));
    }

    paths
}

/// First Docker config path that exists
pub fn discover_path() -> Option<PathBuf> {
    config_paths().into_iter().find(|path| path.is_file())
}
