//! Credentials from a Docker `config.json`

use super::credential_helper::{CredentialHelperAuthProvider, HelperSettings};
use crate::auth::docker_config::{self, DockerAuthEntry, DockerConfig};
use crate::auth::{decode_basic_auth, hostname, AuthConfig};
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config file contents keyed by normalized hostname
#[derive(Debug, Clone)]
struct LoadedConfig {
    path: PathBuf,
    auths: HashMap<String, DockerAuthEntry>,
    cred_helpers: HashMap<String, String>,
    creds_store: Option<String>,
    /// Every helper the file names, looked up once at load
    helpers: HashMap<String, CredentialHelperAuthProvider>,
}

/// Hostname-keyed credentials from the Docker config file
#[derive(Debug, Clone, Default)]
pub struct ConfigFileAuthProvider {
    loaded: Option<LoadedConfig>,
}

impl ConfigFileAuthProvider {
    /// Load from the first Docker config found in the usual locations
    pub fn discover(helpers: HelperSettings) -> Self {
        match docker_config::discover_path() {
            Some(path) => Self::load(&path, helpers),
            None => {
                debug!("No Docker config file found");
                Self::default()
            }
        }
    }

    /// Load the Docker config at `path`
    ///
    /// A missing or malformed file leaves the provider not applicable. The
    /// helpers named in `credHelpers` and `credsStore` are located here, once.
    pub fn load(path: &Path, helpers: HelperSettings) -> Self {
        let loaded = if path.is_file() {
            match DockerConfig::load_from_path(path) {
                Ok(config) => Some(LoadedConfig::new(path, config, &helpers)),
                Err(e) => {
                    warn!("Ignoring Docker config: {:#}", e);
                    None
                }
            }
        } else {
            debug!("No Docker config at {}", path.display());
            None
        };

        Self { loaded }
    }

    pub fn path(&self) -> Option<&Path> {
        self.loaded.as_ref().map(|loaded| loaded.path.as_path())
    }

    pub fn is_applicable(&self) -> bool {
        self.loaded.is_some()
    }

    pub async fn get_auth_config(&self, hostname: &str) -> Result<Option<AuthConfig>> {
        let Some(loaded) = &self.loaded else {
            return Ok(None);
        };

        // Per-registry helpers take precedence over stored entries
        if let Some(helper) = loaded.cred_helpers.get(hostname) {
            debug!("Delegating {} to credential helper {}", hostname, helper);
            return loaded.delegate(helper, hostname).await;
        }

        let Some(entry) = loaded.auths.get(hostname) else {
            debug!("No entry for {} in {}", hostname, loaded.path.display());
            return Ok(None);
        };

        if entry.has_no_secret() {
            if let Some(store) = &loaded.creds_store {
                debug!("Delegating {} to credential store {}", hostname, store);
                return loaded.delegate(store, hostname).await;
            }
            debug!("Entry for {} has no credentials, using anonymous", hostname);
            return Ok(Some(AuthConfig::anonymous(hostname)));
        }

        Ok(entry_to_auth_config(entry, hostname))
    }
}

impl LoadedConfig {
    fn new(path: &Path, config: DockerConfig, settings: &HelperSettings) -> Self {
        let cred_helpers = normalize_keys(config.cred_helpers);
        let creds_store = config.creds_store.filter(|store| !store.is_empty());

        let mut helpers = HashMap::new();
        for name in cred_helpers.values().chain(creds_store.iter()) {
            helpers
                .entry(name.clone())
                .or_insert_with(|| CredentialHelperAuthProvider::new(name, settings));
        }

        Self {
            path: path.to_path_buf(),
            auths: normalize_keys(config.auths),
            cred_helpers,
            creds_store,
            helpers,
        }
    }

    async fn delegate(&self, helper: &str, hostname: &str) -> Result<Option<AuthConfig>> {
        match self.helpers.get(helper) {
            Some(provider) if provider.is_applicable() => provider.get_auth_config(hostname).await,
            _ => {
                warn!(
                    "Credential helper {} configured for {} is not installed",
                    helper, hostname
                );
                Ok(None)
            }
        }
    }
}

/// Re-key a map by normalized hostname
///
/// When several keys collide, a key already in normal form wins, then the
/// lexicographically smallest.
fn normalize_keys<V>(map: HashMap<String, V>) -> HashMap<String, V> {
    let mut entries: Vec<(String, V)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut normalized: HashMap<String, V> = HashMap::new();
    for (raw, value) in entries {
        let key = hostname::normalize(&raw);
        if raw == key || !normalized.contains_key(&key) {
            normalized.insert(key, value);
        }
    }
    normalized
}

fn entry_to_auth_config(entry: &DockerAuthEntry, hostname: &str) -> Option<AuthConfig> {
    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

    let decoded = match non_empty(&entry.auth) {
        Some(encoded) => match decode_basic_auth(&encoded) {
            Some(pair) => Some(pair),
            None => {
                warn!("Failed to decode auth for {}", hostname);
                return None;
            }
        },
        None => None,
    };

    if let Some(token) = non_empty(&entry.identity_token) {
        let username = non_empty(&entry.username).or(decoded.map(|(user, _)| user));
        return Some(AuthConfig::with_identity_token(hostname, username, token));
    }

    if let Some((username, password)) = decoded {
        return Some(AuthConfig::basic(hostname, username, password));
    }

    match (non_empty(&entry.username), non_empty(&entry.password)) {
        (username, Some(password)) => Some(AuthConfig::basic(
            hostname,
            username.unwrap_or_default(),
            password,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> DockerAuthEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_entry_with_encoded_auth() {
        let auth = entry_to_auth_config(&entry(r#"{"auth": "dXNlcjpwYXNz"}"#), "ghcr.io").unwrap();
        assert_eq!(auth, AuthConfig::basic("ghcr.io", "user", "pass"));
    }

    #[test]
    fn test_entry_with_username_and_password() {
        let auth = entry_to_auth_config(
            &entry(r#"{"username": "alice", "password": "secret"}"#),
            "ghcr.io",
        )
        .unwrap();
        assert_eq!(auth, AuthConfig::basic("ghcr.io", "alice", "secret"));
    }

    #[test]
    fn test_entry_with_identity_token() {
        let auth = entry_to_auth_config(
            &entry(r#"{"auth": "YWxpY2U6", "identitytoken": "tok"}"#),
            "myregistry.azurecr.io",
        )
        .unwrap();
        assert_eq!(auth.identity_token(), Some("tok"));
        assert_eq!(auth.username(), Some("alice"));
        assert_eq!(auth.password(), None);
    }

    #[test]
    fn test_entry_with_undecodable_auth() {
        assert!(entry_to_auth_config(&entry(r#"{"auth": "!!!"}"#), "ghcr.io").is_none());
    }

    #[test]
    fn test_normalize_keys_prefers_exact_key() {
        let mut map = HashMap::new();
        map.insert("https://index.docker.io/v1/".to_string(), "url");
        map.insert("index.docker.io".to_string(), "exact");
        map.insert("Docker.io".to_string(), "alias");

        let normalized = normalize_keys(map);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized["index.docker.io"], "exact");
    }

    #[test]
    fn test_normalize_keys_rewrites_urls() {
        let mut map = HashMap::new();
        map.insert("https://ghcr.io".to_string(), 1);
        map.insert("localhost:5000".to_string(), 2);

        let normalized = normalize_keys(map);
        assert_eq!(normalized["ghcr.io"], 1);
        assert_eq!(normalized["localhost:5000"], 2);
    }
}
