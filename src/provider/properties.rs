//! Credentials from a build-system properties file

use crate::auth::{decode_basic_auth, AuthConfig, Credential};
use crate::constants::properties as keys;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Hostname-agnostic override read from a `key=value` properties file
#[derive(Clone, Default)]
pub struct PropertiesFileAuthProvider {
    path: Option<PathBuf>,
    credentials: Option<(Option<String>, Credential)>,
}

impl PropertiesFileAuthProvider {
    /// Default location: `~/.dockauth.properties`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(keys::FILE_NAME))
    }

    /// Load the properties file at `path`
    ///
    /// A missing or unreadable file leaves the provider not applicable.
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            debug!("No properties file at {}", path.display());
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read properties file at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let properties = parse_properties(&content);
        let credentials = credentials_from(&properties);
        if credentials.is_none() {
            debug!("No registry credentials in {}", path.display());
        }

        Self {
            path: Some(path.to_path_buf()),
            credentials,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_applicable(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn get_auth_config(&self, hostname: &str) -> Option<AuthConfig> {
        self.credentials.as_ref().map(|(username, credential)| {
            AuthConfig::with_credential(hostname, username.clone(), Some(credential.clone()))
        })
    }
}

impl std::fmt::Debug for PropertiesFileAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertiesFileAuthProvider")
            .field("path", &self.path)
            .field("applicable", &self.is_applicable())
            .finish()
    }
}

fn credentials_from(properties: &HashMap<String, String>) -> Option<(Option<String>, Credential)> {
    let get = |key: &str| properties.get(key).filter(|v| !v.is_empty()).cloned();
    let username = get(keys::USERNAME);

    if let Some(token) = get(keys::IDENTITY_TOKEN) {
        return Some((username, Credential::IdentityToken(token)));
    }

    if let (Some(username), Some(password)) = (username, get(keys::PASSWORD)) {
        return Some((Some(username), Credential::Password(password)));
    }

    let encoded = get(keys::AUTH)?;
    match decode_basic_auth(&encoded) {
        Some((username, password)) => Some((Some(username), Credential::Password(password))),
        None => {
            warn!(
                "Ignoring {}: expected base64 encoded username:password",
                keys::AUTH
            );
            None
        }
    }
}

/// Parse `key=value` / `key: value` lines, skipping `#` and `!` comments
fn parse_properties(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(|line| match line.find(['=', ':']) {
            Some(idx) => (line[..idx].trim(), line[idx + 1..].trim()),
            None => (line, ""),
        })
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
