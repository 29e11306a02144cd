//! Docker credential helper support

use crate::auth::{hostname, AuthConfig};
use crate::constants::helper;
use crate::error::{ProviderError, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// How helper programs are located and how long they may run
#[derive(Debug, Clone)]
pub struct HelperSettings {
    pub timeout: Duration,
    /// Overrides `PATH` when looking up helper programs; empty finds nothing
    pub search_path: Option<OsString>,
}

impl Default for HelperSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(helper::DEFAULT_TIMEOUT_SECS),
            search_path: None,
        }
    }
}

/// Response from a Docker credential helper
#[derive(Deserialize)]
struct HelperResponse {
    #[serde(rename = "Username", default)]
    username: Option<String>,
    #[serde(rename = "Secret", default)]
    secret: Option<String>,
}

/// Resolves credentials by running a `docker-credential-<name>` program
#[derive(Debug, Clone)]
pub struct CredentialHelperAuthProvider {
    program_name: String,
    program: Option<PathBuf>,
    timeout: Duration,
}

impl CredentialHelperAuthProvider {
    /// Look up the helper named `name` (`foo` or `docker-credential-foo`)
    pub fn new(name: &str, settings: &HelperSettings) -> Self {
        let program_name = if name.starts_with(helper::PROGRAM_PREFIX) {
            name.to_string()
        } else {
            format!("{}{}", helper::PROGRAM_PREFIX, name)
        };

        let found = match &settings.search_path {
            Some(search_path) if search_path.is_empty() => None,
            Some(search_path) => std::env::current_dir().ok().and_then(|cwd| {
                which::which_in(&program_name, Some(search_path), cwd).ok()
            }),
            None => which::which(&program_name).ok(),
        };

        match &found {
            Some(path) => debug!("Found credential helper {} at {}", program_name, path.display()),
            None => debug!("Credential helper {} not found on path", program_name),
        }

        Self {
            program_name,
            program: found,
            timeout: settings.timeout,
        }
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// True when the helper program was found
    pub fn is_applicable(&self) -> bool {
        self.program.is_some()
    }

    /// Ask the helper for credentials for `hostname`
    pub async fn get_auth_config(&self, hostname: &str) -> Result<Option<AuthConfig>> {
        let Some(program) = &self.program else {
            return Ok(None);
        };

        let server_url = hostname::helper_server_url(hostname);
        debug!(
            "Executing credential helper: {} for {}",
            self.program_name, server_url
        );

        let mut child = Command::new(program)
            .arg("get")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProviderError::Spawn {
                helper: self.program_name.clone(),
                hostname: hostname.to_string(),
                source: Arc::new(source),
            })?;

        let stdin = child.stdin.take();
        let exchange = async move {
            if let Some(mut stdin) = stdin {
                // A helper may exit without reading its input
                match stdin.write_all(format!("{}\n", server_url).as_bytes()).await {
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            child.wait_with_output().await
        };

        let output = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(output) => output.map_err(|source| ProviderError::Io {
                helper: self.program_name.clone(),
                hostname: hostname.to_string(),
                source: Arc::new(source),
            })?,
            Err(_) => {
                warn!(
                    "Credential helper {} timed out after {:?}",
                    self.program_name, self.timeout
                );
                return Err(ProviderError::Timeout {
                    helper: self.program_name.clone(),
                    hostname: hostname.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            let Some(code) = output.status.code() else {
                return Err(ProviderError::Terminated {
                    helper: self.program_name.clone(),
                    hostname: hostname.to_string(),
                });
            };

            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stdout.contains(helper::NOT_FOUND) || stderr.contains(helper::NOT_FOUND) {
                debug!("{} has no credentials for {}", self.program_name, server_url);
            } else {
                warn!(
                    "Credential helper {} exited with status {} for {}",
                    self.program_name, code, server_url
                );
            }
            return Ok(None);
        }

        let response: HelperResponse = match serde_json::from_slice(&output.stdout) {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    "Failed to parse response from credential helper {}: {}",
                    self.program_name, e
                );
                return Ok(None);
            }
        };

        let secret = match response.secret {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                debug!("{} returned an empty secret for {}", self.program_name, server_url);
                return Ok(None);
            }
        };

        let auth = match response.username {
            Some(username) if username == helper::TOKEN_USERNAME => {
                AuthConfig::with_identity_token(hostname, None, secret)
            }
            username => {
                AuthConfig::basic(hostname, username.unwrap_or_default(), secret)
            }
        };

        Ok(Some(auth))
    }
}
