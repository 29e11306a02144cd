//! Credentials taken from environment variables

use crate::auth::{decode_basic_auth, AuthConfig};
use crate::config::EnvironmentVars;
use tracing::{debug, warn};

/// Hostname-agnostic override read from the environment
///
/// The variables are read once, when the provider is built.
#[derive(Clone, Default)]
pub struct EnvironmentAuthProvider {
    credentials: Option<(String, String)>,
}

impl EnvironmentAuthProvider {
    /// Read the configured variables from the process environment
    pub fn from_env(vars: &EnvironmentVars) -> Self {
        Self::from_lookup(vars, |name| std::env::var(name).ok())
    }

    /// Read the configured variables through `lookup`
    pub fn from_lookup<F>(vars: &EnvironmentVars, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let (Some(username), Some(password)) = (get(&vars.username), get(&vars.password)) {
            debug!("Using credentials from {} and {}", vars.username, vars.password);
            return Self {
                credentials: Some((username, password)),
            };
        }

        if let Some(encoded) = get(&vars.auth) {
            match decode_basic_auth(&encoded) {
                Some(credentials) => {
                    debug!("Using credentials from {}", vars.auth);
                    return Self {
                        credentials: Some(credentials),
                    };
                }
                None => warn!(
                    "Ignoring {}: expected base64 encoded username:password",
                    vars.auth
                ),
            }
        }

        Self::default()
    }

    pub fn is_applicable(&self) -> bool {
        self.credentials.is_some()
    }

    /// The same credentials apply to every hostname
    pub fn get_auth_config(&self, hostname: &str) -> Option<AuthConfig> {
        self.credentials
            .as_ref()
            .map(|(username, password)| AuthConfig::basic(hostname, username, password))
    }
}

impl std::fmt::Debug for EnvironmentAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentAuthProvider")
            .field("username", &self.credentials.as_ref().map(|(u, _)| u))
            .finish_non_exhaustive()
    }
}
