//! Credential providers
//!
//! Each provider is one credential source. A provider first reports whether it
//! has any configuration at all, then answers for a specific hostname. The set
//! of sources is closed, and the variant order below is the precedence order.

pub mod config_file;
pub mod credential_helper;
pub mod environment;
pub mod properties;

pub use config_file::ConfigFileAuthProvider;
pub use credential_helper::{CredentialHelperAuthProvider, HelperSettings};
pub use environment::EnvironmentAuthProvider;
pub use properties::PropertiesFileAuthProvider;

use crate::auth::AuthConfig;
use crate::error::Result;

/// A single credential source
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// Explicit override from environment variables
    Environment(EnvironmentAuthProvider),
    /// Build-system override from a properties file
    PropertiesFile(PropertiesFileAuthProvider),
    /// Docker `config.json`
    ConfigFile(ConfigFileAuthProvider),
    /// A default credential helper program
    CredentialHelper(CredentialHelperAuthProvider),
}

impl AuthProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AuthProvider::Environment(_) => "environment",
            AuthProvider::PropertiesFile(_) => "properties-file",
            AuthProvider::ConfigFile(_) => "config-file",
            AuthProvider::CredentialHelper(_) => "credential-helper",
        }
    }

    /// Lower values are consulted first
    pub fn precedence(&self) -> u8 {
        match self {
            AuthProvider::Environment(_) => 0,
            AuthProvider::PropertiesFile(_) => 1,
            AuthProvider::ConfigFile(_) => 2,
            AuthProvider::CredentialHelper(_) => 3,
        }
    }

    /// Whether this provider has any configuration loaded
    pub fn is_applicable(&self) -> bool {
        match self {
            AuthProvider::Environment(provider) => provider.is_applicable(),
            AuthProvider::PropertiesFile(provider) => provider.is_applicable(),
            AuthProvider::ConfigFile(provider) => provider.is_applicable(),
            AuthProvider::CredentialHelper(provider) => provider.is_applicable(),
        }
    }

    /// Credentials for `hostname`, if this provider has any
    ///
    /// Only meaningful once [`AuthProvider::is_applicable`] returned true.
    pub async fn get_auth_config(&self, hostname: &str) -> Result<Option<AuthConfig>> {
        match self {
            AuthProvider::Environment(provider) => Ok(provider.get_auth_config(hostname)),
            AuthProvider::PropertiesFile(provider) => Ok(provider.get_auth_config(hostname)),
            AuthProvider::ConfigFile(provider) => provider.get_auth_config(hostname).await,
            AuthProvider::CredentialHelper(provider) => provider.get_auth_config(hostname).await,
        }
    }
}

impl From<EnvironmentAuthProvider> for AuthProvider {
    fn from(provider: EnvironmentAuthProvider) -> Self {
        AuthProvider::Environment(provider)
    }
}

impl From<PropertiesFileAuthProvider> for AuthProvider {
    fn from(provider: PropertiesFileAuthProvider) -> Self {
        AuthProvider::PropertiesFile(provider)
    }
}

impl From<ConfigFileAuthProvider> for AuthProvider {
    fn from(provider: ConfigFileAuthProvider) -> Self {
        AuthProvider::ConfigFile(provider)
    }
}

impl From<CredentialHelperAuthProvider> for AuthProvider {
    fn from(provider: CredentialHelperAuthProvider) -> Self {
        AuthProvider::CredentialHelper(provider)
    }
}
