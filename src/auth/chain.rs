//! Ordered provider chain

use super::AuthConfig;
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::provider::{
    AuthProvider, ConfigFileAuthProvider, CredentialHelperAuthProvider, EnvironmentAuthProvider,
    PropertiesFileAuthProvider,
};
use tracing::debug;

/// Providers tried in order, first match wins
#[derive(Debug, Clone)]
pub struct ProviderChain {
    providers: Vec<AuthProvider>,
}

impl ProviderChain {
    /// Create a chain, ordering providers by precedence
    ///
    /// The sort is stable, so providers of the same kind keep the order given.
    pub fn new(mut providers: Vec<AuthProvider>) -> Self {
        providers.sort_by_key(AuthProvider::precedence);
        Self { providers }
    }

    /// Build the default chain from configuration
    pub fn from_config(config: &ResolverConfig) -> Self {
        let helpers = config.helper_settings();
        let mut providers: Vec<AuthProvider> =
            vec![EnvironmentAuthProvider::from_env(&config.environment).into()];

        if let Some(path) = config
            .properties_file
            .clone()
            .or_else(PropertiesFileAuthProvider::default_path)
        {
            providers.push(PropertiesFileAuthProvider::load(&path).into());
        }

        let config_file = match &config.docker_config {
            Some(path) => ConfigFileAuthProvider::load(path, helpers.clone()),
            None => ConfigFileAuthProvider::discover(helpers.clone()),
        };
        providers.push(config_file.into());

        if let Some(helper) = &config.credential_helper {
            providers.push(CredentialHelperAuthProvider::new(helper, &helpers).into());
        }

        Self::new(providers)
    }

    pub fn providers(&self) -> &[AuthProvider] {
        &self.providers
    }

    /// Resolve credentials for an already normalized hostname
    ///
    /// Providers that are not applicable are skipped. A provider error stops
    /// the chain.
    pub async fn resolve(&self, hostname: &str) -> Result<Option<AuthConfig>> {
        for provider in &self.providers {
            if !provider.is_applicable() {
                debug!("Provider {} not applicable", provider.name());
                continue;
            }

            if let Some(auth) = provider.get_auth_config(hostname).await? {
                debug!("Provider {} matched {}", provider.name(), hostname);
                return Ok(Some(auth));
            }

            debug!("Provider {} has nothing for {}", provider.name(), hostname);
        }

        debug!("No credentials found for {}, using anonymous", hostname);
        Ok(None)
    }
}
