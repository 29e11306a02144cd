use crate::constants::{env, helper};
use crate::provider::HelperSettings;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Seconds a credential helper may run before it is killed
    #[serde(default = "default_helper_timeout_secs")]
    pub helper_timeout_secs: u64,

    /// Docker config file to use instead of the usual locations
    pub docker_config: Option<PathBuf>,

    /// Properties file to use instead of `~/.dockauth.properties`
    pub properties_file: Option<PathBuf>,

    /// Credential helper consulted after the config file
    pub credential_helper: Option<String>,

    /// Directories searched for credential helpers instead of `PATH`
    #[serde(default)]
    pub helper_dirs: Vec<PathBuf>,

    /// Environment variable names
    #[serde(default)]
    pub environment: EnvironmentVars,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentVars {
    #[serde(default = "default_username_var")]
    pub username: String,

    #[serde(default = "default_password_var")]
    pub password: String,

    /// Base64 `username:password`
    #[serde(default = "default_auth_var")]
    pub auth: String,
}

fn default_helper_timeout_secs() -> u64 {
    helper::DEFAULT_TIMEOUT_SECS
}

fn default_username_var() -> String {
    env::USERNAME.to_string()
}

fn default_password_var() -> String {
    env::PASSWORD.to_string()
}

fn default_auth_var() -> String {
    env::AUTH.to_string()
}

impl Default for EnvironmentVars {
    fn default() -> Self {
        Self {
            username: default_username_var(),
            password: default_password_var(),
            auth: default_auth_var(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            helper_timeout_secs: default_helper_timeout_secs(),
            docker_config: None,
            properties_file: None,
            credential_helper: None,
            helper_dirs: Vec::new(),
            environment: EnvironmentVars::default(),
        }
    }
}

impl ResolverConfig {
    /// Load `dockauth/config.toml` from the user config dir, or defaults
    pub fn load() -> anyhow::Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("dockauth").join("config.toml");
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }
        Ok(ResolverConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ResolverConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .helper_search_path()
            .with_context(|| format!("Invalid helper_dirs in {}", path.display()))?;
        Ok(config)
    }

    pub fn helper_timeout(&self) -> Duration {
        Duration::from_secs(self.helper_timeout_secs)
    }

    /// `helper_dirs` joined into a search path, `None` to search `PATH`
    pub fn helper_search_path(&self) -> anyhow::Result<Option<OsString>> {
        if self.helper_dirs.is_empty() {
            return Ok(None);
        }
        let joined = std::env::join_paths(&self.helper_dirs)
            .context("helper directory contains the path separator")?;
        Ok(Some(joined))
    }

    /// Helper lookup settings
    ///
    /// Directories that cannot be joined into a search path leave nothing to
    /// search, so no helper is found rather than falling back to `PATH`.
    pub fn helper_settings(&self) -> HelperSettings {
        let search_path = match self.helper_search_path() {
            Ok(search_path) => search_path,
            Err(e) => {
                warn!("Ignoring helper_dirs: {:#}", e);
                Some(OsString::new())
            }
        };

        HelperSettings {
            timeout: self.helper_timeout(),
            search_path,
        }
    }
}
