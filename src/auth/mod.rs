//! Authentication module for container registries and Docker daemons
//!
//! This module holds the resolved credential record, the Docker config file
//! model, hostname normalization, and the provider chain that decides which
//! credential source answers for a hostname.

use base64::Engine;
use serde::Serialize;
use std::fmt;

pub mod chain;
pub mod docker_config;
pub mod hostname;

pub use chain::ProviderChain;
pub use docker_config::{DockerAuthEntry, DockerConfig};

/// The secret half of a login.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Plain password, sent with the username.
    Password(String),
    /// Token obtained from a token-based login.
    IdentityToken(String),
}

impl Credential {
    /// Short label for the credential kind, safe to print
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Password(_) => "password",
            Credential::IdentityToken(_) => "identity-token",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(<redacted>)", self.kind())
    }
}

/// Resolved credentials for one registry hostname
///
/// Carries at most one of a password or an identity token. A record with
/// neither means the hostname is explicitly configured for anonymous access.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    server_address: String,
    username: Option<String>,
    credential: Option<Credential>,
}

impl AuthConfig {
    /// Create an AuthConfig with username and password
    pub fn basic(
        server_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_credential(
            server_address,
            Some(username.into()),
            Some(Credential::Password(password.into())),
        )
    }

    /// Create an AuthConfig from an identity token
    pub fn with_identity_token(
        server_address: impl Into<String>,
        username: Option<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::with_credential(
            server_address,
            username,
            Some(Credential::IdentityToken(token.into())),
        )
    }

    /// Create an anonymous AuthConfig
    pub fn anonymous(server_address: impl Into<String>) -> Self {
        Self::with_credential(server_address, None, None)
    }

    pub fn with_credential(
        server_address: impl Into<String>,
        username: Option<String>,
        credential: Option<Credential>,
    ) -> Self {
        let server_address = server_address.into();
        debug_assert!(!server_address.is_empty(), "server address must not be empty");
        Self {
            server_address,
            username: username.filter(|u| !u.is_empty()),
            credential,
        }
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn password(&self) -> Option<&str> {
        match &self.credential {
            Some(Credential::Password(password)) => Some(password),
            _ => None,
        }
    }

    pub fn identity_token(&self) -> Option<&str> {
        match &self.credential {
            Some(Credential::IdentityToken(token)) => Some(token),
            _ => None,
        }
    }

    /// Check if this is anonymous authentication
    pub fn is_anonymous(&self) -> bool {
        self.credential.is_none()
    }

    /// Convert to an HTTP `Authorization` header value
    pub fn to_authorization_header(&self) -> Option<String> {
        match &self.credential {
            Some(Credential::IdentityToken(token)) => Some(format!("Bearer {}", token)),
            Some(Credential::Password(password)) => {
                let username = self.username.as_deref().unwrap_or_default();
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                Some(format!("Basic {}", encoded))
            }
            None => None,
        }
    }

    /// Convert to a Docker Engine API `X-Registry-Auth` header value
    pub fn to_registry_auth_header(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct EngineAuth<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            username: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            password: Option<&'a str>,
            #[serde(rename = "identitytoken", skip_serializing_if = "Option::is_none")]
            identity_token: Option<&'a str>,
            #[serde(rename = "serveraddress")]
            server_address: &'a str,
        }

        let json = serde_json::to_vec(&EngineAuth {
            username: self.username(),
            password: self.password(),
            identity_token: self.identity_token(),
            server_address: &self.server_address,
        })?;

        Ok(base64::engine::general_purpose::URL_SAFE.encode(json))
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("server_address", &self.server_address)
            .field("username", &self.username)
            .field("credential", &self.credential)
            .finish()
    }
}

/// Decode a base64 `username:password` pair as stored in Docker's `auth` field
pub fn decode_basic_auth(encoded: &str) -> Option<(String, String)> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
