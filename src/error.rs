//! Errors raised while resolving credentials.
//!
//! Only failures that point at a broken environment are errors. A provider with
//! nothing to offer, or with nothing for a particular hostname, reports
//! `Ok(None)` instead.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// A credential provider could not produce an answer.
///
/// Messages name the helper program and the hostname, never credentials or
/// anything the helper printed on stdout. Cloning is cheap, so one failed
/// evaluation can be handed to every caller that waited on it.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The helper program could not be started.
    #[error("failed to spawn credential helper {helper} for {hostname}: {source}")]
    Spawn {
        helper: String,
        hostname: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Talking to the helper over its stdio pipes failed.
    #[error("i/o error talking to credential helper {helper} for {hostname}: {source}")]
    Io {
        helper: String,
        hostname: String,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The helper did not answer in time and was killed.
    #[error("credential helper {helper} timed out after {timeout:?} for {hostname}")]
    Timeout {
        helper: String,
        hostname: String,
        timeout: Duration,
    },

    /// The helper was terminated by a signal instead of exiting.
    #[error("credential helper {helper} was terminated without an exit code for {hostname}")]
    Terminated { helper: String, hostname: String },
}

impl ProviderError {
    /// Name of the helper program involved in the failure.
    pub fn helper(&self) -> &str {
        match self {
            Self::Spawn { helper, .. }
            | Self::Io { helper, .. }
            | Self::Timeout { helper, .. }
            | Self::Terminated { helper, .. } => helper,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;
