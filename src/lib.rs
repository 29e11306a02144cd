pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod provider;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use auth::{AuthConfig, Credential, ProviderChain};
pub use error::{ProviderError, Result};
pub use resolver::Resolver;
