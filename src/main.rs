use anyhow::{Context, Result};
use clap::Parser;
use dockauth::{
    auth::hostname,
    cli::{Cli, Commands},
    config::ResolverConfig,
    provider::AuthProvider,
    AuthConfig, Resolver,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ResolverConfig::load_from(path)?,
        None => ResolverConfig::load()?,
    };
    debug!("Using configuration: {:?}", config);

    match cli.command {
        Commands::Resolve { hosts, image } => {
            let resolver = Resolver::from_config(&config);

            for host in hosts {
                let registry = if image {
                    hostname::extract_registry(&host).to_string()
                } else {
                    host.clone()
                };

                let auth = resolver
                    .resolve(&registry)
                    .await
                    .with_context(|| format!("Failed to resolve credentials for {}", host))?;

                println!("{}\t{}", hostname::normalize(&registry), describe(auth.as_ref()));
            }
        }
        Commands::Providers => {
            let resolver = Resolver::from_config(&config);

            for provider in resolver.chain().providers() {
                let state = if provider.is_applicable() {
                    "applicable"
                } else {
                    "not applicable"
                };
                match source_of(provider) {
                    Some(source) => println!("{}\t{}\t{}", provider.name(), state, source),
                    None => println!("{}\t{}", provider.name(), state),
                }
            }
        }
        Commands::Version => {
            println!("dockauth {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// One-line summary of a resolution that never includes the secret
fn describe(auth: Option<&AuthConfig>) -> String {
    match auth {
        None => "no credentials".to_string(),
        Some(auth) => match auth.credential() {
            None => "anonymous".to_string(),
            Some(credential) => format!(
                "username={} credential={}",
                auth.username().unwrap_or("-"),
                credential.kind()
            ),
        },
    }
}

fn source_of(provider: &AuthProvider) -> Option<String> {
    match provider {
        AuthProvider::PropertiesFile(p) => p.path().map(|path| path.display().to_string()),
        AuthProvider::ConfigFile(p) => p.path().map(|path| path.display().to_string()),
        AuthProvider::CredentialHelper(p) => Some(p.program_name().to_string()),
        AuthProvider::Environment(_) => None,
    }
}
