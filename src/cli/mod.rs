use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockauth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to dockauth/config.toml in the user config dir)
    #[arg(long, global = true, env = "DOCKAUTH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve which credentials would be used for registry hostnames
    Resolve {
        /// Registry or daemon hostnames (e.g., ghcr.io, https://index.docker.io/v1/)
        #[arg(value_name = "HOST", required = true)]
        hosts: Vec<String>,

        /// Treat arguments as image references and resolve their registries
        #[arg(long)]
        image: bool,
    },

    /// List credential providers in precedence order
    Providers,

    /// Show version information
    Version,
}
