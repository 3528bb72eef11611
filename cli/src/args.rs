//! Command-line parsing.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hubview")]
#[command(about = "Browse a content hub from the terminal")]
#[command(version)]
pub struct Cli {
    /// Hub API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List remote registries
    Registries {
        /// Query string, e.g. 'page=2&name__icontains=quay'
        #[arg(default_value = "")]
        query: String,
        /// Keep refreshing while any registry sync is running
        #[arg(long, short = 'w')]
        watch: bool,
    },
    /// List users
    Users {
        #[arg(default_value = "")]
        query: String,
    },
    /// List assignable roles
    Roles {
        #[arg(default_value = "")]
        query: String,
    },
    /// List namespaces
    Namespaces {
        #[arg(default_value = "")]
        query: String,
    },
    /// Show one user
    User { id: String },
}
