//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Grabarr - Request movies and shows from Radarr and Sonarr
#[derive(Parser, Debug)]
#[command(name = "grabarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config.toml (default: user config dir)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Request a movie
    Movie {
        /// Title to search for
        #[arg(value_name = "TITLE", required = true, num_args = 1..)]
        title: Vec<String>,

        /// Name to request as (default: current user)
        #[arg(long = "as", value_name = "NAME")]
        requester: Option<String>,
    },

    /// Request a show
    Show {
        /// Title to search for
        #[arg(value_name = "TITLE", required = true, num_args = 1..)]
        title: Vec<String>,

        /// Name to request as (default: current user)
        #[arg(long = "as", value_name = "NAME")]
        requester: Option<String>,
    },

    /// Check that both backends are reachable and configured
    Check,
}
