//! CLI argument definitions using clap
//!
//! Commands:
//! - keyplan validate --config <path>
//! - keyplan plan --config <path>
//! - keyplan explain --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// keyplan - access-pattern planner for hash/range key stores
#[derive(Parser, Debug)]
#[command(name = "keyplan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate the configured schema
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./keyplan.json")]
        config: PathBuf,
    },

    /// Plan a single query read from stdin
    Plan {
        /// Path to configuration file
        #[arg(long, default_value = "./keyplan.json")]
        config: PathBuf,
    },

    /// Explain index selection for a single query read from stdin
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./keyplan.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
