//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sift: AI-assisted dataset profiling and cleaning
#[derive(Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a delimited data file: column types, missing values, stats
    Profile {
        /// Path to the data file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Audit a data file for quality issues and optionally clean it
    Audit {
        /// Path to the data file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reasoning provider to use
        #[arg(long, default_value = "anthropic")]
        provider: ProviderChoice,

        /// Apply every suggested action after the audit
        #[arg(long)]
        apply_all: bool,

        /// Commit applied changes and write the cleaned dataset
        #[arg(long, requires = "apply_all")]
        commit: bool,

        /// Output path for the cleaned dataset (default: <file>.cleaned.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a natural language or SQL query against a data file
    Query {
        /// Path to the data file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// The query text
        #[arg(value_name = "QUERY")]
        query: String,

        /// Interpret the query as SQL instead of natural language
        #[arg(long)]
        sql: bool,

        /// Reasoning provider to use
        #[arg(long, default_value = "anthropic")]
        provider: ProviderChoice,
    },
}

/// Reasoning provider choice
#[derive(Clone, Debug, Default)]
pub enum ProviderChoice {
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    #[default]
    Anthropic,
    /// Scripted mock provider for offline use
    Mock,
}

impl std::str::FromStr for ProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderChoice::Anthropic),
            "mock" | "test" => Ok(ProviderChoice::Mock),
            _ => Err(format!("Unknown provider: {}. Use: anthropic or mock.", s)),
        }
    }
}

impl std::fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderChoice::Anthropic => write!(f, "anthropic"),
            ProviderChoice::Mock => write!(f, "mock"),
        }
    }
}
