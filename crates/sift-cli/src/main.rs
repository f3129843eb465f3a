//! Sift CLI - AI-assisted dataset profiling and cleaning.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Profile { file, json } => commands::profile::run(file, json),

        Commands::Audit {
            file,
            provider,
            apply_all,
            commit,
            output,
        } => commands::audit::run(file, provider, apply_all, commit, output),

        Commands::Query {
            file,
            query,
            sql,
            provider,
        } => commands::query::run(file, query, sql, provider),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "sift=debug,sift_cli=debug"
    } else {
        "sift=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
