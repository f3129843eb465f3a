//! Query command - evaluate a query against a sampled dataset.

use std::path::PathBuf;

use colored::Colorize;
use sift::{CleaningSession, QueryExecutor, QueryMode, SiftError, UsageCounters};

use crate::cli::ProviderChoice;

pub fn run(
    file: PathBuf,
    query: String,
    sql: bool,
    provider: ProviderChoice,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_data_file(&file)?;
    let gateway = super::build_gateway(provider)?;
    let mut usage = UsageCounters::default();

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let session = CleaningSession::ingest(name, &text, &mut usage)?;

    let mode = if sql {
        QueryMode::Sql
    } else {
        QueryMode::NaturalLanguage
    };
    println!(
        "{} {} query against {}",
        "Running".cyan().bold(),
        mode.label(),
        file.display().to_string().white()
    );

    let result = QueryExecutor::new(&gateway).run(&session, &query, mode, &mut usage)?;

    if result.rows.is_empty() {
        println!("{}", "No matching rows".yellow());
        return Ok(());
    }

    let rendered = serde_json::to_string_pretty(&result.rows).map_err(SiftError::Json)?;
    println!("{}", rendered);

    if let Some(chart) = result.chart {
        println!();
        println!(
            "{} {} chart \"{}\" ({} vs {})",
            "Suggested".green().bold(),
            chart.chart_type,
            chart.title,
            chart.x_axis,
            chart.y_axis
        );
    }

    Ok(())
}
