//! Profile command - parse a data file and print its column profile.

use std::path::PathBuf;

use colored::Colorize;
use sift::{Dataset, SiftError};

pub fn run(file: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_data_file(&file)?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let dataset = Dataset::ingest(name, &text)?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&dataset.column_stats).map_err(SiftError::Json)?;
        println!("{}", rendered);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns)",
        "Profiled".cyan().bold(),
        file.display().to_string().white(),
        dataset.row_count(),
        dataset.column_count()
    );
    println!();
    println!(
        "  {:<20} {:<12} {:>8} {:>8}  {}",
        "COLUMN".bold(),
        "TYPE".bold(),
        "UNIQUE".bold(),
        "MISSING".bold(),
        "RANGE".bold()
    );

    for stats in &dataset.column_stats {
        let range = match (stats.min, stats.max, stats.avg) {
            (Some(min), Some(max), Some(avg)) => {
                format!("{} .. {} (avg {:.2})", min, max, avg)
            }
            _ => String::new(),
        };
        let missing = if stats.missing_count > 0 {
            stats.missing_count.to_string().yellow().to_string()
        } else {
            stats.missing_count.to_string()
        };

        println!(
            "  {:<20} {:<12} {:>8} {:>8}  {}",
            stats.column,
            stats.inferred_type.label(),
            stats.unique_count,
            missing,
            range
        );
    }

    println!();
    println!("Fingerprint: {}", dataset.fingerprint.dimmed());

    Ok(())
}
