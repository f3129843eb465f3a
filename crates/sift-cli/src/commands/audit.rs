//! Audit command - run an AI audit and optionally apply and commit.

use std::path::PathBuf;

use colored::Colorize;
use sift::{
    ApplyOutcome, AuditOutcome, CleaningSession, CommitOutcome, Importance, SiftError,
    UsageCounters,
};

use crate::cli::ProviderChoice;

pub fn run(
    file: PathBuf,
    provider: ProviderChoice,
    apply_all: bool,
    commit: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_data_file(&file)?;
    let gateway = super::build_gateway(provider)?;
    let mut usage = UsageCounters::default();

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let mut session = CleaningSession::ingest(name, &text, &mut usage)?;

    println!(
        "{} {} ({} rows)",
        "Auditing".cyan().bold(),
        file.display().to_string().white(),
        session.committed().row_count()
    );

    match session.run_audit(&gateway, &mut usage)? {
        AuditOutcome::Completed { actions, insights } => {
            println!(
                "Found {} suggested actions, {} insights, {} validation rules",
                actions.to_string().white().bold(),
                insights,
                session.rules().len()
            );
        }
        AuditOutcome::Stale => unreachable!("single-session audit cannot go stale"),
    }

    for insight in session.insights() {
        let tag = match insight.importance {
            Importance::High => insight.importance.label().red(),
            Importance::Medium => insight.importance.label().yellow(),
            Importance::Low => insight.importance.label().blue(),
        };
        println!("  [{}] {}: {}", tag, insight.title.bold(), insight.description);
    }

    for action in session.actions() {
        println!(
            "  {} {} ({} rows affected)",
            action.id.dimmed(),
            action.title.bold(),
            action.affected_row_count
        );
        if !action.description.is_empty() {
            println!("      {}", action.description);
        }
    }

    if session.pending_actions().is_empty() {
        println!("{}", "No issues found - data looks clean!".green());
        return Ok(());
    }

    if !apply_all {
        println!();
        println!(
            "Run with {} to apply every suggestion",
            "--apply-all".cyan().bold()
        );
        return Ok(());
    }

    match session.apply_all(&gateway, &mut usage)? {
        ApplyOutcome::Applied { rows_replaced } => {
            println!(
                "{} {} sampled rows transformed",
                "Applied".green().bold(),
                rows_replaced
            );
        }
        ApplyOutcome::NoChange => {
            println!("{}", "Assistant made no changes".yellow());
        }
        ApplyOutcome::Stale => unreachable!("single-session apply cannot go stale"),
    }

    if commit {
        match session.commit() {
            CommitOutcome::Committed => {
                let output_path = output.unwrap_or_else(|| {
                    let mut p = file.clone();
                    let stem = p.file_stem().unwrap_or_default().to_string_lossy().into_owned();
                    p.set_file_name(format!("{}.cleaned.json", stem));
                    p
                });
                let rendered = serde_json::to_string_pretty(session.committed())
                    .map_err(SiftError::Json)?;
                std::fs::write(&output_path, rendered).map_err(|source| SiftError::Io {
                    path: output_path.clone(),
                    source,
                })?;
                println!(
                    "{} {}",
                    "Saved to".green().bold(),
                    output_path.display().to_string().white()
                );
            }
            CommitOutcome::Unchanged => {
                println!("Working copy unchanged, nothing to commit");
            }
        }
    }

    println!();
    println!(
        "Processed {} rows with {} AI calls",
        usage.rows_processed, usage.ai_calls
    );

    Ok(())
}
