//! Publish command handler

use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::sync::Arc;

use super::PublishCommands;
use crate::api::{AuthManager, SheetsClient};
use crate::config::Config;
use crate::news::{Emitted, RowOutcome, WriteBackReport};
use crate::pipeline::{self, RunSummary};

/// Run one publish pass with the given flags
pub async fn handle_publish_command(args: PublishCommands) -> Result<()> {
    let config = Config::load(args.config.as_deref(), &args.overrides())
        .context("Invalid configuration")?;

    info!("Connecting Google sheet client.....");
    let http = reqwest::Client::new();
    let auth = Arc::new(AuthManager::from_key_file(http.clone(), &config.key_file)?);
    let client = SheetsClient::new(http, auth.clone(), config.sheet_id.clone());
    client.connect().await?;
    info!(
        "Google sheet client connected as {} (sheet {})",
        auth.client_email(),
        client.spreadsheet_id()
    );

    let now = chrono::Local::now().naive_local();
    let summary = pipeline::run(&client, &config, now, args.dry_run).await?;

    if let Some(script) = &summary.script {
        println!("{}", script);
    }
    print_summary(&summary);

    match &summary.write_back {
        Some(report) => check_write_back(report),
        None => Ok(()),
    }
}

/// Fail when any row could not be flagged; skipped rows are not failures
pub fn check_write_back(report: &WriteBackReport) -> Result<()> {
    if report.failed() > 0 {
        anyhow::bail!(
            "{} of {} rows could not be marked as launched",
            report.failed(),
            report.outcomes.len()
        );
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    if summary.nothing_to_publish() {
        println!(
            "{} ({} rows read)",
            "There is no data which can be published".yellow(),
            summary.records_read
        );
        return;
    }

    println!(
        "Rows read: {}  pending: {}",
        summary.records_read,
        summary.pending.to_string().bright_green().bold()
    );

    match &summary.emitted {
        Some(Emitted::Written(path)) => {
            println!("Script: {}", path.display().to_string().bright_green());
        }
        Some(Emitted::Failed { path, error }) => {
            println!(
                "Script: {} {}",
                path.display().to_string().red(),
                format!("({})", error).dimmed()
            );
        }
        None => {}
    }

    if let Some(report) = &summary.write_back {
        print_write_back(report);
    }
}

fn print_write_back(report: &WriteBackReport) {
    for outcome in &report.outcomes {
        match outcome {
            RowOutcome::Updated { .. } => {}
            RowOutcome::Skipped { no, reason } => {
                println!("  {} row no-{}: {}", "skipped".yellow(), no, reason);
            }
            RowOutcome::Failed { no, error, .. } => {
                println!("  {} row no-{}: {}", "failed".red(), no, error);
            }
        }
    }

    println!(
        "{} rows affected ({} skipped, {} failed)",
        report.updated().to_string().bright_green().bold(),
        report.skipped(),
        report.failed()
    );
}
