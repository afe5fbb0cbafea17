//! Analytics commands
//!
//! Each command fetches one record set and prints it as a table, or as
//! pretty JSON with `--json`.

use colored::Colorize;
use serde::Serialize;

use crate::analytics::{history_table, progress_table, PerformanceView, NO_DATA_MESSAGE};
use crate::api::QuizService;
use crate::commands::authorized_service;
use crate::config::Config;
use crate::error::Result;
use crate::storage::LocalStore;

/// Show aggregate performance
///
/// # Errors
///
/// Returns error if no token is stored or the request fails
pub async fn show_performance(config: &Config, store: &LocalStore, json: bool) -> Result<()> {
    let service = authorized_service(config, store)?;
    let report = service.performance().await.map_err(|e| {
        tracing::error!("Failed to load analytics: {:#}", e);
        e
    })?;

    if json {
        return print_json(&report);
    }

    let Some(view) = PerformanceView::from_report(&report) else {
        println!("{}", NO_DATA_MESSAGE);
        return Ok(());
    };

    println!("{}", "Performance Overview".bold());
    view.summary_table().printstd();
    if view.has_topic_breakdown() {
        println!("\n{}", "Topic Breakdown".bold());
        view.topic_table().printstd();
    }
    Ok(())
}

/// Show the most recent answers, newest first as returned
///
/// # Errors
///
/// Returns error if no token is stored or the request fails
pub async fn show_history(config: &Config, store: &LocalStore, limit: u32, json: bool) -> Result<()> {
    let service = authorized_service(config, store)?;
    let entries = service.history(limit).await.map_err(|e| {
        tracing::error!(limit, "Failed to load history: {:#}", e);
        e
    })?;

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No answered questions yet.");
        return Ok(());
    }
    history_table(&entries).printstd();
    Ok(())
}

/// Show the overall progress summary
///
/// # Errors
///
/// Returns error if no token is stored or the request fails
pub async fn show_progress(config: &Config, store: &LocalStore, json: bool) -> Result<()> {
    let service = authorized_service(config, store)?;
    let summary = service.progress_summary().await.map_err(|e| {
        tracing::error!("Failed to load progress summary: {:#}", e);
        e
    })?;

    if json {
        return print_json(&summary);
    }
    println!("{}", "Progress Summary".bold());
    progress_table(&summary).printstd();
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
