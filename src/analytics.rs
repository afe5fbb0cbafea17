//! Learning analytics views
//!
//! Turns the performance, history, and progress records into tables.
//! Rendering is kept separate from fetching so output can be tested
//! without a server.

use prettytable::{cell, row, Table};

use crate::api::{HistoryEntry, PerformanceReport, ProgressSummary};
use crate::difficulty::{difficulty_label, DifficultyView};
use crate::quiz::format_percentage;
use crate::topics::display_name;

const DIFFICULTY_BAR_WIDTH: usize = 10;

/// Shown instead of a performance table when nothing has been answered
pub const NO_DATA_MESSAGE: &str =
    "No data yet. Start answering questions to see your performance analytics!";

/// Derived figures for the performance overview
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceView {
    pub total_questions: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: f64,
    pub average_difficulty: f64,
    pub strongest_topics: Vec<String>,
    pub weakest_topics: Vec<String>,
}

impl PerformanceView {
    /// `None` when no questions have been answered yet
    pub fn from_report(report: &PerformanceReport) -> Option<Self> {
        if report.total_questions == 0 {
            return None;
        }

        let total = report.total_questions;
        let correct = (f64::from(total) * report.accuracy / 100.0).round();
        let correct = (correct.max(0.0) as u32).min(total);

        Some(Self {
            total_questions: total,
            correct,
            incorrect: total - correct,
            accuracy: report.accuracy,
            average_difficulty: report.average_difficulty,
            strongest_topics: report.strongest_topics.iter().map(|t| display_name(t)).collect(),
            weakest_topics: report.weakest_topics.iter().map(|t| display_name(t)).collect(),
        })
    }

    pub fn has_topic_breakdown(&self) -> bool {
        !self.strongest_topics.is_empty()
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row![b => "Metric", "Value"]);
        table.add_row(row!["Total Questions", self.total_questions]);
        table.add_row(row!["Correct", self.correct]);
        table.add_row(row!["Incorrect", self.incorrect]);
        table.add_row(row!["Accuracy", format_percentage(self.accuracy)]);
        table.add_row(row![
            "Average Difficulty",
            format!(
                "{:.1} ({})",
                self.average_difficulty,
                difficulty_label(self.average_difficulty)
            )
        ]);
        table
    }

    /// Strongest and weakest topics side by side
    pub fn topic_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row![b => "Strongest", "Weakest"]);
        let rows = self.strongest_topics.len().max(self.weakest_topics.len());
        for i in 0..rows {
            let strong = self.strongest_topics.get(i).map(String::as_str).unwrap_or("");
            let weak = self.weakest_topics.get(i).map(String::as_str).unwrap_or("");
            table.add_row(row![strong, weak]);
        }
        table
    }
}

pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.add_row(row![b => "When", "Question", "Your Answer", "Result", "Difficulty"]);
    for entry in entries {
        let result = if entry.is_correct { "Correct" } else { "Incorrect" };
        table.add_row(row![
            short_timestamp(&entry.created_at),
            truncate(&entry.question, 60),
            truncate(&entry.user_answer, 40),
            result,
            format!("{:.1}", entry.difficulty)
        ]);
    }
    table
}

pub fn progress_table(summary: &ProgressSummary) -> Table {
    let topics = if summary.topics_covered.is_empty() {
        "-".to_string()
    } else {
        summary
            .topics_covered
            .iter()
            .map(|t| display_name(t))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut table = Table::new();
    table.add_row(row![b => "Metric", "Value"]);
    table.add_row(row!["Total Questions", summary.total_questions]);
    table.add_row(row!["Correct Answers", summary.correct_answers]);
    table.add_row(row!["Accuracy", format_percentage(summary.accuracy)]);
    let difficulty = DifficultyView::new(summary.current_difficulty);
    table.add_row(row![
        "Current Difficulty",
        format!(
            "{:.1} {}",
            summary.current_difficulty,
            difficulty.bar(DIFFICULTY_BAR_WIDTH)
        )
    ]);
    table.add_row(row!["Current Streak", summary.current_streak]);
    table.add_row(row!["Topics Covered", topics]);
    table
}

/// Trim an RFC 3339 timestamp to `YYYY-MM-DD HH:MM`, or pass it through
fn short_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        })
        .unwrap_or_else(|_| raw.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
