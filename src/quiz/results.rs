//! Display formatting for quiz figures

use crate::api::QuizResults;

/// `125 -> "2m 5s"`
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// `70.0 -> "70.0%"`
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Final results as `(label, value)` rows, in display order
pub fn result_rows(results: &QuizResults) -> Vec<(&'static str, String)> {
    vec![
        ("Total Questions", results.total_questions.to_string()),
        ("Correct Answers", results.correct_answers.to_string()),
        ("Score", format_percentage(results.score_percentage)),
        ("Time Taken", format_elapsed(results.time_taken_seconds)),
        ("Final Difficulty", format!("{:.1}", results.final_difficulty)),
    ]
}
