//! Interactive multiple-choice quiz
//!
//! Reads option letters from the line editor, shows feedback for the
//! reveal delay, and prints the final results with the option to retake.

use colored::Colorize;
use prettytable::{cell, row, Table};
use rustyline::DefaultEditor;

use crate::api::{Question, QuizResults};
use crate::commands::{authorized_service, confirm, read_line};
use crate::config::{Config, MAX_QUESTION_COUNT};
use crate::difficulty::DifficultyView;
use crate::error::{Result, SecquizError};
use crate::quiz::results::{format_elapsed, result_rows};
use crate::quiz::{Advanced, AnswerFeedback, QuizController, QuizSession, QuizState};
use crate::storage::LocalStore;
use crate::topics::{option_id_from_letter, option_letter, QuizTopic};

const PROGRESS_BAR_WIDTH: usize = 20;

/// How one attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Completed,
    Quit,
}

/// What the user typed at the answer prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerInput {
    Option(u32),
    Quit,
    Invalid,
}

/// Run a quiz for `topic` until the user quits or declines a retake
///
/// # Errors
///
/// Returns error for an unknown topic, an out-of-range count, a missing
/// token, or a failed start request
pub async fn run_quiz(
    config: &Config,
    store: &LocalStore,
    topic: &str,
    count: Option<u32>,
) -> Result<()> {
    let topic: QuizTopic = topic.parse()?;
    let count = resolve_count(count, config)?;
    let service = authorized_service(config, store)?;

    let mut controller = QuizController::new(service).with_reveal_delay(config.quiz.reveal_delay());
    let mut rl = DefaultEditor::new()?;

    println!(
        "{} {} ({} questions). Type a letter to answer, q to quit.",
        "Starting".bold(),
        topic.title().cyan(),
        count
    );
    controller.start(topic, Some(count)).await?;

    loop {
        match play(&mut controller, &mut rl).await? {
            Finish::Quit => break,
            Finish::Completed => {
                if !confirm(&mut rl, "Take the quiz again?", false)? {
                    break;
                }
                controller.retake().await?;
            }
        }
    }

    controller.exit();
    Ok(())
}

async fn play(controller: &mut QuizController, rl: &mut DefaultEditor) -> Result<Finish> {
    loop {
        match controller.state() {
            QuizState::Unanswered => {
                let Some(session) = controller.session() else {
                    return Ok(Finish::Quit);
                };
                println!("\n{}", render_question(session));

                if !answer_current(controller, rl).await? {
                    return Ok(Finish::Quit);
                }
            }
            QuizState::Completing => match controller.complete().await {
                Ok(results) => {
                    println!("\n{}", "Quiz complete!".bold().green());
                    results_table(results).printstd();
                    return Ok(Finish::Completed);
                }
                Err(e) => {
                    println!("{} {}", "Error completing quiz:".red(), e);
                    if !can_retry(&e) || !confirm(rl, "Retry?", true)? {
                        return Ok(Finish::Quit);
                    }
                }
            },
            QuizState::Complete => return Ok(Finish::Completed),
            QuizState::Revealing | QuizState::Uninitialized => return Ok(Finish::Quit),
        }
    }
}

/// Prompt until the current question is answered and advanced
///
/// Returns `false` if the user quit.
async fn answer_current(controller: &mut QuizController, rl: &mut DefaultEditor) -> Result<bool> {
    loop {
        let Some(line) = read_line(rl, "Your answer: ")? else {
            return Ok(false);
        };
        let option_id = match parse_answer(&line) {
            AnswerInput::Quit => return Ok(false),
            AnswerInput::Invalid => {
                println!("Type an option letter, or q to quit.");
                continue;
            }
            AnswerInput::Option(id) => id,
        };
        if !controller.select_option(option_id) {
            println!("{} is not one of the options.", option_letter(option_id));
            continue;
        }

        let question = controller
            .session()
            .and_then(QuizSession::current_question)
            .cloned()
            .ok_or_else(|| SecquizError::InvalidState("no question is displayed".into()))?;

        let outcome = match controller.submit_answer().await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return Ok(true),
            Err(e) => {
                println!("{} {}", "Error submitting answer:".red(), e);
                continue;
            }
        };

        println!("{}", render_feedback(&question, &outcome.feedback));
        return Ok(match controller.wait_and_advance(outcome.pending).await {
            Advanced::NextQuestion | Advanced::ReadyToComplete => true,
            Advanced::Stale | Advanced::Cancelled => false,
        });
    }
}

/// Question count from the flag or config, within what the service accepts
fn resolve_count(flag: Option<u32>, config: &Config) -> Result<u32> {
    let count = flag.unwrap_or(config.quiz.question_count);
    if count == 0 || count > MAX_QUESTION_COUNT {
        return Err(SecquizError::Config(format!(
            "--count must be between 1 and {}",
            MAX_QUESTION_COUNT
        ))
        .into());
    }
    Ok(count)
}

fn can_retry(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SecquizError>()
        .map_or(false, SecquizError::is_retryable)
}

fn parse_answer(line: &str) -> AnswerInput {
    let input = line.trim();
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return AnswerInput::Quit;
    }
    if let Ok(id) = input.parse::<u32>() {
        return AnswerInput::Option(id);
    }
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => option_id_from_letter(c)
            .map(AnswerInput::Option)
            .unwrap_or(AnswerInput::Invalid),
        _ => AnswerInput::Invalid,
    }
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:.0}%",
        "=".repeat(filled),
        " ".repeat(PROGRESS_BAR_WIDTH - filled),
        percent
    )
}

fn render_question(session: &QuizSession) -> String {
    let progress = session.progress();
    let difficulty = DifficultyView::new(session.difficulty());
    let mut out = format!(
        "Question {} of {} {}\nDifficulty: {} | Score: {} | Streak: {} | Elapsed: {}\n",
        progress.position,
        progress.total,
        progress_bar(progress.percent()),
        difficulty.colored_summary(),
        session.score(),
        session.streak(),
        format_elapsed(session.elapsed_seconds())
    );
    if let Some(question) = session.current_question() {
        out.push_str(&format!("\n{}\n", question.question_text.bold()));
        for option in &question.options {
            out.push_str(&format!("  {}) {}\n", option_letter(option.id), option.text));
        }
    }
    out
}

fn render_feedback(question: &Question, feedback: &AnswerFeedback) -> String {
    let verdict = if feedback.is_correct {
        format!("Correct! {}", feedback.explanation).green()
    } else {
        format!("Incorrect. {}", feedback.explanation).red()
    };

    let mut out = format!("{}\n", verdict);
    for option in &question.options {
        let line = format!("  {}) {}", option_letter(option.id), option.text);
        if option.id == feedback.correct_option_id {
            out.push_str(&format!("{} {}\n", line.green(), "✓".green()));
        } else if option.id == feedback.selected_option_id {
            out.push_str(&format!("{} {}\n", line.red(), "✗".red()));
        } else {
            out.push_str(&format!("{}\n", line));
        }
    }
    out.push_str(&format!(
        "Score: {} | Streak: {} | Difficulty: {}",
        feedback.score,
        feedback.streak,
        DifficultyView::new(feedback.difficulty).colored_summary()
    ));
    out
}

fn results_table(results: &QuizResults) -> Table {
    let mut table = Table::new();
    for (label, value) in result_rows(results) {
        table.add_row(row![b -> label, value]);
    }
    table
}
