//! Interactive chat practice
//!
//! One open-ended question at a time. `/stats` prints difficulty and
//! streak, `/quit` or Ctrl-D leaves.

use anyhow::Context;
use colored::Colorize;
use rustyline::DefaultEditor;

use crate::api::{ChatAnswerResult, ChatReply};
use crate::chat::{ChatController, ChatStats};
use crate::commands::{authorized_service, read_line};
use crate::config::Config;
use crate::difficulty::DifficultyView;
use crate::error::Result;
use crate::storage::LocalStore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatInput<'a> {
    Quit,
    Stats,
    Empty,
    Answer(&'a str),
}

/// Pick the topic: explicit flag, then the stored selection, then config
pub(crate) fn resolve_topic(flag: Option<&str>, store: &LocalStore, config: &Config) -> String {
    flag.map(str::to_string)
        .or_else(|| store.selected_topic().map(str::to_string))
        .unwrap_or_else(|| config.chat.default_topic.clone())
}

/// Run chat practice until the user quits
///
/// # Errors
///
/// Returns error if no token is stored or the line editor fails
pub async fn run_chat(config: &Config, store: &mut LocalStore, topic: Option<String>) -> Result<()> {
    let service = authorized_service(config, store)?;
    let topic = resolve_topic(topic.as_deref(), store, config);
    store
        .save_selected_topic(&topic)
        .with_context(|| format!("Failed to remember topic {}", topic))?;

    let mut chat = ChatController::new(service, topic).with_advance_delay(config.chat.advance_delay());
    let mut rl = DefaultEditor::new()?;

    println!(
        "{} {}. Type your answer, /stats for your stats, /quit to leave.",
        "Practicing".bold(),
        chat.topic_display().cyan()
    );
    if chat.seed().await {
        println!("{}", render_stats(chat.stats()));
    }

    load_question(&mut chat, false).await;

    loop {
        let Some(line) = read_line(&mut rl, "> ")? else {
            break;
        };
        match parse_input(&line) {
            ChatInput::Quit => break,
            ChatInput::Empty => continue,
            ChatInput::Stats => println!("{}", render_stats(chat.stats())),
            ChatInput::Answer(_) if chat.current_question_id().is_none() => {
                println!("No question is waiting. Fetching one...");
                load_question(&mut chat, false).await;
            }
            ChatInput::Answer(answer) => {
                rl.add_history_entry(answer)?;
                match chat.submit_answer(answer).await {
                    Ok(result) => {
                        println!("{}", render_result(&result));
                        load_question(&mut chat, true).await;
                    }
                    Err(e) => println!("{} {}", "Error submitting answer:".red(), e),
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn load_question(chat: &mut ChatController, after_delay: bool) {
    let reply = if after_delay {
        chat.wait_and_next().await
    } else {
        chat.next_question().await
    };
    match reply {
        Ok(reply) => println!("\n{}", render_reply(&reply)),
        Err(e) => println!("{} {}", "Error loading question:".red(), e),
    }
}

fn parse_input(line: &str) -> ChatInput<'_> {
    match line.trim() {
        "" => ChatInput::Empty,
        "/quit" | "/exit" => ChatInput::Quit,
        "/stats" => ChatInput::Stats,
        other => ChatInput::Answer(other),
    }
}

fn render_reply(reply: &ChatReply) -> String {
    let header = format!("[{}] {}", reply.topic, DifficultyView::new(reply.difficulty));
    format!("{}\n{}", header.dimmed(), reply.response)
}

fn render_result(result: &ChatAnswerResult) -> String {
    let verdict = if result.is_correct {
        "Correct!".green().bold()
    } else {
        "Not quite.".red().bold()
    };
    let mut out = format!("{} {}", verdict, result.feedback);
    if !result.explanation.is_empty() {
        out.push_str(&format!("\n{}", result.explanation));
    }
    out.push_str(&format!(
        "\nDifficulty: {} | Streak: {}",
        DifficultyView::new(result.new_difficulty).colored_summary(),
        result.streak
    ));
    out
}

fn render_stats(stats: ChatStats) -> String {
    let difficulty = stats
        .difficulty
        .map(|d| DifficultyView::new(d).colored_summary().to_string())
        .unwrap_or_else(|| "-".to_string());
    let streak = stats
        .streak
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("Difficulty: {} | Streak: {}", difficulty, streak)
}
