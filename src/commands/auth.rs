//! Account commands
//!
//! Login and register talk to the service without a token; the token
//! returned by login is written to the local store.

use anyhow::Context;
use colored::Colorize;
use prettytable::{cell, row, Table};
use rustyline::DefaultEditor;

use crate::api::{HttpQuizService, QuizService, RegisterRequest, UserInfo};
use crate::commands::{authorized_service, read_line};
use crate::config::Config;
use crate::difficulty::DifficultyView;
use crate::error::{Result, SecquizError};
use crate::storage::LocalStore;

const DIFFICULTY_BAR_WIDTH: usize = 10;

/// Log in and persist the issued token
///
/// # Errors
///
/// Returns error if the credentials are rejected or the token cannot be
/// stored
pub async fn login(
    config: &Config,
    store: &mut LocalStore,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let password = resolve_password(password)?;
    let service = HttpQuizService::new(&config.server)?;
    login_with(&service, store, username, &password).await?;
    println!("{} Logged in as {}", "✓".green(), username.bold());
    Ok(())
}

/// Create an account, then log in with the same credentials
///
/// # Errors
///
/// Returns error if registration or the follow-up login fails
pub async fn register(
    config: &Config,
    store: &mut LocalStore,
    email: &str,
    username: &str,
    password: Option<String>,
    full_name: Option<String>,
) -> Result<()> {
    let password = resolve_password(password)?;
    let service = HttpQuizService::new(&config.server)?;

    let request = RegisterRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: password.clone(),
        full_name,
    };
    let user = service.register(&request).await.map_err(|e| {
        tracing::error!(username, "Registration failed: {:#}", e);
        e
    })?;
    tracing::info!(user_id = user.id, "Registered account");

    login_with(&service, store, username, &password).await?;
    println!(
        "{} Account created. Logged in as {}",
        "✓".green(),
        user.username.bold()
    );
    Ok(())
}

/// Forget the stored token
///
/// # Errors
///
/// Returns error if the store cannot be written
pub fn logout(store: &mut LocalStore) -> Result<()> {
    if store.token().is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    store.clear_token()?;
    println!("Logged out.");
    Ok(())
}

/// Show the logged-in user
///
/// # Errors
///
/// Returns error if no token is stored or the request fails
pub async fn whoami(config: &Config, store: &LocalStore) -> Result<()> {
    let service = authorized_service(config, store)?;
    let user = service.current_user().await.map_err(|e| {
        tracing::error!("Failed to load current user: {:#}", e);
        e
    })?;
    user_table(&user).printstd();
    Ok(())
}

pub(crate) async fn login_with(
    service: &dyn QuizService,
    store: &mut LocalStore,
    username: &str,
    password: &str,
) -> Result<()> {
    let token = service.login(username, password).await.map_err(|e| {
        tracing::error!(username, "Login failed: {:#}", e);
        e
    })?;
    if token.access_token.is_empty() {
        return Err(SecquizError::Authentication("service issued an empty token".into()).into());
    }
    store
        .save_token(&token.access_token)
        .context("Logged in, but the access token could not be stored")?;
    tracing::info!(username, "Stored access token");
    Ok(())
}

fn resolve_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut rl = DefaultEditor::new()?;
    match read_line(&mut rl, "Password: ")? {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(SecquizError::Authentication("a password is required".into()).into()),
    }
}

fn user_table(user: &UserInfo) -> Table {
    let view = DifficultyView::new(user.current_difficulty);
    let mut table = Table::new();
    table.add_row(row![b => "Field", "Value"]);
    table.add_row(row!["Username", user.username]);
    table.add_row(row!["Email", user.email]);
    if let Some(name) = &user.full_name {
        table.add_row(row!["Name", name]);
    }
    table.add_row(row![
        "Difficulty",
        format!("{:.1} {}", view.difficulty, view.bar(DIFFICULTY_BAR_WIDTH))
    ]);
    table.add_row(row!["Streak", user.correct_streak]);
    table.add_row(row![
        "Answered",
        format!("{} ({} correct)", user.total_questions, user.correct_answers)
    ]);
    table
}
