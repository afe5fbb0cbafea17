//! Secquiz - adaptive security-education quiz client
//!
#![doc = "Secquiz - adaptive security-education quiz client"]
#![doc = "Main entry point for the secquiz terminal application."]

use anyhow::{Context, Result};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use secquiz::cli::{Cli, Commands};
use secquiz::commands;
use secquiz::config::Config;
use secquiz::storage::LocalStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let mut store = LocalStore::new().context("Failed to open local storage")?;
    tracing::debug!("Using local store at {}", store.path().display());

    // Execute command
    match cli.command {
        Commands::Login { username, password } => {
            tracing::info!("Logging in as {}", username);
            commands::auth::login(&config, &mut store, &username, password).await?;
        }
        Commands::Register {
            email,
            username,
            password,
            full_name,
        } => {
            tracing::info!("Registering {}", username);
            commands::auth::register(&config, &mut store, &email, &username, password, full_name)
                .await?;
        }
        Commands::Logout => commands::auth::logout(&mut store)?,
        Commands::Whoami => commands::auth::whoami(&config, &store).await?,
        Commands::Topics => commands::topics::list_topics(),
        Commands::Quiz { topic, count } => {
            tracing::info!("Starting quiz on {}", topic);
            commands::quiz::run_quiz(&config, &store, &topic, count).await?;
        }
        Commands::Chat { topic } => {
            tracing::info!("Starting chat practice");
            commands::chat::run_chat(&config, &mut store, topic).await?;
        }
        Commands::Analytics { json } => {
            commands::analytics::show_performance(&config, &store, json).await?;
        }
        Commands::History { limit, json } => {
            commands::analytics::show_history(&config, &store, limit, json).await?;
        }
        Commands::Progress { json } => {
            commands::analytics::show_progress(&config, &store, json).await?;
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with the interactive
/// transcript on stdout.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "secquiz=debug" } else { "secquiz=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
