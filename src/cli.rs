//! Command-line interface definition for Secquiz
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication, quizzes, chat practice,
//! and performance analytics.

use clap::{Parser, Subcommand};

/// Secquiz - adaptive security-education quiz client
///
/// Practice security topics against an adaptive quiz service from the
/// terminal. Question selection and difficulty adjustment happen
/// server-side.
#[derive(Parser, Debug, Clone)]
#[command(name = "secquiz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the service base URL
    #[arg(long)]
    pub server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Secquiz
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the bearer token locally
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account, then log in
    Register {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Optional display name
        #[arg(long)]
        full_name: Option<String>,
    },

    /// Forget the stored bearer token
    Logout,

    /// Show the logged-in user with current difficulty and streak
    Whoami,

    /// List the supported quiz topics
    Topics,

    /// Take a multiple-choice quiz
    Quiz {
        /// Quiz topic slug (see `secquiz topics`)
        #[arg(short, long)]
        topic: String,

        /// Number of questions (defaults to quiz.question_count)
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Open-ended question practice, one question at a time
    Chat {
        /// Topic slug; defaults to the last selected topic
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Show aggregate performance analytics
    Analytics {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recently answered questions
    History {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the overall progress summary
    Progress {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            server: None,
            verbose: false,
            json_logs: false,
            command: Commands::Whoami,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.server.is_none());
        assert!(matches!(cli.command, Commands::Whoami));
    }

    #[test]
    fn test_cli_parse_quiz_command() {
        let cli = Cli::try_parse_from(["secquiz", "quiz", "--topic", "networking"]).unwrap();
        if let Commands::Quiz { topic, count } = cli.command {
            assert_eq!(topic, "networking");
            assert_eq!(count, None);
        } else {
            panic!("Expected Quiz command");
        }
    }

    #[test]
    fn test_cli_parse_quiz_with_count() {
        let cli =
            Cli::try_parse_from(["secquiz", "quiz", "-t", "cryptography", "-n", "5"]).unwrap();
        if let Commands::Quiz { count, .. } = cli.command {
            assert_eq!(count, Some(5));
        } else {
            panic!("Expected Quiz command");
        }
    }

    #[test]
    fn test_cli_quiz_requires_topic() {
        assert!(Cli::try_parse_from(["secquiz", "quiz"]).is_err());
    }

    #[test]
    fn test_cli_parse_login() {
        let cli = Cli::try_parse_from(["secquiz", "login", "-u", "alice"]).unwrap();
        if let Commands::Login { username, password } = cli.command {
            assert_eq!(username, "alice");
            assert!(password.is_none());
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_cli_parse_register_full_name() {
        let cli = Cli::try_parse_from([
            "secquiz",
            "register",
            "-e",
            "a@example.com",
            "-u",
            "alice",
            "-p",
            "pw",
            "--full-name",
            "Alice A",
        ])
        .unwrap();
        if let Commands::Register { full_name, .. } = cli.command {
            assert_eq!(full_name.as_deref(), Some("Alice A"));
        } else {
            panic!("Expected Register command");
        }
    }

    #[test]
    fn test_cli_parse_history_default_limit() {
        let cli = Cli::try_parse_from(["secquiz", "history"]).unwrap();
        if let Commands::History { limit, json } = cli.command {
            assert_eq!(limit, 20);
            assert!(!json);
        } else {
            panic!("Expected History command");
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "secquiz",
            "--server",
            "http://quiz.local/api",
            "-v",
            "--json-logs",
            "analytics",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://quiz.local/api"));
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Analytics { json: true }));
    }
}
