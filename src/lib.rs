//! Secquiz - adaptive security-education quiz client library
//!
//! This library provides a terminal client for an adaptive quiz service.
//! Question selection, grading, and difficulty adjustment all happen
//! server-side; the client drives the request/response cycle and renders
//! what comes back.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Service contract, HTTP client, and a scripted test double
//! - `quiz`: Multiple-choice session state and progression controller
//! - `chat`: Open-ended question practice
//! - `difficulty`: Difficulty labels, colour tiers, and bars
//! - `analytics`: Performance, history, and progress views
//! - `storage`: Local token and topic persistence
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use secquiz::api::HttpQuizService;
//! use secquiz::quiz::QuizController;
//! use secquiz::topics::QuizTopic;
//! use secquiz::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let service = HttpQuizService::new(&config.server)?.with_token("token");
//!     let mut controller = QuizController::new(Arc::new(service));
//!     controller.start(QuizTopic::Networking, Some(10)).await?;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod quiz;
pub mod storage;
pub mod topics;

// Re-export commonly used types
pub use api::{HttpQuizService, QuizService};
pub use config::Config;
pub use error::{Result, SecquizError};
pub use quiz::{QuizController, QuizState};
pub use topics::QuizTopic;
