//! Remote quiz service interface
//!
//! [`QuizService`] is the seam between the controllers and the network.
//! [`http::HttpQuizService`] talks to the real service; unit tests use the
//! scripted fake in `fake`.

#[cfg(test)]
pub mod fake;
pub mod http;
pub mod types;

pub use http::HttpQuizService;
pub use types::{
    AnswerResponse, AnswerSubmission, ChatAnswerRequest, ChatAnswerResult, ChatReply, ChatRequest,
    HistoryEntry, PerformanceReport, ProgressSummary, Question, QuizOption, QuizResults, QuizStart,
    RegisterRequest, TokenResponse, UserInfo,
};

use crate::error::Result;
use async_trait::async_trait;

/// Calls offered by the quiz service
///
/// Every method is a single request/response exchange. Implementations
/// do not retry.
///
/// # Examples
///
/// ```
/// use secquiz::api::{HttpQuizService, QuizService};
/// use secquiz::config::ServerConfig;
///
/// # tokio_test::block_on(async {
/// // No token attached: fails before any request is sent
/// let service = HttpQuizService::new(&ServerConfig::default()).unwrap();
/// assert!(service.current_user().await.is_err());
/// # });
/// ```
#[async_trait]
pub trait QuizService: Send + Sync {
    /// Exchange credentials for a bearer token
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse>;

    /// Create an account
    async fn register(&self, request: &RegisterRequest) -> Result<UserInfo>;

    /// Profile of the authenticated user
    async fn current_user(&self) -> Result<UserInfo>;

    /// Open a quiz session
    async fn start_quiz(&self, topic: &str, number_of_questions: u32) -> Result<QuizStart>;

    /// Answer the current question of a session
    async fn submit_answer(
        &self,
        session_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResponse>;

    /// Finalize a session whose last answer signalled completion
    async fn complete_quiz(&self, session_id: &str) -> Result<QuizResults>;

    /// Ask for the next open-ended question on a topic
    async fn chat_message(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Answer an open-ended question
    async fn chat_answer(&self, request: &ChatAnswerRequest) -> Result<ChatAnswerResult>;

    /// Aggregate performance across all answers
    async fn performance(&self) -> Result<PerformanceReport>;

    /// Most recent answers, newest first
    async fn history(&self, limit: u32) -> Result<Vec<HistoryEntry>>;

    /// Overall progress summary
    async fn progress_summary(&self) -> Result<ProgressSummary>;
}
