//! Scripted in-process quiz service for tests
//!
//! [`ScriptedService`] answers each call with the next response queued
//! for that endpoint and records every call it receives. An endpoint with
//! an empty queue fails with a `Network` error, which is also how tests
//! simulate an unreachable service.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::types::*;
use crate::api::QuizService;
use crate::error::{Result, SecquizError};

/// A call received by the fake, with its identifying arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login { username: String },
    Register { username: String },
    CurrentUser,
    StartQuiz { topic: String, number_of_questions: u32 },
    SubmitAnswer { session_id: String, submission: AnswerSubmission },
    CompleteQuiz { session_id: String },
    ChatMessage { topic: String },
    ChatAnswer { question_id: i64, answer: String },
    Performance,
    History { limit: u32 },
    ProgressSummary,
}

type Queue<T> = Mutex<VecDeque<std::result::Result<T, SecquizError>>>;

/// In-process [`QuizService`] driven by queued responses
#[derive(Debug, Default)]
pub struct ScriptedService {
    calls: Mutex<Vec<Call>>,
    login: Queue<TokenResponse>,
    register: Queue<UserInfo>,
    current_user: Queue<UserInfo>,
    start: Queue<QuizStart>,
    answer: Queue<AnswerResponse>,
    complete: Queue<QuizResults>,
    chat_message: Queue<ChatReply>,
    chat_answer: Queue<ChatAnswerResult>,
    performance: Queue<PerformanceReport>,
    history: Queue<Vec<HistoryEntry>>,
    progress: Queue<ProgressSummary>,
}

macro_rules! pusher {
    ($name:ident, $field:ident, $ty:ty) => {
        /// Queue the next response for this endpoint
        pub fn $name(&self, response: std::result::Result<$ty, SecquizError>) {
            lock(&self.$field).push_back(response);
        }
    };
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn pop<T>(queue: &Queue<T>, endpoint: &str) -> Result<T> {
    match lock(queue).pop_front() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(e.into()),
        None => Err(SecquizError::Network(format!("no scripted response for {}", endpoint)).into()),
    }
}

impl ScriptedService {
    /// Create a fake with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    pusher!(push_login, login, TokenResponse);
    pusher!(push_register, register, UserInfo);
    pusher!(push_current_user, current_user, UserInfo);
    pusher!(push_start, start, QuizStart);
    pusher!(push_answer, answer, AnswerResponse);
    pusher!(push_complete, complete, QuizResults);
    pusher!(push_chat_message, chat_message, ChatReply);
    pusher!(push_chat_answer, chat_answer, ChatAnswerResult);
    pusher!(push_performance, performance, PerformanceReport);
    pusher!(push_history, history, Vec<HistoryEntry>);
    pusher!(push_progress, progress, ProgressSummary);

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl QuizService for ScriptedService {
    async fn login(&self, username: &str, _password: &str) -> Result<TokenResponse> {
        self.record(Call::Login {
            username: username.to_string(),
        });
        pop(&self.login, "login")
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserInfo> {
        self.record(Call::Register {
            username: request.username.clone(),
        });
        pop(&self.register, "register")
    }

    async fn current_user(&self) -> Result<UserInfo> {
        self.record(Call::CurrentUser);
        pop(&self.current_user, "current user")
    }

    async fn start_quiz(&self, topic: &str, number_of_questions: u32) -> Result<QuizStart> {
        self.record(Call::StartQuiz {
            topic: topic.to_string(),
            number_of_questions,
        });
        pop(&self.start, "start quiz")
    }

    async fn submit_answer(
        &self,
        session_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResponse> {
        self.record(Call::SubmitAnswer {
            session_id: session_id.to_string(),
            submission: submission.clone(),
        });
        pop(&self.answer, "submit answer")
    }

    async fn complete_quiz(&self, session_id: &str) -> Result<QuizResults> {
        self.record(Call::CompleteQuiz {
            session_id: session_id.to_string(),
        });
        pop(&self.complete, "complete quiz")
    }

    async fn chat_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.record(Call::ChatMessage {
            topic: request.topic.clone(),
        });
        pop(&self.chat_message, "chat message")
    }

    async fn chat_answer(&self, request: &ChatAnswerRequest) -> Result<ChatAnswerResult> {
        self.record(Call::ChatAnswer {
            question_id: request.question_id,
            answer: request.answer.clone(),
        });
        pop(&self.chat_answer, "chat answer")
    }

    async fn performance(&self) -> Result<PerformanceReport> {
        self.record(Call::Performance);
        pop(&self.performance, "performance")
    }

    async fn history(&self, limit: u32) -> Result<Vec<HistoryEntry>> {
        self.record(Call::History { limit });
        pop(&self.history, "history")
    }

    async fn progress_summary(&self) -> Result<ProgressSummary> {
        self.record(Call::ProgressSummary);
        pop(&self.progress, "progress summary")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_queue_is_network_error() {
        let service = ScriptedService::new();
        let err = service.history(5).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SecquizError>(),
            Some(SecquizError::Network(_))
        ));
        assert_eq!(service.calls(), vec![Call::History { limit: 5 }]);
    }

    #[tokio::test]
    async fn test_responses_are_consumed_in_order() {
        let service = ScriptedService::new();
        service.push_history(Ok(vec![]));
        service.push_history(Err(SecquizError::Api {
            status: 500,
            message: "boom".into(),
        }));

        assert!(service.history(1).await.unwrap().is_empty());
        assert!(service.history(1).await.is_err());
        assert!(service.history(1).await.is_err());
        assert_eq!(service.call_count(), 3);
    }

    #[tokio::test]
    async fn test_scripted_response_is_returned_and_recorded() {
        let service = ScriptedService::new();
        service.push_performance(Ok(PerformanceReport::default()));

        let report = service.performance().await.unwrap();
        assert_eq!(report.total_questions, 0);
        assert_eq!(service.calls(), vec![Call::Performance]);
    }
}
