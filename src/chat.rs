//! Open-ended question practice
//!
//! A single-question-at-a-time sibling of the quiz flow. There is no
//! session: each question is requested by topic, answered in free text,
//! and graded by the service.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{ChatAnswerRequest, ChatAnswerResult, ChatReply, ChatRequest, QuizService};
use crate::error::{Result, SecquizError};
use crate::topics::display_name;

/// Message sent to request the next question
pub const NEXT_QUESTION_PROMPT: &str = "Next question please";

/// Running difficulty and streak as last reported by the service
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChatStats {
    pub difficulty: Option<f64>,
    pub streak: Option<u32>,
}

/// Drives chat practice for one topic
pub struct ChatController {
    service: Arc<dyn QuizService>,
    topic: String,
    advance_delay: Duration,
    question_id: Option<i64>,
    stats: ChatStats,
}

impl ChatController {
    pub fn new(service: Arc<dyn QuizService>, topic: impl Into<String>) -> Self {
        Self {
            service,
            topic: topic.into(),
            advance_delay: Duration::from_secs(2),
            question_id: None,
            stats: ChatStats::default(),
        }
    }

    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Topic as shown to the user, e.g. `Phishing Detection`
    pub fn topic_display(&self) -> String {
        display_name(&self.topic)
    }

    /// Question awaiting an answer, if any
    pub fn current_question_id(&self) -> Option<i64> {
        self.question_id
    }

    pub fn stats(&self) -> ChatStats {
        self.stats
    }

    /// Load difficulty and streak from the user profile
    ///
    /// Failure is logged and leaves the stats untouched.
    pub async fn seed(&mut self) -> bool {
        match self.service.current_user().await {
            Ok(user) => {
                self.stats.difficulty = Some(user.current_difficulty);
                self.stats.streak = Some(user.correct_streak);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load user stats: {:#}", e);
                false
            }
        }
    }

    /// Request the next question for the topic
    ///
    /// # Errors
    ///
    /// Returns error if the request fails; the previous question, if
    /// any, stays current
    pub async fn next_question(&mut self) -> Result<ChatReply> {
        let request = ChatRequest {
            message: NEXT_QUESTION_PROMPT.to_string(),
            topic: self.topic.clone(),
        };
        let reply = self.service.chat_message(&request).await.map_err(|e| {
            tracing::error!(topic = %self.topic, "Failed to load question: {:#}", e);
            e
        })?;
        self.question_id = reply.question_id;
        Ok(reply)
    }

    /// Submit a free-text answer to the current question
    ///
    /// Blank answers and answers with no question pending are rejected
    /// without a request. On failure the question stays current so the
    /// user can try again.
    ///
    /// # Errors
    ///
    /// Returns error for a blank answer, a missing question, or a failed
    /// request
    pub async fn submit_answer(&mut self, answer: &str) -> Result<ChatAnswerResult> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SecquizError::InvalidState("Please enter an answer".to_string()).into());
        }
        let question_id = self.question_id.ok_or_else(|| {
            SecquizError::InvalidState("There is no question to answer".to_string())
        })?;

        let request = ChatAnswerRequest {
            question_id,
            answer: answer.to_string(),
        };
        let result = self.service.chat_answer(&request).await.map_err(|e| {
            tracing::error!(question_id, "Failed to submit answer: {:#}", e);
            e
        })?;

        self.question_id = None;
        self.stats.difficulty = Some(result.new_difficulty);
        self.stats.streak = Some(result.streak);
        Ok(result)
    }

    /// Pause for the advance delay, then request the next question
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn wait_and_next(&mut self) -> Result<ChatReply> {
        tokio::time::sleep(self.advance_delay).await;
        self.next_question().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, ScriptedService};
    use crate::api::UserInfo;

    fn reply(id: i64) -> ChatReply {
        ChatReply {
            response: format!("What is question {}?", id),
            question_id: Some(id),
            difficulty: 1.0,
            is_question: true,
            topic: "Phishing Detection".to_string(),
        }
    }

    fn graded(correct: bool) -> ChatAnswerResult {
        ChatAnswerResult {
            is_correct: correct,
            feedback: "Nice".to_string(),
            explanation: "Because".to_string(),
            new_difficulty: 1.3,
            streak: 2,
        }
    }

    #[tokio::test]
    async fn test_seed_from_user() {
        let service = Arc::new(ScriptedService::new());
        service.push_current_user(Ok(UserInfo {
            id: 1,
            email: "a@example.com".into(),
            username: "alice".into(),
            full_name: None,
            current_difficulty: 2.5,
            correct_streak: 4,
            total_questions: 10,
            correct_answers: 6,
        }));
        let mut chat = ChatController::new(service, "phishing_detection");
        assert!(chat.seed().await);
        assert_eq!(
            chat.stats(),
            ChatStats {
                difficulty: Some(2.5),
                streak: Some(4)
            }
        );
    }

    #[tokio::test]
    async fn test_seed_failure_is_ignored() {
        let service = Arc::new(ScriptedService::new());
        let mut chat = ChatController::new(service, "phishing_detection");
        assert!(!chat.seed().await);
        assert_eq!(chat.stats(), ChatStats::default());
    }

    #[tokio::test]
    async fn test_question_answer_cycle() {
        let service = Arc::new(ScriptedService::new());
        service.push_chat_message(Ok(reply(5)));
        service.push_chat_answer(Ok(graded(true)));
        let mut chat = ChatController::new(service.clone(), "phishing_detection");

        chat.next_question().await.unwrap();
        assert_eq!(chat.current_question_id(), Some(5));

        let result = chat.submit_answer("  check the sender domain  ").await.unwrap();
        assert!(result.is_correct);
        assert_eq!(chat.current_question_id(), None);
        assert_eq!(chat.stats().difficulty, Some(1.3));
        assert_eq!(chat.stats().streak, Some(2));

        assert_eq!(
            service.calls(),
            vec![
                Call::ChatMessage {
                    topic: "phishing_detection".to_string()
                },
                Call::ChatAnswer {
                    question_id: 5,
                    answer: "check the sender domain".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_answer_rejected_without_request() {
        let service = Arc::new(ScriptedService::new());
        service.push_chat_message(Ok(reply(5)));
        let mut chat = ChatController::new(service.clone(), "phishing_detection");
        chat.next_question().await.unwrap();

        assert!(chat.submit_answer("   ").await.is_err());
        assert_eq!(service.call_count(), 1);
        assert_eq!(chat.current_question_id(), Some(5));
    }

    #[tokio::test]
    async fn test_answer_without_question_rejected() {
        let service = Arc::new(ScriptedService::new());
        let mut chat = ChatController::new(service.clone(), "phishing_detection");
        assert!(chat.submit_answer("anything").await.is_err());
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_answer_keeps_question() {
        let service = Arc::new(ScriptedService::new());
        service.push_chat_message(Ok(reply(9)));
        let mut chat = ChatController::new(service.clone(), "malware_awareness");
        chat.next_question().await.unwrap();

        assert!(chat.submit_answer("a trojan").await.is_err());
        assert_eq!(chat.current_question_id(), Some(9));
    }

    #[tokio::test]
    async fn test_failed_next_question_keeps_previous() {
        let service = Arc::new(ScriptedService::new());
        service.push_chat_message(Ok(reply(5)));
        service.push_chat_message(Err(SecquizError::Network("connection reset".into())));
        let mut chat = ChatController::new(service.clone(), "phishing_detection");
        chat.next_question().await.unwrap();

        let err = chat.next_question().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SecquizError>(),
            Some(SecquizError::Network(_))
        ));
        assert_eq!(chat.current_question_id(), Some(5));
        assert_eq!(service.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_and_next_sleeps_first() {
        let service = Arc::new(ScriptedService::new());
        service.push_chat_message(Ok(reply(2)));
        let mut chat = ChatController::new(service, "phishing_detection")
            .with_advance_delay(Duration::from_millis(1500));

        let before = tokio::time::Instant::now();
        chat.wait_and_next().await.unwrap();
        assert!(before.elapsed() >= Duration::from_millis(1500));
        assert_eq!(chat.current_question_id(), Some(2));
    }

    #[test]
    fn test_topic_display() {
        let chat = ChatController::new(Arc::new(ScriptedService::new()), "social_engineering");
        assert_eq!(chat.topic_display(), "Social Engineering");
    }
}
