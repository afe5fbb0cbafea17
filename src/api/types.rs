//! Wire types for the quiz service
//!
//! Field names follow the service's JSON contract. Values are received,
//! never constructed client-side, except for request bodies.

use serde::{Deserialize, Serialize};

/// One multiple-choice option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Contiguous within a question, starting at 1
    pub id: u32,
    pub text: String,
}

/// A multiple-choice question as served by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,
    pub question_text: String,
    pub options: Vec<QuizOption>,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: f64,
    /// 1-based position within the quiz
    pub question_number: u32,
    #[serde(default)]
    pub total_questions: Option<u32>,
}

impl Question {
    /// Option with the given id
    pub fn option(&self, option_id: u32) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Body of `POST /quiz/start`
#[derive(Debug, Clone, Serialize)]
pub struct StartQuizRequest {
    pub topic: String,
    pub number_of_questions: u32,
}

/// Response of `POST /quiz/start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStart {
    pub session_id: String,
    pub topic: String,
    pub total_questions: u32,
    pub difficulty_level: f64,
    pub first_question: Question,
}

/// Body of `POST /quiz/answer`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSubmission {
    pub question_id: i64,
    pub selected_option_id: u32,
}

/// Response of `POST /quiz/answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub is_correct: bool,
    pub explanation: String,
    pub correct_option_id: u32,
    #[serde(default)]
    pub points_earned: i64,
    pub current_score: i64,
    pub current_streak: u32,
    pub new_difficulty: f64,
    #[serde(default)]
    pub quiz_complete: bool,
    #[serde(default)]
    pub next_question: Option<Question>,
}

/// Response of `POST /quiz/complete`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResults {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub topic: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(default)]
    pub incorrect_answers: u32,
    pub score_percentage: f64,
    pub time_taken_seconds: u64,
    pub final_difficulty: f64,
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Response of `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub current_difficulty: f64,
    pub correct_streak: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub correct_answers: u32,
}

/// Body of `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub topic: String,
}

/// Response of `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub question_id: Option<i64>,
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default)]
    pub is_question: bool,
    #[serde(default)]
    pub topic: String,
}

/// Body of `POST /chat/answer`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatAnswerRequest {
    pub question_id: i64,
    pub answer: String,
}

/// Response of `POST /chat/answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswerResult {
    pub is_correct: bool,
    pub feedback: String,
    #[serde(default)]
    pub explanation: String,
    pub new_difficulty: f64,
    pub streak: u32,
}

/// Response of `GET /analytics/performance`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_questions: u32,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub average_difficulty: f64,
    #[serde(default)]
    pub strongest_topics: Vec<String>,
    #[serde(default)]
    pub weakest_topics: Vec<String>,
}

/// One entry of `GET /analytics/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub user_answer: String,
    pub is_correct: bool,
    pub difficulty: f64,
    pub created_at: String,
}

/// Response of `GET /progress/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    #[serde(default)]
    pub user_id: i64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
    pub current_difficulty: f64,
    pub current_streak: u32,
    #[serde(default)]
    pub topics_covered: Vec<String>,
}
