//! Client-side view of one quiz attempt

use chrono::{DateTime, Utc};

use crate::api::{Question, QuizStart};

/// Where an attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// No attempt in progress
    Uninitialized,
    /// A question is displayed and awaits an answer
    Unanswered,
    /// The current question was answered; feedback is showing
    Revealing,
    /// The last answer signalled completion; final results not fetched yet
    Completing,
    /// Final results received; the attempt accepts no further calls
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Active,
    Completing,
    Complete,
}

/// Progress through the attempt, `position` of `total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: u32,
    pub total: u32,
}

impl Progress {
    /// Fraction in `[0, 1]` for well-formed sessions
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.position) / f64::from(self.total)
    }

    /// Fraction as a percentage
    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

/// State of an in-progress quiz
///
/// Score, streak, and difficulty are only ever copied from service
/// responses.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub(crate) session_id: String,
    pub(crate) topic: String,
    pub(crate) total_questions: u32,
    pub(crate) current_question: Option<Question>,
    pub(crate) selected_option_id: Option<u32>,
    pub(crate) answered: bool,
    pub(crate) score: i64,
    pub(crate) streak: u32,
    pub(crate) difficulty: f64,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) epoch: u64,
    pub(crate) phase: Phase,
}

impl QuizSession {
    pub(crate) fn from_start(start: &QuizStart, epoch: u64) -> Self {
        Self {
            session_id: start.session_id.clone(),
            topic: start.topic.clone(),
            total_questions: start.total_questions,
            current_question: None,
            selected_option_id: None,
            answered: false,
            score: 0,
            streak: 0,
            difficulty: start.difficulty_level,
            started_at: Utc::now(),
            epoch,
            phase: Phase::Active,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn selected_option_id(&self) -> Option<u32> {
        self.selected_option_id
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seconds since the attempt started, for local display only
    pub fn elapsed_seconds(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }

    /// Position of the current question out of the agreed total
    pub fn progress(&self) -> Progress {
        Progress {
            position: self
                .current_question
                .as_ref()
                .map(|q| q.question_number)
                .unwrap_or(0),
            total: self.total_questions,
        }
    }

    pub fn state(&self) -> QuizState {
        match self.phase {
            Phase::Complete => QuizState::Complete,
            Phase::Completing => QuizState::Completing,
            Phase::Active if self.answered => QuizState::Revealing,
            Phase::Active => QuizState::Unanswered,
        }
    }
}
