//! Quiz progression
//!
//! [`QuizController`] drives one attempt through
//! `start -> display -> select -> submit -> reveal -> advance | complete`.
//! Correctness, scoring, difficulty, and question content all come from
//! the service; the controller only enforces the local preconditions and
//! applies responses.
//!
//! The delayed advance after a submission is handed back to the caller as
//! a [`PendingAdvance`] ticket. A ticket is bound to the session id and
//! the session epoch it was issued under, and is discarded if either no
//! longer matches when it is applied.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{AnswerResponse, AnswerSubmission, Question, QuizResults, QuizService};
use crate::error::{Result, SecquizError};
use crate::quiz::session::{Phase, QuizSession, QuizState};
use crate::topics::QuizTopic;

/// Questions requested when the caller does not choose a count
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Delay between answer feedback and advancing
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_secs(2);

/// What follows an answered question
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    Continue(Question),
    Complete,
}

/// Feedback for one submitted answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub explanation: String,
    pub selected_option_id: u32,
    pub correct_option_id: u32,
    pub score: i64,
    pub streak: u32,
    pub difficulty: f64,
}

/// Deferred transition issued by a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAdvance {
    session_id: String,
    epoch: u64,
    next: NextStep,
}

impl PendingAdvance {
    pub fn next(&self) -> &NextStep {
        &self.next
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub feedback: AnswerFeedback,
    pub pending: PendingAdvance,
}

/// Result of applying a [`PendingAdvance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    /// The next question is now current
    NextQuestion,
    /// The attempt awaits [`QuizController::complete`]
    ReadyToComplete,
    /// The ticket no longer matches the active session; nothing changed
    Stale,
    /// The wait was cancelled; nothing changed
    Cancelled,
}

/// Owns the single active [`QuizSession`]
pub struct QuizController {
    service: Arc<dyn QuizService>,
    reveal_delay: Duration,
    session: Option<QuizSession>,
    results: Option<QuizResults>,
    last_request: Option<(QuizTopic, u32)>,
    epoch: u64,
    cancel: CancellationToken,
}

impl QuizController {
    /// Create a controller with no active session
    pub fn new(service: Arc<dyn QuizService>) -> Self {
        Self {
            service,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            session: None,
            results: None,
            last_request: None,
            epoch: 0,
            cancel: CancellationToken::new(),
        }
    }

    /// Override the delay between feedback and advancing
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// Final results, once [`complete`](Self::complete) succeeded
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    pub fn state(&self) -> QuizState {
        self.session
            .as_ref()
            .map(QuizSession::state)
            .unwrap_or(QuizState::Uninitialized)
    }

    /// Token cancelled when the active session is abandoned
    ///
    /// Clone it into anything that should stop waiting once the user
    /// exits.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Open a new attempt
    ///
    /// Any previous attempt is discarded first. On failure no session
    /// exists afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if `count` is zero or the start request fails
    pub async fn start(&mut self, topic: QuizTopic, count: Option<u32>) -> Result<&QuizSession> {
        let count = count.unwrap_or(DEFAULT_QUESTION_COUNT);
        if count == 0 {
            return Err(
                SecquizError::InvalidState("question count must be positive".to_string()).into(),
            );
        }

        self.exit();
        self.last_request = Some((topic, count));

        let start = match self.service.start_quiz(topic.slug(), count).await {
            Ok(start) => start,
            Err(e) => {
                tracing::error!("Failed to start {} quiz: {:#}", topic, e);
                return Err(e);
            }
        };

        tracing::info!(
            session_id = %start.session_id,
            topic = %start.topic,
            total = start.total_questions,
            "Quiz started"
        );

        let mut session = QuizSession::from_start(&start, self.epoch);
        show(&mut session, start.first_question);
        Ok(&*self.session.insert(session))
    }

    /// Make `question` current, clearing selection and answered state
    ///
    /// # Errors
    ///
    /// Returns error if there is no active session
    pub fn display_question(&mut self, question: Question) -> Result<()> {
        let session = self.active_session_mut()?;
        show(session, question);
        Ok(())
    }

    /// Record the chosen option
    ///
    /// Returns `false` without changing anything when there is no active
    /// unanswered question or the id is not one of its options.
    pub fn select_option(&mut self, option_id: u32) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase != Phase::Active || session.answered {
            return false;
        }
        let known = session
            .current_question
            .as_ref()
            .is_some_and(|q| q.option(option_id).is_some());
        if !known {
            return false;
        }
        session.selected_option_id = Some(option_id);
        true
    }

    /// Whether [`submit_answer`](Self::submit_answer) would issue a request
    pub fn can_submit(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            s.phase == Phase::Active
                && !s.answered
                && s.selected_option_id.is_some()
                && s.current_question.is_some()
        })
    }

    /// Submit the selected option for the current question
    ///
    /// Returns `Ok(None)` without issuing a request when nothing is
    /// selected or the question was already answered. A failed request
    /// leaves the session exactly as it was so the user can resubmit.
    ///
    /// # Errors
    ///
    /// Returns error if the submission request fails
    pub async fn submit_answer(&mut self) -> Result<Option<SubmitOutcome>> {
        if !self.can_submit() {
            return Ok(None);
        }
        let Some(session) = self.session.as_ref() else {
            return Ok(None);
        };
        let (Some(question), Some(selected)) =
            (session.current_question.as_ref(), session.selected_option_id)
        else {
            return Ok(None);
        };

        let session_id = session.session_id.clone();
        let epoch = session.epoch;
        let submission = AnswerSubmission {
            question_id: question.question_id,
            selected_option_id: selected,
        };

        let response = match self.service.submit_answer(&session_id, &submission).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(session_id = %session_id, "Failed to submit answer: {:#}", e);
                return Err(e);
            }
        };

        // The session may have been replaced while the request was in flight.
        let session = match self.session.as_mut() {
            Some(s) if s.session_id == session_id && s.epoch == epoch => s,
            _ => {
                tracing::warn!(session_id = %session_id, "Dropping answer for abandoned session");
                return Ok(None);
            }
        };

        Ok(Some(apply_answer(session, selected, response)))
    }

    /// Apply a ticket from [`submit_answer`](Self::submit_answer)
    pub fn advance(&mut self, pending: PendingAdvance) -> Advanced {
        let Some(session) = self.session.as_mut() else {
            return Advanced::Stale;
        };
        if session.session_id != pending.session_id
            || session.epoch != pending.epoch
            || session.phase != Phase::Active
            || !session.answered
        {
            tracing::debug!(session_id = %pending.session_id, "Discarding stale advance");
            return Advanced::Stale;
        }

        match pending.next {
            NextStep::Continue(question) => {
                show(session, question);
                Advanced::NextQuestion
            }
            NextStep::Complete => {
                session.phase = Phase::Completing;
                Advanced::ReadyToComplete
            }
        }
    }

    /// Wait out the reveal delay, then apply the ticket
    ///
    /// Returns [`Advanced::Cancelled`] if the session is abandoned first.
    pub async fn wait_and_advance(&mut self, pending: PendingAdvance) -> Advanced {
        let token = self.cancel.clone();
        tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(session_id = %pending.session_id, "Advance cancelled");
                Advanced::Cancelled
            }
            _ = tokio::time::sleep(self.reveal_delay) => self.advance(pending),
        }
    }

    /// Fetch final results for a completed attempt
    ///
    /// A failed call leaves the attempt in [`QuizState::Completing`], so
    /// the caller may try again.
    ///
    /// # Errors
    ///
    /// Returns error if the attempt is not awaiting completion or the
    /// request fails
    pub async fn complete(&mut self) -> Result<&QuizResults> {
        let session = match self.session.as_ref() {
            Some(s) if s.phase == Phase::Completing => s,
            Some(s) => {
                return Err(SecquizError::InvalidState(format!(
                    "cannot complete a session in state {:?}",
                    s.state()
                ))
                .into())
            }
            None => {
                return Err(SecquizError::InvalidState("no active session".to_string()).into())
            }
        };
        let session_id = session.session_id.clone();
        let epoch = session.epoch;

        let results = match self.service.complete_quiz(&session_id).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(session_id = %session_id, "Failed to complete quiz: {:#}", e);
                return Err(e);
            }
        };

        match self.session.as_mut() {
            Some(s) if s.session_id == session_id && s.epoch == epoch => {
                s.phase = Phase::Complete;
                s.difficulty = results.final_difficulty;
            }
            _ => {
                return Err(SecquizError::InvalidState(
                    "session was abandoned before completion".to_string(),
                )
                .into())
            }
        }

        tracing::info!(
            session_id = %session_id,
            correct = results.correct_answers,
            total = results.total_questions,
            "Quiz completed"
        );
        Ok(&*self.results.insert(results))
    }

    /// Abandon the active attempt, if any
    ///
    /// Outstanding waits are cancelled and outstanding tickets become
    /// stale.
    pub fn exit(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(session_id = %session.session_id, "Leaving quiz session");
        }
        self.results = None;
        self.epoch += 1;
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
    }

    /// Abandon the current attempt and start again with the same topic
    /// and question count
    ///
    /// # Errors
    ///
    /// Returns error if no attempt was ever started or the start fails
    pub async fn retake(&mut self) -> Result<&QuizSession> {
        let (topic, count) = self.last_request.ok_or_else(|| {
            SecquizError::InvalidState("no previous quiz to retake".to_string())
        })?;
        self.start(topic, Some(count)).await
    }

    fn active_session_mut(&mut self) -> Result<&mut QuizSession> {
        match self.session.as_mut() {
            Some(s) if s.phase == Phase::Active => Ok(s),
            Some(s) => Err(SecquizError::InvalidState(format!(
                "session is {:?}",
                s.state()
            ))
            .into()),
            None => Err(SecquizError::InvalidState("no active session".to_string()).into()),
        }
    }
}

fn show(session: &mut QuizSession, question: Question) {
    tracing::debug!(
        session_id = %session.session_id,
        position = question.question_number,
        "Displaying question"
    );
    session.current_question = Some(question);
    session.selected_option_id = None;
    session.answered = false;
}

fn apply_answer(session: &mut QuizSession, selected: u32, response: AnswerResponse) -> SubmitOutcome {
    session.answered = true;
    session.score = response.current_score;
    session.streak = response.current_streak;
    session.difficulty = response.new_difficulty;

    let next = if response.quiz_complete {
        NextStep::Complete
    } else if let Some(question) = response.next_question {
        NextStep::Continue(question)
    } else {
        tracing::warn!(
            session_id = %session.session_id,
            "Service sent neither a next question nor completion; treating as complete"
        );
        NextStep::Complete
    };

    SubmitOutcome {
        feedback: AnswerFeedback {
            is_correct: response.is_correct,
            explanation: response.explanation,
            selected_option_id: selected,
            correct_option_id: response.correct_option_id,
            score: session.score,
            streak: session.streak,
            difficulty: session.difficulty,
        },
        pending: PendingAdvance {
            session_id: session.session_id.clone(),
            epoch: session.epoch,
            next,
        },
    }
}
