//! Multiple-choice quiz flow
//!
//! - `session`: client-side state of one attempt
//! - `controller`: request/response cycle and state transitions
//! - `results`: formatting of running and final figures

pub mod controller;
pub mod results;
pub mod session;

pub use controller::{
    Advanced, AnswerFeedback, NextStep, PendingAdvance, QuizController, SubmitOutcome,
    DEFAULT_QUESTION_COUNT, DEFAULT_REVEAL_DELAY,
};
pub use results::{format_elapsed, format_percentage};
pub use session::{Progress, QuizSession, QuizState};
