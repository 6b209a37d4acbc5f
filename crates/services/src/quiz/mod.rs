mod outcome;
mod service;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use outcome::{AnswerOutcome, NextQuestion};
pub use service::{QuizService, QuizSettings};
