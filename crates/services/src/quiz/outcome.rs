use quiz_core::model::{SessionStep, SessionSummary, VerdictSource};

/// What a client should see next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    /// `position` is 1-based.
    Question {
        text: String,
        position: usize,
        total: usize,
    },
    Done,
}

impl NextQuestion {
    #[must_use]
    pub fn from_step(step: SessionStep<'_>) -> Self {
        match step {
            SessionStep::Asking {
                question,
                position,
                total,
            } => Self::Question {
                text: question.text().to_owned(),
                position,
                total,
            },
            SessionStep::Done => Self::Done,
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub verdict: String,
    pub source: VerdictSource,
    /// Answers recorded so far, including this one.
    pub progress: usize,
    pub total: usize,
    pub done: bool,
    /// Present only on the answer that completed the session.
    pub summary: Option<SessionSummary>,
}
