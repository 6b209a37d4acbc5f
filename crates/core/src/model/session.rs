use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use thiserror::Error;

use crate::model::{
    Question, QuestionPool, QuestionPoolError, SessionSummary, SessionSummaryError, VerdictSource,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("session already completed")]
    Completed,

    #[error("answer targets question {expected} but session is at {actual}")]
    StaleCursor { expected: usize, actual: usize },

    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// One answered question and the verdict it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: Question,
    pub answer: String,
    pub verdict: String,
    pub source: VerdictSource,
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Where a session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep<'a> {
    /// `position` is 1-based.
    Asking {
        question: &'a Question,
        position: usize,
        total: usize,
    },
    Done,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A client's walk through a fixed list of sampled questions.
///
/// The cursor is the number of recorded answers, so it can only move forward
/// and always equals `answers().len()`.
#[derive(Clone)]
pub struct Session {
    questions: Vec<Question>,
    answers: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    summary: Option<SessionSummary>,
}

impl Session {
    #[must_use]
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Self {
        Self {
            questions,
            answers: Vec::new(),
            started_at,
            last_active_at: started_at,
            completed_at: None,
            summary: None,
        }
    }

    /// Sample `count` questions from `pool` and open a session.
    ///
    /// # Errors
    ///
    /// Returns `QuestionPoolError::PoolTooSmall` if the pool cannot supply `count` questions.
    pub fn start<R: Rng + ?Sized>(
        pool: &QuestionPool,
        count: usize,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuestionPoolError> {
        let questions = pool.sample(count, rng)?;
        Ok(Self::new(questions, started_at))
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// 0-based cursor into `questions`.
    #[must_use]
    pub fn index(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index() >= self.total()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index())
    }

    #[must_use]
    pub fn step(&self) -> SessionStep<'_> {
        match self.current_question() {
            Some(question) => SessionStep::Asking {
                question,
                position: self.index() + 1,
                total: self.total(),
            },
            None => SessionStep::Done,
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Tally computed when the final answer was recorded.
    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Marks the session as used at `at`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_active_at {
            self.last_active_at = at;
        }
    }

    /// Append an answer for the question at `expected_index` and advance.
    ///
    /// `expected_index` is the cursor the caller observed before judging the
    /// answer; a mismatch means another submission got there first.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::Completed` if every question is answered.
    /// Returns `SessionStateError::StaleCursor` if the cursor moved since `expected_index`.
    pub fn record(
        &mut self,
        expected_index: usize,
        answer: AnswerRecord,
        recorded_at: DateTime<Utc>,
    ) -> Result<&AnswerRecord, SessionStateError> {
        if self.is_complete() {
            return Err(SessionStateError::Completed);
        }
        let actual = self.index();
        if actual != expected_index {
            return Err(SessionStateError::StaleCursor {
                expected: expected_index,
                actual,
            });
        }

        self.answers.push(answer);
        if self.is_complete() {
            match SessionSummary::from_answers(self.started_at, recorded_at, &self.answers) {
                Ok(summary) => {
                    self.summary = Some(summary);
                    self.completed_at = Some(recorded_at);
                }
                Err(err) => {
                    self.answers.pop();
                    return Err(err.into());
                }
            }
        }

        self.touch(recorded_at);
        self.answers.last().ok_or(SessionStateError::Completed)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("questions_len", &self.questions.len())
            .field("index", &self.index())
            .field("started_at", &self.started_at)
            .field("last_active_at", &self.last_active_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
