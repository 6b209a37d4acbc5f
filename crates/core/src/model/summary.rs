use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AnswerRecord, Verdict, VerdictSource};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many answers for a single session: {len}")]
    TooManyAnswers { len: usize },
}

/// Aggregate tally for a completed quiz session.
///
/// Verdict texts are matched by substring, so a classifier reply with extra
/// words around a label still counts. A reply mentioning no label lands in
/// `unmatched`; one mentioning several labels counts toward each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    answered: u32,
    truthful: u32,
    suspicious: u32,
    lying: u32,
    unmatched: u32,
    fallback_verdicts: u32,
}

impl SessionSummary {
    /// Build a summary from the recorded answers of a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::TooManyAnswers` if the answer count cannot fit in `u32`.
    pub fn from_answers(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        answers: &[AnswerRecord],
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        let answered = u32::try_from(answers.len())
            .map_err(|_| SessionSummaryError::TooManyAnswers { len: answers.len() })?;

        let mut summary = Self {
            started_at,
            completed_at,
            answered,
            truthful: 0,
            suspicious: 0,
            lying: 0,
            unmatched: 0,
            fallback_verdicts: 0,
        };

        for answer in answers {
            let mut matched = false;
            for verdict in Verdict::ALL {
                if verdict.matches(&answer.verdict) {
                    matched = true;
                    let slot = match verdict {
                        Verdict::Truthful => &mut summary.truthful,
                        Verdict::Suspicious => &mut summary.suspicious,
                        Verdict::Lying => &mut summary.lying,
                    };
                    *slot = slot.saturating_add(1);
                }
            }
            if !matched {
                summary.unmatched = summary.unmatched.saturating_add(1);
            }
            if answer.source == VerdictSource::Fallback {
                summary.fallback_verdicts = summary.fallback_verdicts.saturating_add(1);
            }
        }

        Ok(summary)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Number of answers the tally was computed over.
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn count(&self, verdict: Verdict) -> u32 {
        match verdict {
            Verdict::Truthful => self.truthful,
            Verdict::Suspicious => self.suspicious,
            Verdict::Lying => self.lying,
        }
    }

    #[must_use]
    pub fn unmatched(&self) -> u32 {
        self.unmatched
    }

    #[must_use]
    pub fn fallback_verdicts(&self) -> u32 {
        self.fallback_verdicts
    }

    /// Share of truthful verdicts over all answers, in percent, one decimal.
    ///
    /// Ties round to the even digit, so 6.25 becomes 6.2 and 18.75 becomes 18.8.
    #[must_use]
    pub fn honesty_percent(&self) -> f64 {
        if self.answered == 0 {
            return 0.0;
        }
        let percent = f64::from(self.truthful) / f64::from(self.answered) * 100.0;
        (percent * 10.0).round_ties_even() / 10.0
    }
}
