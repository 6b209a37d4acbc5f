//! JSON bodies exchanged with the client page.

use serde::{Deserialize, Serialize};

use quiz_core::model::{SessionSummary, Verdict};
use services::{AnswerOutcome, NextQuestion};

/// Response of `GET /next`. Only `done` is present once the session is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl NextResponse {
    #[must_use]
    pub fn from_next(next: NextQuestion, session_id: Option<String>) -> Self {
        match next {
            NextQuestion::Question {
                text,
                position,
                total,
            } => Self {
                question: Some(text),
                index: Some(position),
                total: Some(total),
                done: false,
                session_id,
            },
            NextQuestion::Done => Self {
                question: None,
                index: None,
                total: None,
                done: true,
                session_id,
            },
        }
    }
}

/// Body of `POST /answer`. A missing field counts as an empty answer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub verdict: String,
    pub progress: usize,
    pub done: bool,
    pub summary: Option<SummaryBody>,
}

impl From<AnswerOutcome> for AnswerResponse {
    fn from(outcome: AnswerOutcome) -> Self {
        Self {
            verdict: outcome.verdict,
            progress: outcome.progress,
            done: outcome.done,
            summary: outcome.summary.as_ref().map(SummaryBody::from),
        }
    }
}

/// Per-label tally keyed by the verdict label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    #[serde(rename = "Truthful ✅")]
    pub truthful: u32,
    #[serde(rename = "Suspicious 😶")]
    pub suspicious: u32,
    #[serde(rename = "Lying 🤥")]
    pub lying: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBody {
    pub counts: VerdictCounts,
    pub unmatched: u32,
    pub fallback_verdicts: u32,
    pub answered: u32,
    pub honesty_percent: f64,
}

impl From<&SessionSummary> for SummaryBody {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            counts: VerdictCounts {
                truthful: summary.count(Verdict::Truthful),
                suspicious: summary.count(Verdict::Suspicious),
                lying: summary.count(Verdict::Lying),
            },
            unmatched: summary.unmatched(),
            fallback_verdicts: summary.fallback_verdicts(),
            answered: summary.answered(),
            honesty_percent: summary.honesty_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
