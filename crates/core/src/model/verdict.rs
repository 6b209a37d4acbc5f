use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── VERDICT ──────────────────────────────────────────────────────────────────
//

/// Three-way honesty judgement.
///
/// Each variant owns a fixed label. The classifier is asked to answer with one
/// of these labels verbatim; the label doubles as the tally key in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Truthful,
    Suspicious,
    Lying,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Truthful, Verdict::Suspicious, Verdict::Lying];

    /// Display text and tally key.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Truthful => "Truthful ✅",
            Verdict::Suspicious => "Suspicious 😶",
            Verdict::Lying => "Lying 🤥",
        }
    }

    /// Whether `text` mentions this verdict's label anywhere.
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        text.contains(self.label())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── VERDICT SOURCE ───────────────────────────────────────────────────────────
//

/// Where a recorded verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Returned by the external classifier.
    Classifier,
    /// Substituted after the classifier failed.
    Fallback,
}
