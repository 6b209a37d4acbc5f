mod chat;
mod config;
mod fallback;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use quiz_core::model::{Question, VerdictSource};

use crate::error::ClassifierError;

pub use chat::{ChatCompletionClassifier, system_instruction};
pub use config::{
    API_KEY_VAR, BASE_URL_VAR, ClassifierConfig, MODEL_VAR, TEMPERATURE_VAR, TIMEOUT_VAR,
};
pub use fallback::{FallbackPolicy, FixedFallback, RandomFallback};

/// Turns a question/answer pair into verdict text.
///
/// The returned text is passed through untouched; it is not required to be
/// one of the known verdict labels.
#[async_trait]
pub trait VerdictClassifier: Send + Sync {
    /// Judge a single answer.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError` on transport, status, or decoding failure.
    async fn classify(&self, question: &str, answer: &str) -> Result<String, ClassifierError>;
}

/// Verdict text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgedVerdict {
    pub text: String,
    pub source: VerdictSource,
}

/// Classifier with a fallback policy; judging always yields a verdict.
#[derive(Clone)]
pub struct VerdictJudge {
    classifier: Arc<dyn VerdictClassifier>,
    fallback: Arc<dyn FallbackPolicy>,
}

impl VerdictJudge {
    #[must_use]
    pub fn new(classifier: Arc<dyn VerdictClassifier>, fallback: Arc<dyn FallbackPolicy>) -> Self {
        Self {
            classifier,
            fallback,
        }
    }

    /// Judge with a uniformly random verdict on classifier failure.
    #[must_use]
    pub fn with_random_fallback(classifier: Arc<dyn VerdictClassifier>) -> Self {
        Self::new(classifier, Arc::new(RandomFallback))
    }

    pub async fn judge(&self, question: &Question, answer: &str) -> JudgedVerdict {
        match self.classifier.classify(question.text(), answer).await {
            Ok(text) => JudgedVerdict {
                text,
                source: VerdictSource::Classifier,
            },
            Err(error) => {
                let verdict = self.fallback.verdict();
                warn!(%error, fallback = %verdict, "classifier unavailable, using fallback verdict");
                JudgedVerdict {
                    text: verdict.label().to_owned(),
                    source: VerdictSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Verdict;

    struct Echo;

    #[async_trait]
    impl VerdictClassifier for Echo {
        async fn classify(&self, _question: &str, answer: &str) -> Result<String, ClassifierError> {
            Ok(answer.to_owned())
        }
    }

    struct Down;

    #[async_trait]
    impl VerdictClassifier for Down {
        async fn classify(&self, _question: &str, _answer: &str) -> Result<String, ClassifierError> {
            Err(ClassifierError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn passes_classifier_text_through() {
        let judge = VerdictJudge::new(Arc::new(Echo), Arc::new(FixedFallback(Verdict::Lying)));
        let judged = judge.judge(&Question::new("Q?"), "not a label").await;
        assert_eq!(judged.text, "not a label");
        assert_eq!(judged.source, VerdictSource::Classifier);
    }

    #[tokio::test]
    async fn failure_uses_fallback_label() {
        let judge = VerdictJudge::new(Arc::new(Down), Arc::new(FixedFallback(Verdict::Lying)));
        let judged = judge.judge(&Question::new("Q?"), "yes").await;
        assert_eq!(judged.text, Verdict::Lying.label());
        assert_eq!(judged.source, VerdictSource::Fallback);
    }

    #[tokio::test]
    async fn random_fallback_yields_a_known_label() {
        let judge = VerdictJudge::with_random_fallback(Arc::new(Down));
        let judged = judge.judge(&Question::new("Q?"), "yes").await;
        assert!(Verdict::ALL.iter().any(|v| v.label() == judged.text));
    }
}
