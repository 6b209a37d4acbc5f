#![forbid(unsafe_code)]

pub mod classifier;
pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use classifier::{
    ChatCompletionClassifier, ClassifierConfig, FallbackPolicy, FixedFallback, JudgedVerdict,
    RandomFallback, VerdictClassifier, VerdictJudge,
};
pub use error::{ClassifierError, ConfigError, QuizError};
pub use quiz::{AnswerOutcome, NextQuestion, QuizService, QuizSettings};
