use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Default number of questions asked per session.
pub const DEFAULT_QUESTIONS_PER_SESSION: usize = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionPoolError {
    #[error("question pool has {available} questions, {requested} requested")]
    PoolTooSmall { requested: usize, available: usize },
}

/// A single quiz prompt. Identity is its text.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Question({:?})", self.0)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed set of unique questions that sessions sample from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    /// Builds a pool, dropping blank and repeated texts while keeping first-seen order.
    #[must_use]
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let questions = texts
            .into_iter()
            .map(Into::into)
            .filter(|text| !text.trim().is_empty())
            .filter(|text| seen.insert(text.clone()))
            .map(Question)
            .collect();
        Self { questions }
    }

    /// The prompts shipped with the service.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_QUESTIONS.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Fails when the pool cannot supply `count` distinct questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionPoolError::PoolTooSmall` if `count` exceeds the pool size.
    pub fn ensure_capacity(&self, count: usize) -> Result<(), QuestionPoolError> {
        if count > self.questions.len() {
            return Err(QuestionPoolError::PoolTooSmall {
                requested: count,
                available: self.questions.len(),
            });
        }
        Ok(())
    }

    /// Draws `count` distinct questions uniformly at random, in random order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionPoolError::PoolTooSmall` if `count` exceeds the pool size.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, QuestionPoolError> {
        self.ensure_capacity(count)?;
        let mut picked: Vec<Question> = self
            .questions
            .choose_multiple(rng, count)
            .cloned()
            .collect();
        picked.shuffle(rng);
        Ok(picked)
    }
}

const BUILTIN_QUESTIONS: [&str; 30] = [
    "Did you really wake up on time today?",
    "Have you lied to someone recently?",
    "Do you always tell the truth?",
    "Are you hiding anything right now?",
    "Do you think people can tell when you lie?",
    "Would you say you’re confident in your honesty?",
    "Have you ever broken a promise?",
    "Do you trust AI to judge your truthfulness?",
    "Have you ever cheated on a test?",
    "Do you sometimes exaggerate?",
    "Have you lied to a friend before?",
    "Do you hide your feelings often?",
    "Have you ever stolen something?",
    "Do you always keep secrets?",
    "Have you ever lied about your age?",
    "Do you tell white lies often?",
    "Have you ever blamed someone else unfairly?",
    "Do you hide mistakes at work/school?",
    "Have you ever lied to avoid punishment?",
    "Do you sometimes fake interest in conversations?",
    "Do you lie in online profiles?",
    "Have you ever lied in a relationship?",
    "Do you sometimes pretend to know things you don't?",
    "Have you lied to protect someone's feelings?",
    "Do you tell different stories to different people?",
    "Have you ever lied to get out of trouble?",
    "Do you exaggerate your achievements?",
    "Have you lied to get attention?",
    "Do you lie about small things often?",
    "Have you ever faked being sick?",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn builtin_pool_supports_a_full_session() {
        let pool = QuestionPool::builtin();
        assert_eq!(pool.len(), 30);
        assert!(pool.ensure_capacity(DEFAULT_QUESTIONS_PER_SESSION).is_ok());
    }

    #[test]
    fn pool_drops_duplicates_and_blanks() {
        let pool = QuestionPool::new(["a?", "b?", "a?", "  ", "c?"]);
        let texts: Vec<_> = pool.questions().iter().map(Question::text).collect();
        assert_eq!(texts, vec!["a?", "b?", "c?"]);
    }

    #[test]
    fn sample_is_distinct_and_sized() {
        let pool = QuestionPool::builtin();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pool.sample(30, &mut rng).unwrap();
            assert_eq!(picked.len(), 30);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), 30);
            assert!(picked.iter().all(|q| pool.questions().contains(q)));
        }
    }

    #[test]
    fn sample_smaller_than_pool_stays_distinct() {
        let pool = QuestionPool::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pool.sample(5, &mut rng).unwrap();
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn sample_fails_when_pool_is_too_small() {
        let pool = QuestionPool::new(["only one?"]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = pool.sample(2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            QuestionPoolError::PoolTooSmall {
                requested: 2,
                available: 1
            }
        );
    }
}
