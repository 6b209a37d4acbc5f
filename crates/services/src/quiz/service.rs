use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use quiz_core::model::{
    AnswerRecord, DEFAULT_QUESTIONS_PER_SESSION, QuestionPool, Session, SessionKey, SessionSummary,
};
use storage::{SessionHandle, SessionRepository};

use super::outcome::{AnswerOutcome, NextQuestion};
use crate::Clock;
use crate::classifier::VerdictJudge;
use crate::error::QuizError;

/// Tunables for quiz sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    pub questions_per_session: usize,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            questions_per_session: DEFAULT_QUESTIONS_PER_SESSION,
        }
    }
}

//
// ─── QUIZ SERVICE ──────────────────────────────────────────────────────────────
//

/// Orchestrates sessions: lazy creation, question delivery, and answer judging.
///
/// Sessions are locked one at a time and never across the classifier call. The
/// cursor observed before judging is compared again when recording, so two
/// racing submissions for the same question cannot both be recorded.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    pool: Arc<QuestionPool>,
    settings: QuizSettings,
    sessions: Arc<dyn SessionRepository>,
    judge: VerdictJudge,
}

impl QuizService {
    /// # Errors
    ///
    /// Returns `QuizError::InvalidQuestionCount` for a zero question count and
    /// `QuizError::Pool` when the pool cannot fill a session.
    pub fn new(
        clock: Clock,
        pool: QuestionPool,
        settings: QuizSettings,
        sessions: Arc<dyn SessionRepository>,
        judge: VerdictJudge,
    ) -> Result<Self, QuizError> {
        if settings.questions_per_session == 0 {
            return Err(QuizError::InvalidQuestionCount);
        }
        pool.ensure_capacity(settings.questions_per_session)?;
        Ok(Self {
            clock,
            pool: Arc::new(pool),
            settings,
            sessions,
            judge,
        })
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    /// Whether a session exists for `key`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the store cannot be read.
    pub async fn has_session(&self, key: &SessionKey) -> Result<bool, QuizError> {
        Ok(self.sessions.get(key).await?.is_some())
    }

    /// Current question for `key`, starting a session on first use.
    ///
    /// Never advances the session; repeated calls return the same question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` for storage or sampling failures.
    pub async fn next_question(&self, key: &SessionKey) -> Result<NextQuestion, QuizError> {
        let handle = self.get_or_create(key).await?;
        let mut session = handle.lock().await;
        session.touch(self.clock.now());
        Ok(NextQuestion::from_step(session.step()))
    }

    /// Judge `answer` against the current question and advance the session.
    ///
    /// # Errors
    ///
    /// - `QuizError::NotStarted` if `key` has no session.
    /// - `QuizError::EmptyAnswer` if `answer` is blank; the classifier is not called.
    /// - `QuizError::Completed` if every question is already answered.
    /// - `QuizError::Conflict` if another submission advanced the session meanwhile.
    pub async fn submit_answer(
        &self,
        key: &SessionKey,
        answer: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        let handle = self.sessions.get(key).await?.ok_or(QuizError::NotStarted)?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(QuizError::EmptyAnswer);
        }

        let (expected_index, question) = {
            let mut session = handle.lock().await;
            let Some(question) = session.current_question().cloned() else {
                return Err(QuizError::Completed);
            };
            session.touch(self.clock.now());
            (session.index(), question)
        };

        let judged = self.judge.judge(&question, answer).await;

        let mut session = handle.lock().await;
        let record = AnswerRecord {
            question,
            answer: answer.to_owned(),
            verdict: judged.text.clone(),
            source: judged.source,
        };
        session.record(expected_index, record, self.clock.now())?;

        let done = session.is_complete();
        let summary = if done { session.summary().cloned() } else { None };
        if let Some(summary) = &summary {
            info!(
                session = %key,
                answered = summary.answered(),
                honesty_percent = summary.honesty_percent(),
                fallback_verdicts = summary.fallback_verdicts(),
                "quiz session completed"
            );
        } else {
            debug!(session = %key, position = session.index(), "answer recorded");
        }

        Ok(AnswerOutcome {
            verdict: judged.text,
            source: judged.source,
            progress: session.index(),
            total: session.total(),
            done,
            summary,
        })
    }

    /// Summary of a completed session, for clients that missed the final response.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` without a session and
    /// `QuizError::NotComplete` while questions remain.
    pub async fn summary(&self, key: &SessionKey) -> Result<SessionSummary, QuizError> {
        let handle = self.sessions.get(key).await?.ok_or(QuizError::NotStarted)?;
        let session = handle.lock().await;
        session.summary().cloned().ok_or(QuizError::NotComplete)
    }

    /// Drop sessions idle for longer than `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the store cannot be swept.
    pub async fn evict_idle(&self, ttl: Duration) -> Result<usize, QuizError> {
        let evicted = self.sessions.evict_idle(self.clock.cutoff(ttl)).await?;
        if evicted > 0 {
            debug!(evicted, "evicted idle quiz sessions");
        }
        Ok(evicted)
    }

    async fn get_or_create(&self, key: &SessionKey) -> Result<SessionHandle, QuizError> {
        if let Some(handle) = self.sessions.get(key).await? {
            return Ok(handle);
        }

        let session = {
            let mut rng = rand::rng();
            Session::start(
                &self.pool,
                self.settings.questions_per_session,
                &mut rng,
                self.clock.now(),
            )?
        };
        let inserted = self.sessions.insert_if_absent(key.clone(), session).await?;
        if inserted.created {
            info!(
                session = %key,
                total = self.settings.questions_per_session,
                "quiz session started"
            );
        }
        Ok(inserted.handle)
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("clock", &self.clock)
            .field("pool_len", &self.pool.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{FixedFallback, VerdictClassifier};
    use crate::error::ClassifierError;
    use async_trait::async_trait;
    use quiz_core::model::{Verdict, VerdictSource};
    use quiz_core::time::fixed_clock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::InMemorySessionStore;

    #[derive(Default)]
    struct CountingClassifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VerdictClassifier for CountingClassifier {
        async fn classify(&self, _question: &str, _answer: &str) -> Result<String, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Verdict::Truthful.label().to_owned())
        }
    }

    fn service_with(
        classifier: Arc<CountingClassifier>,
        questions_per_session: usize,
    ) -> QuizService {
        let judge = VerdictJudge::new(classifier, Arc::new(FixedFallback(Verdict::Lying)));
        QuizService::new(
            fixed_clock(),
            QuestionPool::builtin(),
            QuizSettings {
                questions_per_session,
            },
            Arc::new(InMemorySessionStore::new()),
            judge,
        )
        .unwrap()
    }

    #[test]
    fn rejects_settings_the_pool_cannot_serve() {
        let judge = VerdictJudge::with_random_fallback(Arc::new(CountingClassifier::default()));
        let store: Arc<dyn SessionRepository> = Arc::new(InMemorySessionStore::new());

        let err = QuizService::new(
            fixed_clock(),
            QuestionPool::new(["a?", "b?"]),
            QuizSettings::default(),
            Arc::clone(&store),
            judge.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::Pool(_)));

        let err = QuizService::new(
            fixed_clock(),
            QuestionPool::builtin(),
            QuizSettings {
                questions_per_session: 0,
            },
            store,
            judge,
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuestionCount));
    }

    #[tokio::test]
    async fn next_question_is_idempotent() {
        let service = service_with(Arc::new(CountingClassifier::default()), 30);
        let key = SessionKey::generate();

        let first = service.next_question(&key).await.unwrap();
        let second = service.next_question(&key).await.unwrap();
        assert_eq!(first, second);
        let NextQuestion::Question {
            position, total, ..
        } = first
        else {
            panic!("expected a question");
        };
        assert_eq!((position, total), (1, 30));
    }

    #[tokio::test]
    async fn blank_answers_never_reach_the_classifier() {
        let classifier = Arc::new(CountingClassifier::default());
        let service = service_with(Arc::clone(&classifier), 3);
        let key = SessionKey::generate();
        service.next_question(&key).await.unwrap();

        for blank in ["", "   ", "\n\t"] {
            let err = service.submit_answer(&key, blank).await.unwrap_err();
            assert!(matches!(err, QuizError::EmptyAnswer));
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);

        let NextQuestion::Question { position, .. } = service.next_question(&key).await.unwrap()
        else {
            panic!("expected a question");
        };
        assert_eq!(position, 1);
    }

    #[tokio::test]
    async fn answer_without_session_is_rejected() {
        let service = service_with(Arc::new(CountingClassifier::default()), 3);
        let err = service
            .submit_answer(&SessionKey::generate(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::NotStarted));
    }

    #[tokio::test]
    async fn completes_and_retains_summary() {
        let service = service_with(Arc::new(CountingClassifier::default()), 2);
        let key = SessionKey::generate();
        service.next_question(&key).await.unwrap();

        let first = service.submit_answer(&key, "  yes  ").await.unwrap();
        assert_eq!((first.progress, first.done), (1, false));
        assert!(first.summary.is_none());
        assert!(matches!(
            service.summary(&key).await.unwrap_err(),
            QuizError::NotComplete
        ));

        let last = service.submit_answer(&key, "no").await.unwrap();
        assert_eq!((last.progress, last.done), (2, true));
        assert_eq!(last.source, VerdictSource::Classifier);
        let summary = last.summary.unwrap();
        assert!((summary.honesty_percent() - 100.0).abs() < f64::EPSILON);

        assert_eq!(service.summary(&key).await.unwrap(), summary);
        assert!(service.next_question(&key).await.unwrap().is_done());

        let err = service.submit_answer(&key, "again").await.unwrap_err();
        assert!(matches!(err, QuizError::Completed));
    }

    #[tokio::test]
    async fn evicts_sessions_past_ttl() {
        let mut clock = fixed_clock();
        let store = Arc::new(InMemorySessionStore::new());
        let judge = VerdictJudge::with_random_fallback(Arc::new(CountingClassifier::default()));
        let build = |clock| {
            QuizService::new(
                clock,
                QuestionPool::builtin(),
                QuizSettings::default(),
                store.clone(),
                judge.clone(),
            )
            .unwrap()
        };

        let key = SessionKey::generate();
        build(clock).next_question(&key).await.unwrap();

        clock.advance(Duration::minutes(30));
        assert_eq!(build(clock).evict_idle(Duration::hours(1)).await.unwrap(), 0);

        clock.advance(Duration::minutes(31));
        assert_eq!(build(clock).evict_idle(Duration::hours(1)).await.unwrap(), 1);
        assert!(!build(clock).has_session(&key).await.unwrap());
    }
}
