mod args;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use quiz_core::model::QuestionPool;
use services::{
    ChatCompletionClassifier, ClassifierConfig, Clock, QuizService, QuizSettings, VerdictJudge,
};
use storage::InMemorySessionStore;
use tracing::{info, warn};
use web::{AppState, router};

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config = ClassifierConfig::from_env().context("classifier configuration")?;
    info!(
        base_url = %config.base_url,
        model = %config.model,
        temperature = config.temperature,
        timeout_secs = config.timeout.as_secs(),
        "classifier configured"
    );
    let classifier =
        ChatCompletionClassifier::new(config).context("failed to build classifier client")?;

    let quiz = QuizService::new(
        Clock::default(),
        QuestionPool::builtin(),
        QuizSettings {
            questions_per_session: args.questions_per_session,
        },
        Arc::new(InMemorySessionStore::new()),
        VerdictJudge::with_random_fallback(Arc::new(classifier)),
    )
    .context("invalid quiz settings")?;
    let quiz = Arc::new(quiz);

    if let Some(secs) = args.session_ttl_secs {
        spawn_sweeper(Arc::clone(&quiz), secs);
    }

    let app = router(AppState::new(quiz, args.keying));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(
        addr = %listener.local_addr()?,
        keying = %args.keying,
        questions = args.questions_per_session,
        "quiz server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("quiz server stopped");
    Ok(())
}

/// Periodically drops sessions idle for longer than `ttl_secs`.
fn spawn_sweeper(quiz: Arc<QuizService>, ttl_secs: u64) {
    let ttl = i64::try_from(ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX);
    let period = Duration::from_secs(ttl_secs.clamp(1, 60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = quiz.evict_idle(ttl).await {
                warn!("session sweep failed: {e}");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
