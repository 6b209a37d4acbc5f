use std::net::SocketAddr;

use clap::Parser;
use clap::builder::TypedValueParser;
use quiz_core::model::DEFAULT_QUESTIONS_PER_SESSION;
use web::SessionKeying;

/// Web quiz that asks personal questions and has a language model judge
/// each answer.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "QUIZ_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// How clients are mapped to sessions: `token` or `address`
    #[arg(long, env = "QUIZ_KEYING", default_value_t = SessionKeying::Token)]
    pub keying: SessionKeying,

    /// Questions drawn for each session
    #[arg(
        long,
        env = "QUIZ_QUESTIONS_PER_SESSION",
        default_value_t = DEFAULT_QUESTIONS_PER_SESSION,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    pub questions_per_session: usize,

    /// Drop sessions idle for this many seconds (kept forever when unset)
    #[arg(long, env = "QUIZ_SESSION_TTL_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub session_ttl_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_parse() {
        let args = Args::try_parse_from([
            "honesty-quiz",
            "--bind",
            "127.0.0.1:8080",
            "--keying",
            "address",
            "--questions-per-session",
            "5",
            "--session-ttl-secs",
            "600",
        ])
        .unwrap();
        assert_eq!(args.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(args.keying, SessionKeying::RemoteAddr);
        assert_eq!(args.questions_per_session, 5);
        assert_eq!(args.session_ttl_secs, Some(600));
    }

    #[test]
    fn zero_questions_rejected() {
        let parsed = Args::try_parse_from(["honesty-quiz", "--questions-per-session", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_keying_rejected() {
        let parsed = Args::try_parse_from(["honesty-quiz", "--keying", "cookie"]);
        assert!(parsed.is_err());
    }
}
