mod ids;
mod question;
mod session;
mod summary;
mod verdict;

pub use ids::{ParseSessionKeyError, SessionKey};
pub use question::{DEFAULT_QUESTIONS_PER_SESSION, Question, QuestionPool, QuestionPoolError};
pub use session::{AnswerRecord, Session, SessionStateError, SessionStep};
pub use summary::{SessionSummary, SessionSummaryError};
pub use verdict::{Verdict, VerdictSource};
