#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod stats;

pub use quiz_core::Clock;

pub use error::{SessionError, StatsError};

pub use sessions::{
    Advance, AnswerOutcome, PoolBuilder, QuestionTimer, QuizHistoryId, QuizHistoryListItem,
    QuizHistoryService, QuizLoopService, QuizPhase, QuizSession, SessionAdvance, SessionProgress,
    Shuffle, Tick,
};
pub use stats::{Badge, BadgeKind, QuizStats, StatsService};
