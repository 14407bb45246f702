mod pool;
mod progress;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use pool::{PoolBuilder, Shuffle};
pub use progress::SessionProgress;
pub use service::{Advance, AnswerOutcome, QuizPhase, QuizSession, Tick};
pub use timer::QuestionTimer;
pub use view::{QuizHistoryId, QuizHistoryListItem, QuizHistoryService};
pub use workflow::{QuizLoopService, SessionAdvance};
