mod history;
mod ids;
mod mode;
mod question;

pub use history::{QuizHistoryEntry, QuizHistoryError, ScoreTier};
pub use ids::{ParseIdError, QuestionId};
pub use mode::{ParseQuizModeError, QuizMode};
pub use question::{Answer, Question, QuestionError, QuestionKind};
