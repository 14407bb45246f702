//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizHistoryError;
use storage::repository::StorageError;

/// Errors emitted by quiz session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for this mode")]
    EmptyPool,

    #[error("too many questions for a single session: {len}")]
    PoolTooLarge { len: usize },

    #[error("quiz already completed")]
    Completed,

    #[error("current question already has a recorded answer")]
    AlreadyAnswered,

    #[error("current question has no recorded answer yet")]
    NotAnswered,

    #[error(transparent)]
    History(#[from] QuizHistoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
