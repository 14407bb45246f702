use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::QuizMode;
use storage::repository::{QuizHistoryRepository, QuizHistoryRow};

use crate::error::SessionError;

/// Storage identifier for a persisted history entry.
///
/// NOTE: This is currently `i64` to match `SQLite` row IDs.
pub type QuizHistoryId = i64;

/// Presentation-agnostic list item for a finished quiz.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings,
/// no localization assumptions. The UI may format timestamps (e.g. relative
/// time, locale) as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizHistoryListItem {
    pub id: QuizHistoryId,
    pub mode: QuizMode,
    pub completed_at: DateTime<Utc>,

    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub streak: u32,
}

impl QuizHistoryListItem {
    #[must_use]
    pub fn from_row(row: &QuizHistoryRow) -> Self {
        let entry = &row.entry;
        Self {
            id: row.id,
            mode: entry.mode(),
            completed_at: entry.completed_at(),
            score: entry.score(),
            total: entry.total(),
            percentage: entry.percentage(),
            streak: entry.streak(),
        }
    }
}

/// Read-side access to the persisted quiz history.
#[derive(Clone)]
pub struct QuizHistoryService {
    history: Arc<dyn QuizHistoryRepository>,
}

impl QuizHistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn QuizHistoryRepository>) -> Self {
        Self { history }
    }

    /// List finished quizzes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when repository access fails.
    pub async fn recent(&self, limit: u32) -> Result<Vec<QuizHistoryListItem>, SessionError> {
        let rows = self.history.list_recent(limit).await?;
        Ok(rows.iter().map(QuizHistoryListItem::from_row).collect())
    }
}
