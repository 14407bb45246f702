use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{Question, QuestionId, QuizHistoryEntry, QuizMode};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted history entry together with its storage row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizHistoryRow {
    pub id: i64,
    pub entry: QuizHistoryEntry,
}

impl QuizHistoryRow {
    #[must_use]
    pub fn new(id: i64, entry: QuizHistoryEntry) -> Self {
        Self { id, entry }
    }
}

/// Repository contract for the question pool.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or update a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Fetch every question playable in the given mode.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures. An empty pool is not an
    /// error at this layer; the session layer decides how to surface it.
    async fn questions_for_mode(&self, mode: QuizMode) -> Result<Vec<Question>, StorageError>;
}

/// Repository contract for quiz history (the persistence port for finished
/// sessions). Entries are append-only.
#[async_trait]
pub trait QuizHistoryRepository: Send + Sync {
    /// Append one finished quiz, returning its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_entry(&self, entry: &QuizHistoryEntry) -> Result<i64, StorageError>;

    /// Fetch a single entry by row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_entry(&self, id: i64) -> Result<QuizHistoryEntry, StorageError>;

    /// List entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizHistoryRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<QuestionId, Question>>>,
    history: Arc<Mutex<Vec<QuizHistoryEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(question.id(), question.clone());
        Ok(())
    }

    async fn questions_for_mode(&self, mode: QuizMode) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .values()
            .filter(|q| q.mode() == mode)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl QuizHistoryRepository for InMemoryRepository {
    async fn append_entry(&self, entry: &QuizHistoryEntry) -> Result<i64, StorageError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(entry.clone());
        i64::try_from(guard.len()).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn get_entry(&self, id: i64) -> Result<QuizHistoryEntry, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let index = usize::try_from(id.checked_sub(1).ok_or(StorageError::NotFound)?)
            .map_err(|_| StorageError::NotFound)?;
        guard.get(index).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizHistoryRow>, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut rows: Vec<QuizHistoryRow> = guard
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let id = i64::try_from(index + 1).unwrap_or(i64::MAX);
                QuizHistoryRow::new(id, entry.clone())
            })
            .collect();
        // Same ordering as the SQLite adapter: completed_at DESC, id DESC.
        rows.sort_by(|a, b| {
            b.entry
                .completed_at()
                .cmp(&a.entry.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(limit);
        Ok(rows)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub history: Arc<dyn QuizHistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let history: Arc<dyn QuizHistoryRepository> = Arc::new(repo);
        Self { questions, history }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionKind, QuizHistoryEntry};
    use quiz_core::time::fixed_now;

    fn build_question(id: u64, mode: QuizMode) -> Question {
        let kind = match mode {
            QuizMode::Recap => QuestionKind::MultipleChoice {
                options: vec!["A".into(), "B".into()],
                correct: 0,
            },
            QuizMode::TrueFalse => QuestionKind::TrueFalse { correct: true },
        };
        Question::new(QuestionId::new(id), format!("Q{id}"), kind, "", "Misc").unwrap()
    }

    fn build_entry(score: u32) -> QuizHistoryEntry {
        QuizHistoryEntry::from_persisted(QuizMode::Recap, score, 5, fixed_now(), score).unwrap()
    }

    fn build_entry_at(score: u32, minutes: i64) -> QuizHistoryEntry {
        QuizHistoryEntry::from_persisted(
            QuizMode::Recap,
            score,
            5,
            fixed_now() + chrono::Duration::minutes(minutes),
            score,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn filters_questions_by_mode() {
        let repo = InMemoryRepository::new();
        repo.upsert_question(&build_question(1, QuizMode::Recap))
            .await
            .unwrap();
        repo.upsert_question(&build_question(2, QuizMode::TrueFalse))
            .await
            .unwrap();

        let recap = repo.questions_for_mode(QuizMode::Recap).await.unwrap();
        assert_eq!(recap.len(), 1);
        assert_eq!(recap[0].id(), QuestionId::new(1));
    }

    #[tokio::test]
    async fn history_appends_and_lists_newest_first() {
        let repo = InMemoryRepository::new();
        let first = repo.append_entry(&build_entry(2)).await.unwrap();
        let second = repo.append_entry(&build_entry(5)).await.unwrap();
        assert_ne!(first, second);

        let rows = repo.list_recent(10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[0].entry.score(), 5);

        let fetched = repo.get_entry(first).await.unwrap();
        assert_eq!(fetched.score(), 2);
    }

    #[tokio::test]
    async fn list_recent_orders_by_completion_time() {
        let repo = InMemoryRepository::new();
        // Appended out of timestamp order: the later quiz lands first.
        let late = repo.append_entry(&build_entry_at(1, 10)).await.unwrap();
        let early = repo.append_entry(&build_entry_at(4, 0)).await.unwrap();

        let rows = repo.list_recent(10).await.unwrap();
        assert_eq!(rows[0].id, late);
        assert_eq!(rows[1].id, early);

        let capped = repo.list_recent(1).await.unwrap();
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].id, late);
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.get_entry(42).await.unwrap_err(),
            StorageError::NotFound
        ));
    }
}
