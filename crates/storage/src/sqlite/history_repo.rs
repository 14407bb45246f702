use quiz_core::model::QuizHistoryEntry;
use sqlx::Row;

use super::mapping::{mode_from_str, ser, u32_from_i64};
use super::SqliteRepository;
use crate::repository::{QuizHistoryRepository, QuizHistoryRow, StorageError};

fn map_entry_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuizHistoryEntry, StorageError> {
    let mode_raw: String = row.try_get("mode").map_err(ser)?;
    let mode = mode_from_str(&mode_raw)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let streak = u32_from_i64("streak", row.try_get::<i64, _>("streak").map_err(ser)?)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;

    QuizHistoryEntry::from_persisted(mode, score, total, completed_at, streak).map_err(ser)
}

fn map_entry_row_with_id(row: &sqlx::sqlite::SqliteRow) -> Result<QuizHistoryRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let entry = map_entry_row(row)?;
    Ok(QuizHistoryRow::new(id, entry))
}

#[async_trait::async_trait]
impl QuizHistoryRepository for SqliteRepository {
    async fn append_entry(&self, entry: &QuizHistoryEntry) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_history (mode, score, total, streak, completed_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(entry.mode().as_str())
        .bind(i64::from(entry.score()))
        .bind(i64::from(entry.total()))
        .bind(i64::from(entry.streak()))
        .bind(entry.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_entry(&self, id: i64) -> Result<QuizHistoryEntry, StorageError> {
        let row = sqlx::query(
            r"
                SELECT mode, score, total, streak, completed_at
                FROM quiz_history
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_entry_row(&row)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizHistoryRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, mode, score, total, streak, completed_at
                FROM quiz_history
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_entry_row_with_id(&row)?);
        }
        Ok(out)
    }
}
