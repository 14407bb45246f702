use quiz_core::model::{Question, QuestionKind, QuizMode};
use sqlx::Row;

use super::mapping::{id_i64, kind_column, question_id_from_i64, ser};
use super::SqliteRepository;
use crate::repository::{QuestionRepository, StorageError};

fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let kind_raw: String = row.try_get("kind").map_err(ser)?;
    let prompt: String = row.try_get("prompt").map_err(ser)?;
    let explanation: String = row.try_get("explanation").map_err(ser)?;
    let category: String = row.try_get("category").map_err(ser)?;

    let kind = match kind_raw.as_str() {
        "multiple_choice" => {
            let options_json: String = row.try_get("options").map_err(ser)?;
            let options: Vec<String> = serde_json::from_str(&options_json).map_err(ser)?;
            let correct_raw: i64 = row.try_get("correct_index").map_err(ser)?;
            let correct = usize::try_from(correct_raw).map_err(ser)?;
            QuestionKind::MultipleChoice { options, correct }
        }
        "true_false" => {
            let correct: bool = row.try_get("correct_bool").map_err(ser)?;
            QuestionKind::TrueFalse { correct }
        }
        other => {
            return Err(StorageError::Serialization(format!(
                "unknown question kind: {other}"
            )));
        }
    };

    // Revalidate through the domain constructor so malformed rows surface
    // as errors instead of flowing into a session.
    Question::new(id, prompt, kind, explanation, category).map_err(ser)
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let id = id_i64("question_id", question.id().value())?;
        let kind = kind_column(question.mode());

        let (options, correct_index, correct_bool) = match question.kind() {
            QuestionKind::MultipleChoice { options, correct } => {
                let json = serde_json::to_string(options).map_err(ser)?;
                let index = i64::try_from(*correct).map_err(ser)?;
                (Some(json), Some(index), None)
            }
            QuestionKind::TrueFalse { correct } => (None, None, Some(*correct)),
        };

        sqlx::query(
            r"
                INSERT INTO questions (
                    id, kind, prompt, options, correct_index, correct_bool,
                    explanation, category
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(id) DO UPDATE SET
                    kind = excluded.kind,
                    prompt = excluded.prompt,
                    options = excluded.options,
                    correct_index = excluded.correct_index,
                    correct_bool = excluded.correct_bool,
                    explanation = excluded.explanation,
                    category = excluded.category
            ",
        )
        .bind(id)
        .bind(kind)
        .bind(question.prompt())
        .bind(options)
        .bind(correct_index)
        .bind(correct_bool)
        .bind(question.explanation())
        .bind(question.category())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn questions_for_mode(&self, mode: QuizMode) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, kind, prompt, options, correct_index, correct_bool,
                       explanation, category
                FROM questions
                WHERE kind = ?1
                ORDER BY id ASC
            ",
        )
        .bind(kind_column(mode))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_question_row(&row)?);
        }
        Ok(out)
    }
}
