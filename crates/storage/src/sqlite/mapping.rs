use std::str::FromStr;

use quiz_core::model::{QuestionId, QuizMode};

use crate::repository::StorageError;

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    u64::try_from(v)
        .map(QuestionId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid question id: {v}")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn mode_from_str(raw: &str) -> Result<QuizMode, StorageError> {
    QuizMode::from_str(raw).map_err(ser)
}

/// Column value for the `questions.kind` discriminator.
pub(crate) fn kind_column(mode: QuizMode) -> &'static str {
    match mode {
        QuizMode::Recap => "multiple_choice",
        QuizMode::TrueFalse => "true_false",
    }
}
