use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::mode::QuizMode;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("multiple-choice question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectOutOfRange { index: usize, len: usize },
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// A submitted answer. Timeouts are represented as `Option<Answer>::None`
/// at the session layer, so this type only covers explicit choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    /// Index into a multiple-choice option list.
    Choice(usize),
    /// True/false selection.
    Bool(bool),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Answer shape of a question, together with its correct value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String>, correct: usize },
    TrueFalse { correct: bool },
}

impl QuestionKind {
    /// The quiz mode this kind of question is playable in.
    #[must_use]
    pub fn mode(&self) -> QuizMode {
        match self {
            QuestionKind::MultipleChoice { .. } => QuizMode::Recap,
            QuestionKind::TrueFalse { .. } => QuizMode::TrueFalse,
        }
    }
}

/// A single quiz question. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    kind: QuestionKind,
    explanation: String,
    category: String,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::TooFewOptions` for a multiple-choice question with
    /// fewer than two options, and `QuestionError::CorrectOutOfRange` when
    /// the correct index does not address an option.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        kind: QuestionKind,
        explanation: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        if let QuestionKind::MultipleChoice { options, correct } = &kind {
            if options.len() < 2 {
                return Err(QuestionError::TooFewOptions { len: options.len() });
            }
            if *correct >= options.len() {
                return Err(QuestionError::CorrectOutOfRange {
                    index: *correct,
                    len: options.len(),
                });
            }
        }

        Ok(Self {
            id,
            prompt,
            kind,
            explanation: explanation.into(),
            category: category.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The quiz mode this question belongs to.
    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.kind.mode()
    }

    /// Option list for multiple-choice questions, empty for true/false.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. } => options,
            QuestionKind::TrueFalse { .. } => &[],
        }
    }

    /// The correct option text, where one exists.
    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        match &self.kind {
            QuestionKind::MultipleChoice { options, correct } => {
                options.get(*correct).map(String::as_str)
            }
            QuestionKind::TrueFalse { .. } => None,
        }
    }

    /// Scores an answer against this question.
    ///
    /// Timeouts (`None`) and answers of the wrong shape are incorrect; a
    /// `Choice` can never match a true/false question and vice versa.
    #[must_use]
    pub fn is_correct(&self, answer: Option<&Answer>) -> bool {
        match (&self.kind, answer) {
            (QuestionKind::MultipleChoice { correct, .. }, Some(Answer::Choice(index))) => {
                index == correct
            }
            (QuestionKind::TrueFalse { correct }, Some(Answer::Bool(value))) => value == correct,
            _ => false,
        }
    }
}
