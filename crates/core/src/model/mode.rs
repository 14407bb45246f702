use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown quiz mode: {raw}")]
pub struct ParseQuizModeError {
    pub raw: String,
}

//
// ─── QUIZ MODE ─────────────────────────────────────────────────────────────────
//

/// The two playable quiz modes.
///
/// Each mode carries a fixed draw size and a fixed per-question countdown.
/// These are product constants, not user configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizMode {
    /// Five multiple-choice questions about recently shown facts, 15 s each.
    Recap,
    /// Ten true/false statements at a faster 12 s tempo.
    TrueFalse,
}

impl QuizMode {
    /// Number of questions drawn for one session of this mode.
    #[must_use]
    pub fn question_count(&self) -> usize {
        match self {
            QuizMode::Recap => 5,
            QuizMode::TrueFalse => 10,
        }
    }

    /// Countdown start value for each question, in seconds.
    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        match self {
            QuizMode::Recap => 15,
            QuizMode::TrueFalse => 12,
        }
    }

    /// Stable string form used for persistence and flags.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizMode::Recap => "recap",
            QuizMode::TrueFalse => "true-false",
        }
    }

    /// Display title as shown to players (Swedish).
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            QuizMode::Recap => "Recap-quiz",
            QuizMode::TrueFalse => "Sant/Falskt",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuizMode {
    type Err = ParseQuizModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recap" => Ok(QuizMode::Recap),
            "true-false" => Ok(QuizMode::TrueFalse),
            other => Err(ParseQuizModeError {
                raw: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_table_is_fixed() {
        assert_eq!(QuizMode::Recap.question_count(), 5);
        assert_eq!(QuizMode::Recap.seconds_per_question(), 15);
        assert_eq!(QuizMode::TrueFalse.question_count(), 10);
        assert_eq!(QuizMode::TrueFalse.seconds_per_question(), 12);
    }

    #[test]
    fn mode_string_roundtrip() {
        for mode in [QuizMode::Recap, QuizMode::TrueFalse] {
            let parsed: QuizMode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "multi".parse::<QuizMode>().unwrap_err();
        assert_eq!(err.raw, "multi");
    }
}
