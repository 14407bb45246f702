use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::mode::QuizMode;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizHistoryError {
    #[error("history entry cannot have zero questions")]
    EmptyTotal,

    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("streak ({streak}) exceeds total questions ({total})")]
    StreakExceedsTotal { streak: u32, total: u32 },
}

//
// ─── SCORE TIER ────────────────────────────────────────────────────────────────
//

/// Display tier for a finished quiz. Thresholds are fixed product values:
/// perfect is exactly 100 %, great is at least 80 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Perfect,
    Great,
    Practice,
}

impl ScoreTier {
    /// Classify a rounded percentage.
    #[must_use]
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage == 100 {
            ScoreTier::Perfect
        } else if percentage >= 80 {
            ScoreTier::Great
        } else {
            ScoreTier::Practice
        }
    }

    /// Results headline (Swedish).
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            ScoreTier::Perfect => "Perfekt poäng!",
            ScoreTier::Great => "Bra jobbat!",
            ScoreTier::Practice => "Bra försök!",
        }
    }

    /// Results body copy (Swedish).
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ScoreTier::Perfect => "Du är en faktamästare!",
            ScoreTier::Great => "Du kan verkligen dina fakta!",
            ScoreTier::Practice => "Fortsätt utforska för att förbättra dig!",
        }
    }
}

//
// ─── HISTORY ENTRY ─────────────────────────────────────────────────────────────
//

/// One finished quiz attempt. Appended to persisted history on completion
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizHistoryEntry {
    mode: QuizMode,
    score: u32,
    total: u32,
    completed_at: DateTime<Utc>,
    streak: u32,
}

impl QuizHistoryEntry {
    /// Rehydrate an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizHistoryError::EmptyTotal` for a zero-question entry and
    /// `ScoreExceedsTotal`/`StreakExceedsTotal` when the counters do not fit
    /// the session size.
    pub fn from_persisted(
        mode: QuizMode,
        score: u32,
        total: u32,
        completed_at: DateTime<Utc>,
        streak: u32,
    ) -> Result<Self, QuizHistoryError> {
        if total == 0 {
            return Err(QuizHistoryError::EmptyTotal);
        }
        if score > total {
            return Err(QuizHistoryError::ScoreExceedsTotal { score, total });
        }
        if streak > total {
            return Err(QuizHistoryError::StreakExceedsTotal { streak, total });
        }

        Ok(Self {
            mode,
            score,
            total,
            completed_at,
            streak,
        })
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Streak counter value at the moment the quiz finished.
    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Rounded score percentage in `0..=100`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percentage(&self) -> u32 {
        let ratio = f64::from(self.score) / f64::from(self.total);
        (ratio * 100.0).round() as u32
    }

    /// True when every question was answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }

    /// Display tier for this entry.
    #[must_use]
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::for_percentage(self.percentage())
    }
}
