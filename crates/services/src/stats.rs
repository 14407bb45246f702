//! Overview stats and badges computed from quiz history.

use std::sync::Arc;

use storage::repository::{QuizHistoryRepository, QuizHistoryRow};

use crate::error::StatsError;

// History window scanned for stats. Plenty for a single-player history.
const HISTORY_SCAN_LIMIT: u32 = 500;

/// Headline numbers for the quiz overview screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStats {
    pub total_quizzes: u32,
    /// Percentage of the most recent quiz, if any was played.
    pub last_score_percent: Option<u32>,
    pub best_streak: u32,
}

/// The unlockable achievements, with their fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    /// Finish one quiz.
    FirstQuiz,
    /// Score 100 % on any quiz.
    PerfectScore,
    /// Reach a streak of five correct answers.
    StreakMaster,
    /// Finish ten quizzes.
    QuizAddict,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 4] = [
        BadgeKind::FirstQuiz,
        BadgeKind::PerfectScore,
        BadgeKind::StreakMaster,
        BadgeKind::QuizAddict,
    ];

    /// Stable identifier for persistence and UI keys.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            BadgeKind::FirstQuiz => "first-quiz",
            BadgeKind::PerfectScore => "perfect-score",
            BadgeKind::StreakMaster => "streak-master",
            BadgeKind::QuizAddict => "quiz-addict",
        }
    }

    /// Badge title (Swedish).
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BadgeKind::FirstQuiz => "Första försöket",
            BadgeKind::PerfectScore => "Perfekt poäng",
            BadgeKind::StreakMaster => "Streak-mästare",
            BadgeKind::QuizAddict => "Quiz-beroende",
        }
    }

    /// Unlocked description (Swedish).
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            BadgeKind::FirstQuiz => "Genomför ditt första quiz",
            BadgeKind::PerfectScore => "Få 100% på ett quiz",
            BadgeKind::StreakMaster => "Få 5 rätt i rad",
            BadgeKind::QuizAddict => "Genomför 10 quiz",
        }
    }

    /// Locked requirement text (Swedish).
    #[must_use]
    pub fn requirement(&self) -> &'static str {
        match self {
            BadgeKind::FirstQuiz => "Genomför 1 quiz",
            BadgeKind::PerfectScore => "Få 100% på ett quiz",
            BadgeKind::StreakMaster => "5 rätt i rad",
            BadgeKind::QuizAddict => "Genomför 10 quiz",
        }
    }

    fn unlocked_by(&self, facts: &HistoryFacts) -> bool {
        match self {
            BadgeKind::FirstQuiz => facts.total_quizzes >= 1,
            BadgeKind::PerfectScore => facts.perfect_scores >= 1,
            BadgeKind::StreakMaster => facts.best_streak >= 5,
            BadgeKind::QuizAddict => facts.total_quizzes >= 10,
        }
    }
}

/// One badge with its unlock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub kind: BadgeKind,
    pub unlocked: bool,
}

#[derive(Debug, Default)]
struct HistoryFacts {
    total_quizzes: u32,
    perfect_scores: u32,
    best_streak: u32,
    last_score_percent: Option<u32>,
}

impl HistoryFacts {
    fn from_rows(rows: &[QuizHistoryRow]) -> Self {
        let mut facts = HistoryFacts {
            total_quizzes: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            // rows are newest first
            last_score_percent: rows.first().map(|row| row.entry.percentage()),
            ..HistoryFacts::default()
        };
        for row in rows {
            if row.entry.is_perfect() {
                facts.perfect_scores = facts.perfect_scores.saturating_add(1);
            }
            facts.best_streak = facts.best_streak.max(row.entry.streak());
        }
        facts
    }
}

/// Computes overview stats and badge unlocks from persisted history.
#[derive(Clone)]
pub struct StatsService {
    history: Arc<dyn QuizHistoryRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(history: Arc<dyn QuizHistoryRepository>) -> Self {
        Self { history }
    }

    /// Headline stats for the overview screen.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` when repository access fails.
    pub async fn overview(&self) -> Result<QuizStats, StatsError> {
        let rows = self.history.list_recent(HISTORY_SCAN_LIMIT).await?;
        let facts = HistoryFacts::from_rows(&rows);
        Ok(QuizStats {
            total_quizzes: facts.total_quizzes,
            last_score_percent: facts.last_score_percent,
            best_streak: facts.best_streak,
        })
    }

    /// All badges with their current unlock state.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` when repository access fails.
    pub async fn badges(&self) -> Result<Vec<Badge>, StatsError> {
        let rows = self.history.list_recent(HISTORY_SCAN_LIMIT).await?;
        let facts = HistoryFacts::from_rows(&rows);
        Ok(BadgeKind::ALL
            .iter()
            .map(|kind| Badge {
                kind: *kind,
                unlocked: kind.unlocked_by(&facts),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuizHistoryEntry, QuizMode};
    use quiz_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, QuizHistoryRepository};

    fn entry(score: u32, total: u32, streak: u32, minutes: i64) -> QuizHistoryEntry {
        QuizHistoryEntry::from_persisted(
            QuizMode::Recap,
            score,
            total,
            fixed_now() + chrono::Duration::minutes(minutes),
            streak,
        )
        .unwrap()
    }

    async fn service_with(entries: &[QuizHistoryEntry]) -> StatsService {
        let repo = InMemoryRepository::new();
        for e in entries {
            repo.append_entry(e).await.unwrap();
        }
        StatsService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn empty_history_yields_zeroed_stats() {
        let service = service_with(&[]).await;
        let stats = service.overview().await.unwrap();
        assert_eq!(stats.total_quizzes, 0);
        assert_eq!(stats.last_score_percent, None);
        assert_eq!(stats.best_streak, 0);
    }

    #[tokio::test]
    async fn overview_uses_latest_entry_and_best_streak() {
        let service = service_with(&[entry(5, 5, 5, 0), entry(2, 5, 1, 10)]).await;
        let stats = service.overview().await.unwrap();
        assert_eq!(stats.total_quizzes, 2);
        // newest entry is the 2/5 one
        assert_eq!(stats.last_score_percent, Some(40));
        assert_eq!(stats.best_streak, 5);
    }

    #[tokio::test]
    async fn badges_unlock_at_fixed_thresholds() {
        let service = service_with(&[entry(3, 5, 2, 0)]).await;
        let badges = service.badges().await.unwrap();
        let by_kind = |kind: BadgeKind| badges.iter().find(|b| b.kind == kind).unwrap().unlocked;

        assert!(by_kind(BadgeKind::FirstQuiz));
        assert!(!by_kind(BadgeKind::PerfectScore));
        assert!(!by_kind(BadgeKind::StreakMaster));
        assert!(!by_kind(BadgeKind::QuizAddict));
    }

    #[tokio::test]
    async fn perfect_and_streak_badges() {
        let service = service_with(&[entry(5, 5, 5, 0)]).await;
        let badges = service.badges().await.unwrap();
        assert!(badges
            .iter()
            .filter(|b| matches!(b.kind, BadgeKind::PerfectScore | BadgeKind::StreakMaster))
            .all(|b| b.unlocked));
    }

    #[tokio::test]
    async fn quiz_addict_needs_ten_finishes() {
        let entries: Vec<_> = (0..10).map(|i| entry(1, 5, 0, i)).collect();
        let service = service_with(&entries).await;
        let badges = service.badges().await.unwrap();
        let addict = badges
            .iter()
            .find(|b| b.kind == BadgeKind::QuizAddict)
            .unwrap();
        assert!(addict.unlocked);
    }
}
