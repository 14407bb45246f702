use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{Answer, Question, QuestionId, QuizHistoryEntry, QuizMode};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Record of one answered (or timed-out) question within a session.
///
/// Exactly one outcome is recorded per question, timeouts included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    /// The submitted answer; `None` for a timeout.
    pub answer: Option<Answer>,
    pub correct: bool,
    /// Streak counter value after this answer was applied.
    pub streak_after: u32,
    /// Set when the answer was correct and the streak before it was >= 2.
    /// Purely a display trigger.
    pub streak_bonus: bool,
}

//
// ─── SESSION STATES ────────────────────────────────────────────────────────────
//

/// Where one quiz attempt currently is.
///
/// `Question` is counting down and waiting for an answer, `Reveal` is
/// showing the explanation for the recorded answer, `Results` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Question,
    Reveal,
    Results,
}

/// Result of a single one-second timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown still running; carries the remaining seconds.
    Counting(u32),
    /// The countdown hit zero and a timeout answer was recorded.
    Expired,
    /// The session is not counting down (reveal or results), nothing moved.
    Idle,
}

/// Result of advancing past a revealed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    Finished,
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// In-memory state machine for one quiz attempt.
///
/// Steps through a pre-drawn question list, scoring answers and tracking
/// the consecutive-correct streak. Returning to the overview is simply
/// dropping the value; nothing is persisted until the final advance.
pub struct QuizSession {
    mode: QuizMode,
    questions: Vec<Question>,
    total_questions: u32,
    current: usize,
    score: u32,
    streak: u32,
    time_left: u32,
    phase: QuizPhase,
    outcomes: Vec<AnswerOutcome>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    history_id: Option<i64>,
}

impl QuizSession {
    /// Create a session over an already drawn and ordered question list.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if no questions are provided and
    /// `SessionError::PoolTooLarge` if the count cannot fit in `u32`.
    pub fn new(
        mode: QuizMode,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyPool);
        }
        let total_questions = u32::try_from(questions.len())
            .map_err(|_| SessionError::PoolTooLarge {
                len: questions.len(),
            })?;

        Ok(Self {
            mode,
            total_questions,
            questions,
            current: 0,
            score: 0,
            streak: 0,
            time_left: mode.seconds_per_question(),
            phase: QuizPhase::Question,
            outcomes: Vec::new(),
            started_at,
            completed_at: None,
            history_id: None,
        })
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Remaining seconds on the current question's countdown.
    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn history_id(&self) -> Option<i64> {
        self.history_id
    }

    #[must_use]
    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.outcomes.last()
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    /// Number of questions with a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, QuizPhase::Results)
    }

    /// The question currently shown, `None` once the session is in results.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = self.outcomes.len();
        SessionProgress {
            current: self.current,
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Apply one second of countdown.
    ///
    /// Only decrements while the current question is unanswered; when the
    /// countdown reaches zero a timeout answer (`None`) is recorded through
    /// the same path as an explicit submission, so it is scored as
    /// incorrect and recorded exactly once. In reveal or results this is a
    /// no-op.
    pub fn tick(&mut self) -> Tick {
        if self.phase != QuizPhase::Question {
            return Tick::Idle;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.record_answer(None);
            Tick::Expired
        } else {
            Tick::Counting(self.time_left)
        }
    }

    /// Record an answer for the current question and move to reveal.
    ///
    /// Freezes the countdown, scores the answer, and updates the streak:
    /// +1 on a correct answer, reset to 0 otherwise.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyAnswered` when the current question has
    /// a recorded answer and `SessionError::Completed` after results.
    pub fn submit_answer(
        &mut self,
        answer: Option<Answer>,
    ) -> Result<&AnswerOutcome, SessionError> {
        match self.phase {
            QuizPhase::Results => Err(SessionError::Completed),
            QuizPhase::Reveal => Err(SessionError::AlreadyAnswered),
            QuizPhase::Question => {
                self.record_answer(answer);
                self.outcomes.last().ok_or(SessionError::Completed)
            }
        }
    }

    // Shared answer path for submissions and timeouts. Caller must have
    // checked that the phase is `Question`.
    fn record_answer(&mut self, answer: Option<Answer>) {
        let question = &self.questions[self.current];
        let correct = question.is_correct(answer.as_ref());
        let streak_bonus = correct && self.streak >= 2;

        if correct {
            self.score += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        self.outcomes.push(AnswerOutcome {
            question_id: question.id(),
            answer,
            correct,
            streak_after: self.streak,
            streak_bonus,
        });
        self.phase = QuizPhase::Reveal;
    }

    /// Leave the reveal for the current question.
    ///
    /// Moves on to the next question with a fresh countdown, or into the
    /// terminal results state when this was the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnswered` while the current question is
    /// still counting down and `SessionError::Completed` after results.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        match self.phase {
            QuizPhase::Question => Err(SessionError::NotAnswered),
            QuizPhase::Results => Err(SessionError::Completed),
            QuizPhase::Reveal => {
                if self.current + 1 < self.questions.len() {
                    self.current += 1;
                    self.time_left = self.mode.seconds_per_question();
                    self.phase = QuizPhase::Question;
                    Ok(Advance::NextQuestion)
                } else {
                    self.phase = QuizPhase::Results;
                    self.completed_at = Some(now);
                    Ok(Advance::Finished)
                }
            }
        }
    }

    /// Build the history entry for a finished session.
    ///
    /// # Errors
    ///
    /// Propagates `QuizHistoryError` if the final tally is inconsistent.
    pub(crate) fn build_entry(
        &self,
        completed_at: DateTime<Utc>,
    ) -> Result<QuizHistoryEntry, SessionError> {
        Ok(QuizHistoryEntry::from_persisted(
            self.mode,
            self.score,
            self.total_questions,
            completed_at,
            self.streak,
        )?)
    }

    pub(crate) fn set_history_id(&mut self, id: i64) {
        self.history_id = Some(id);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("streak", &self.streak)
            .field("time_left", &self.time_left)
            .field("completed_at", &self.completed_at)
            .field("history_id", &self.history_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, QuestionKind, ScoreTier};
    use quiz_core::time::fixed_now;

    fn choice_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            QuestionKind::MultipleChoice {
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct: 1,
            },
            "Because.",
            "Misc",
        )
        .unwrap()
    }

    fn recap_session(count: u64) -> QuizSession {
        let questions = (1..=count).map(choice_question).collect();
        QuizSession::new(QuizMode::Recap, questions, fixed_now()).unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = QuizSession::new(QuizMode::Recap, Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::EmptyPool));
    }

    #[test]
    fn starts_at_question_zero_with_mode_timer() {
        let session = recap_session(5);
        assert_eq!(session.progress().current, 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.time_left(), 15);
        assert_eq!(session.phase(), QuizPhase::Question);
    }

    #[test]
    fn all_correct_recap_is_a_perfect_score() {
        let mut session = recap_session(5);

        for i in 0..5 {
            let outcome = session.submit_answer(Some(Answer::Choice(1))).unwrap();
            assert!(outcome.correct);
            assert_eq!(outcome.streak_after, i + 1);
            session.advance(fixed_now()).unwrap();
        }

        assert!(session.is_complete());
        assert_eq!(session.score(), 5);
        assert_eq!(session.total_questions(), 5);
        let entry = session.build_entry(fixed_now()).unwrap();
        assert_eq!(entry.percentage(), 100);
        assert_eq!(entry.tier(), ScoreTier::Perfect);
        assert_eq!(entry.streak(), 5);
    }

    #[test]
    fn expiring_every_timer_records_only_timeouts() {
        let mut session = recap_session(5);

        for _ in 0..5 {
            for expected in (1..15).rev() {
                assert_eq!(session.tick(), Tick::Counting(expected));
            }
            assert_eq!(session.tick(), Tick::Expired);
            session.advance(fixed_now()).unwrap();
        }

        assert!(session.is_complete());
        assert_eq!(session.score(), 0);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.answered_count(), 5);
        assert!(session.outcomes().iter().all(|o| o.answer.is_none()));
        assert!(session.outcomes().iter().all(|o| o.streak_after == 0));
    }

    #[test]
    fn wrong_answer_resets_streak() {
        let mut session = recap_session(4);

        session.submit_answer(Some(Answer::Choice(1))).unwrap();
        session.advance(fixed_now()).unwrap();
        session.submit_answer(Some(Answer::Choice(1))).unwrap();
        session.advance(fixed_now()).unwrap();
        assert_eq!(session.streak(), 2);

        let outcome = session.submit_answer(Some(Answer::Choice(0))).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.streak_after, 0);
        assert_eq!(session.streak(), 0);
        session.advance(fixed_now()).unwrap();

        let outcome = session.submit_answer(Some(Answer::Choice(1))).unwrap();
        assert_eq!(outcome.streak_after, 1);
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn streak_bonus_fires_from_the_third_consecutive_correct() {
        let mut session = recap_session(4);

        for expected_bonus in [false, false, true, true] {
            let outcome = session.submit_answer(Some(Answer::Choice(1))).unwrap();
            assert_eq!(outcome.streak_bonus, expected_bonus);
            session.advance(fixed_now()).unwrap();
        }
    }

    #[test]
    fn answer_is_recorded_exactly_once_per_question() {
        let mut session = recap_session(2);

        session.submit_answer(Some(Answer::Choice(1))).unwrap();
        let err = session.submit_answer(Some(Answer::Choice(2))).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyAnswered));
        assert_eq!(session.answered_count(), 1);

        // Ticks no longer move the frozen countdown either.
        assert_eq!(session.tick(), Tick::Idle);
    }

    #[test]
    fn cannot_advance_an_unanswered_question() {
        let mut session = recap_session(2);
        let err = session.advance(fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::NotAnswered));
    }

    #[test]
    fn results_state_is_terminal() {
        let mut session = recap_session(1);
        session.submit_answer(None).unwrap();
        session.advance(fixed_now()).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert!(session.current_question().is_none());

        assert!(matches!(
            session.submit_answer(Some(Answer::Choice(0))).unwrap_err(),
            SessionError::Completed
        ));
        assert!(matches!(
            session.advance(fixed_now()).unwrap_err(),
            SessionError::Completed
        ));
        assert_eq!(session.tick(), Tick::Idle);
    }

    #[test]
    fn score_matches_correct_answer_count() {
        let mut session = recap_session(5);
        let answers = [
            Some(Answer::Choice(1)),
            Some(Answer::Choice(0)),
            None,
            Some(Answer::Choice(1)),
            Some(Answer::Choice(3)),
        ];

        for answer in answers {
            session.submit_answer(answer).unwrap();
            session.advance(fixed_now()).unwrap();
        }

        let correct = session.outcomes().iter().filter(|o| o.correct).count();
        assert_eq!(session.score() as usize, correct);
        assert_eq!(session.score(), 2);
        assert!(session.score() <= session.total_questions());
    }

    #[test]
    fn progress_tracks_answered_and_remaining() {
        let mut session = recap_session(3);
        assert_eq!(session.progress().remaining, 3);

        session.submit_answer(Some(Answer::Choice(1))).unwrap();
        session.advance(fixed_now()).unwrap();

        let progress = session.progress();
        assert_eq!(progress.current, 1);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.is_complete);
    }

    #[test]
    fn timer_resets_between_questions() {
        let mut session = recap_session(2);
        session.tick();
        session.tick();
        assert_eq!(session.time_left(), 13);

        session.submit_answer(Some(Answer::Choice(1))).unwrap();
        session.advance(fixed_now()).unwrap();
        assert_eq!(session.time_left(), 15);
    }
}
