use std::sync::Arc;

use log::{debug, info};

use quiz_core::model::QuizMode;
use storage::repository::{QuestionRepository, QuizHistoryRepository};

use super::pool::{PoolBuilder, Shuffle};
use super::service::{Advance, AnswerOutcome, QuizSession, Tick};
use super::timer::QuestionTimer;
use crate::Clock;
use crate::error::SessionError;

/// Result of advancing a session through the loop service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAdvance {
    pub step: Advance,
    pub is_complete: bool,
    pub history_id: Option<i64>,
}

/// Orchestrates session start and history persistence.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    shuffle: Shuffle,
    questions: Arc<dyn QuestionRepository>,
    history: Arc<dyn QuizHistoryRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        history: Arc<dyn QuizHistoryRepository>,
    ) -> Self {
        Self {
            clock,
            shuffle: Shuffle::default(),
            questions,
            history,
        }
    }

    /// Override the randomness source used for question draws.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: Shuffle) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Start a new quiz in the given mode.
    ///
    /// Draws and shuffles the mode's question pool, capped at the mode's
    /// question count.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when the repository holds no
    /// playable questions for the mode, or `SessionError::Storage` for
    /// repository failures.
    pub async fn start_session(&self, mode: QuizMode) -> Result<QuizSession, SessionError> {
        let pool = self.questions.questions_for_mode(mode).await?;
        let drawn = PoolBuilder::new(mode).with_shuffle(self.shuffle).build(pool)?;
        debug!("starting {mode} session with {} questions", drawn.len());
        QuizSession::new(mode, drawn, self.clock.now())
    }

    /// Advance past the current question's reveal, persisting the history
    /// entry exactly once when the session finishes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for state-machine misuse or persistence
    /// failures.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<SessionAdvance, SessionError> {
        let step = session.advance(self.clock.now())?;

        if session.is_complete() && session.history_id().is_none() {
            let completed_at = session.completed_at().ok_or(SessionError::Completed)?;
            let entry = session.build_entry(completed_at)?;
            let id = self.history.append_entry(&entry).await?;
            session.set_history_id(id);
            info!(
                "quiz finished: mode={} score={}/{} streak={}",
                entry.mode(),
                entry.score(),
                entry.total(),
                entry.streak()
            );
        }

        Ok(SessionAdvance {
            step,
            is_complete: session.is_complete(),
            history_id: session.history_id(),
        })
    }

    /// Retry history persistence for a completed session.
    ///
    /// Useful when the final append failed (e.g. transient storage error).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is not complete or
    /// missing timestamps. Returns `SessionError::Storage` if persistence
    /// fails.
    pub async fn finalize_entry(&self, session: &mut QuizSession) -> Result<i64, SessionError> {
        if let Some(id) = session.history_id() {
            return Ok(id);
        }

        if !session.is_complete() {
            return Err(SessionError::Completed);
        }

        let completed_at = session.completed_at().ok_or(SessionError::Completed)?;
        let entry = session.build_entry(completed_at)?;
        let id = self.history.append_entry(&entry).await?;
        session.set_history_id(id);
        Ok(id)
    }

    /// Drive the session's countdown from a ticking timer until the current
    /// question is answered elsewhere, the countdown expires, or the timer
    /// is cancelled.
    ///
    /// On expiry the implicit timeout answer has already been recorded;
    /// the recorded outcome is returned.
    pub async fn run_question(
        &self,
        session: &mut QuizSession,
        timer: &mut QuestionTimer,
    ) -> Option<AnswerOutcome> {
        while timer.next_tick().await.is_some() {
            match session.tick() {
                Tick::Expired => return session.last_outcome().cloned(),
                Tick::Idle => return None,
                Tick::Counting(_) => {}
            }
        }
        None
    }
}
