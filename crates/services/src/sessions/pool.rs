use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{SeedableRng, rng};

use quiz_core::model::{Question, QuizMode};

use crate::error::SessionError;

/// Randomness source for question selection.
///
/// `Seeded` keeps shuffles reproducible for tests; `Random` is what players
/// get.
#[derive(Debug, Clone, Copy, Default)]
pub enum Shuffle {
    #[default]
    Random,
    Seeded(u64),
}

impl Shuffle {
    /// Shuffle a slice in place according to this source.
    pub fn shuffle<T>(&self, items: &mut [T]) {
        match self {
            Shuffle::Random => items.shuffle(&mut rng()),
            Shuffle::Seeded(seed) => items.shuffle(&mut StdRng::seed_from_u64(*seed)),
        }
    }
}

/// Draws a session's questions from a mode's pool: filter to the mode's
/// question kind, shuffle, cap at the mode's draw size.
#[derive(Debug, Clone, Copy)]
pub struct PoolBuilder {
    mode: QuizMode,
    shuffle: Shuffle,
}

impl PoolBuilder {
    #[must_use]
    pub fn new(mode: QuizMode) -> Self {
        Self {
            mode,
            shuffle: Shuffle::default(),
        }
    }

    /// Override the randomness source used for the draw.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: Shuffle) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Build the ordered question list for one session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` when no question in the input is
    /// playable in this mode.
    pub fn build(
        self,
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<Vec<Question>, SessionError> {
        let mut pool: Vec<Question> = questions
            .into_iter()
            .filter(|q| q.mode() == self.mode)
            .collect();

        if pool.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        self.shuffle.shuffle(&mut pool);
        pool.truncate(self.mode.question_count());
        Ok(pool)
    }
}
