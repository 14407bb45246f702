use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// One-second countdown ticks for a single question.
///
/// The ticks come from a background task owned by this handle. The task
/// stops after `seconds` ticks, when the receiver is dropped, or when the
/// timer is cancelled (an answer was submitted, or the session was torn
/// down). Dropping the handle aborts the task.
pub struct QuestionTimer {
    ticks: mpsc::Receiver<()>,
    handle: JoinHandle<()>,
}

impl QuestionTimer {
    /// Spawn the ticking task for a countdown of `seconds`.
    #[must_use]
    pub fn start(seconds: u32) -> Self {
        let (tx, ticks) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; consume it so
            // every delivered tick represents one elapsed second.
            tick.tick().await;
            for _ in 0..seconds {
                tick.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { ticks, handle }
    }

    /// Wait for the next one-second tick.
    ///
    /// Returns `None` once the countdown is exhausted or cancelled.
    pub async fn next_tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    /// Stop ticking. Pending ticks are discarded.
    pub fn cancel(&mut self) {
        self.handle.abort();
        self.ticks.close();
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_one_tick_per_second_then_ends() {
        let mut timer = QuestionTimer::start(3);
        for _ in 0..3 {
            assert_eq!(timer.next_tick().await, Some(()));
        }
        assert_eq!(timer.next_tick().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_remaining_ticks() {
        let mut timer = QuestionTimer::start(10);
        assert_eq!(timer.next_tick().await, Some(()));
        timer.cancel();
        assert_eq!(timer.next_tick().await, None);
    }
}
