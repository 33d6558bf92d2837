//! Tokio driver for [`Countdown`].
//!
//! `spawn_countdown` acquires a one-second interval for the lifetime of the
//! returned [`CountdownTask`]. Completion, an explicit `cancel`, or dropping
//! the handle all release the timer; once released no navigation can fire.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use crate::countdown::{Countdown, Navigator, Step, TICK_MS};

/// Running countdown. Aborts its timer when dropped.
#[derive(Debug)]
pub struct CountdownTask {
    handle: JoinHandle<()>,
    remaining: watch::Receiver<u32>,
}

/// Start `countdown` on the current tokio runtime.
pub fn spawn_countdown<N>(countdown: Countdown, navigator: N) -> CountdownTask
where
    N: Navigator + Send + 'static,
{
    let (tx, remaining) = watch::channel(countdown.remaining());
    let handle = tokio::spawn(run(countdown, navigator, tx));
    CountdownTask { handle, remaining }
}

async fn run<N: Navigator>(mut countdown: Countdown, navigator: N, tx: watch::Sender<u32>) {
    let period = Duration::from_millis(u64::from(TICK_MS));
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        match countdown.tick() {
            Some(Step::Tick(n)) => {
                let _ = tx.send(n);
            }
            Some(Step::Redirect(redirect)) => {
                let _ = tx.send(0);
                navigator.navigate(&redirect.path, &redirect.from);
                return;
            }
            None => return,
        }
    }
}

impl CountdownTask {
    /// Seconds currently displayed.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// Wait for the next displayed value. Returns `None` after the countdown ends.
    pub async fn next(&mut self) -> Option<u32> {
        self.remaining.changed().await.ok()?;
        Some(*self.remaining.borrow_and_update())
    }

    /// Wait until the countdown has navigated away.
    ///
    /// Returns `false` if the task was aborted before it could finish.
    pub async fn wait(mut self) -> bool {
        (&mut self.handle).await.is_ok()
    }

    /// Release the timer without navigating.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for CountdownTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[path = "runtime_test.rs"]
mod tests;
