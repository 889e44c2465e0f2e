//! The single "now" tick source.
//!
//! A [`Ticker`] publishes the current IST time on a `watch` channel at a fixed
//! interval. Consumers read the latest value and pass it into the pure
//! classification functions; nothing else in the crate owns a timer for
//! "now".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

use crate::clock::{now_ist, IstDateTime};

/// Periodic publisher of the current time.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    /// A ticker firing every `period`. A zero period is raised to one millisecond.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// Tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking on the current tokio runtime.
    ///
    /// The receiver starts out holding the time of the call. The task ends
    /// when the handle is stopped or every receiver has been dropped.
    #[must_use]
    pub fn spawn(self) -> (watch::Receiver<IstDateTime>, TickHandle) {
        let (tx, rx) = watch::channel(now_ist());
        let stop_signal = Arc::new(AtomicBool::new(false));
        let signal = Arc::clone(&stop_signal);
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                if signal.load(Ordering::SeqCst) {
                    break;
                }
                let now = now_ist();
                if tx.send(now).is_err() {
                    break;
                }
                trace!(%now, "tick");
            }
        });

        (rx, TickHandle { stop_signal, task })
    }
}

/// Control over a running [`Ticker`].
#[derive(Debug)]
pub struct TickHandle {
    stop_signal: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Ask the ticker to stop at its next tick.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Stop and wait for the task to exit.
    pub async fn shutdown(self) {
        self.stop();
        // A panicked or aborted tick task has nothing left to clean up
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_is_raised() {
        assert_eq!(Ticker::new(Duration::ZERO).period(), Duration::from_millis(1));
        assert_eq!(
            Ticker::new(Duration::from_secs(1)).period(),
            Duration::from_secs(1)
        );
    }

    #[tokio::test]
    async fn test_ticks_advance_now() {
        let (mut rx, handle) = Ticker::new(Duration::from_millis(10)).spawn();
        let first = *rx.borrow_and_update();

        rx.changed().await.unwrap();
        rx.changed().await.unwrap();
        let later = *rx.borrow();
        assert!(later >= first);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_stop_ends_task() {
        let (mut rx, handle) = Ticker::new(Duration::from_millis(5)).spawn();
        handle.stop();
        handle.shutdown().await;

        // The sender is gone once the task exits
        while rx.changed().await.is_ok() {}
    }

    #[tokio::test]
    async fn test_dropping_receiver_ends_task() {
        let (rx, handle) = Ticker::new(Duration::from_millis(5)).spawn();
        drop(rx);
        let exited = tokio::time::timeout(Duration::from_secs(1), handle.task).await;
        assert!(exited.is_ok());
    }
}
