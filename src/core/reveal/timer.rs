use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// One timer firing for the reveal cycle identified by `reveal_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTick {
    pub reveal_id: u64,
}

pub type TickReceiver = mpsc::UnboundedReceiver<RevealTick>;

/// A timer that has been armed for one reveal cycle. Dropping the handle does
/// not stop the timer; [`ArmedTimer::clear`] does.
#[derive(Debug)]
pub struct ArmedTimer {
    reveal_id: u64,
    cancel_token: CancellationToken,
}

impl ArmedTimer {
    pub fn reveal_id(&self) -> u64 {
        self.reveal_id
    }

    pub fn clear(self) {
        self.cancel_token.cancel();
    }

    #[cfg(test)]
    pub(crate) fn token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}

/// Spawns repeating tick timers that report into a single channel.
///
/// Every scheduler that shares a dispatcher shares the receiver; ticks carry
/// the id of the cycle that armed them so stale ones can be told apart.
/// Ids are allocated here, so they are unique across all clones.
#[derive(Clone, Debug)]
pub struct TickDispatcher {
    tx: mpsc::UnboundedSender<RevealTick>,
    next_reveal_id: Arc<AtomicU64>,
}

impl TickDispatcher {
    pub fn new() -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            tx,
            next_reveal_id: Arc::new(AtomicU64::new(1)),
        };
        (dispatcher, rx)
    }

    /// Arms a timer under a fresh reveal id that fires every `period`, first
    /// firing one full period from now. Must be called from within a tokio
    /// runtime.
    pub fn arm(&self, period: Duration) -> ArmedTimer {
        let reveal_id = self.next_reveal_id.fetch_add(1, Ordering::Relaxed);
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(RevealTick { reveal_id }).is_err() {
                            break;
                        }
                    }
                }
            }
            trace!(reveal_id, "reveal timer stopped");
        });

        ArmedTimer {
            reveal_id,
            cancel_token,
        }
    }
}

#[cfg(test)]
impl TickDispatcher {
    pub fn send_for_test(&self, reveal_id: u64) {
        let _ = self.tx.send(RevealTick { reveal_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn armed_timer_fires_each_period() {
        let (dispatcher, mut rx) = TickDispatcher::new();
        let timer = dispatcher.arm(Duration::from_millis(10));
        let reveal_id = timer.reveal_id();

        let start = Instant::now();
        assert_eq!(rx.recv().await, Some(RevealTick { reveal_id }));
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert_eq!(rx.recv().await, Some(RevealTick { reveal_id }));
        assert!(start.elapsed() >= Duration::from_millis(20));

        timer.clear();
    }

    #[tokio::test(start_paused = true)]
    async fn cleared_timer_stops_firing() {
        let (dispatcher, mut rx) = TickDispatcher::new();
        let timer = dispatcher.arm(Duration::from_millis(10));
        let reveal_id = timer.reveal_id();
        assert_eq!(rx.recv().await, Some(RevealTick { reveal_id }));

        timer.clear();
        let next = time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(next.is_err(), "no tick after clear, got {next:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn cloned_dispatchers_never_reuse_an_id() {
        let (dispatcher, _rx) = TickDispatcher::new();
        let other = dispatcher.clone();

        let first = dispatcher.arm(Duration::from_millis(10));
        let second = other.arm(Duration::from_millis(10));
        let third = dispatcher.arm(Duration::from_millis(10));

        assert_ne!(first.reveal_id(), second.reveal_id());
        assert_ne!(second.reveal_id(), third.reveal_id());
        assert_ne!(first.reveal_id(), third.reveal_id());
        for timer in [first, second, third] {
            timer.clear();
        }
    }
}
