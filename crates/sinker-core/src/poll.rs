use std::{future::Future, time::Duration};

use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Owned handle to one periodic job.
///
/// The first tick fires immediately, later ticks every `period`. Each tick
/// spawns its own future, so a slow tick does not delay the next one and
/// in-flight work is never aborted. Cancelling (or dropping) the handle only
/// stops future ticks.
#[derive(Debug)]
pub struct PollHandle {
    name: &'static str,
    token: CancellationToken,
}

impl PollHandle {
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let stop = token.clone();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        trace!(job = name, "tick");
                        tokio::spawn(tick());
                    }
                }
            }
            debug!(job = name, "poll loop stopped");
        });

        debug!(job = name, period_ms = period.as_millis() as u64, "poll loop started");
        Self { name, token }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn counting(period: Duration) -> (PollHandle, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let handle = PollHandle::spawn("test", period, move || {
            let seen = Arc::clone(&seen);
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });
        (handle, hits)
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_immediate() {
        let (_handle, hits) = counting(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_every_period() {
        let (_handle, hits) = counting(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(10_001)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (handle, hits) = counting(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(1)).await;
        handle.cancel();
        assert!(handle.is_cancelled());
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticks() {
        let (handle, hits) = counting(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
