//! Trailing-edge debouncer for editor autosave.
//!
//! Every `trigger()` restarts a fixed delay. When the delay elapses with no
//! further trigger, the action runs once. Dropping the `Debouncer` stops the
//! background task; a burst that has not yet settled is discarded.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

#[derive(Debug)]
pub struct Debouncer {
    signal: mpsc::Sender<()>,
}

impl Debouncer {
    pub fn spawn<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (signal, mut rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            // Idle until the first edit of a burst.
            while rx.recv().await.is_some() {
                loop {
                    match timeout(delay, rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) => return,
                        Err(_elapsed) => {
                            action().await;
                            break;
                        }
                    }
                }
            }
        });

        Self { signal }
    }

    /// Restarts the delay. A full buffer already holds a pending signal, so
    /// the extra one is dropped.
    pub fn trigger(&self) {
        let _ = self.signal.try_send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    fn counting(delay: Duration) -> (Debouncer, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let debouncer = Debouncer::spawn(delay, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (debouncer, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_triggers_runs_once_after_quiet_period() {
        let (debouncer, runs) = counting(Duration::from_millis(1000));

        for _ in 0..3 {
            debouncer.trigger();
            sleep(Duration::from_millis(500)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_each_run() {
        let (debouncer, runs) = counting(Duration::from_millis(1000));

        debouncer.trigger();
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        debouncer.trigger();
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_discards_pending_burst() {
        let (debouncer, runs) = counting(Duration::from_millis(1000));

        debouncer.trigger();
        sleep(Duration::from_millis(200)).await;
        drop(debouncer);

        sleep(Duration::from_millis(5000)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn no_trigger_no_run() {
        let (_debouncer, runs) = counting(Duration::from_millis(10));
        sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
