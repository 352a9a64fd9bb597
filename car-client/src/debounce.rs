//! Debounce controller for search input.
//!
//! Each [`Debouncer::schedule`] replaces whatever was pending: only the last
//! job of a quiescent window runs, `delay` after it was scheduled. Dropping
//! the debouncer cancels the pending job.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default quiescence delay for search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs at most one delayed job at a time; newer jobs cancel older ones.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiescence delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The quiescence delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `job` after the delay unless another job is scheduled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        }));
    }

    /// Cancel the pending job, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                trace!("cancelling pending debounce job");
            }
            handle.abort();
        }
    }

    /// Whether a job is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::{advance, sleep, Instant};

    type Log = Arc<Mutex<Vec<(String, Duration)>>>;

    fn job(log: &Log, start: Instant, label: &str) -> impl Future<Output = ()> + Send + 'static {
        let log = Arc::clone(log);
        let label = label.to_string();
        async move {
            log.lock().unwrap().push((label, start.elapsed()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_job_of_burst_runs() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));

        // Keystrokes at t=0, 50, 100, 300.
        d.schedule(job(&log, start, "q1"));
        sleep(Duration::from_millis(50)).await;
        d.schedule(job(&log, start, "q2"));
        sleep(Duration::from_millis(50)).await;
        d.schedule(job(&log, start, "q3"));
        sleep(Duration::from_millis(200)).await;
        d.schedule(job(&log, start, "q4"));

        sleep(Duration::from_millis(1000)).await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1, "exactly one evaluation: {log:?}");
        assert_eq!(log[0].0, "q4");
        assert!(log[0].1 >= Duration::from_millis(400));
        assert_eq!(log[0].1, Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_windows_each_fire() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));

        d.schedule(job(&log, start, "a"));
        sleep(Duration::from_millis(150)).await;
        d.schedule(job(&log, start, "b"));
        sleep(Duration::from_millis(150)).await;

        let labels: Vec<_> = log.lock().unwrap().iter().map(|(l, _)| l.clone()).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_run() {
        let log: Log = Arc::default();
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));

        d.schedule(job(&log, start, "x"));
        assert!(d.is_pending());
        d.cancel();
        assert!(!d.is_pending());

        advance(Duration::from_secs(1)).await;
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_job() {
        let log: Log = Arc::default();
        let start = Instant::now();
        {
            let mut d = Debouncer::new(Duration::from_millis(300));
            d.schedule(job(&log, start, "x"));
        }

        sleep(Duration::from_secs(1)).await;
        assert!(log.lock().unwrap().is_empty());
    }
}
