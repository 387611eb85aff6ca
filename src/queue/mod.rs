//! Bounded-concurrency job queue
//!
//! At most `ceiling` jobs run at once, gated by a `Semaphore`. Submissions
//! go through a channel to a single dispatcher task, which acquires a permit
//! for each job in submission order before spawning it, so jobs start FIFO.
//! Everything a job touches (browser, page) belongs to that job alone.
//!
//! A job that panics is reported to its own caller as
//! [`ScrapeError::JobAborted`] and frees its permit like any other job.

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use tokio::sync::{Semaphore, mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::error::{ScrapeError, ScrapeResult};

/// Type-erased job ready to be spawned
type Launch = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct Inner {
    ceiling: usize,
    max_queued: Option<usize>,
    semaphore: Arc<Semaphore>,
    /// Submitted jobs that have not been handed a permit yet
    waiting: Arc<AtomicUsize>,
    tx: mpsc::UnboundedSender<Launch>,
    /// Taken by the first `submit`, which starts the dispatcher
    rx: Mutex<Option<mpsc::UnboundedReceiver<Launch>>>,
}

/// FIFO scheduler with a fixed concurrency ceiling
///
/// Cheap to clone; clones share the same permits.
#[derive(Clone)]
pub struct ScrapeQueue {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ScrapeQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeQueue")
            .field("ceiling", &self.inner.ceiling)
            .field("max_queued", &self.inner.max_queued)
            .field("active", &self.active())
            .field("queued", &self.queued())
            .finish()
    }
}

impl ScrapeQueue {
    /// Create a queue running at most `ceiling` jobs (minimum 1), with no
    /// limit on waiting jobs
    #[must_use]
    pub fn new(ceiling: usize) -> Self {
        Self::with_max_queued(ceiling, None)
    }

    /// Like [`ScrapeQueue::new`], but submissions are rejected with
    /// [`ScrapeError::QueueFull`] once `max_queued` jobs are waiting
    #[must_use]
    pub fn with_max_queued(ceiling: usize, max_queued: Option<usize>) -> Self {
        let ceiling = ceiling.max(1);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(Inner {
                ceiling,
                max_queued,
                semaphore: Arc::new(Semaphore::new(ceiling)),
                waiting: Arc::new(AtomicUsize::new(0)),
                tx,
                rx: Mutex::new(Some(rx)),
            }),
        }
    }

    #[must_use]
    pub fn ceiling(&self) -> usize {
        self.inner.ceiling
    }

    /// Jobs currently holding a permit
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner
            .ceiling
            .saturating_sub(self.inner.semaphore.available_permits())
    }

    /// Jobs admitted but not yet started
    #[must_use]
    pub fn queued(&self) -> usize {
        self.inner.queued_now()
    }

    /// Submit a job.
    ///
    /// `job` is not called until a permit is free. The returned handle
    /// resolves with the job's output, or [`ScrapeError::JobAborted`] if it
    /// panicked. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// [`ScrapeError::QueueFull`] if the queue is bounded and full.
    pub fn submit<T, F, Fut>(&self, job: F) -> ScrapeResult<JobHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.inner.admit()?;
        self.inner.ensure_dispatcher();

        let (tx, rx) = oneshot::channel();
        let launch: Launch = Box::new(move || {
            async move {
                let outcome = AssertUnwindSafe(async move { job().await })
                    .catch_unwind()
                    .await
                    .map_err(|payload| panic_message(payload.as_ref()));
                if let Err(message) = &outcome {
                    warn!("Scrape job panicked: {message}");
                }
                // Receiver may have been dropped; the job still counted
                let _ = tx.send(outcome);
            }
            .boxed()
        });

        if self.inner.tx.send(launch).is_err() {
            self.inner.waiting.fetch_sub(1, Ordering::SeqCst);
            return Err(ScrapeError::JobAborted(
                "scrape queue dispatcher has stopped".to_string(),
            ));
        }

        debug!(
            "Job submitted ({} waiting, {} running)",
            self.queued(),
            self.active()
        );
        Ok(JobHandle { rx })
    }
}

impl Inner {
    /// Jobs that will not get a permit right away
    fn queued_now(&self) -> usize {
        self.waiting
            .load(Ordering::SeqCst)
            .saturating_sub(self.semaphore.available_permits())
    }

    /// Count a new waiter, refusing it when the bound is reached
    fn admit(&self) -> ScrapeResult<()> {
        let available = self.semaphore.available_permits();
        self.waiting
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |waiting| {
                match self.max_queued {
                    Some(max) if waiting.saturating_sub(available) >= max => None,
                    _ => Some(waiting + 1),
                }
            })
            .map(|_| ())
            .map_err(|waiting| ScrapeError::QueueFull {
                depth: waiting.saturating_sub(available),
            })
    }

    fn ensure_dispatcher(&self) {
        let Some(rx) = self.rx.lock().take() else {
            return;
        };
        tokio::spawn(dispatch(
            rx,
            Arc::clone(&self.semaphore),
            Arc::clone(&self.waiting),
        ));
    }
}

/// Hand out permits in submission order; ends when the queue is dropped
async fn dispatch(
    mut rx: mpsc::UnboundedReceiver<Launch>,
    semaphore: Arc<Semaphore>,
    waiting: Arc<AtomicUsize>,
) {
    while let Some(launch) = rx.recv().await {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("Scrape queue semaphore closed unexpectedly: {e}");
                return;
            }
        };
        waiting.fetch_sub(1, Ordering::SeqCst);

        tokio::spawn(async move {
            let _permit = permit; // Hold until the job completes
            launch().await;
        });
    }
    debug!("Scrape queue dispatcher finished");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "job panicked".to_string()
    }
}

/// Completion handle returned by [`ScrapeQueue::submit`]
///
/// Dropping the handle does not cancel the job.
#[must_use = "the job result is only observable through its handle"]
pub struct JobHandle<T> {
    rx: oneshot::Receiver<Result<T, String>>,
}

impl<T> Future for JobHandle<T> {
    type Output = ScrapeResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(message)) => Err(ScrapeError::JobAborted(message)),
            Err(_) => Err(ScrapeError::JobAborted(
                "job was dropped before completing".to_string(),
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_ceiling_is_never_exceeded() {
        let queue = ScrapeQueue::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                queue
                    .submit(move || async move {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        i
                    })
                    .unwrap()
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(queue.active(), 2);
        assert_eq!(queue.queued(), 3);

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_jobs_start_in_submission_order() {
        let queue = ScrapeQueue::new(2);
        let started = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let started = Arc::clone(&started);
                queue
                    .submit(move || async move {
                        started.lock().push(i);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    })
                    .unwrap()
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(*started.lock(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_panicking_job_is_isolated() {
        let queue = ScrapeQueue::new(1);

        let bad = queue
            .submit(|| async {
                panic!("boom");
            })
            .unwrap();
        let good = queue.submit(|| async { "ok" }).unwrap();

        match bad.await {
            Err(ScrapeError::JobAborted(message)) => assert!(message.contains("boom")),
            other => panic!("expected JobAborted, got {other:?}"),
        }
        assert_eq!(good.await.unwrap(), "ok");

        tokio::task::yield_now().await;
        assert_eq!(queue.active(), 0);
        assert_eq!(queue.queued(), 0);
    }

    #[tokio::test]
    async fn test_bounded_queue_rejects_overflow() {
        let queue = ScrapeQueue::with_max_queued(1, Some(1));
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let first = queue
            .submit(move || async move {
                let _ = release_rx.await;
            })
            .unwrap();
        let second = queue.submit(|| async {}).unwrap();

        match queue.submit(|| async {}) {
            Err(ScrapeError::QueueFull { depth }) => assert_eq!(depth, 1),
            other => panic!("expected QueueFull, got {:?}", other.map(|_| ())),
        }

        release_tx.send(()).unwrap();
        first.await.unwrap();
        second.await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_ceiling_is_clamped() {
        let queue = ScrapeQueue::new(0);
        assert_eq!(queue.ceiling(), 1);
        assert_eq!(queue.submit(|| async { 7 }).unwrap().await.unwrap(), 7);
    }
}
