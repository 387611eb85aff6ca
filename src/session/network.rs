//! In-flight request tracking for the network-idle wait
//!
//! The page is idle once at most [`IDLE_MAX_INFLIGHT`] requests have been
//! outstanding for an unbroken [`IDLE_QUIET_WINDOW`]. Counting comes from
//! CDP `Network` events, so long-polling beacons and streaming connections
//! do not keep a page busy forever.

use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::listeners::EventStream;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Requests allowed in flight while still counting as idle
pub const IDLE_MAX_INFLIGHT: usize = 2;

/// How long the in-flight count must stay low
pub const IDLE_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Upper bound on one wait between events while the page is busy
const BUSY_RECHECK: Duration = Duration::from_millis(250);

/// Outstanding requests and when the count last dropped to the idle level
#[derive(Debug)]
pub struct InflightTracker {
    inflight: HashSet<String>,
    quiet_since: Option<Instant>,
}

impl InflightTracker {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            inflight: HashSet::new(),
            quiet_since: Some(now),
        }
    }

    pub fn started(&mut self, request_id: &str, now: Instant) {
        self.inflight.insert(request_id.to_string());
        self.refresh(now);
    }

    /// Finished or failed. Ids never seen starting are ignored.
    pub fn finished(&mut self, request_id: &str, now: Instant) {
        self.inflight.remove(request_id);
        self.refresh(now);
    }

    #[must_use]
    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    /// Time left before the page counts as idle, `None` while busy
    #[must_use]
    pub fn until_idle(&self, now: Instant) -> Option<Duration> {
        self.quiet_since
            .map(|since| (since + IDLE_QUIET_WINDOW).saturating_duration_since(now))
    }

    #[must_use]
    pub fn is_idle(&self, now: Instant) -> bool {
        self.until_idle(now).is_some_and(|left| left.is_zero())
    }

    fn refresh(&mut self, now: Instant) {
        let quiet = self.inflight.len() <= IDLE_MAX_INFLIGHT;
        match (quiet, self.quiet_since) {
            (true, None) => self.quiet_since = Some(now),
            (false, Some(_)) => self.quiet_since = None,
            _ => {}
        }
    }
}

/// Network event subscriptions for one page, opened before navigation
pub struct NetworkActivity {
    requests: EventStream<EventRequestWillBeSent>,
    finished: EventStream<EventLoadingFinished>,
    failed: EventStream<EventLoadingFailed>,
    tracker: InflightTracker,
}

impl NetworkActivity {
    /// Subscribe to request lifecycle events.
    ///
    /// Returns `None` when a listener cannot be registered; the caller then
    /// skips the idle wait.
    pub async fn subscribe(page: &Page) -> Option<Self> {
        let subscribed = async {
            Ok::<_, chromiumoxide::error::CdpError>((
                page.event_listener::<EventRequestWillBeSent>().await?,
                page.event_listener::<EventLoadingFinished>().await?,
                page.event_listener::<EventLoadingFailed>().await?,
            ))
        }
        .await;

        match subscribed {
            Ok((requests, finished, failed)) => Some(Self {
                requests,
                finished,
                failed,
                tracker: InflightTracker::new(Instant::now()),
            }),
            Err(e) => {
                warn!("Failed to subscribe to network events: {e}");
                None
            }
        }
    }

    /// Consume events until the quiet window has passed
    pub async fn wait_for_idle(&mut self) {
        loop {
            let wait = match self.tracker.until_idle(Instant::now()) {
                Some(left) if left.is_zero() => return,
                Some(left) => left,
                None => BUSY_RECHECK,
            };

            tokio::select! {
                Some(event) = self.requests.next() => {
                    self.tracker.started(event.request_id.inner(), Instant::now());
                }
                Some(event) = self.finished.next() => {
                    self.tracker.finished(event.request_id.inner(), Instant::now());
                }
                Some(event) = self.failed.next() => {
                    self.tracker.finished(event.request_id.inner(), Instant::now());
                }
                () = tokio::time::sleep(wait) => {
                    trace!("{} requests in flight", self.tracker.inflight());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_periodic_beacon_does_not_block_idle() {
        let t0 = Instant::now();
        let mut tracker = InflightTracker::new(t0);

        // A short beacon every 400 ms, never more than one in flight
        for i in 0..5u64 {
            let id = format!("beacon-{i}");
            tracker.started(&id, t0 + ms(i * 400));
            tracker.finished(&id, t0 + ms(i * 400 + 50));
        }
        assert!(tracker.is_idle(t0 + ms(2000)));
    }

    #[test]
    fn test_three_open_requests_keep_page_busy() {
        let t0 = Instant::now();
        let mut tracker = InflightTracker::new(t0);
        for id in ["a", "b", "c"] {
            tracker.started(id, t0);
        }
        assert_eq!(tracker.until_idle(t0 + ms(5000)), None);
        assert!(!tracker.is_idle(t0 + ms(5000)));
    }

    #[test]
    fn test_quiet_window_restarts_after_busy_period() {
        let t0 = Instant::now();
        let mut tracker = InflightTracker::new(t0);
        for id in ["a", "b", "c"] {
            tracker.started(id, t0);
        }
        tracker.finished("c", t0 + ms(1000));

        assert!(!tracker.is_idle(t0 + ms(1400)));
        assert_eq!(tracker.until_idle(t0 + ms(1400)), Some(ms(100)));
        assert!(tracker.is_idle(t0 + ms(1500)));
    }

    #[test]
    fn test_two_long_lived_connections_still_idle() {
        let t0 = Instant::now();
        let mut tracker = InflightTracker::new(t0);
        tracker.started("socket", t0);
        tracker.started("stream", t0 + ms(100));
        assert!(tracker.is_idle(t0 + ms(500)));
    }

    #[test]
    fn test_unknown_finish_is_ignored() {
        let t0 = Instant::now();
        let mut tracker = InflightTracker::new(t0);
        tracker.finished("never-started", t0 + ms(10));
        assert_eq!(tracker.inflight(), 0);
        assert!(tracker.is_idle(t0 + ms(500)));
    }
}
