use kodegen_tools_shopscrape::{ScrapeError, ScrapeQueue, ScrapeResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Tracks how many jobs run at once and the highest value seen
#[derive(Default)]
struct Gauge {
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_burst_respects_ceiling() {
    let queue = ScrapeQueue::new(2);
    let gauge = Arc::new(Gauge::default());

    let handles: Vec<_> = (0..12u64)
        .map(|i| {
            let gauge = Arc::clone(&gauge);
            queue
                .submit(move || async move {
                    gauge.enter();
                    // Uneven durations so completion order differs from start order
                    tokio::time::sleep(Duration::from_millis(5 + (i % 4) * 10)).await;
                    gauge.exit();
                    i
                })
                .unwrap()
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(results, (0..12).collect::<Vec<_>>());
    assert!(gauge.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(gauge.running.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_independent_ceilings() {
    let single = ScrapeQueue::new(1);
    let wide = ScrapeQueue::new(4);
    let single_gauge = Arc::new(Gauge::default());
    let wide_gauge = Arc::new(Gauge::default());

    let mut handles = Vec::new();
    for _ in 0..4 {
        for (queue, gauge) in [(&single, &single_gauge), (&wide, &wide_gauge)] {
            let gauge = Arc::clone(gauge);
            handles.push(
                queue
                    .submit(move || async move {
                        gauge.enter();
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        gauge.exit();
                    })
                    .unwrap(),
            );
        }
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(single_gauge.peak.load(Ordering::SeqCst), 1);
    assert_eq!(wide_gauge.peak.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_failed_jobs_do_not_affect_others() {
    let queue = ScrapeQueue::new(2);

    let handles: Vec<_> = (0..6)
        .map(|i| {
            queue
                .submit(move || async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    if i % 2 == 0 {
                        Err(ScrapeError::Navigation {
                            url: format!("https://loja/{i}"),
                            reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
                        })
                    } else {
                        Ok(i)
                    }
                })
                .unwrap()
        })
        .collect();

    let mut outcomes: Vec<ScrapeResult<i32>> = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    let ok: Vec<i32> = outcomes.iter().filter_map(|o| o.as_ref().ok().copied()).collect();
    assert_eq!(ok, vec![1, 3, 5]);
    assert_eq!(outcomes.iter().filter(|o| o.is_err()).count(), 3);
}

#[tokio::test]
async fn test_dropped_handle_still_frees_slot() {
    let queue = ScrapeQueue::new(1);

    drop(
        queue
            .submit(|| async {
                tokio::time::sleep(Duration::from_millis(5)).await;
            })
            .unwrap(),
    );

    let next = queue.submit(|| async { "ran" }).unwrap();
    assert_eq!(next.await.unwrap(), "ran");
}
