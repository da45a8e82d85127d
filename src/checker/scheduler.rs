// src/checker/scheduler.rs
// =============================================================================
// This module runs many probes at once with a fixed pool of workers.
//
// How it works:
// 1. Put every URL into a shared queue (filled before any worker starts)
// 2. Spawn exactly `concurrency` workers
// 3. Each worker pops a URL, probes it, sends the Outcome on a channel,
//    and exits once the queue is empty
// 4. A supervisor task waits for ALL workers (the join barrier) and only then
//    drops the last sender, which closes the result stream exactly once
//
// Results arrive in whatever order the workers finish, not input order.
//
// Rust concepts:
// - tokio::spawn: Runs each worker as an independent task
// - mpsc channel: Moves each Outcome from a worker to the consumer
// - VecDeque behind a Mutex: The shared work queue
// =============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use super::probe::LivenessProbe;
use crate::models::Outcome;

type WorkQueue = Arc<Mutex<VecDeque<String>>>;

// Starts checking `urls` and returns a stream of Outcomes
//
// Parameters:
//   probe: shared prober (HTTP client + robots.txt cache)
//   urls: every URL to check; each produces exactly one Outcome
//   concurrency: number of workers (values below 1 count as 1)
//   timeout: deadline for each individual probe; there is no batch deadline
//
// Returns: a receiver that yields one Outcome per URL, then None
//
// Must be called from inside a tokio runtime.
pub fn check_all(
    probe: Arc<LivenessProbe>,
    urls: Vec<String>,
    concurrency: usize,
    timeout: Duration,
) -> mpsc::Receiver<Outcome> {
    let workers = concurrency.max(1);
    let total = urls.len();

    // Capacity `total` means a worker never waits on a slow consumer
    let (results_tx, results_rx) = mpsc::channel(total.max(1));
    let queue: WorkQueue = Arc::new(Mutex::new(urls.into_iter().collect()));

    debug!(total, workers, ?timeout, "starting worker pool");

    let handles: Vec<_> = (0..workers)
        .map(|id| {
            tokio::spawn(worker(
                id,
                Arc::clone(&probe),
                Arc::clone(&queue),
                results_tx.clone(),
                timeout,
            ))
        })
        .collect();

    tokio::spawn(async move {
        for joined in join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "worker task ended abnormally");
            }
        }
        // Last sender: dropping it ends the stream for the consumer
        drop(results_tx);
        debug!(total, "all workers finished");
    });

    results_rx
}

// Runs `check_all` and gathers every Outcome, in arrival order
pub async fn collect_all(
    probe: Arc<LivenessProbe>,
    urls: Vec<String>,
    concurrency: usize,
    timeout: Duration,
) -> Vec<Outcome> {
    let mut results_rx = check_all(probe, urls, concurrency, timeout);
    let mut outcomes = Vec::new();
    while let Some(outcome) = results_rx.recv().await {
        outcomes.push(outcome);
    }
    outcomes
}

// One worker: pop, probe, publish, repeat until the queue is empty
async fn worker(
    id: usize,
    probe: Arc<LivenessProbe>,
    queue: WorkQueue,
    results_tx: mpsc::Sender<Outcome>,
    timeout: Duration,
) {
    let mut probed = 0usize;

    loop {
        // The guard is a temporary, so the lock is released before probing
        let next = queue.lock().await.pop_front();
        let Some(url) = next else {
            break;
        };

        let outcome = probe.probe(&url, timeout).await;
        probed += 1;

        if results_tx.send(outcome).await.is_err() {
            debug!(worker = id, "result receiver dropped, stopping");
            break;
        }
    }

    debug!(worker = id, probed, "worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{build_client, CheckerConfig, RobotsFailMode};
    use crate::models::ProbeError;
    use crate::robots::RobotsCache;
    use crate::test_support::{spawn_server, unreachable_base};
    use axum::http::StatusCode;
    use axum::Router;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn probe() -> Arc<LivenessProbe> {
        let client = build_client(&CheckerConfig::default()).unwrap();
        let robots = Arc::new(RobotsCache::new(client.clone(), RobotsFailMode::Open));
        Arc::new(LivenessProbe::new(client, robots))
    }

    // Every path answers 200 except /robots.txt, which answers 404
    async fn ok_server() -> String {
        let router = Router::new().fallback(|uri: axum::http::Uri| async move {
            if uri.path() == "/robots.txt" {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            }
        });
        spawn_server(router).await
    }

    fn count_by_url(outcomes: &[Outcome]) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for outcome in outcomes {
            *counts.entry(outcome.url.clone()).or_insert(0) += 1;
        }
        counts
    }

    #[tokio::test]
    async fn test_every_url_exactly_once_for_any_concurrency() {
        let base = ok_server().await;
        let urls: Vec<String> = (0..6).map(|i| format!("{}/page/{}", base, i)).collect();

        for concurrency in 1..=urls.len() {
            let outcomes = collect_all(probe(), urls.clone(), concurrency, TIMEOUT).await;

            assert_eq!(outcomes.len(), urls.len(), "concurrency {}", concurrency);
            let counts = count_by_url(&outcomes);
            for url in &urls {
                assert_eq!(counts.get(url), Some(&1), "{} with concurrency {}", url, concurrency);
            }
            assert!(outcomes.iter().all(|o| o.online));
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let base = ok_server().await;
        let dead = unreachable_base();
        let urls = vec![
            format!("{}/fine", base),
            "not a url".to_string(),
            format!("{}/refused", dead),
            format!("{}/also-fine", base),
        ];

        let outcomes = collect_all(probe(), urls.clone(), 2, TIMEOUT).await;
        assert_eq!(outcomes.len(), 4);

        let by_url: HashMap<_, _> = outcomes.iter().map(|o| (o.url.as_str(), o)).collect();
        assert!(by_url[urls[0].as_str()].online);
        assert!(matches!(
            by_url["not a url"].error,
            Some(ProbeError::InvalidUrl { .. })
        ));
        assert!(matches!(
            by_url[urls[2].as_str()].error,
            Some(ProbeError::Network { .. })
        ));
        assert!(by_url[urls[3].as_str()].online);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_uses_one_worker() {
        let base = ok_server().await;
        let urls = vec![format!("{}/a", base), format!("{}/b", base)];

        let outcomes = collect_all(probe(), urls, 0, TIMEOUT).await;
        assert_eq!(outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_input_closes_stream() {
        let outcomes = collect_all(probe(), Vec::new(), 3, TIMEOUT).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_requests_never_exceed_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let router = {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            Router::new().fallback(move |uri: axum::http::Uri| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    if uri.path() == "/robots.txt" {
                        return StatusCode::NOT_FOUND;
                    }
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    StatusCode::OK
                }
            })
        };
        let base = spawn_server(router).await;
        let urls: Vec<String> = (0..12).map(|i| format!("{}/slow/{}", base, i)).collect();

        let outcomes = collect_all(probe(), urls, 3, TIMEOUT).await;
        assert_eq!(outcomes.len(), 12);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_robots_cache_is_shared_across_workers() {
        let base = ok_server().await;
        let probe = probe();
        let urls: Vec<String> = (0..5).map(|i| format!("{}/p/{}", base, i)).collect();

        let outcomes = collect_all(Arc::clone(&probe), urls, 5, TIMEOUT).await;
        assert_eq!(outcomes.len(), 5);
        assert_eq!(probe.robots().len().await, 1);
    }
}
