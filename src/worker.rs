// Background sampling worker. One periodic tick drives aggregate + broadcast;
// the cycle runs inline on this task, so cycles never overlap and a slow
// external command delays, never stacks, subsequent ticks.

use crate::aggregator::Aggregator;
use crate::models::Snapshot;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};

/// Rate limit for the idle log (avoid a line every tick while nobody watches).
const IDLE_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Channels, collectors, and shutdown for the worker.
pub struct WorkerDeps {
    pub aggregator: Arc<Aggregator>,
    pub tx: broadcast::Sender<Snapshot>,
    pub feed_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config. Stats logging uses a real-time interval,
/// independent of sample_interval_ms.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        aggregator,
        tx,
        feed_connections,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(sample_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut cycles_total: u64 = 0;
        let mut last_idle_log: Option<Instant> = None;

        let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);
        let _guard = worker_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    // nobody listening: skip the whole cycle, collectors included
                    if tx.receiver_count() == 0 {
                        let should_log = last_idle_log
                            .is_none_or(|t| t.elapsed() >= IDLE_LOG_INTERVAL);
                        if should_log {
                            tracing::debug!(
                                operation = "broadcast_snapshot",
                                "No active feed clients; skipping sample cycle"
                            );
                            last_idle_log = Some(Instant::now());
                        }
                        continue;
                    }

                    match aggregator.aggregate().await {
                        Ok(snapshot) => {
                            cycles_total += 1;
                            // receivers may all have vanished mid-cycle
                            let _ = tx.send(snapshot);
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "aggregate",
                                "aggregation cycle failed; skipping"
                            );
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        feed_clients =
                            feed_connections.load(std::sync::atomic::Ordering::Relaxed),
                        cycles_total = cycles_total,
                        "app stats"
                    );
                }
            }
        }
    })
}
