// Stateful delta trackers: cumulative counters in, rates/utilization out.
// Each tracker holds exactly one previous sample and is owned by the system
// collector; the scheduler never runs two collection cycles concurrently, so
// read-then-overwrite needs no further synchronization.

use std::time::Instant;

/// Per-core CPU time counters, monotonically non-decreasing while the host
/// is up (same categories as /proc/stat, with iowait folded into idle and
/// softirq/steal folded into irq).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub irq: u64,
}

impl CoreTimes {
    pub fn total(&self) -> u64 {
        self.user + self.nice + self.system + self.idle + self.irq
    }
}

/// Utilization figures for one sample pair, percentages rounded to one decimal.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuUsage {
    pub overall: f64,
    pub cores: Vec<f64>,
}

/// Converts successive per-core time samples into utilization percentages.
#[derive(Debug, Default)]
pub struct CpuUsageTracker {
    prev: Option<Vec<CoreTimes>>,
}

impl CpuUsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// First call stores the sample and reports all-zero utilization (warm-up
    /// reading; there is no prior sample to delta against). Later calls report
    /// `(total_delta - idle_delta) / total_delta * 100` per core, and the same
    /// formula over the summed deltas for the overall figure. A core with
    /// `total_delta == 0` reads 0. The stored sample is always overwritten.
    pub fn update(&mut self, current: Vec<CoreTimes>) -> CpuUsage {
        let usage = match &self.prev {
            None => CpuUsage {
                overall: 0.0,
                cores: vec![0.0; current.len()],
            },
            Some(prev) => {
                let mut cores = Vec::with_capacity(current.len());
                let mut idle_sum: u64 = 0;
                let mut total_sum: u64 = 0;
                for (cur, old) in current.iter().zip(prev.iter()) {
                    let idle_delta = cur.idle.saturating_sub(old.idle);
                    let total_delta = cur.total().saturating_sub(old.total());
                    idle_sum += idle_delta;
                    total_sum += total_delta;
                    cores.push(busy_percent(idle_delta, total_delta));
                }
                // cores that appeared since the previous sample read as warm-up
                cores.resize(current.len(), 0.0);
                CpuUsage {
                    overall: busy_percent(idle_sum, total_sum),
                    cores,
                }
            }
        };
        self.prev = Some(current);
        usage
    }
}

fn busy_percent(idle_delta: u64, total_delta: u64) -> f64 {
    if total_delta == 0 {
        return 0.0;
    }
    let busy = total_delta.saturating_sub(idle_delta) as f64;
    round1(busy / total_delta as f64 * 100.0)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Converts successive cumulative byte counters into per-direction rates.
/// Callers exclude loopback bytes before feeding totals in.
#[derive(Debug, Default)]
pub struct NetworkRateTracker {
    prev: Option<(u64, u64, Instant)>,
}

impl NetworkRateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns (rate_in, rate_out) in bytes/sec. No prior sample or a
    /// non-positive elapsed interval yields zero rates; an apparent counter
    /// decrease (reset/wraparound) floors the delta at zero. The stored
    /// sample and timestamp are always overwritten.
    pub fn update(&mut self, bytes_in: u64, bytes_out: u64, now: Instant) -> (f64, f64) {
        let rates = match self.prev {
            None => (0.0, 0.0),
            Some((prev_in, prev_out, at)) => {
                let elapsed = now.saturating_duration_since(at).as_secs_f64();
                if elapsed <= 0.0 {
                    (0.0, 0.0)
                } else {
                    (
                        bytes_in.saturating_sub(prev_in) as f64 / elapsed,
                        bytes_out.saturating_sub(prev_out) as f64 / elapsed,
                    )
                }
            }
        };
        self.prev = Some((bytes_in, bytes_out, now));
        rates
    }
}
