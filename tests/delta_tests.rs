// Delta tracker properties: cold start, aggregate-then-divide overall CPU,
// divide-by-zero guards, rate floors.

use hostpulse::delta::{CoreTimes, CpuUsageTracker, NetworkRateTracker};
use std::time::{Duration, Instant};

fn core(user: u64, system: u64, idle: u64) -> CoreTimes {
    CoreTimes {
        user,
        nice: 0,
        system,
        idle,
        irq: 0,
    }
}

#[test]
fn cpu_first_reading_is_zero_for_overall_and_every_core() {
    let mut tracker = CpuUsageTracker::new();
    let usage = tracker.update(vec![core(500, 100, 400), core(900, 50, 50)]);
    assert_eq!(usage.overall, 0.0);
    assert_eq!(usage.cores, vec![0.0, 0.0]);
}

#[test]
fn cpu_per_core_utilization_from_known_deltas() {
    let mut tracker = CpuUsageTracker::new();
    tracker.update(vec![core(100, 100, 800)]);
    // +50 user, +25 system, +25 idle: busy 75 of 100 total
    let usage = tracker.update(vec![core(150, 125, 825)]);
    assert_eq!(usage.cores, vec![75.0]);
    assert_eq!(usage.overall, 75.0);
}

#[test]
fn cpu_overall_is_delta_weighted_not_mean_of_percentages() {
    let mut tracker = CpuUsageTracker::new();
    tracker.update(vec![core(0, 0, 0), core(0, 0, 0)]);
    // core 0: 10 total, 1 idle -> 90%; core 1: 1000 total, 900 idle -> 10%
    let usage = tracker.update(vec![core(9, 0, 1), core(100, 0, 900)]);
    assert_eq!(usage.cores, vec![90.0, 10.0]);
    // (1010 - 901) / 1010 * 100 = 10.792... -> 10.8; mean would be 50
    assert_eq!(usage.overall, 10.8);
}

#[test]
fn cpu_zero_total_delta_reads_zero() {
    let mut tracker = CpuUsageTracker::new();
    let sample = vec![core(100, 100, 800)];
    tracker.update(sample.clone());
    let usage = tracker.update(sample);
    assert_eq!(usage.cores, vec![0.0]);
    assert_eq!(usage.overall, 0.0);
}

#[test]
fn cpu_rounds_to_one_decimal() {
    let mut tracker = CpuUsageTracker::new();
    tracker.update(vec![core(0, 0, 0)]);
    // 1 busy of 3 total = 33.333...
    let usage = tracker.update(vec![core(1, 0, 2)]);
    assert_eq!(usage.cores, vec![33.3]);
}

#[test]
fn cpu_stores_sample_even_on_cold_start() {
    let mut tracker = CpuUsageTracker::new();
    tracker.update(vec![core(100, 0, 100)]);
    // second call must delta against the first, not read cold again
    let usage = tracker.update(vec![core(200, 0, 100)]);
    assert_eq!(usage.overall, 100.0);
}

#[test]
fn network_first_reading_is_zero() {
    let mut tracker = NetworkRateTracker::new();
    let (rin, rout) = tracker.update(5_000, 7_000, Instant::now());
    assert_eq!((rin, rout), (0.0, 0.0));
}

#[test]
fn network_rate_is_delta_over_elapsed() {
    let mut tracker = NetworkRateTracker::new();
    let t0 = Instant::now();
    tracker.update(10_000, 20_000, t0);
    let (rin, rout) = tracker.update(14_000, 21_000, t0 + Duration::from_secs(4));
    assert_eq!(rin, 1_000.0);
    assert_eq!(rout, 250.0);
}

#[test]
fn network_counter_reset_floors_rate_at_zero() {
    let mut tracker = NetworkRateTracker::new();
    let t0 = Instant::now();
    tracker.update(1_000_000, 1_000_000, t0);
    let (rin, rout) = tracker.update(10, 20, t0 + Duration::from_secs(2));
    assert_eq!((rin, rout), (0.0, 0.0));
}

#[test]
fn network_zero_elapsed_reads_zero() {
    let mut tracker = NetworkRateTracker::new();
    let t0 = Instant::now();
    tracker.update(1_000, 1_000, t0);
    let (rin, rout) = tracker.update(9_000, 9_000, t0);
    assert_eq!((rin, rout), (0.0, 0.0));
}

#[test]
fn network_overwrites_sample_each_call() {
    let mut tracker = NetworkRateTracker::new();
    let t0 = Instant::now();
    tracker.update(0, 0, t0);
    tracker.update(1_000, 0, t0 + Duration::from_secs(1));
    // rate computed against the 1_000 sample, not the initial 0
    let (rin, _) = tracker.update(1_500, 0, t0 + Duration::from_secs(2));
    assert_eq!(rin, 500.0);
}
