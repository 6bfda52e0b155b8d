// System stats: sysinfo for identity/memory/uptime/load, /proc for the raw
// counters the delta trackers consume, shell gateway for kernel and disk.

mod linux;

pub use linux::{parse_proc_stat, sum_net_dev};

use crate::command::ShellGateway;
use crate::delta::{CpuUsage, CpuUsageTracker, NetworkRateTracker};
use crate::models::{CpuInfo, DiskInfo, LoadAvg, MemoryInfo, NetworkInfo, SystemStats};
use crate::units::{format_bytes, format_rate, format_uptime};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::System;
use tracing::instrument;

pub struct SystemRepo {
    gateway: Arc<ShellGateway>,
    sys: Arc<std::sync::Mutex<System>>,
    cpu_tracker: Arc<std::sync::Mutex<CpuUsageTracker>>,
    net_tracker: Arc<std::sync::Mutex<NetworkRateTracker>>,
}

impl SystemRepo {
    pub fn new(gateway: Arc<ShellGateway>) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            gateway,
            sys: Arc::new(std::sync::Mutex::new(sys)),
            cpu_tracker: Arc::new(std::sync::Mutex::new(CpuUsageTracker::new())),
            net_tracker: Arc::new(std::sync::Mutex::new(NetworkRateTracker::new())),
        }
    }

    /// One full system reading. External-tool and /proc failures degrade the
    /// affected field; only an environment error (poisoned lock, join error)
    /// surfaces, and it is fatal to the cycle alone.
    #[instrument(skip(self), fields(repo = "system", operation = "collect"))]
    pub async fn collect(&self) -> anyhow::Result<SystemStats> {
        let kernel_raw = self.gateway.capture("uname -r").await;
        let df_raw = self.gateway.capture("df -k /").await;

        let sys = self.sys.clone();
        let cpu_tracker = self.cpu_tracker.clone();
        let net_tracker = self.net_tracker.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let hostname = System::host_name().unwrap_or_else(|| "unknown".into());
            let kernel = if kernel_raw.is_empty() {
                System::kernel_version().unwrap_or_else(|| "Unknown".into())
            } else {
                kernel_raw
            };

            let uptime_seconds = System::uptime();
            let load = System::load_average();

            let model = linux::read_cpu_model()
                .or_else(|| {
                    sys.cpus()
                        .first()
                        .map(|c| c.name().to_string())
                        .filter(|s| !s.is_empty() && s != "cpu0")
                })
                .unwrap_or_else(|| "Unknown".into());
            let count = sys.cpus().len() as u32;

            let usage: CpuUsage = cpu_tracker
                .lock()
                .map(|mut t| t.update(linux::read_core_times()))
                .unwrap_or(CpuUsage {
                    overall: 0.0,
                    cores: vec![],
                });

            let mem_total = sys.total_memory();
            let mem_used = mem_total.saturating_sub(sys.available_memory());

            let (disk_used, disk_total) = parse_df(&df_raw).unwrap_or((0, 0));

            let (bytes_in, bytes_out) = linux::read_interface_bytes();
            let (rate_in, rate_out) = net_tracker
                .lock()
                .map(|mut t| t.update(bytes_in, bytes_out, Instant::now()))
                .unwrap_or((0.0, 0.0));

            Ok(SystemStats {
                hostname,
                platform: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
                kernel,
                uptime: format_uptime(uptime_seconds),
                uptime_seconds,
                cpu: CpuInfo {
                    model,
                    count,
                    overall: usage.overall,
                    cores: usage.cores,
                },
                memory: MemoryInfo {
                    used: format_bytes(mem_used as f64),
                    total: format_bytes(mem_total as f64),
                    percent: usage_percent(mem_used, mem_total),
                },
                disk: DiskInfo {
                    used: format_bytes(disk_used as f64),
                    total: format_bytes(disk_total as f64),
                    percent: usage_percent(disk_used, disk_total),
                },
                load_avg: LoadAvg {
                    one: round2(load.one),
                    five: round2(load.five),
                    fifteen: round2(load.fifteen),
                },
                network: NetworkInfo {
                    bytes_in: format_bytes(bytes_in as f64),
                    bytes_out: format_bytes(bytes_out as f64),
                    rate_in: format_rate(rate_in),
                    rate_out: format_rate(rate_out),
                },
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("system collect join: {}", e))?
    }
}

/// Used/total from a `df -k <path>` report: first data line, 1K-block and
/// used columns, scaled to bytes. None on any unexpected shape.
pub fn parse_df(raw: &str) -> Option<(u64, u64)> {
    let line = raw.lines().skip(1).find(|l| !l.trim().is_empty())?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }
    let total_kb: u64 = fields[1].parse().ok()?;
    let used_kb: u64 = fields[2].parse().ok()?;
    Some((used_kb * 1024, total_kb * 1024))
}

fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 1000.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
