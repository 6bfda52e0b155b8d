// Linux-specific helpers: /proc readers and their pure parsers.

use crate::delta::CoreTimes;

/// Read per-core CPU times from /proc/stat. Empty on non-Linux hosts or any
/// read failure; the tracker then reports warm-up zeros.
pub(super) fn read_core_times() -> Vec<CoreTimes> {
    #[cfg(target_os = "linux")]
    {
        match std::fs::read_to_string("/proc/stat") {
            Ok(content) => parse_proc_stat(&content),
            Err(_) => Vec::new(),
        }
    }
    #[cfg(not(target_os = "linux"))]
    Vec::new()
}

/// Parse /proc/stat "cpuN" lines into per-core counters. The aggregate "cpu"
/// line is skipped; iowait counts as idle, softirq/steal count as irq.
pub fn parse_proc_stat(content: &str) -> Vec<CoreTimes> {
    let mut cores = Vec::new();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else { continue };
        if !label.starts_with("cpu") || label == "cpu" {
            continue;
        }
        let v: Vec<u64> = fields.map(|f| f.parse().unwrap_or(0)).collect();
        if v.len() < 4 {
            continue;
        }
        let at = |i: usize| v.get(i).copied().unwrap_or(0);
        cores.push(CoreTimes {
            user: at(0),
            nice: at(1),
            system: at(2),
            idle: at(3) + at(4),
            irq: at(5) + at(6) + at(7),
        });
    }
    cores
}

/// Read cumulative interface byte counters, loopback excluded, as
/// (bytes_in, bytes_out). Zeros on non-Linux hosts or any read failure.
pub(super) fn read_interface_bytes() -> (u64, u64) {
    #[cfg(target_os = "linux")]
    {
        match std::fs::read_to_string("/proc/net/dev") {
            Ok(content) => sum_net_dev(&content),
            Err(_) => (0, 0),
        }
    }
    #[cfg(not(target_os = "linux"))]
    (0, 0)
}

/// Sum rx/tx bytes across interfaces from /proc/net/dev, excluding "lo".
pub fn sum_net_dev(content: &str) -> (u64, u64) {
    let mut bytes_in: u64 = 0;
    let mut bytes_out: u64 = 0;
    for line in content.lines().skip(2) {
        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };
        if name.trim() == "lo" {
            continue;
        }
        let v: Vec<u64> = counters
            .split_whitespace()
            .map(|f| f.parse().unwrap_or(0))
            .collect();
        // rx bytes is column 0, tx bytes is column 8
        bytes_in += v.first().copied().unwrap_or(0);
        bytes_out += v.get(8).copied().unwrap_or(0);
    }
    (bytes_in, bytes_out)
}

/// Read first "model name" from /proc/cpuinfo. Prefer over sysinfo when it
/// returns "cpu0" etc.
pub(super) fn read_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in content.lines() {
            if line.starts_with("model name") {
                let name = line
                    .find(": ")
                    .map(|i| line[i + 2..].trim())
                    .filter(|s| !s.is_empty() && *s != "cpu0")?;
                return Some(name.to_string());
            }
        }
    }
    None
}
