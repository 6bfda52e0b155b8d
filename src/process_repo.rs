// Top processes from two independent `ps aux` queries, sorted by CPU and by
// memory. `head -6` keeps the header plus the top five rows; the cap is part
// of the contract, not configuration.

use crate::command::ShellGateway;
use crate::models::{ProcessRankings, ProcessRecord};
use std::sync::Arc;
use tracing::instrument;

const TOP_N: usize = 5;
const PS_BY_CPU: &str = "ps aux --sort=-%cpu | head -6";
const PS_BY_MEM: &str = "ps aux --sort=-%mem | head -6";

/// Command lines are truncated to bound snapshot size.
const MAX_COMMAND_CHARS: usize = 80;

pub struct ProcessRepo {
    gateway: Arc<ShellGateway>,
}

impl ProcessRepo {
    pub fn new(gateway: Arc<ShellGateway>) -> Self {
        Self { gateway }
    }

    /// Either ranking degrades to empty independently of the other.
    #[instrument(skip(self), fields(repo = "process", operation = "top_processes"))]
    pub async fn top_processes(&self) -> ProcessRankings {
        let (by_cpu_raw, by_mem_raw) = tokio::join!(
            self.gateway.capture(PS_BY_CPU),
            self.gateway.capture(PS_BY_MEM)
        );
        ProcessRankings {
            by_cpu: parse_ps_table(&by_cpu_raw),
            by_mem: parse_ps_table(&by_mem_raw),
        }
    }
}

/// Parse a `ps aux` report: skip the header, fixed column mapping, malformed
/// rows dropped.
pub fn parse_ps_table(raw: &str) -> Vec<ProcessRecord> {
    raw.lines()
        .skip(1)
        .filter_map(parse_ps_row)
        .take(TOP_N)
        .collect()
}

fn parse_ps_row(line: &str) -> Option<ProcessRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 11 {
        return None;
    }
    let mut command = fields[10..].join(" ");
    if command.chars().count() > MAX_COMMAND_CHARS {
        command = command.chars().take(MAX_COMMAND_CHARS).collect();
    }
    Some(ProcessRecord {
        user: fields[0].to_string(),
        pid: fields[1].parse().ok()?,
        cpu: fields[2].parse().unwrap_or(0.0),
        mem: fields[3].parse().unwrap_or(0.0),
        vsz: fields[4].parse().unwrap_or(0),
        rss: fields[5].parse().unwrap_or(0),
        command,
    })
}
