// Wire models. Keys are contractual - the viewer renders on them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub model: String,
    pub count: u32,
    /// Overall utilization percent, one decimal; 0.0 on the warm-up cycle.
    pub overall: f64,
    pub cores: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub used: String,
    pub total: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    pub used: String,
    pub total: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadAvg {
    #[serde(rename = "1m")]
    pub one: f64,
    #[serde(rename = "5m")]
    pub five: f64,
    #[serde(rename = "15m")]
    pub fifteen: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub bytes_in: String,
    pub bytes_out: String,
    pub rate_in: String,
    pub rate_out: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub hostname: String,
    pub platform: String,
    pub arch: String,
    pub kernel: String,
    pub uptime: String,
    pub uptime_seconds: u64,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub load_avg: LoadAvg,
    pub network: NetworkInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Human status string as reported by the engine (e.g. "Up 3 hours").
    pub status: String,
    pub ports: String,
    /// Lifecycle state: "running" | "exited" | other engine-reported state.
    pub state: String,
    /// Cross-checked against the separately queried running-id set.
    pub running: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub name: String,
    pub windows: u32,
    pub created: String,
    pub attached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub user: String,
    pub pid: u32,
    pub cpu: f64,
    pub mem: f64,
    pub vsz: u64,
    pub rss: u64,
    pub command: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRankings {
    pub by_cpu: Vec<ProcessRecord>,
    pub by_mem: Vec<ProcessRecord>,
}

/// One complete, timestamped bundle of all metrics, as delivered to
/// subscribers. Self-contained; no relationship to prior snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub system: SystemStats,
    pub docker: Vec<ContainerRecord>,
    pub sessions: Vec<SessionRecord>,
    pub processes: ProcessRankings,
    /// Epoch milliseconds at aggregation start.
    pub timestamp: u64,
}
