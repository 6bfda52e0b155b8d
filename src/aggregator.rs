// One aggregation cycle: all collectors in parallel, one Snapshot out.

use crate::docker_repo::DockerRepo;
use crate::models::Snapshot;
use crate::process_repo::ProcessRepo;
use crate::system_repo::SystemRepo;
use crate::tmux_repo::TmuxRepo;
use std::sync::Arc;

pub struct Aggregator {
    pub system_repo: Arc<SystemRepo>,
    pub docker_repo: Arc<DockerRepo>,
    pub tmux_repo: Arc<TmuxRepo>,
    pub process_repo: Arc<ProcessRepo>,
}

impl Aggregator {
    /// Collectors absorb their own failures, so the only error path here is
    /// an environment fault inside the system collector. The snapshot is
    /// stamped with the aggregation start time.
    pub async fn aggregate(&self) -> anyhow::Result<Snapshot> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
                0
            });

        let (system, docker, sessions, processes) = tokio::join!(
            self.system_repo.collect(),
            self.docker_repo.list_containers(),
            self.tmux_repo.list_sessions(),
            self.process_repo.top_processes(),
        );

        Ok(Snapshot {
            system: system?,
            docker,
            sessions,
            processes,
            timestamp,
        })
    }
}
