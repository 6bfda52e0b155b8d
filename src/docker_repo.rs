// Container inventory via the engine CLI: `docker ps` in JSON-lines mode,
// once for running containers and once for all. The running-id set from the
// first query cross-checks the state reported by the second, so a container
// that exits between the two queries is never reported as live.

use crate::command::ShellGateway;
use crate::models::ContainerRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::instrument;

const PS_RUNNING: &str = "docker ps --format '{{json .}}'";
const PS_ALL: &str = "docker ps -a --format '{{json .}}'";

/// One line of `docker ps --format '{{json .}}'`. Unknown fields ignored,
/// missing fields default to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PsLine {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Names")]
    names: String,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Ports")]
    ports: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "CreatedAt")]
    created_at: String,
}

pub struct DockerRepo {
    gateway: Arc<ShellGateway>,
}

impl DockerRepo {
    pub fn new(gateway: Arc<ShellGateway>) -> Self {
        Self { gateway }
    }

    /// All containers with a derived running flag. Empty when the engine is
    /// missing, unreachable, or produces unparseable output.
    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    pub async fn list_containers(&self) -> Vec<ContainerRecord> {
        let (running_raw, all_raw) =
            tokio::join!(self.gateway.capture(PS_RUNNING), self.gateway.capture(PS_ALL));

        let running_ids: HashSet<String> =
            parse_ps_lines(&running_raw).into_iter().map(|c| c.id).collect();
        merge_containers(parse_ps_lines(&all_raw), &running_ids)
    }
}

fn parse_ps_lines(raw: &str) -> Vec<PsLine> {
    raw.lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| match serde_json::from_str::<PsLine>(l) {
            Ok(line) if !line.id.is_empty() => Some(line),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparseable docker ps line");
                None
            }
        })
        .collect()
}

/// Every container from the "all" listing is reported. State prefers the
/// container's own report; otherwise it falls back to running/exited by
/// membership in the live-id set, which also decides the running flag.
fn merge_containers(all: Vec<PsLine>, running_ids: &HashSet<String>) -> Vec<ContainerRecord> {
    all.into_iter()
        .map(|c| {
            let running = running_ids.contains(&c.id);
            let state = if !c.state.is_empty() {
                c.state
            } else if running {
                "running".into()
            } else {
                "exited".into()
            };
            ContainerRecord {
                running,
                state,
                id: c.id,
                name: c.names,
                image: c.image,
                status: c.status,
                ports: c.ports,
                created_at: c.created_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, state: &str) -> PsLine {
        PsLine {
            id: id.into(),
            names: format!("name-{id}"),
            image: "img:latest".into(),
            status: "Up 2 hours".into(),
            state: state.into(),
            ..Default::default()
        }
    }

    #[test]
    fn parse_ps_lines_json_per_line() {
        let raw = concat!(
            r#"{"ID":"abc","Names":"web","Image":"nginx","Status":"Up 3 hours","Ports":"80/tcp","State":"running","CreatedAt":"2026-08-01 10:00:00 +0000 UTC"}"#,
            "\n",
            r#"{"ID":"def","Names":"job","Image":"alpine","Status":"Exited (0) 2 days ago","State":"exited"}"#,
            "\n",
            "not json at all\n",
        );
        let lines = parse_ps_lines(raw);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, "abc");
        assert_eq!(lines[0].ports, "80/tcp");
        assert_eq!(lines[1].ports, "");
    }

    #[test]
    fn parse_ps_lines_empty_output() {
        assert!(parse_ps_lines("").is_empty());
    }

    #[test]
    fn merge_prefers_own_state_when_present() {
        let running: HashSet<String> = ["abc".to_string()].into();
        let out = merge_containers(vec![line("abc", "restarting")], &running);
        assert_eq!(out[0].state, "restarting");
        assert!(out[0].running);
    }

    #[test]
    fn merge_falls_back_to_running_set_membership() {
        let running: HashSet<String> = ["abc".to_string()].into();
        let out = merge_containers(vec![line("abc", ""), line("def", "")], &running);
        assert_eq!(out[0].state, "running");
        assert!(out[0].running);
        assert_eq!(out[1].state, "exited");
        assert!(!out[1].running);
    }

    #[test]
    fn merge_cross_checks_stale_state_against_live_ids() {
        // exited between the two queries: own state says running, live set disagrees
        let running: HashSet<String> = HashSet::new();
        let out = merge_containers(vec![line("abc", "running")], &running);
        assert_eq!(out[0].state, "running");
        assert!(!out[0].running);
    }
}
