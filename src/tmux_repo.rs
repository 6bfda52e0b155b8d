// Multiplexer sessions from `tmux list-sessions`, one line per session:
//   name: N windows (created Mon Aug  4 10:00:00 2025) (attached)
// Parsing degrades per line: strict pattern, then name + first integer, then
// a minimal record with zero windows.

use crate::command::ShellGateway;
use crate::models::SessionRecord;
use std::sync::Arc;
use tracing::instrument;

const LIST_SESSIONS: &str = "tmux list-sessions";

pub struct TmuxRepo {
    gateway: Arc<ShellGateway>,
}

impl TmuxRepo {
    pub fn new(gateway: Arc<ShellGateway>) -> Self {
        Self { gateway }
    }

    /// Empty when tmux is missing or no server is running (both surface as a
    /// gateway failure).
    #[instrument(skip(self), fields(repo = "tmux", operation = "list_sessions"))]
    pub async fn list_sessions(&self) -> Vec<SessionRecord> {
        let raw = self.gateway.capture(LIST_SESSIONS).await;
        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(parse_session_line)
            .collect()
    }
}

fn parse_session_line(line: &str) -> SessionRecord {
    let attached = line.contains("(attached)");

    let Some((name, rest)) = line.split_once(':') else {
        // no separator at all: keep the line as the session name
        return SessionRecord {
            name: line.trim().to_string(),
            windows: 0,
            created: String::new(),
            attached,
        };
    };
    let name = name.trim().to_string();
    let rest = rest.trim_start();

    let mut tokens = rest.split_whitespace();
    if let (Some(count), Some(unit)) = (tokens.next(), tokens.next())
        && let Ok(windows) = count.parse::<u32>()
        && unit.starts_with("window")
    {
        return SessionRecord {
            name,
            windows,
            created: created_field(line),
            attached,
        };
    }

    // looser fallback: first integer anywhere after the name
    let windows = rest
        .split_whitespace()
        .find_map(|t| t.parse::<u32>().ok())
        .unwrap_or(0);
    SessionRecord {
        name,
        windows,
        created: String::new(),
        attached,
    }
}

/// Text inside "(created ...)", empty when the marker is absent.
fn created_field(line: &str) -> String {
    let Some(start) = line.find("(created ") else {
        return String::new();
    };
    let tail = &line[start + "(created ".len()..];
    let end = tail.find(')').unwrap_or(tail.len());
    tail[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_session_line() {
        let s = parse_session_line("main: 3 windows (created Mon Aug  4 10:00:00 2025) (attached)");
        assert_eq!(s.name, "main");
        assert_eq!(s.windows, 3);
        assert_eq!(s.created, "Mon Aug  4 10:00:00 2025");
        assert!(s.attached);
    }

    #[test]
    fn parses_detached_single_window() {
        let s = parse_session_line("work: 1 windows (created Tue Aug  5 09:30:00 2025)");
        assert_eq!(s.name, "work");
        assert_eq!(s.windows, 1);
        assert!(!s.attached);
    }

    #[test]
    fn loose_fallback_captures_name_and_count() {
        let s = parse_session_line("odd: [2] something unexpected");
        assert_eq!(s.name, "odd");
        assert_eq!(s.windows, 0); // "[2]" is not a bare integer
        let s = parse_session_line("odd: something 2 unexpected");
        assert_eq!(s.windows, 2);
        assert_eq!(s.created, "");
    }

    #[test]
    fn minimal_record_on_total_failure() {
        let s = parse_session_line("completely unstructured text");
        assert_eq!(s.name, "completely unstructured text");
        assert_eq!(s.windows, 0);
        assert!(!s.attached);
    }

    #[test]
    fn attached_marker_detected_anywhere() {
        let s = parse_session_line("weird (attached) line with no colon");
        assert!(s.attached);
    }
}
