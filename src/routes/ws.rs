// WebSocket feed: the push-stream side of the broadcaster.
//
// Each connection subscribes to the broadcast channel, then gets one
// best-effort snapshot straight away so first paint does not wait for the
// next scheduled tick. Subscribing before the initial push means the client
// sees only snapshots produced after it connected. A failed, timed-out, or
// lagged send ends the connection task - that is the eviction path; a dead
// peer is never retried.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::aggregator::Aggregator;
use crate::models::Snapshot;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements feed connection count on drop (connect = +1, drop = -1).
struct FeedGuard(Arc<AtomicUsize>);

impl Drop for FeedGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_feed(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let tx = state.snapshot_tx.clone();
    let aggregator = state.aggregator.clone();
    let conn_count = state.feed_connections.clone();
    ws.on_upgrade(move |socket| async move {
        let mut rx = tx.subscribe();
        if let Err(e) = stream_feed(socket, &mut rx, aggregator, conn_count).await {
            tracing::info!("Feed stream error: {}", e);
        }
    })
}

async fn stream_feed(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<Snapshot>,
    aggregator: Arc<Aggregator>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = FeedGuard(conn_count);
    tracing::info!("Client connected to snapshot feed");

    // immediate first snapshot; on aggregation failure the client just waits
    // for the next tick
    match aggregator.aggregate().await {
        Ok(snapshot) => {
            if !send_snapshot(&mut socket, &snapshot).await? {
                return Ok(());
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "initial_snapshot", "initial snapshot failed");
        }
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        if !send_snapshot(&mut socket, &snapshot).await? {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // outbound queue overflowed: evict rather than block
                        tracing::warn!("Feed client lagged {} snapshots behind, dropping it", n);
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// One framed JSON text message. Ok(false) means the peer is gone.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &Snapshot) -> anyhow::Result<bool> {
    let json = serde_json::to_string(snapshot)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(!(r.is_err() || r.unwrap_or(Ok(())).is_err()))
}
