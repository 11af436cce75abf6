/**
 * WebSocket Transport
 *
 * `GET /ws` upgrades to a WebSocket and attaches it to the notification hub.
 * Every `NEW_MESSAGE` event is written as one text frame:
 *
 * ```json
 * {"event":"NEW_MESSAGE","data":{"id":"...","type":"TEXT","content":"hi",...}}
 * ```
 *
 * Frames sent by the client are ignored; a close frame or a read error ends
 * the connection. A write that fails or does not finish within
 * `SEND_TIMEOUT` also ends it. In every case the connection leaves the live
 * set when its `Subscription` is dropped.
 */
use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::backend::realtime::hub::{NotificationHub, PendingConnection};

/// Upper bound on a single frame write before the peer is considered hung
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle `GET /ws`
pub async fn handle_websocket(
    State(hub): State<Arc<NotificationHub>>,
    ws: WebSocketUpgrade,
) -> Response {
    let pending = hub.open();
    tracing::debug!("[Realtime] WebSocket upgrade requested for {}", pending.id());
    ws.on_upgrade(move |socket| serve_socket(socket, hub, pending))
}

async fn serve_socket(socket: WebSocket, hub: Arc<NotificationHub>, pending: PendingConnection) {
    let mut subscription = hub.register(pending);
    let id = subscription.id();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else {
                    tracing::debug!("[Realtime] {} dropped by hub", id);
                    break;
                };

                let payload = match serde_json::to_string(event.as_ref()) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                        continue;
                    }
                };

                match tokio::time::timeout(SEND_TIMEOUT, sink.send(WsMessage::Text(payload.into()))).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::debug!("[Realtime] {} write failed: {:?}", id, e);
                        break;
                    }
                    Err(_) => {
                        tracing::warn!("[Realtime] {} write timed out", id);
                        break;
                    }
                }
            }
            incoming = stream.next() => {
                match incoming {
                    None | Some(Ok(WsMessage::Close(_))) => break,
                    Some(Err(e)) => {
                        tracing::debug!("[Realtime] {} read failed: {:?}", id, e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.unregister(id);
    let _ = sink.close().await;
}
