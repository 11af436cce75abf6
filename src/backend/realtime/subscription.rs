/**
 * Real-time Subscription Handler (Server-Sent Events)
 *
 * `GET /realtime` is the SSE alternative to the WebSocket transport. Each
 * request registers one connection with the notification hub and streams
 * its events:
 *
 * ```http
 * HTTP/1.1 200 OK
 * Content-Type: text/event-stream
 *
 * event: NEW_MESSAGE
 * data: {"id":"...","type":"TEXT","content":"hi",...}
 * ```
 *
 * When the client goes away axum drops the stream, which drops the
 * `Subscription` and removes the connection from the live set. Keep-alive
 * comments are injected by axum.
 */
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{stream, Stream};
use std::convert::Infallible;
use std::sync::Arc;

use crate::backend::realtime::hub::{NotificationHub, Subscription};

/// Handle `GET /realtime`
pub async fn handle_realtime_subscription(
    State(hub): State<Arc<NotificationHub>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = hub.connect();
    tracing::info!("[Realtime] SSE subscription {} active", subscription.id());

    Sse::new(event_stream(subscription)).keep_alive(KeepAlive::default())
}

fn event_stream(subscription: Subscription) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(subscription, |mut subscription| async move {
        loop {
            let event = subscription.recv().await?;
            match Event::default().event(event.name()).json_data(&event.data) {
                Ok(sse_event) => return Some((Ok(sse_event), subscription)),
                Err(e) => {
                    tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                    continue;
                }
            }
        }
    })
}
