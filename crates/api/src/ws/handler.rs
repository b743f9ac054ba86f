//! The live-feed WebSocket endpoint.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use wardsight_events::{FeedHub, LiveEvent};

use crate::state::AppState;

/// HTTP handler that upgrades the connection to a WebSocket and subscribes
/// it to the live feed.
pub async fn live_feed_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Manage a single live-feed subscription after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers with the hub and gets the subscriber's event queue.
///   2. Spawns a writer task serializing queued events onto the sink.
///   3. Processes inbound messages on the current task; the literal text
///      `ping` earns exactly one `pong`, everything else is ignored.
///   4. Deregisters on any exit path, so closing the socket always
///      triggers the disconnect.
async fn handle_socket(socket: WebSocket, hub: Arc<FeedHub>) {
    let (subscriber_id, mut rx) = hub.connect().await;
    tracing::info!(subscriber = %subscriber_id, "Live feed subscriber connected");

    let (mut sink, mut stream) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize live event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                tracing::debug!(subscriber = %subscriber_id, "Live feed sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) if text.as_str() == "ping" => {
                hub.send_to(subscriber_id, LiveEvent::pong()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {
                // Any other inbound frame is not part of the feed contract.
            }
            Err(e) => {
                tracing::debug!(subscriber = %subscriber_id, error = %e, "Live feed receive error");
                break;
            }
        }
    }

    hub.disconnect(subscriber_id).await;
    send_task.abort();
    tracing::info!(subscriber = %subscriber_id, "Live feed subscriber disconnected");
}
