//! WebSocket upgrade handler for the broadcast endpoint.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Register the session with the hub
//! 3. Feed inbound text frames to the hub, one at a time
//! 4. Drain the outbound queue into the socket
//! 5. Stop the writer and unregister on disconnect

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::adapters::http::HubState;
use crate::application::MessageOutcome;
use crate::ports::Session;

use super::WebSocketSession;

/// Route the broadcast endpoint is mounted on.
pub const BROADCAST_PATH: &str = "/broadcast";

/// How long the writer gets to flush a close frame after `stop`.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

const STOP_REQUESTED: &str = "stop requested";

/// Handle WebSocket upgrade requests for the broadcast endpoint.
///
/// Route: `GET /broadcast`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<HubState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. Inbound frames are processed
/// sequentially on the reader task, which is what keeps `on_message` calls
/// for one session from overlapping.
async fn handle_socket(socket: WebSocket, state: HubState) {
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    let session = Arc::new(WebSocketSession::new(outbound_tx));
    let session_id = session.id();

    if let Err(e) = state.hub.on_open(session.clone()).await {
        tracing::error!(session_id = %session_id, error = %e, "Rejecting connection");
        return;
    }

    // Writer: drain the outbound queue into the socket. Holds no session
    // handle, so dropping `outbound_rx` on exit marks the session closed.
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let closing = matches!(frame, Message::Close(_));
            if let Err(e) = sink.send(frame).await {
                tracing::debug!(session_id = %session_id, "Send error, closing connection: {}", e);
                return "send failed";
            }
            if closing {
                return STOP_REQUESTED;
            }
        }
        "outbound queue closed"
    });

    // Reader: hand each text frame to the hub
    let mut recv_task = {
        let hub = state.hub.clone();
        let session = session.clone();
        tokio::spawn(async move {
            while let Some(result) = stream.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        if hub.on_message(&*session, &text).await == MessageOutcome::Stopped {
                            return STOP_REQUESTED;
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(session_id = %session_id, "Received unsupported binary message");
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                        // Protocol-level keepalive, answered by axum
                    }
                    Ok(Message::Close(_)) => {
                        tracing::debug!(session_id = %session_id, "Client sent close frame");
                        return "client closed";
                    }
                    Err(e) => {
                        hub.on_error(&session_id, &e);
                        return "transport error";
                    }
                }
            }
            "stream ended"
        })
    };

    let reason = tokio::select! {
        result = &mut send_task => {
            recv_task.abort();
            result.unwrap_or("send task aborted")
        }
        result = &mut recv_task => {
            let reason = result.unwrap_or("receive task aborted");
            if reason == STOP_REQUESTED {
                // Let the queued close frame reach the client first
                if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task).await.is_err() {
                    send_task.abort();
                }
            } else {
                send_task.abort();
            }
            reason
        }
    };

    session.mark_closed();
    state.hub.on_close(&session_id, reason).await;
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router() -> axum::Router<HubState> {
    use axum::routing::get;

    axum::Router::new().route(BROADCAST_PATH, get(ws_handler))
}
