//! WebSocket endpoint for live graph updates
//!
//! `GET /ws` upgrades to a WebSocket session. Each session subscribes to the
//! service's domain event channel and forwards every event as a JSON frame:
//!
//! ```json
//! {"topic": "/topic/nodes", "payload": {"id": 1, "title": "Root", ...}}
//! {"topic": "/topic/nodes", "payload": {"deleted": "1"}}
//! {"topic": "/topic/graph", "payload": [ ...full node list... ]}
//! ```
//!
//! Clients may also send `{"action": "connect", "sourceId": "1",
//! "targetId": "2"}`; a failed connect is logged and ignored, the session
//! stays open either way.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;
use mindmesh_core::db::DomainEvent;
use mindmesh_core::models::ConnectRequest;

/// Outbound frame envelope
#[derive(Debug, Serialize)]
struct BroadcastFrame {
    topic: &'static str,
    payload: serde_json::Value,
}

/// Inbound client messages, tagged by `action`
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum ClientMessage {
    Connect(ConnectRequest),
}

/// Build the WebSocket router
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Map a domain event to its broadcast frame
fn event_frame(event: &DomainEvent) -> Result<BroadcastFrame, serde_json::Error> {
    let frame = match event {
        DomainEvent::NodeCreated(node) | DomainEvent::NodeUpdated(node) => BroadcastFrame {
            topic: "/topic/nodes",
            payload: serde_json::to_value(node)?,
        },
        DomainEvent::NodeDeleted { id } => BroadcastFrame {
            topic: "/topic/nodes",
            payload: serde_json::json!({ "deleted": id.to_string() }),
        },
        DomainEvent::GraphChanged(nodes) => BroadcastFrame {
            topic: "/topic/graph",
            payload: serde_json::to_value(nodes)?,
        },
    };
    Ok(frame)
}

/// Drive one WebSocket session until the client disconnects
async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut events = state.node_service.subscribe_to_events();
    let (mut sender, mut receiver) = socket.split();

    tracing::debug!("WebSocket client connected");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let text = match event_frame(&event).and_then(|f| serde_json::to_string(&f)) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::error!("Failed to serialize {} event: {}", event.event_type(), e);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Clients only track current state, a gap is tolerable
                        tracing::warn!("WebSocket client lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&state, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!("WebSocket client disconnected");
}

/// Handle an inbound text frame; malformed or failed requests never close
/// the session
async fn handle_client_message(state: &AppState, text: &str) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Ignoring malformed WebSocket message: {}", e);
            return;
        }
    };

    match message {
        ClientMessage::Connect(request) => {
            match state.node_service.connect_nodes(request).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!("WebSocket connect request not applied");
                }
                Err(e) => {
                    tracing::warn!("WebSocket connect request failed: {}", e);
                }
            }
        }
    }
}
