//! WebSocket route handler
//!
//! Handles WebSocket upgrade and streams pipeline deltas to the client.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use govwire_core::{ClientMessage, ServerMessage};

use crate::AppState;

/// Create WebSocket routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// The client's hub subscription lives for the duration of the connection;
/// dropping it on disconnect is the unsubscribe. A client that stops reading
/// lags on its broadcast receiver and skips messages rather than stalling the
/// publisher or other clients.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (client_id, mut updates) = state.hub.subscribe();
    info!("WebSocket connected: {}", client_id);

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(message) => {
                    let Ok(text) = serde_json::to_string(&message) else {
                        continue;
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("{} lagged, skipped {} messages", client_id, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Ping { timestamp }) => {
                            let pong = ServerMessage::Pong {
                                client_timestamp: timestamp,
                                server_timestamp: Utc::now().timestamp_millis(),
                            };
                            let Ok(text) = serde_json::to_string(&pong) else {
                                continue;
                            };
                            if sender.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            debug!("{} sent unparseable message: {}", client_id, e);
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("{} socket error: {}", client_id, e);
                    break;
                }
            },
        }
    }

    info!("WebSocket disconnected: {}", client_id);
}
