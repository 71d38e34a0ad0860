//! WebSocket handling for the dice-roll channel.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use jojo_shared::{ClientMessage, ServerMessage};

use super::connections::SharedConnectionManager;
use crate::app::App;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Combined state for WebSocket handlers.
pub struct WsState {
    pub app: Arc<App>,
    pub connections: SharedConnectionManager,
}

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let connection_id = Uuid::new_v4();

    // Create a bounded channel for sending messages to this client
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    state.connections.register(connection_id, tx.clone()).await;

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Spawn a task to forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(reply) = handle_text(&text, &state, connection_id).await {
                    if tx.try_send(reply).is_err() {
                        tracing::warn!(
                            connection_id = %connection_id,
                            "Failed to send response, channel full or closed"
                        );
                    }
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up
    state.connections.unregister(connection_id).await;
    send_task.abort();

    tracing::info!(connection_id = %connection_id, "WebSocket connection terminated");
}

/// Parse one text frame and dispatch it. Unparseable frames are answered
/// with `PARSE_ERROR`.
async fn handle_text(text: &str, state: &WsState, connection_id: Uuid) -> Option<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => handle_message(msg, state, connection_id).await,
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
            Some(ServerMessage::Error {
                code: "PARSE_ERROR".to_string(),
                message: format!("Invalid message format: {}", e),
            })
        }
    }
}

/// Dispatch a parsed client message. The returned message, if any, goes to
/// the sender only.
async fn handle_message(
    msg: ClientMessage,
    state: &WsState,
    connection_id: Uuid,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Heartbeat => Some(ServerMessage::Pong),

        ClientMessage::Roll { action, dice } => {
            handle_roll(state, connection_id, action, dice).await
        }

        ClientMessage::Unknown => {
            tracing::debug!(connection_id = %connection_id, "Unknown message type");
            Some(ServerMessage::Error {
                code: "UNKNOWN_MESSAGE".to_string(),
                message: "Unknown message type".to_string(),
            })
        }
    }
}

async fn handle_roll(
    state: &WsState,
    connection_id: Uuid,
    action: String,
    dice: i64,
) -> Option<ServerMessage> {
    match state.app.use_cases.roll.execute(dice) {
        Ok(roll) => {
            tracing::info!(
                connection_id = %connection_id,
                action = %action,
                dice = ?roll.dice,
                result = roll.result,
                "Roll"
            );
            state
                .connections
                .broadcast(ServerMessage::RollResult {
                    action,
                    dice: roll.dice,
                    result: roll.result,
                    outcome: roll.outcome,
                })
                .await;
            None
        }
        Err(e) => Some(ServerMessage::Error {
            code: "INVALID_ROLL".to_string(),
            message: e.to_string(),
        }),
    }
}
