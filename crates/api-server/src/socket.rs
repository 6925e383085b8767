//! Socket.IO connection hub
//!
//! Manages the set of live client connections: full-state handoff on
//! connect, inbound command dispatch through the message router, and event
//! fan-out. The hub holds no board state of its own.

use serde_json::Value;
use socketioxide::extract::{Data, SocketRef, State};
use socketioxide::{SocketIo, TransportType};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::realtime::{ClientCommand, MessageRouter, OutboundMessage, Routed, MESSAGE_EVENT};

/// Shared state for the socket handlers
#[derive(Clone)]
pub struct SocketState {
    pub router: Arc<MessageRouter>,
}

impl SocketState {
    pub fn new(router: Arc<MessageRouter>) -> Self {
        Self { router }
    }
}

/// Handle a new socket connection
pub async fn on_connect(socket: SocketRef, State(state): State<SocketState>) {
    info!("Client connected: {}", socket.id);

    socket.on(
        MESSAGE_EVENT,
        |socket: SocketRef, State(state): State<SocketState>, Data(value): Data<Value>| async move {
            handle_message(socket, state, value).await;
        },
    );

    socket.on_disconnect(|socket: SocketRef| async move {
        info!("Client disconnected: {}", socket.id);
    });

    // Full-state handoff: the snapshot is the only way a client ever learns
    // the current board; there is no incremental backfill.
    if let Routed::Direct(event) = state.router.dispatch(ClientCommand::Sync).await {
        if let Err(e) = socket.emit(MESSAGE_EVENT, &OutboundMessage::new(event, None)) {
            warn!("Failed to send initial sync to {}: {}", socket.id, e);
        }
    }
}

async fn handle_message(socket: SocketRef, state: SocketState, value: Value) {
    let command = match ClientCommand::parse(value) {
        Ok(Some(command)) => command,
        Ok(None) => {
            debug!("Ignoring message with unknown type from {}", socket.id);
            return;
        }
        Err(e) => {
            // A single malformed message never terminates the session.
            warn!("Dropping malformed message from {}: {}", socket.id, e);
            return;
        }
    };

    match state.router.dispatch(command).await {
        Routed::Broadcast(event) => {
            let message = OutboundMessage::new(event, Some(socket.id.to_string()));
            broadcast_message(&socket, &message);
        }
        Routed::Direct(event) => {
            let _ = socket.emit(MESSAGE_EVENT, &OutboundMessage::new(event, None));
        }
        Routed::Silent => {}
    }
}

/// Send one event to every open connection, the originator included. The
/// originator gets no distinguished acknowledgment; the broadcast is its
/// confirmation too.
fn broadcast_message(socket: &SocketRef, message: &OutboundMessage) {
    // Emit to the sender
    let _ = socket.emit(MESSAGE_EVENT, message);
    // Broadcast to all other clients
    let _ = socket.broadcast().emit(MESSAGE_EVENT, message);
}

/// Create and configure the Socket.IO layer
pub fn create_socket_layer(state: SocketState) -> (socketioxide::layer::SocketIoLayer, SocketIo) {
    let (layer, io) = SocketIo::builder()
        .with_state(state)
        // Only allow WebSocket transport to avoid CORS issues with polling
        .transports([TransportType::Websocket])
        .build_layer();

    io.ns("/", on_connect);

    (layer, io)
}
