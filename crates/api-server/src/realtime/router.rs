//! Message router
//!
//! Stateless dispatcher mapping each inbound command to exactly one store
//! operation and classifying the result for delivery. The store is injected
//! so the mapping can be exercised without any transport attached.

use std::sync::Arc;
use tracing::{debug, warn};

use rb_core::board::BoardStore;

use super::protocol::{ClientCommand, ServerEvent};

/// How a routed result is delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// Fan out to every open connection, the originator included.
    Broadcast(ServerEvent),
    /// Send to the requesting connection only.
    Direct(ServerEvent),
    /// Nothing to send: the command was rejected or its target is gone.
    Silent,
}

/// Routes validated commands into the board store
pub struct MessageRouter {
    board: Arc<BoardStore>,
}

impl MessageRouter {
    pub fn new(board: Arc<BoardStore>) -> Self {
        Self { board }
    }

    /// Apply one command to the store and derive the canonical event.
    ///
    /// A missing target never surfaces as an error; the broadcast is simply
    /// suppressed and the caller learns nothing.
    pub async fn dispatch(&self, command: ClientCommand) -> Routed {
        match command {
            ClientCommand::TaskCreate(draft) => {
                if draft.title.trim().is_empty() {
                    warn!("Rejecting task:create with blank title");
                    return Routed::Silent;
                }
                match self.board.create_task(draft).await {
                    Some(task) => Routed::Broadcast(ServerEvent::TaskCreated(task)),
                    None => {
                        debug!("task:create targeted a missing column");
                        Routed::Silent
                    }
                }
            }

            ClientCommand::TaskUpdate(payload) => {
                match self.board.update_task(&payload.id, payload.patch).await {
                    Some(task) => Routed::Broadcast(ServerEvent::TaskUpdated(task)),
                    None => Routed::Silent,
                }
            }

            ClientCommand::TaskMove(payload) => {
                match self
                    .board
                    .move_task(&payload.task_id, &payload.column_id, payload.position)
                    .await
                {
                    Some(task) => Routed::Broadcast(ServerEvent::TaskMoved(task)),
                    None => Routed::Silent,
                }
            }

            ClientCommand::TaskDelete(payload) => {
                if self.board.delete_task(&payload.id).await {
                    Routed::Broadcast(ServerEvent::TaskDeleted(payload))
                } else {
                    Routed::Silent
                }
            }

            ClientCommand::ColumnCreate(payload) => {
                if payload.title.trim().is_empty() {
                    warn!("Rejecting column:create with blank title");
                    return Routed::Silent;
                }
                let column = self.board.create_column(&payload.title).await;
                Routed::Broadcast(ServerEvent::ColumnCreated(column))
            }

            ClientCommand::ColumnUpdate(payload) => {
                match self.board.update_column(&payload.id, payload.patch).await {
                    Some(column) => Routed::Broadcast(ServerEvent::ColumnUpdated(column)),
                    None => Routed::Silent,
                }
            }

            ClientCommand::ColumnDelete(payload) => {
                if self.board.delete_column(&payload.id).await {
                    Routed::Broadcast(ServerEvent::ColumnDeleted(payload))
                } else {
                    Routed::Silent
                }
            }

            ClientCommand::Sync => Routed::Direct(ServerEvent::Sync(self.board.snapshot().await)),
        }
    }
}
