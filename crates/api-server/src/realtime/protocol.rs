//! Wire protocol for board synchronization
//!
//! Every value travels over a single Socket.IO event name in both
//! directions; the `type` field of the envelope is the actual dispatch key.
//! Inbound messages decode in two steps: the envelope first, then the
//! kind-specific payload, so nothing malformed ever reaches the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use rb_core::board::{BoardSnapshot, Column, ColumnPatch, NewTask, Task, TaskPatch};

/// The Socket.IO event name carrying every protocol message.
pub const MESSAGE_EVENT: &str = "message";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid message envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw inbound envelope. Clients may attach `clientId` and `timestamp`, but
/// neither carries meaning server-side and both are ignored here.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// `task:update` payload: the target id plus a partial task
#[derive(Debug, Deserialize)]
pub struct UpdateTaskPayload {
    pub id: String,
    #[serde(flatten)]
    pub patch: TaskPatch,
}

/// `task:move` payload. The original clients send the target as `taskId`,
/// older ones as `id`; both are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskPayload {
    #[serde(alias = "id")]
    pub task_id: String,
    pub column_id: String,
    pub position: u32,
}

/// `column:create` payload. The server assigns the id and the position.
#[derive(Debug, Deserialize)]
pub struct CreateColumnPayload {
    pub title: String,
}

/// `column:update` payload: the target id plus a partial column
#[derive(Debug, Deserialize)]
pub struct UpdateColumnPayload {
    pub id: String,
    #[serde(flatten)]
    pub patch: ColumnPatch,
}

/// `{ "id": ... }` payload shared by the delete commands and their
/// broadcasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPayload {
    pub id: String,
}

/// The closed set of inbound command kinds
#[derive(Debug)]
pub enum ClientCommand {
    TaskCreate(NewTask),
    TaskUpdate(UpdateTaskPayload),
    TaskMove(MoveTaskPayload),
    TaskDelete(IdPayload),
    ColumnCreate(CreateColumnPayload),
    ColumnUpdate(UpdateColumnPayload),
    ColumnDelete(IdPayload),
    Sync,
}

impl ClientCommand {
    /// Decode one inbound message. `Ok(None)` means the kind is unknown and
    /// the message is to be dropped without error.
    pub fn parse(value: Value) -> Result<Option<Self>, ProtocolError> {
        let envelope: Envelope =
            serde_json::from_value(value).map_err(ProtocolError::InvalidEnvelope)?;

        let command = match envelope.kind.as_str() {
            "task:create" => Self::TaskCreate(decode("task:create", envelope.payload)?),
            "task:update" => Self::TaskUpdate(decode("task:update", envelope.payload)?),
            "task:move" => Self::TaskMove(decode("task:move", envelope.payload)?),
            "task:delete" => Self::TaskDelete(decode("task:delete", envelope.payload)?),
            "column:create" => Self::ColumnCreate(decode("column:create", envelope.payload)?),
            "column:update" => Self::ColumnUpdate(decode("column:update", envelope.payload)?),
            "column:delete" => Self::ColumnDelete(decode("column:delete", envelope.payload)?),
            "sync" | "sync:tasks" => Self::Sync,
            _ => return Ok(None),
        };

        Ok(Some(command))
    }
}

fn decode<T>(kind: &'static str, payload: Value) -> Result<T, ProtocolError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(payload).map_err(|source| ProtocolError::MalformedPayload { kind, source })
}

/// Canonical event derived from a store operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerEvent {
    #[serde(rename = "task:create")]
    TaskCreated(Task),
    #[serde(rename = "task:update")]
    TaskUpdated(Task),
    #[serde(rename = "task:move")]
    TaskMoved(Task),
    #[serde(rename = "task:delete")]
    TaskDeleted(IdPayload),
    #[serde(rename = "column:create")]
    ColumnCreated(Column),
    #[serde(rename = "column:update")]
    ColumnUpdated(Column),
    #[serde(rename = "column:delete")]
    ColumnDeleted(IdPayload),
    #[serde(rename = "sync:tasks")]
    Sync(BoardSnapshot),
}

/// Outbound envelope: the event plus the originating connection id (present
/// only when a client command caused the event) and a send-time timestamp in
/// epoch milliseconds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    #[serde(flatten)]
    pub event: ServerEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub timestamp: i64,
}

impl OutboundMessage {
    pub fn new(event: ServerEvent, client_id: Option<String>) -> Self {
        Self {
            event,
            client_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_task_create_with_defaults() {
        let value = json!({
            "type": "task:create",
            "payload": { "title": "Ship v1", "columnId": "todo" },
            "clientId": "abc",
            "timestamp": 123
        });

        let command = ClientCommand::parse(value).unwrap().unwrap();
        match command {
            ClientCommand::TaskCreate(draft) => {
                assert_eq!(draft.title, "Ship v1");
                assert_eq!(draft.column_id, "todo");
                assert!(draft.description.is_none());
                assert!(draft.attachments.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_kind_is_ignored() {
        let value = json!({ "type": "task:archive", "payload": { "id": "task-1" } });
        assert!(ClientCommand::parse(value).unwrap().is_none());
    }

    #[test]
    fn test_parse_malformed_payload() {
        let value = json!({ "type": "task:create", "payload": { "columnId": "todo" } });
        let err = ClientCommand::parse(value).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedPayload { kind: "task:create", .. }
        ));
    }

    #[test]
    fn test_parse_missing_type_is_invalid_envelope() {
        let value = json!({ "payload": {} });
        let err = ClientCommand::parse(value).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidEnvelope(_)));
    }

    #[test]
    fn test_parse_move_accepts_both_target_keys() {
        for key in ["taskId", "id"] {
            let value = json!({
                "type": "task:move",
                "payload": { key: "task-1", "columnId": "done", "position": 0 }
            });
            let command = ClientCommand::parse(value).unwrap().unwrap();
            match command {
                ClientCommand::TaskMove(payload) => {
                    assert_eq!(payload.task_id, "task-1");
                    assert_eq!(payload.column_id, "done");
                    assert_eq!(payload.position, 0);
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_sync_kinds() {
        for kind in ["sync", "sync:tasks"] {
            let value = json!({ "type": kind });
            let command = ClientCommand::parse(value).unwrap().unwrap();
            assert!(matches!(command, ClientCommand::Sync));
        }
    }

    #[test]
    fn test_parse_update_flattens_patch() {
        let value = json!({
            "type": "task:update",
            "payload": { "id": "task-1", "title": "New", "position": 4 }
        });

        let command = ClientCommand::parse(value).unwrap().unwrap();
        match command {
            ClientCommand::TaskUpdate(payload) => {
                assert_eq!(payload.id, "task-1");
                assert_eq!(payload.patch.title.as_deref(), Some("New"));
                assert_eq!(payload.patch.position, Some(4));
                assert!(payload.patch.column_id.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_outbound_message_shape() {
        let message = OutboundMessage {
            event: ServerEvent::TaskDeleted(IdPayload {
                id: "task-1".to_string(),
            }),
            client_id: Some("conn-1".to_string()),
            timestamp: 1700000000000,
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "task:delete");
        assert_eq!(value["payload"]["id"], "task-1");
        assert_eq!(value["clientId"], "conn-1");
        assert_eq!(value["timestamp"], 1700000000000i64);
    }

    #[test]
    fn test_sync_event_serializes_snapshot() {
        let message = OutboundMessage::new(
            ServerEvent::Sync(BoardSnapshot {
                columns: Vec::new(),
                tasks: Vec::new(),
            }),
            None,
        );

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "sync:tasks");
        assert!(value["payload"]["columns"].is_array());
        assert!(value["payload"]["tasks"].is_array());
        // Server-originated messages carry no clientId.
        assert!(value.get("clientId").is_none());
    }

    #[test]
    fn test_attachment_wire_field_names() {
        let value = json!({
            "type": "task:create",
            "payload": {
                "title": "With file",
                "columnId": "todo",
                "attachments": [
                    { "id": "att-1", "name": "report.pdf", "type": "application/pdf", "size": 2048 }
                ]
            }
        });

        let command = ClientCommand::parse(value).unwrap().unwrap();
        let ClientCommand::TaskCreate(draft) = command else {
            panic!("expected task:create");
        };
        let attachment = &draft.attachments[0];
        assert_eq!(attachment.name, "report.pdf");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.size_bytes, 2048);
        assert_eq!(attachment.url, "");

        let value = serde_json::to_value(attachment).unwrap();
        assert_eq!(value["type"], "application/pdf");
        assert_eq!(value["size"], 2048);
    }
}
