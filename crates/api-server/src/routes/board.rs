//! Board snapshot facade
//!
//! Request/response access to the same store the realtime hub mutates.
//! Writes go through the identical message-router path and are fanned out to
//! every connected client, so mutations made here are not silent.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use rb_core::board::{BoardSnapshot, Column, Task};

use crate::realtime::{ClientCommand, OutboundMessage, Routed, ServerEvent, MESSAGE_EVENT};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardActionResponse {
    pub success: bool,
    /// The event that was broadcast, absent when the command found no target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ServerEvent>,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /api/tasks - Current board snapshot
async fn get_board(State(state): State<AppState>) -> Json<BoardSnapshot> {
    Json(state.board().snapshot().await)
}

/// POST /api/tasks - Apply one command in the realtime wire form
async fn apply_command(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<BoardActionResponse>, (StatusCode, Json<ErrorResponse>)> {
    let command = match ClientCommand::parse(body) {
        Ok(Some(command)) => command,
        Ok(None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Unknown action".to_string(),
                }),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    };

    let result = match state.router().dispatch(command).await {
        Routed::Broadcast(event) => {
            // Facade mutations reach connected clients through the same
            // fan-out as socket commands, with no originating connection.
            let message = OutboundMessage::new(event.clone(), None);
            let _ = state.io().emit(MESSAGE_EVENT, &message);
            Some(event)
        }
        Routed::Direct(event) => Some(event),
        Routed::Silent => None,
    };

    let snapshot = state.board().snapshot().await;
    Ok(Json(BoardActionResponse {
        success: result.is_some(),
        result,
        columns: snapshot.columns,
        tasks: snapshot.tasks,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/tasks", get(get_board).post(apply_command))
}
