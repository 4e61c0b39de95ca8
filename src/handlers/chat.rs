use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::SessionState;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
    /// Absent or `{}` means a fresh conversation.
    #[serde(default)]
    pub session_state: SessionState,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_state: SessionState,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    tracing::info!(text = %req.text, "incoming chat message");

    let turn = state
        .engine
        .process_turn(&req.text, req.session_state)
        .map_err(|e| AppError::Engine(e.to_string()))?;

    Ok(Json(ChatResponse {
        response: turn.response,
        session_state: turn.session_state,
    }))
}
