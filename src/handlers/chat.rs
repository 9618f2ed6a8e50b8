use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::BotResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub room_id: String,
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageOutcome {
    pub addressed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BotResponse>,
}

// POST /api/chat/message
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(msg): Json<IncomingMessage>,
) -> Result<Json<MessageOutcome>, AppError> {
    if msg.room_id.trim().is_empty() || msg.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("room_id and user_id are required".to_string()));
    }

    let response = state
        .engine
        .process_message(&msg.text, &msg.room_id, &msg.user_id)
        .await;

    if let Some(response) = &response {
        // Paced delivery; the HTTP reply does not wait for it.
        let engine = state.engine.clone();
        let delay = Duration::from_millis(state.config.pacing_delay_ms);
        let room_id = msg.room_id.clone();
        let response = response.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Failures are logged by the engine.
            let _ = engine.send_bot_response(&room_id, &response).await;
        });
    }

    Ok(Json(MessageOutcome {
        addressed: response.is_some(),
        response,
    }))
}
