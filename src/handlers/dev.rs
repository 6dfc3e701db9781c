use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::dialogue;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DevMessage {
    pub from: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct DevResponse {
    pub reply: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operator_notifications: Vec<String>,
}

fn drain_notifications(state: &AppState) -> Vec<String> {
    state
        .dev_notifications
        .lock()
        .map(|mut n| n.drain(..).collect())
        .unwrap_or_default()
}

/// Exercises the dialogue engine without a gateway in front: the reply
/// comes back in the response body instead of being sent out, along with
/// any operator notifications produced by the turn.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DevMessage>,
) -> Response {
    let from = payload.from.trim().to_string();

    match dialogue::process_message(&state, &from, &payload.message).await {
        Ok(reply) => Json(DevResponse {
            reply,
            success: true,
            error: None,
            operator_notifications: drain_notifications(&state),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "dev message processing failed");
            Json(DevResponse {
                reply: String::new(),
                success: false,
                error: Some(e.to_string()),
                operator_notifications: drain_notifications(&state),
            })
            .into_response()
        }
    }
}
