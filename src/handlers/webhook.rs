use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;

use crate::services::dialogue;
use crate::state::AppState;

const FALLBACK_REPLY: &str =
    "⚠️ Estamos com uma instabilidade no momento. Por favor, tente novamente em instantes.";

#[derive(Deserialize)]
pub struct GatewayEvent {
    pub event: String,
    pub payload: GatewayMessage,
}

#[derive(Deserialize)]
pub struct GatewayMessage {
    pub from: String,
    pub body: String,
}

/// HMAC-SHA1 over the raw request body, base64-encoded, as the gateway
/// sends it in X-Gateway-Signature.
fn validate_gateway_signature(secret: &str, signature: &str, body: &[u8]) -> bool {
    let mut mac = match Hmac::<Sha1>::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(body);
    let result = mac.finalize().into_bytes();
    let expected = base64::engine::general_purpose::STANDARD.encode(result);

    expected == signature
}

pub async fn gateway_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // 1. Validate gateway signature (skipped while no secret is configured)
    if !state.config.webhook_secret.is_empty() {
        let signature = headers
            .get("x-gateway-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if signature.is_empty() {
            tracing::warn!("missing X-Gateway-Signature header");
            return (StatusCode::FORBIDDEN, "Missing signature").into_response();
        }

        if !validate_gateway_signature(&state.config.webhook_secret, signature, &body) {
            tracing::warn!("invalid gateway signature");
            return (StatusCode::FORBIDDEN, "Invalid signature").into_response();
        }
    }

    // 2. Decode the event envelope
    let event: GatewayEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "malformed gateway event");
            return (StatusCode::BAD_REQUEST, "Malformed event").into_response();
        }
    };

    // 3. Delivery receipts and other gateway noise are acked unprocessed
    if event.event != "message" {
        tracing::debug!(event = %event.event, "ignoring non-message event");
        return ack();
    }

    let from = event.payload.from.trim().to_string();
    let body = event.payload.body.trim().to_string();

    tracing::info!(from = %from, body = %body, "incoming message");

    // 4. Run the dialogue engine and deliver its reply
    match dialogue::process_message(&state, &from, &body).await {
        Ok(reply) => {
            if let Err(e) = state.messaging.send_message(&from, &reply).await {
                tracing::error!(error = %e, "failed to send reply");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, from = %from, "dialogue processing failed");
            let _ = state.messaging.send_message(&from, FALLBACK_REPLY).await;
        }
    }

    // 5. Reclaim sessions that went quiet
    let expired = state.sessions.sweep();
    if expired > 0 {
        tracing::debug!(expired, "swept idle sessions");
    }

    ack()
}

fn ack() -> Response {
    Json(serde_json::json!({ "ok": true })).into_response()
}
