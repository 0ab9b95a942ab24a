/*
 * Responsibility
 * - POST /callback
 * - Runs only after the signature middleware accepted the request,
 *   so the body here is exactly what the dispatcher signed
 */
use axum::{Json, body::Bytes, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::info;

use crate::api::v1::extractors::VerifiedCallbackExtractor;

pub async fn receive_callback(
    VerifiedCallbackExtractor(callback): VerifiedCallbackExtractor,
    body: Bytes,
) -> impl IntoResponse {
    info!(
        message_id = ?callback.message_id,
        destination = %callback.destination,
        issued_at = ?callback.issued_at,
        expires_at = callback.expires_at,
        body_len = body.len(),
        "callback accepted"
    );

    (
        StatusCode::OK,
        Json(json!({
            "status": "accepted",
            "message_id": callback.message_id,
            "destination": callback.destination,
        })),
    )
}
