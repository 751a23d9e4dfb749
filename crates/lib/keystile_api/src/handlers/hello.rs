//! Root endpoint — liveness check.

use axum::Json;

use crate::models::MessageResponse;

/// `GET /` — always answers while the server is up.
pub async fn hello_world() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello, World!".to_string(),
    })
}
