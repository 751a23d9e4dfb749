//! Example protected resource.

use axum::{Extension, Json};

use crate::middleware::auth::AuthenticatedUser;
use crate::models::MessageResponse;

/// `GET /protected` — greets the subject of the presented token.
pub async fn protected_handler(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello {}, you are authorized", user.subject),
    })
}
