pub mod health;
pub mod chats;

use axum::http::HeaderMap;
use tidechat_store::User;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Resolve the request to an owning user: 401 when the session capability
/// yields no subject, 404 when the subject has no account.
pub(crate) async fn require_user(state: &AppState, headers: &HeaderMap) -> ApiResult<User> {
    let subject = state
        .sessions
        .authenticate(headers)
        .await
        .ok_or(ApiError::Unauthenticated)?;

    state
        .store
        .users()
        .find_by_email(&subject)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))
}
