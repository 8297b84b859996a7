use crate::{
    auth::AuthUser,
    errors::AppResult,
    models::{MessageResponse, Notification},
    state::AppState,
};
use axum::{Json, extract::State};

/// Unread notifications of the logged-in user, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Unread notifications", body = Vec<Notification>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(state.store.list_unread_notifications(auth.id).await?))
}

/// Mark all of the logged-in user's notifications as read
#[utoipa::path(
    post,
    path = "/api/notifications/read",
    responses(
        (status = 200, description = "Notifications marked as read", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_notifications_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MessageResponse>> {
    state.store.mark_notifications_read(auth.id).await?;
    Ok(Json(MessageResponse::new("Notifications marked as read")))
}
