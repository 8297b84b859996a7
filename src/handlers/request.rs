use crate::{
    auth::{AdminUser, AuthUser},
    errors::{AppError, AppResult},
    models::{CreateSupportRequest, NewSupportRequest, RequestStatusUpdate, SupportRequestView},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

/// Raise a support, clarification or access request
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = CreateSupportRequest,
    responses(
        (status = 201, description = "Request created", body = SupportRequestView),
        (status = 400, description = "Missing details"),
        (status = 404, description = "Linked task not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn create_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateSupportRequest>,
) -> AppResult<(StatusCode, Json<SupportRequestView>)> {
    if body.details.trim().is_empty() {
        return Err(AppError::Validation("details is required".to_string()));
    }
    if let Some(task) = body.task {
        state
            .store
            .find_task(task)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;
    }

    let view = state
        .store
        .create_request(NewSupportRequest {
            requester_id: auth.id,
            task_id: body.task,
            request_type: body.request_type,
            details: body.details,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// List every request, newest first (admin)
#[utoipa::path(
    get,
    path = "/api/requests",
    responses(
        (status = 200, description = "All requests", body = Vec<SupportRequestView>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn list_requests(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SupportRequestView>>> {
    Ok(Json(state.store.list_requests().await?))
}

/// Approve or reject a request (admin)
#[utoipa::path(
    put,
    path = "/api/requests/{id}/status",
    request_body = RequestStatusUpdate,
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request resolved", body = SupportRequestView),
        (status = 400, description = "Status is not Approved or Rejected"),
        (status = 404, description = "Request not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn update_request_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RequestStatusUpdate>,
) -> AppResult<Json<SupportRequestView>> {
    if !body.status.is_resolution() {
        return Err(AppError::BadRequest("Invalid status update".to_string()));
    }

    let view = state
        .store
        .set_request_status(id, body.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

    info!(request = %view.request.id, status = ?view.request.status, "Request resolved");
    Ok(Json(view))
}
