use crate::{
    auth::{AdminUser, AuthUser},
    errors::{AppError, AppResult},
    models::{
        CreateTaskRequest, MessageResponse, NewTask, Role, TaskStatusRequest, TaskView,
        UpdateTaskRequest,
    },
    state::AppState,
    store::HrStore,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

const DASHBOARD_LINK: &str = "/dashboard";

async fn require_assignee(store: &dyn HrStore, assignee: Uuid) -> AppResult<()> {
    store
        .find_user(assignee)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Assignee {} not found", assignee)))
}

/// Create a task, optionally assigned (admin). The assignee gets an in-app notification.
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskView),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Assignee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn create_task(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<TaskView>)> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if let Some(assignee) = body.assignee {
        require_assignee(state.store.as_ref(), assignee).await?;
    }

    let view = state
        .store
        .create_task(NewTask {
            title: body.title.trim().to_string(),
            description: body.description,
            priority: body.priority.unwrap_or_default(),
            assignee_id: body.assignee,
            created_by: admin.id,
            due_date: body.due_date,
        })
        .await?;

    if let Some(assignee) = view.task.assignee_id {
        let message = format!("You have been assigned a new task: \"{}\"", view.task.title);
        state
            .store
            .notify(assignee, &message, Some(DASHBOARD_LINK))
            .await?;
    }

    info!(task = %view.task.id, assignee = ?view.task.assignee_id, "Task created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// List every task, newest first (admin)
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "All tasks", body = Vec<TaskView>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn list_tasks(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TaskView>>> {
    Ok(Json(state.store.list_tasks().await?))
}

/// List the tasks assigned to the logged-in user
#[utoipa::path(
    get,
    path = "/api/tasks/mytasks",
    responses(
        (status = 200, description = "Assigned tasks", body = Vec<TaskView>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn list_my_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TaskView>>> {
    Ok(Json(state.store.list_tasks_for(auth.id).await?))
}

/// Move a task along its board. Only the assignee or an admin may do this.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}/status",
    request_body = TaskStatusRequest,
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Status updated", body = TaskView),
        (status = 403, description = "Neither assignee nor admin"),
        (status = 404, description = "Task not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn update_task_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TaskStatusRequest>,
) -> AppResult<Json<TaskView>> {
    let task = state
        .store
        .find_task(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    if task.assignee_id != Some(auth.id) && auth.role != Role::Admin {
        return Err(AppError::Forbidden("User not authorized".to_string()));
    }

    let view = state
        .store
        .set_task_status(id, body.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    Ok(Json(view))
}

/// Edit a task (admin). `null` clears description, assignee or due date.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    request_body = UpdateTaskRequest,
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task updated", body = TaskView),
        (status = 404, description = "Task or assignee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn update_task(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut body): Json<UpdateTaskRequest>,
) -> AppResult<Json<TaskView>> {
    if let Some(title) = body.title.as_mut() {
        if title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        *title = title.trim().to_string();
    }
    if let Some(Some(assignee)) = body.assignee {
        require_assignee(state.store.as_ref(), assignee).await?;
    }

    let view = state
        .store
        .update_task(id, body)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    if let Some(assignee) = view.task.assignee_id {
        let message = format!(
            "A task assigned to you has been updated: \"{}\"",
            view.task.title
        );
        state
            .store
            .notify(assignee, &message, Some(DASHBOARD_LINK))
            .await?;
    }

    Ok(Json(view))
}

/// Delete a task (admin)
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task removed", body = MessageResponse),
        (status = 404, description = "Task not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn delete_task(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if !state.store.delete_task(id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }
    Ok(Json(MessageResponse::new("Task removed")))
}
