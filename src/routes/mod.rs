// src/routes/mod.rs

use crate::{
    handlers::{
        general::{health_handler, root_handler},
        notification::{list_notifications, mark_notifications_read},
        payroll::{generate_payroll_for_period, mark_payslip_paid},
        profile::{get_my_profile, get_user_profile, update_employment, update_my_profile},
        request::{create_request, list_requests, update_request_status},
        salary::set_salary,
        task::{
            create_task, delete_task, list_my_tasks, list_tasks, update_task, update_task_status,
        },
        user::{
            approve_user, delete_user, get_me, list_pending_users, list_users, login_user,
            register_user, set_user_role, update_me, update_password,
        },
    },
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Users ────────────────────────────────────────────
        .route("/users", get(list_users))
        .route("/users/register", post(register_user))
        .route("/users/login", post(login_user))
        .route("/users/pending", get(list_pending_users))
        .route("/users/me", get(get_me).put(update_me))
        .route("/users/update-password", put(update_password))
        .route("/users/{id}", delete(delete_user))
        .route("/users/{id}/approve", put(approve_user))
        .route("/users/{id}/role", put(set_user_role))
        // ─── Salary ───────────────────────────────────────────
        .route("/salary/{user_id}", post(set_salary))
        // ─── Profile ──────────────────────────────────────────
        .route("/profile", post(update_my_profile))
        .route("/profile/me", get(get_my_profile))
        .route("/profile/{user_id}", put(update_employment))
        .route("/profile/user/{user_id}", get(get_user_profile))
        // ─── Payroll ──────────────────────────────────────────
        .route("/payroll/{year}/{month}", get(generate_payroll_for_period))
        .route("/payroll/payslips/{payslip_id}/pay", put(mark_payslip_paid))
        // ─── Tasks ────────────────────────────────────────────
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/mytasks", get(list_my_tasks))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
        .route("/tasks/{id}/status", put(update_task_status))
        // ─── Requests ─────────────────────────────────────────
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/{id}/status", put(update_request_status))
        // ─── Notifications ────────────────────────────────────
        .route("/notifications", get(list_notifications))
        .route("/notifications/read", post(mark_notifications_read))
}

/// The complete application: landing page, health, API, docs and HTTP layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
