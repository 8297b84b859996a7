use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// Root handler: HTML landing page with the route map
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>HR Payroll API</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; min-height: 100vh; padding: 40px 20px; }
    .container { max-width: 860px; margin: 0 auto; }
    header { text-align: center; margin-bottom: 40px; }
    header h1 { font-size: 2.4rem; font-weight: 800; color: #38bdf8; margin-bottom: 8px; }
    header p { color: #94a3b8; }
    .routes { background: #1e293b; border: 1px solid #334155; border-radius: 12px; padding: 24px; }
    .route-group { margin-bottom: 20px; }
    .route-group h4 { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.1em; color: #64748b; margin-bottom: 8px; }
    .route-item { display: flex; gap: 12px; padding: 6px 0; border-bottom: 1px solid #0f172a; }
    .method { font-size: 0.7rem; font-weight: 700; min-width: 56px; font-family: monospace; color: #34d399; }
    .route-path { font-family: monospace; font-size: 0.85rem; flex: 1; }
    .route-desc { font-size: 0.8rem; color: #64748b; }
    a { color: #38bdf8; }
  </style>
</head>
<body>
<div class="container">
  <header>
    <h1>HR Payroll API</h1>
    <p>Users, approvals, profiles, salaries and monthly payslips. <a href="/docs">Swagger UI</a> · <a href="/health">Health</a></p>
  </header>

  <div class="routes">
    <div class="route-group">
      <h4>Users</h4>
      <div class="route-item"><span class="method">POST</span><span class="route-path">/api/users/register</span><span class="route-desc">Register (employees await approval)</span></div>
      <div class="route-item"><span class="method">POST</span><span class="route-path">/api/users/login</span><span class="route-desc">Login and get a JWT</span></div>
      <div class="route-item"><span class="method">GET</span><span class="route-path">/api/users</span><span class="route-desc">All users with salaries (admin)</span></div>
      <div class="route-item"><span class="method">GET</span><span class="route-path">/api/users/pending</span><span class="route-desc">Pending registrations (admin)</span></div>
      <div class="route-item"><span class="method">PUT</span><span class="route-path">/api/users/:id/approve</span><span class="route-desc">Approve a registration (admin)</span></div>
    </div>

    <div class="route-group">
      <h4>Salary &amp; Profile</h4>
      <div class="route-item"><span class="method">POST</span><span class="route-path">/api/salary/:userId</span><span class="route-desc">Set base salary (admin)</span></div>
      <div class="route-item"><span class="method">GET</span><span class="route-path">/api/profile/me</span><span class="route-desc">Own profile</span></div>
      <div class="route-item"><span class="method">PUT</span><span class="route-path">/api/profile/:userId</span><span class="route-desc">Job title &amp; joining date (admin)</span></div>
    </div>

    <div class="route-group">
      <h4>Payroll</h4>
      <div class="route-item"><span class="method">GET</span><span class="route-path">/api/payroll/:year/:month</span><span class="route-desc">Generate and list payslips (admin)</span></div>
      <div class="route-item"><span class="method">PUT</span><span class="route-path">/api/payroll/payslips/:id/pay</span><span class="route-desc">Mark a payslip as paid (admin)</span></div>
    </div>

    <div class="route-group">
      <h4>Tasks, Requests &amp; Notifications</h4>
      <div class="route-item"><span class="method">POST</span><span class="route-path">/api/tasks</span><span class="route-desc">Create and assign a task (admin)</span></div>
      <div class="route-item"><span class="method">GET</span><span class="route-path">/api/tasks/mytasks</span><span class="route-desc">Own tasks</span></div>
      <div class="route-item"><span class="method">PUT</span><span class="route-path">/api/tasks/:id/status</span><span class="route-desc">Update task status (assignee or admin)</span></div>
      <div class="route-item"><span class="method">POST</span><span class="route-path">/api/requests</span><span class="route-desc">Raise a support request</span></div>
      <div class="route-item"><span class="method">PUT</span><span class="route-path">/api/requests/:id/status</span><span class="route-desc">Approve or reject (admin)</span></div>
      <div class="route-item"><span class="method">GET</span><span class="route-path">/api/notifications</span><span class="route-desc">Unread notifications</span></div>
    </div>
  </div>
</div>
</body>
</html>"#)
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "service": "hr-payroll",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": e.to_string()
            })),
        ),
    }
}
