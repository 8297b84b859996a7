use crate::{
    auth::AdminUser,
    errors::{AppError, AppResult},
    models::{MAX_MONEY, Role, Salary, SetSalaryRequest},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Set or update an employee's monthly base salary (admin)
#[utoipa::path(
    post,
    path = "/api/salary/{user_id}",
    request_body = SetSalaryRequest,
    params(("user_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Salary saved", body = Salary),
        (status = 400, description = "Negative or out-of-range salary"),
        (status = 404, description = "Employee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn set_salary(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<SetSalaryRequest>,
) -> AppResult<Json<Salary>> {
    if body.base_salary < dec!(0) {
        return Err(AppError::Validation("Base salary cannot be negative".to_string()));
    }
    let base_salary = body.base_salary.round_dp(2);
    if base_salary > MAX_MONEY {
        return Err(AppError::Validation(format!(
            "Base salary cannot exceed {MAX_MONEY}"
        )));
    }

    let employee = state.store.find_user(user_id).await?;
    if !matches!(employee, Some(ref u) if u.role == Role::Employee) {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    let salary = state
        .store
        .upsert_salary(user_id, base_salary)
        .await?;

    Ok(Json(salary))
}
