// src/handlers/payroll.rs

use crate::{
    auth::AdminUser,
    errors::AppResult,
    models::{PayPeriod, PayslipView},
    services::payroll::{generate_payroll, mark_paid},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// Generate (or refresh) payslips for a month and return all of them.
/// Safe to call repeatedly: unchanged and paid payslips are left as they are.
#[utoipa::path(
    get,
    path = "/api/payroll/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Calendar year, e.g. 2025"),
        ("month" = i32, Path, description = "Month number, 1-12"),
    ),
    responses(
        (status = 200, description = "Payslips for the period", body = Vec<PayslipView>),
        (status = 400, description = "Invalid year or month"),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll_for_period(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((year, month)): Path<(String, String)>,
) -> AppResult<Json<Vec<PayslipView>>> {
    let period = PayPeriod::parse(&year, &month)?;
    let (payslips, _report) = generate_payroll(state.store.as_ref(), period).await?;
    Ok(Json(payslips))
}

/// Mark a payslip as paid
#[utoipa::path(
    put,
    path = "/api/payroll/payslips/{payslip_id}/pay",
    params(("payslip_id" = Uuid, Path, description = "Payslip ID")),
    responses(
        (status = 200, description = "Payslip marked as paid", body = PayslipView),
        (status = 404, description = "Payslip not found"),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn mark_payslip_paid(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(payslip_id): Path<Uuid>,
) -> AppResult<Json<PayslipView>> {
    Ok(Json(mark_paid(state.store.as_ref(), payslip_id).await?))
}
