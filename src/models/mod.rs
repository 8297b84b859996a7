// src/models/mod.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

mod period;

pub use period::PayPeriod;

// ─── Users ────────────────────────────────────────────────────────────────────

// sqlx 0.8: custom Postgres enums need #[sqlx(type_name = "...")] on the enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Approved employees are the only users the payroll generator pays.
    pub fn is_payroll_eligible(&self) -> bool {
        self.role == Role::Employee && self.is_approved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        UserPublic {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            is_approved: user.is_approved,
            created_at: user.created_at,
        }
    }
}

/// Admin listing row: the user plus their current base salary, if one is set.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithSalary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: UserPublic,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub base_salary: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `employee`
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPublic,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub full_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRoleRequest {
    pub role: Role,
}

// ─── Salary ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub user_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
    pub effective_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetSalaryRequest {
    pub base_salary: Decimal,
}

/// Largest amount a `NUMERIC(14,2)` money column holds.
pub const MAX_MONEY: Decimal = dec!(999999999999.99);

// ─── Profile ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(default)]
pub struct Graduation {
    pub degree: String,
    pub university: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: Uuid,
    pub phone_number: Option<String>,
    #[sqlx(flatten)]
    pub address: Address,
    #[sqlx(flatten)]
    pub highest_graduation: Graduation,
    pub job_title: String,
    /// Calendar date the employee started; drives payroll pro-ration
    #[schema(value_type = Option<String>, format = "date", example = "2025-02-15")]
    pub date_of_joining: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Self-service profile fields. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub phone_number: Option<String>,
    pub address: Option<Address>,
    pub highest_graduation: Option<Graduation>,
}

/// Admin-managed profile fields. Absent fields are left untouched; an explicit
/// `"dateOfJoining": null` clears the date.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentDetails {
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = "date", example = "2025-02-15")]
    pub date_of_joining: Option<Option<NaiveDate>>,
}

/// Keeps an explicit `null` apart from a missing field: `Some(None)` vs `None`.
/// Pair with `#[serde(default)]`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ─── Payslip ──────────────────────────────────────────────────────────────────

// Variant names are the stored labels: 'Pending' | 'Paid'
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "payslip_status")]
pub enum PayslipStatus {
    Pending,
    Paid,
}

impl PayslipStatus {
    /// `Pending` is the only state the generator may write to; `Paid` is
    /// terminal and only reachable through the mark-paid action.
    pub fn accepts_regeneration(self) -> bool {
        matches!(self, PayslipStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: i32,
    pub month: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_pay: Decimal,
    pub status: PayslipStatus,
    pub paid_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The figures the generator writes into a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayslipAmounts {
    pub base_salary: Decimal,
    pub net_pay: Decimal,
}

impl Payslip {
    pub fn amounts(&self) -> PayslipAmounts {
        PayslipAmounts {
            base_salary: self.base_salary,
            net_pay: self.net_pay,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipEmployee {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub full_name: String,
}

/// A payslip joined with the employee's display name, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipView {
    pub id: Uuid,
    #[sqlx(flatten)]
    pub user: PayslipEmployee,
    pub year: i32,
    pub month: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_pay: Decimal,
    pub status: PayslipStatus,
    pub paid_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── Tasks ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    #[sqlx(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A task with the display names of its assignee and creator.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub assignee_name: Option<String>,
    pub created_by_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub assignee_id: Option<Uuid>,
    pub created_by: Uuid,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `Medium`
    pub priority: Option<TaskPriority>,
    pub assignee: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Admin edit. Absent fields are left untouched; `null` clears the nullable ones.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub assignee: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TaskStatusRequest {
    pub status: TaskStatus,
}

// ─── Support requests ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "request_type")]
pub enum RequestType {
    Support,
    Clarification,
    Access,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "request_status")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Admins can only resolve a request; nothing moves it back to `Pending`.
    pub fn is_resolution(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub task_id: Option<Uuid>,
    pub request_type: RequestType,
    pub details: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequestView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: SupportRequest,
    pub requester_name: String,
}

#[derive(Debug, Clone)]
pub struct NewSupportRequest {
    pub requester_id: Uuid,
    pub task_id: Option<Uuid>,
    pub request_type: RequestType,
    pub details: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupportRequest {
    pub request_type: RequestType,
    pub details: String,
    /// Optional task the request is about
    pub task: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestStatusUpdate {
    pub status: RequestStatus,
}

// ─── Notifications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ─── JWT Claims ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn employment_details_tell_an_explicit_null_from_a_missing_field() {
        let missing: EmploymentDetails = serde_json::from_value(json!({ "jobTitle": "Analyst" })).unwrap();
        assert_eq!(missing.date_of_joining, None);

        let cleared: EmploymentDetails =
            serde_json::from_value(json!({ "dateOfJoining": null })).unwrap();
        assert_eq!(cleared.date_of_joining, Some(None));

        let set: EmploymentDetails =
            serde_json::from_value(json!({ "dateOfJoining": "2025-02-15" })).unwrap();
        assert_eq!(set.date_of_joining, Some(NaiveDate::from_ymd_opt(2025, 2, 15)));
    }

    #[test]
    fn money_goes_out_as_json_numbers() {
        let salary = Salary {
            user_id: Uuid::nil(),
            base_salary: dec!(14000.50),
            effective_date: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&salary).unwrap();
        assert_eq!(value["baseSalary"], json!(14000.5));

        let request: SetSalaryRequest = serde_json::from_value(json!({ "baseSalary": 4200 })).unwrap();
        assert_eq!(request.base_salary, dec!(4200));
    }

    #[test]
    fn task_labels_match_the_stored_enum_values() {
        assert_eq!(serde_json::to_value(TaskStatus::ToDo).unwrap(), json!("To Do"));
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), json!("In Progress"));
        let status: TaskStatusRequest = serde_json::from_value(json!({ "status": "Completed" })).unwrap();
        assert_eq!(status.status, TaskStatus::Completed);
    }

    #[test]
    fn only_approved_or_rejected_resolve_a_request() {
        assert!(RequestStatus::Approved.is_resolution());
        assert!(RequestStatus::Rejected.is_resolution());
        assert!(!RequestStatus::Pending.is_resolution());
    }

    #[test]
    fn money_ceiling_matches_the_column_precision() {
        assert_eq!(MAX_MONEY.to_string(), "999999999999.99");
    }
}
