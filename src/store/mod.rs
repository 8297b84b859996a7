// src/store/mod.rs

use crate::{
    errors::AppResult,
    models::{
        ContactDetails, EmploymentDetails, NewSupportRequest, NewTask, NewUser, Notification,
        PayPeriod, Payslip, PayslipAmounts, PayslipView, Profile, RequestStatus, Role, Salary,
        SupportRequestView, Task, TaskStatus, TaskView, UpdateTaskRequest, User, UserWithSalary,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::{Interleaving, MemoryStore};
pub use postgres::PgStore;

/// Persistence seam for every record the API reads or writes.
///
/// Each method is its own unit of work; nothing here spans multiple calls in
/// a transaction.
#[async_trait]
pub trait HrStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    // ─── Users ────────────────────────────────────────────────────────────────
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_users(&self) -> AppResult<Vec<UserWithSalary>>;
    /// Employees that registered but have not been approved yet.
    async fn list_pending_users(&self) -> AppResult<Vec<User>>;
    /// Approved employees, the population a payroll run covers.
    async fn list_payroll_employees(&self) -> AppResult<Vec<User>>;
    async fn approve_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn set_user_role(&self, id: Uuid, role: Role) -> AppResult<Option<User>>;
    async fn set_full_name(&self, id: Uuid, full_name: &str) -> AppResult<Option<User>>;
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool>;
    /// Removes the user together with their salary, profile, payslips, requests
    /// and notifications. Their tasks lose the assignee or creator link.
    async fn delete_user(&self, id: Uuid) -> AppResult<bool>;

    // ─── Salaries ─────────────────────────────────────────────────────────────
    async fn find_salary(&self, user_id: Uuid) -> AppResult<Option<Salary>>;
    async fn upsert_salary(&self, user_id: Uuid, base_salary: Decimal) -> AppResult<Salary>;

    // ─── Profiles ─────────────────────────────────────────────────────────────
    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>>;
    /// Returns the profile, creating a blank one first if none exists.
    async fn ensure_profile(&self, user_id: Uuid) -> AppResult<Profile>;
    async fn update_contact_details(
        &self,
        user_id: Uuid,
        details: ContactDetails,
    ) -> AppResult<Profile>;
    async fn update_employment_details(
        &self,
        user_id: Uuid,
        details: EmploymentDetails,
    ) -> AppResult<Profile>;

    // ─── Payslips ─────────────────────────────────────────────────────────────
    async fn find_payslip(&self, user_id: Uuid, period: PayPeriod) -> AppResult<Option<Payslip>>;
    /// Inserts a `Pending` payslip. Returns `None` when one already exists for
    /// the same (user, year, month).
    async fn insert_payslip(
        &self,
        user_id: Uuid,
        period: PayPeriod,
        amounts: PayslipAmounts,
    ) -> AppResult<Option<Payslip>>;
    /// Overwrites the figures of a payslip that is still `Pending`. Returns
    /// `None` when the payslip is gone or has been paid meanwhile.
    async fn resync_payslip(&self, id: Uuid, amounts: PayslipAmounts)
    -> AppResult<Option<Payslip>>;
    /// Every payslip of the period, oldest first.
    async fn list_payslips(&self, period: PayPeriod) -> AppResult<Vec<PayslipView>>;
    async fn mark_payslip_paid(
        &self,
        id: Uuid,
        paid_on: DateTime<Utc>,
    ) -> AppResult<Option<PayslipView>>;

    // ─── Tasks ────────────────────────────────────────────────────────────────
    async fn create_task(&self, task: NewTask) -> AppResult<TaskView>;
    async fn find_task(&self, id: Uuid) -> AppResult<Option<Task>>;
    /// Every task, newest first.
    async fn list_tasks(&self) -> AppResult<Vec<TaskView>>;
    /// Tasks assigned to `assignee_id`, newest first.
    async fn list_tasks_for(&self, assignee_id: Uuid) -> AppResult<Vec<TaskView>>;
    async fn update_task(&self, id: Uuid, changes: UpdateTaskRequest) -> AppResult<Option<TaskView>>;
    async fn set_task_status(&self, id: Uuid, status: TaskStatus) -> AppResult<Option<TaskView>>;
    async fn delete_task(&self, id: Uuid) -> AppResult<bool>;

    // ─── Support requests ─────────────────────────────────────────────────────
    async fn create_request(&self, request: NewSupportRequest) -> AppResult<SupportRequestView>;
    /// Every request, newest first.
    async fn list_requests(&self) -> AppResult<Vec<SupportRequestView>>;
    async fn set_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> AppResult<Option<SupportRequestView>>;

    // ─── Notifications ────────────────────────────────────────────────────────
    async fn notify(&self, user_id: Uuid, message: &str, link: Option<&str>)
    -> AppResult<Notification>;
    /// Unread notifications of `user_id`, newest first.
    async fn list_unread_notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;
    /// Returns how many notifications were flipped to read.
    async fn mark_notifications_read(&self, user_id: Uuid) -> AppResult<u64>;
}
