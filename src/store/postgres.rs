// src/store/postgres.rs

use super::HrStore;
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
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, full_name, email, password_hash, role, is_approved, created_at";

const PROFILE_COLUMNS: &str = "user_id, phone_number, street, city, state, zip_code, \
     degree, university, job_title, date_of_joining, created_at, updated_at";

const PAYSLIP_COLUMNS: &str =
    "id, user_id, year, month, base_salary, net_pay, status, paid_on, created_at, updated_at";

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, assignee_id, created_by, due_date, created_at";

// expects the task row aliased as `t`
const TASK_VIEW: &str = "SELECT t.id, t.title, t.description, t.status, t.priority, t.assignee_id, \
     t.created_by, t.due_date, t.created_at, \
     a.full_name AS assignee_name, c.full_name AS created_by_name \
     FROM t \
     LEFT JOIN users a ON a.id = t.assignee_id \
     LEFT JOIN users c ON c.id = t.created_by";

// expects the request row aliased as `r`
const REQUEST_VIEW: &str = "SELECT r.id, r.requester_id, r.task_id, r.request_type, r.details, \
     r.status, r.created_at, u.full_name AS requester_name \
     FROM r \
     JOIN users u ON u.id = r.requester_id";

const NOTIFICATION_COLUMNS: &str = "id, user_id, message, is_read, link, created_at";

/// `HrStore` backed by the Postgres schema in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HrStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ─── Users ────────────────────────────────────────────────────────────────

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (id, full_name, email, password_hash, role, is_approved, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, NOW())
             RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.is_approved)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<UserWithSalary>> {
        let users = sqlx::query_as::<_, UserWithSalary>(
            r#"SELECT u.id, u.full_name, u.email, u.role, u.is_approved, u.created_at,
                      s.base_salary
               FROM users u
               LEFT JOIN salaries s ON s.user_id = u.id
               ORDER BY u.created_at"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn list_pending_users(&self) -> AppResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role = 'employee' AND is_approved = false
             ORDER BY created_at"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn list_payroll_employees(&self) -> AppResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role = 'employee' AND is_approved = true
             ORDER BY created_at"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn approve_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let sql = format!("UPDATE users SET is_approved = true WHERE id = $1 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> AppResult<Option<User>> {
        let sql = format!("UPDATE users SET role = $1 WHERE id = $2 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn set_full_name(&self, id: Uuid, full_name: &str) -> AppResult<Option<User>> {
        let sql = format!("UPDATE users SET full_name = $1 WHERE id = $2 RETURNING {USER_COLUMNS}");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(full_name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        // salaries, profiles and payslips go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Salaries ─────────────────────────────────────────────────────────────

    async fn find_salary(&self, user_id: Uuid) -> AppResult<Option<Salary>> {
        let salary = sqlx::query_as::<_, Salary>(
            "SELECT user_id, base_salary, effective_date, updated_at FROM salaries WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(salary)
    }

    async fn upsert_salary(&self, user_id: Uuid, base_salary: Decimal) -> AppResult<Salary> {
        let salary = sqlx::query_as::<_, Salary>(
            r#"INSERT INTO salaries (user_id, base_salary, effective_date, updated_at)
               VALUES ($1, $2, NOW(), NOW())
               ON CONFLICT (user_id) DO UPDATE
               SET base_salary = EXCLUDED.base_salary,
                   updated_at = NOW()
               RETURNING user_id, base_salary, effective_date, updated_at"#,
        )
        .bind(user_id)
        .bind(base_salary)
        .fetch_one(&self.pool)
        .await?;
        Ok(salary)
    }

    // ─── Profiles ─────────────────────────────────────────────────────────────

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn ensure_profile(&self, user_id: Uuid) -> AppResult<Profile> {
        sqlx::query(
            "INSERT INTO profiles (user_id, created_at, updated_at) VALUES ($1, NOW(), NOW())
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn update_contact_details(
        &self,
        user_id: Uuid,
        details: ContactDetails,
    ) -> AppResult<Profile> {
        let address = details.address;
        let graduation = details.highest_graduation;
        let sql = format!(
            "INSERT INTO profiles (user_id, phone_number, street, city, state, zip_code,
                                   degree, university, created_at, updated_at)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), COALESCE($5, ''),
                     COALESCE($6, ''), COALESCE($7, ''), COALESCE($8, ''), NOW(), NOW())
             ON CONFLICT (user_id) DO UPDATE
             SET phone_number = COALESCE($2, profiles.phone_number),
                 street       = COALESCE($3, profiles.street),
                 city         = COALESCE($4, profiles.city),
                 state        = COALESCE($5, profiles.state),
                 zip_code     = COALESCE($6, profiles.zip_code),
                 degree       = COALESCE($7, profiles.degree),
                 university   = COALESCE($8, profiles.university),
                 updated_at   = NOW()
             RETURNING {PROFILE_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .bind(details.phone_number)
            .bind(address.as_ref().map(|a| a.street.clone()))
            .bind(address.as_ref().map(|a| a.city.clone()))
            .bind(address.as_ref().map(|a| a.state.clone()))
            .bind(address.as_ref().map(|a| a.zip_code.clone()))
            .bind(graduation.as_ref().map(|g| g.degree.clone()))
            .bind(graduation.as_ref().map(|g| g.university.clone()))
            .fetch_one(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn update_employment_details(
        &self,
        user_id: Uuid,
        details: EmploymentDetails,
    ) -> AppResult<Profile> {
        let sql = format!(
            "INSERT INTO profiles (user_id, job_title, date_of_joining, created_at, updated_at)
             VALUES ($1, COALESCE($2, ''), $3, NOW(), NOW())
             ON CONFLICT (user_id) DO UPDATE
             SET job_title       = COALESCE($2, profiles.job_title),
                 date_of_joining = CASE WHEN $4 THEN $3 ELSE profiles.date_of_joining END,
                 updated_at      = NOW()
             RETURNING {PROFILE_COLUMNS}"
        );
        // $4 tells an explicit null (clear) apart from an absent field (keep)
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(user_id)
            .bind(details.job_title)
            .bind(details.date_of_joining.flatten())
            .bind(details.date_of_joining.is_some())
            .fetch_one(&self.pool)
            .await?;
        Ok(profile)
    }

    // ─── Payslips ─────────────────────────────────────────────────────────────

    async fn find_payslip(&self, user_id: Uuid, period: PayPeriod) -> AppResult<Option<Payslip>> {
        let sql = format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE user_id = $1 AND year = $2 AND month = $3"
        );
        let payslip = sqlx::query_as::<_, Payslip>(&sql)
            .bind(user_id)
            .bind(period.year())
            .bind(period.month())
            .fetch_optional(&self.pool)
            .await?;
        Ok(payslip)
    }

    async fn insert_payslip(
        &self,
        user_id: Uuid,
        period: PayPeriod,
        amounts: PayslipAmounts,
    ) -> AppResult<Option<Payslip>> {
        let sql = format!(
            "INSERT INTO payslips (id, user_id, year, month, base_salary, net_pay, status,
                                   created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, 'Pending', NOW(), NOW())
             ON CONFLICT ON CONSTRAINT payslips_user_period_key DO NOTHING
             RETURNING {PAYSLIP_COLUMNS}"
        );
        let payslip = sqlx::query_as::<_, Payslip>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(period.year())
            .bind(period.month())
            .bind(amounts.base_salary)
            .bind(amounts.net_pay)
            .fetch_optional(&self.pool)
            .await?;
        Ok(payslip)
    }

    async fn resync_payslip(
        &self,
        id: Uuid,
        amounts: PayslipAmounts,
    ) -> AppResult<Option<Payslip>> {
        let sql = format!(
            "UPDATE payslips SET base_salary = $1, net_pay = $2, updated_at = NOW()
             WHERE id = $3 AND status = 'Pending'
             RETURNING {PAYSLIP_COLUMNS}"
        );
        let payslip = sqlx::query_as::<_, Payslip>(&sql)
            .bind(amounts.base_salary)
            .bind(amounts.net_pay)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(payslip)
    }

    async fn list_payslips(&self, period: PayPeriod) -> AppResult<Vec<PayslipView>> {
        let payslips = sqlx::query_as::<_, PayslipView>(
            r#"SELECT p.id, p.user_id, u.full_name, p.year, p.month, p.base_salary, p.net_pay,
                      p.status, p.paid_on, p.created_at, p.updated_at
               FROM payslips p
               JOIN users u ON u.id = p.user_id
               WHERE p.year = $1 AND p.month = $2
               ORDER BY p.created_at, p.id"#,
        )
        .bind(period.year())
        .bind(period.month())
        .fetch_all(&self.pool)
        .await?;
        Ok(payslips)
    }

    async fn mark_payslip_paid(
        &self,
        id: Uuid,
        paid_on: DateTime<Utc>,
    ) -> AppResult<Option<PayslipView>> {
        let payslip = sqlx::query_as::<_, PayslipView>(
            r#"WITH paid AS (
                   UPDATE payslips SET status = 'Paid', paid_on = $2, updated_at = NOW()
                   WHERE id = $1
                   RETURNING *
               )
               SELECT p.id, p.user_id, u.full_name, p.year, p.month, p.base_salary, p.net_pay,
                      p.status, p.paid_on, p.created_at, p.updated_at
               FROM paid p
               JOIN users u ON u.id = p.user_id"#,
        )
        .bind(id)
        .bind(paid_on)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payslip)
    }

    // ─── Tasks ────────────────────────────────────────────────────────────────

    async fn create_task(&self, task: NewTask) -> AppResult<TaskView> {
        let sql = format!(
            "WITH t AS (
                 INSERT INTO tasks (id, title, description, priority, assignee_id, created_by,
                                    due_date, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
                 RETURNING {TASK_COLUMNS}
             )
             {TASK_VIEW}"
        );
        let view = sqlx::query_as::<_, TaskView>(&sql)
            .bind(Uuid::new_v4())
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.priority)
            .bind(task.assignee_id)
            .bind(task.created_by)
            .bind(task.due_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(view)
    }

    async fn find_task(&self, id: Uuid) -> AppResult<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks(&self) -> AppResult<Vec<TaskView>> {
        let sql = format!(
            "WITH t AS (SELECT {TASK_COLUMNS} FROM tasks)
             {TASK_VIEW}
             ORDER BY t.created_at DESC, t.id"
        );
        let tasks = sqlx::query_as::<_, TaskView>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn list_tasks_for(&self, assignee_id: Uuid) -> AppResult<Vec<TaskView>> {
        let sql = format!(
            "WITH t AS (SELECT {TASK_COLUMNS} FROM tasks WHERE assignee_id = $1)
             {TASK_VIEW}
             ORDER BY t.created_at DESC, t.id"
        );
        let tasks = sqlx::query_as::<_, TaskView>(&sql)
            .bind(assignee_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, changes: UpdateTaskRequest) -> AppResult<Option<TaskView>> {
        // even-numbered flags tell an explicit null apart from an absent field
        let sql = format!(
            "WITH t AS (
                 UPDATE tasks
                 SET title       = COALESCE($2, title),
                     description = CASE WHEN $4 THEN $3 ELSE description END,
                     status      = COALESCE($5, status),
                     priority    = COALESCE($6, priority),
                     assignee_id = CASE WHEN $8 THEN $7 ELSE assignee_id END,
                     due_date    = CASE WHEN $10 THEN $9 ELSE due_date END
                 WHERE id = $1
                 RETURNING {TASK_COLUMNS}
             )
             {TASK_VIEW}"
        );
        let view = sqlx::query_as::<_, TaskView>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description.clone().flatten())
            .bind(changes.description.is_some())
            .bind(changes.status)
            .bind(changes.priority)
            .bind(changes.assignee.flatten())
            .bind(changes.assignee.is_some())
            .bind(changes.due_date.flatten())
            .bind(changes.due_date.is_some())
            .fetch_optional(&self.pool)
            .await?;
        Ok(view)
    }

    async fn set_task_status(&self, id: Uuid, status: TaskStatus) -> AppResult<Option<TaskView>> {
        let sql = format!(
            "WITH t AS (
                 UPDATE tasks SET status = $2 WHERE id = $1
                 RETURNING {TASK_COLUMNS}
             )
             {TASK_VIEW}"
        );
        let view = sqlx::query_as::<_, TaskView>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(view)
    }

    async fn delete_task(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Support requests ─────────────────────────────────────────────────────

    async fn create_request(&self, request: NewSupportRequest) -> AppResult<SupportRequestView> {
        let sql = format!(
            "WITH r AS (
                 INSERT INTO support_requests (id, requester_id, task_id, request_type, details,
                                               created_at)
                 VALUES ($1, $2, $3, $4, $5, NOW())
                 RETURNING *
             )
             {REQUEST_VIEW}"
        );
        let view = sqlx::query_as::<_, SupportRequestView>(&sql)
            .bind(Uuid::new_v4())
            .bind(request.requester_id)
            .bind(request.task_id)
            .bind(request.request_type)
            .bind(&request.details)
            .fetch_one(&self.pool)
            .await?;
        Ok(view)
    }

    async fn list_requests(&self) -> AppResult<Vec<SupportRequestView>> {
        let sql = format!(
            "WITH r AS (SELECT * FROM support_requests)
             {REQUEST_VIEW}
             ORDER BY r.created_at DESC, r.id"
        );
        let requests = sqlx::query_as::<_, SupportRequestView>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    async fn set_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> AppResult<Option<SupportRequestView>> {
        let sql = format!(
            "WITH r AS (
                 UPDATE support_requests SET status = $2 WHERE id = $1
                 RETURNING *
             )
             {REQUEST_VIEW}"
        );
        let view = sqlx::query_as::<_, SupportRequestView>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(view)
    }

    // ─── Notifications ────────────────────────────────────────────────────────

    async fn notify(
        &self,
        user_id: Uuid,
        message: &str,
        link: Option<&str>,
    ) -> AppResult<Notification> {
        let sql = format!(
            "INSERT INTO notifications (id, user_id, message, link, created_at)
             VALUES ($1, $2, $3, $4, NOW())
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(message)
            .bind(link)
            .fetch_one(&self.pool)
            .await?;
        Ok(notification)
    }

    async fn list_unread_notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = $1 AND is_read = false
             ORDER BY created_at DESC"
        );
        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(notifications)
    }

    async fn mark_notifications_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
