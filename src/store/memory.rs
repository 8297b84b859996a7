// src/store/memory.rs

use super::HrStore;
use crate::{
    errors::{AppError, AppResult},
    models::{
        ContactDetails, EmploymentDetails, NewSupportRequest, NewTask, NewUser, Notification,
        PayPeriod, Payslip, PayslipAmounts, PayslipEmployee, PayslipStatus, PayslipView, Profile,
        RequestStatus, Role, Salary, SupportRequest, SupportRequestView, Task, TaskStatus,
        TaskView, UpdateTaskRequest, User, UserPublic, UserWithSalary,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::{
    collections::HashMap,
    sync::{
        Mutex as SyncMutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    salaries: HashMap<Uuid, Salary>,
    profiles: HashMap<Uuid, Profile>,
    // insertion order doubles as creation order
    payslips: Vec<Payslip>,
    tasks: Vec<Task>,
    requests: Vec<SupportRequest>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn full_name(&self, id: Option<Uuid>) -> Option<String> {
        let id = id?;
        self.users.iter().find(|u| u.id == id).map(|u| u.full_name.clone())
    }

    fn task_view(&self, task: &Task) -> TaskView {
        TaskView {
            task: task.clone(),
            assignee_name: self.full_name(task.assignee_id),
            created_by_name: self.full_name(task.created_by),
        }
    }

    fn request_view(&self, request: &SupportRequest) -> Option<SupportRequestView> {
        Some(SupportRequestView {
            request: request.clone(),
            requester_name: self.full_name(Some(request.requester_id))?,
        })
    }
}

/// Another generation run acting between this run's read and its write.
/// Applied once, by the payslip write it targets.
#[derive(Debug, Clone, Copy)]
pub enum Interleaving {
    /// A rival inserts the payslip first, with these figures.
    RivalInsert(PayslipAmounts),
    /// The payslip is marked paid just before the resync lands.
    PaidBeforeResync,
    /// The insert conflicts, but the conflicting row is gone by the re-read.
    VanishAfterConflict,
}

/// In-process `HrStore` for tests. Counts payslip writes, can be told to
/// start failing after a number of them, and can replay an `Interleaving`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    interleaving: SyncMutex<Option<Interleaving>>,
    pub payslip_writes: AtomicUsize,
    pub fail_payslip_writes_after: Option<usize>,
}

impl MemoryStore {
    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_payslip_writes_after: Some(writes),
            ..Self::default()
        }
    }

    pub fn interleave(&self, interleaving: Interleaving) {
        *self.interleaving.lock().unwrap() = Some(interleaving);
    }

    fn take_interleaving(&self, wanted: impl FnOnce(&Interleaving) -> bool) -> Option<Interleaving> {
        self.interleaving.lock().unwrap().take_if(|i| wanted(i))
    }

    pub fn writes(&self) -> usize {
        self.payslip_writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) -> AppResult<()> {
        if let Some(limit) = self.fail_payslip_writes_after {
            if self.writes() >= limit {
                return Err(AppError::StoreUnavailable(sqlx::Error::PoolTimedOut));
            }
        }
        self.payslip_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Seeds a user directly, bypassing registration.
    pub async fn add_user(&self, full_name: &str, role: Role, is_approved: bool) -> User {
        self.create_user(NewUser {
            full_name: full_name.to_string(),
            email: format!("{}@example.com", full_name.to_lowercase().replace(' ', ".")),
            password_hash: String::new(),
            role,
            is_approved,
        })
        .await
        .expect("memory store never fails user inserts")
    }

    pub async fn payslip(&self, id: Uuid) -> Option<Payslip> {
        let tables = self.tables.lock().await;
        tables.payslips.iter().find(|p| p.id == id).cloned()
    }
}

fn blank_profile(user_id: Uuid) -> Profile {
    let now = Utc::now();
    Profile {
        user_id,
        phone_number: None,
        address: Default::default(),
        highest_graduation: Default::default(),
        job_title: String::new(),
        date_of_joining: None,
        created_at: now,
        updated_at: now,
    }
}

fn pending_payslip(user_id: Uuid, period: PayPeriod, amounts: PayslipAmounts) -> Payslip {
    let now = Utc::now();
    Payslip {
        id: Uuid::new_v4(),
        user_id,
        year: period.year(),
        month: period.month(),
        base_salary: amounts.base_salary,
        net_pay: amounts.net_pay,
        status: PayslipStatus::Pending,
        paid_on: None,
        created_at: now,
        updated_at: now,
    }
}

fn view(payslip: &Payslip, users: &[User]) -> Option<PayslipView> {
    let user = users.iter().find(|u| u.id == payslip.user_id)?;
    Some(PayslipView {
        id: payslip.id,
        user: PayslipEmployee {
            user_id: user.id,
            full_name: user.full_name.clone(),
        },
        year: payslip.year,
        month: payslip.month,
        base_salary: payslip.base_salary,
        net_pay: payslip.net_pay,
        status: payslip.status,
        paid_on: payslip.paid_on,
        created_at: payslip.created_at,
        updated_at: payslip.updated_at,
    })
}

#[async_trait]
impl HrStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!("email '{}' taken", user.email)));
        }
        let created = User {
            id: Uuid::new_v4(),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_approved: user.is_approved,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<UserWithSalary>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .map(|u| UserWithSalary {
                user: UserPublic::from(u.clone()),
                base_salary: tables.salaries.get(&u.id).map(|s| s.base_salary),
            })
            .collect())
    }

    async fn list_pending_users(&self) -> AppResult<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.role == Role::Employee && !u.is_approved)
            .cloned()
            .collect())
    }

    async fn list_payroll_employees(&self) -> AppResult<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.is_payroll_eligible())
            .cloned()
            .collect())
    }

    async fn approve_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.is_approved = true;
            u.clone()
        }))
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> AppResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.role = role;
            u.clone()
        }))
    }

    async fn set_full_name(&self, id: Uuid, full_name: &str) -> AppResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.full_name = full_name.to_string();
            u.clone()
        }))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        Ok(match tables.users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                true
            }
            None => false,
        })
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.salaries.remove(&id);
        tables.profiles.remove(&id);
        tables.payslips.retain(|p| p.user_id != id);
        tables.requests.retain(|r| r.requester_id != id);
        tables.notifications.retain(|n| n.user_id != id);
        for task in tables.tasks.iter_mut() {
            if task.assignee_id == Some(id) {
                task.assignee_id = None;
            }
            if task.created_by == Some(id) {
                task.created_by = None;
            }
        }
        Ok(true)
    }

    async fn find_salary(&self, user_id: Uuid) -> AppResult<Option<Salary>> {
        let tables = self.tables.lock().await;
        Ok(tables.salaries.get(&user_id).cloned())
    }

    async fn upsert_salary(&self, user_id: Uuid, base_salary: Decimal) -> AppResult<Salary> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let salary = tables.salaries.entry(user_id).or_insert_with(|| Salary {
            user_id,
            base_salary,
            effective_date: now,
            updated_at: now,
        });
        salary.base_salary = base_salary;
        salary.updated_at = now;
        Ok(salary.clone())
    }

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let tables = self.tables.lock().await;
        Ok(tables.profiles.get(&user_id).cloned())
    }

    async fn ensure_profile(&self, user_id: Uuid) -> AppResult<Profile> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .profiles
            .entry(user_id)
            .or_insert_with(|| blank_profile(user_id))
            .clone())
    }

    async fn update_contact_details(
        &self,
        user_id: Uuid,
        details: ContactDetails,
    ) -> AppResult<Profile> {
        let mut tables = self.tables.lock().await;
        let profile = tables
            .profiles
            .entry(user_id)
            .or_insert_with(|| blank_profile(user_id));
        if let Some(phone) = details.phone_number {
            profile.phone_number = Some(phone);
        }
        if let Some(address) = details.address {
            profile.address = address;
        }
        if let Some(graduation) = details.highest_graduation {
            profile.highest_graduation = graduation;
        }
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn update_employment_details(
        &self,
        user_id: Uuid,
        details: EmploymentDetails,
    ) -> AppResult<Profile> {
        let mut tables = self.tables.lock().await;
        let profile = tables
            .profiles
            .entry(user_id)
            .or_insert_with(|| blank_profile(user_id));
        if let Some(job_title) = details.job_title {
            profile.job_title = job_title;
        }
        if let Some(date) = details.date_of_joining {
            profile.date_of_joining = date;
        }
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn find_payslip(&self, user_id: Uuid, period: PayPeriod) -> AppResult<Option<Payslip>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .payslips
            .iter()
            .find(|p| p.user_id == user_id && p.year == period.year() && p.month == period.month())
            .cloned())
    }

    async fn insert_payslip(
        &self,
        user_id: Uuid,
        period: PayPeriod,
        amounts: PayslipAmounts,
    ) -> AppResult<Option<Payslip>> {
        let mut tables = self.tables.lock().await;
        match self.take_interleaving(|i| !matches!(i, Interleaving::PaidBeforeResync)) {
            Some(Interleaving::RivalInsert(rival)) => {
                tables.payslips.push(pending_payslip(user_id, period, rival));
            }
            Some(Interleaving::VanishAfterConflict) => return Ok(None),
            _ => {}
        }
        let exists = tables
            .payslips
            .iter()
            .any(|p| p.user_id == user_id && p.year == period.year() && p.month == period.month());
        if exists {
            return Ok(None);
        }
        self.record_write()?;
        let payslip = pending_payslip(user_id, period, amounts);
        tables.payslips.push(payslip.clone());
        Ok(Some(payslip))
    }

    async fn resync_payslip(
        &self,
        id: Uuid,
        amounts: PayslipAmounts,
    ) -> AppResult<Option<Payslip>> {
        let mut tables = self.tables.lock().await;
        if self
            .take_interleaving(|i| matches!(i, Interleaving::PaidBeforeResync))
            .is_some()
        {
            if let Some(rival) = tables.payslips.iter_mut().find(|p| p.id == id) {
                rival.status = PayslipStatus::Paid;
                rival.paid_on = Some(Utc::now());
            }
        }
        let Some(payslip) = tables
            .payslips
            .iter_mut()
            .find(|p| p.id == id && p.status == PayslipStatus::Pending)
        else {
            return Ok(None);
        };
        self.record_write()?;
        payslip.base_salary = amounts.base_salary;
        payslip.net_pay = amounts.net_pay;
        payslip.updated_at = Utc::now();
        Ok(Some(payslip.clone()))
    }

    async fn list_payslips(&self, period: PayPeriod) -> AppResult<Vec<PayslipView>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .payslips
            .iter()
            .filter(|p| p.year == period.year() && p.month == period.month())
            .filter_map(|p| view(p, &tables.users))
            .collect())
    }

    async fn mark_payslip_paid(
        &self,
        id: Uuid,
        paid_on: DateTime<Utc>,
    ) -> AppResult<Option<PayslipView>> {
        let mut tables = self.tables.lock().await;
        let Some(payslip) = tables.payslips.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        payslip.status = PayslipStatus::Paid;
        payslip.paid_on = Some(paid_on);
        payslip.updated_at = Utc::now();
        let payslip = payslip.clone();
        Ok(view(&payslip, &tables.users))
    }

    async fn create_task(&self, task: NewTask) -> AppResult<TaskView> {
        let mut tables = self.tables.lock().await;
        let created = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: TaskStatus::default(),
            priority: task.priority,
            assignee_id: task.assignee_id,
            created_by: Some(task.created_by),
            due_date: task.due_date,
            created_at: Utc::now(),
        };
        tables.tasks.push(created.clone());
        Ok(tables.task_view(&created))
    }

    async fn find_task(&self, id: Uuid) -> AppResult<Option<Task>> {
        let tables = self.tables.lock().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self) -> AppResult<Vec<TaskView>> {
        let tables = self.tables.lock().await;
        Ok(tables.tasks.iter().rev().map(|t| tables.task_view(t)).collect())
    }

    async fn list_tasks_for(&self, assignee_id: Uuid) -> AppResult<Vec<TaskView>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .tasks
            .iter()
            .rev()
            .filter(|t| t.assignee_id == Some(assignee_id))
            .map(|t| tables.task_view(t))
            .collect())
    }

    async fn update_task(&self, id: Uuid, changes: UpdateTaskRequest) -> AppResult<Option<TaskView>> {
        let mut tables = self.tables.lock().await;
        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        if let Some(assignee) = changes.assignee {
            task.assignee_id = assignee;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        let task = task.clone();
        Ok(Some(tables.task_view(&task)))
    }

    async fn set_task_status(&self, id: Uuid, status: TaskStatus) -> AppResult<Option<TaskView>> {
        let mut tables = self.tables.lock().await;
        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.status = status;
        let task = task.clone();
        Ok(Some(tables.task_view(&task)))
    }

    async fn delete_task(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        if tables.tasks.len() == before {
            return Ok(false);
        }
        for request in tables.requests.iter_mut() {
            if request.task_id == Some(id) {
                request.task_id = None;
            }
        }
        Ok(true)
    }

    async fn create_request(&self, request: NewSupportRequest) -> AppResult<SupportRequestView> {
        let mut tables = self.tables.lock().await;
        let created = SupportRequest {
            id: Uuid::new_v4(),
            requester_id: request.requester_id,
            task_id: request.task_id,
            request_type: request.request_type,
            details: request.details,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        let view = tables.request_view(&created).ok_or_else(|| {
            AppError::Validation(format!("requester {} does not exist", created.requester_id))
        })?;
        tables.requests.push(created);
        Ok(view)
    }

    async fn list_requests(&self) -> AppResult<Vec<SupportRequestView>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .requests
            .iter()
            .rev()
            .filter_map(|r| tables.request_view(r))
            .collect())
    }

    async fn set_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> AppResult<Option<SupportRequestView>> {
        let mut tables = self.tables.lock().await;
        let Some(request) = tables.requests.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        request.status = status;
        let request = request.clone();
        Ok(tables.request_view(&request))
    }

    async fn notify(
        &self,
        user_id: Uuid,
        message: &str,
        link: Option<&str>,
    ) -> AppResult<Notification> {
        let mut tables = self.tables.lock().await;
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            message: message.to_string(),
            is_read: false,
            link: link.map(str::to_string),
            created_at: Utc::now(),
        };
        tables.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_unread_notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .cloned()
            .collect())
    }

    async fn mark_notifications_read(&self, user_id: Uuid) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let mut flipped = 0;
        for notification in tables.notifications.iter_mut() {
            if notification.user_id == user_id && !notification.is_read {
                notification.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}
