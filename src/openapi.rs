// src/openapi.rs

use crate::models::{
    Address, AuthResponse, ContactDetails, CreateSupportRequest, CreateTaskRequest,
    EmploymentDetails, Graduation, LoginRequest, MessageResponse, Notification, PayslipEmployee,
    PayslipStatus, PayslipView, Profile, RegisterRequest, RequestStatus, RequestStatusUpdate,
    RequestType, Role, Salary, SetRoleRequest, SetSalaryRequest, SupportRequest,
    SupportRequestView, Task, TaskPriority, TaskStatus, TaskStatusRequest, TaskView,
    UpdateMeRequest, UpdatePasswordRequest, UpdateTaskRequest, UserPublic, UserWithSalary,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Payroll API",
        version = "1.0.0",
        description = "Internal HR backend: registration with an admin approval gate, \
            user and profile management, salary records, monthly payslip generation \
            with pro-ration for employees who join mid-month, tasks, support requests \
            and in-app notifications.",
        license(name = "MIT")
    ),
    paths(
        // Users
        crate::handlers::user::register_user,
        crate::handlers::user::login_user,
        crate::handlers::user::list_users,
        crate::handlers::user::list_pending_users,
        crate::handlers::user::get_me,
        crate::handlers::user::update_me,
        crate::handlers::user::update_password,
        crate::handlers::user::approve_user,
        crate::handlers::user::set_user_role,
        crate::handlers::user::delete_user,
        // Salary
        crate::handlers::salary::set_salary,
        // Profile
        crate::handlers::profile::get_my_profile,
        crate::handlers::profile::update_my_profile,
        crate::handlers::profile::update_employment,
        crate::handlers::profile::get_user_profile,
        // Payroll
        crate::handlers::payroll::generate_payroll_for_period,
        crate::handlers::payroll::mark_payslip_paid,
        // Tasks
        crate::handlers::task::create_task,
        crate::handlers::task::list_tasks,
        crate::handlers::task::list_my_tasks,
        crate::handlers::task::update_task_status,
        crate::handlers::task::update_task,
        crate::handlers::task::delete_task,
        // Requests
        crate::handlers::request::create_request,
        crate::handlers::request::list_requests,
        crate::handlers::request::update_request_status,
        // Notifications
        crate::handlers::notification::list_notifications,
        crate::handlers::notification::mark_notifications_read,
    ),
    components(
        schemas(
            RegisterRequest, LoginRequest, AuthResponse, MessageResponse, Role,
            UserPublic, UserWithSalary, UpdateMeRequest, UpdatePasswordRequest, SetRoleRequest,
            Salary, SetSalaryRequest,
            Profile, Address, Graduation, ContactDetails, EmploymentDetails,
            PayslipView, PayslipEmployee, PayslipStatus,
            Task, TaskView, TaskStatus, TaskPriority, CreateTaskRequest, UpdateTaskRequest,
            TaskStatusRequest,
            SupportRequest, SupportRequestView, RequestType, RequestStatus, CreateSupportRequest,
            RequestStatusUpdate,
            Notification,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Users", description = "Registration, login, approval and user administration"),
        (name = "Salary", description = "Employee base salaries"),
        (name = "Profile", description = "Contact details, job title and date of joining"),
        (name = "Payroll", description = "Generate monthly payslips and mark them paid"),
        (name = "Tasks", description = "Create, assign and track tasks"),
        (name = "Requests", description = "Support, clarification and access requests"),
        (name = "Notifications", description = "In-app notifications"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_the_payroll_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/payroll/{year}/{month}"));
        assert!(doc.paths.paths.contains_key("/api/payroll/payslips/{payslip_id}/pay"));
    }

    #[test]
    fn documents_the_workflow_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/tasks",
            "/api/tasks/mytasks",
            "/api/tasks/{id}",
            "/api/tasks/{id}/status",
            "/api/requests",
            "/api/requests/{id}/status",
            "/api/notifications",
            "/api/notifications/read",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
