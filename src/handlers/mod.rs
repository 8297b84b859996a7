pub mod general;
pub mod notification;
pub mod payroll;
pub mod profile;
pub mod request;
pub mod salary;
pub mod task;
pub mod user;
