pub mod prelude;

pub mod announcements;
pub mod attendance_records;
pub mod audit_logs;
pub mod expense_reports;
pub mod leave_requests;
pub mod notifications;
pub mod performance_reviews;
pub mod permissions;
pub mod projects;
pub mod role_permissions;
pub mod roles;
pub mod tasks;
pub mod users;
