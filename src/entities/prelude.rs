pub use super::announcements::Entity as Announcements;
pub use super::attendance_records::Entity as AttendanceRecords;
pub use super::audit_logs::Entity as AuditLogs;
pub use super::expense_reports::Entity as ExpenseReports;
pub use super::leave_requests::Entity as LeaveRequests;
pub use super::notifications::Entity as Notifications;
pub use super::performance_reviews::Entity as PerformanceReviews;
pub use super::permissions::Entity as Permissions;
pub use super::projects::Entity as Projects;
pub use super::role_permissions::Entity as RolePermissions;
pub use super::roles::Entity as Roles;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
