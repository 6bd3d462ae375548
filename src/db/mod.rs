use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::{ExpenseStatus, LeaveStatus, TaskStatus};
use crate::entities::{
    announcements, attendance_records, expense_reports, leave_requests, notifications,
    performance_reviews, permissions, projects, roles, tasks,
};

pub mod migrator;
pub mod repositories;

pub use crate::entities::audit_logs::Model as AuditLog;
pub use repositories::project::{NewTask, TaskUpdate};
pub use repositories::review::ReviewDraft;
pub use repositories::role::RoleInput;
pub use repositories::user::{NewUser, User, UserProfileUpdate};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn role_repo(&self) -> repositories::role::RoleRepository {
        repositories::role::RoleRepository::new(self.conn.clone())
    }

    fn leave_repo(&self) -> repositories::leave::LeaveRepository {
        repositories::leave::LeaveRepository::new(self.conn.clone())
    }

    fn attendance_repo(&self) -> repositories::attendance::AttendanceRepository {
        repositories::attendance::AttendanceRepository::new(self.conn.clone())
    }

    fn expense_repo(&self) -> repositories::expense::ExpenseRepository {
        repositories::expense::ExpenseRepository::new(self.conn.clone())
    }

    fn announcement_repo(&self) -> repositories::announcement::AnnouncementRepository {
        repositories::announcement::AnnouncementRepository::new(self.conn.clone())
    }

    fn project_repo(&self) -> repositories::project::ProjectRepository {
        repositories::project::ProjectRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    fn notification_repo(&self) -> repositories::notification::NotificationRepository {
        repositories::notification::NotificationRepository::new(self.conn.clone())
    }

    fn audit_repo(&self) -> repositories::audit::AuditRepository {
        repositories::audit::AuditRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_users(
        &self,
        department: Option<&str>,
        include_inactive: bool,
    ) -> Result<Vec<User>> {
        self.user_repo().list(department, include_inactive).await
    }

    pub async fn list_active_user_ids(&self) -> Result<Vec<i32>> {
        self.user_repo().list_active_ids().await
    }

    pub async fn count_active_users(&self) -> Result<u64> {
        self.user_repo().count_active().await
    }

    pub async fn count_users_assigned_to_role(&self, role_id: i32) -> Result<u64> {
        self.user_repo().count_assigned_to_role(role_id).await
    }

    pub async fn create_user(&self, new: NewUser) -> Result<User> {
        self.user_repo().create(new).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        update: UserProfileUpdate,
    ) -> Result<Option<User>> {
        self.user_repo().update_profile(id, update).await
    }

    pub async fn set_user_active(&self, id: i32, active: bool) -> Result<Option<User>> {
        self.user_repo().set_active(id, active).await
    }

    pub async fn set_user_role(&self, id: i32, role_id: Option<i32>) -> Result<Option<User>> {
        self.user_repo().set_role(id, role_id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        new_password: &str,
        config: Option<&crate::config::SecurityConfig>,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, config)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn get_user_api_key(&self, username: &str) -> Result<Option<String>> {
        self.user_repo().get_api_key(username).await
    }

    pub async fn regenerate_user_api_key(&self, username: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(username).await
    }

    // ========== Access control ==========

    pub async fn resolve_permission_names(&self, user_id: i32) -> Result<HashSet<String>> {
        self.role_repo().resolve_permission_names(user_id).await
    }

    pub async fn user_ids_holding_permission(&self, permission: &str) -> Result<Vec<i32>> {
        self.role_repo().user_ids_holding(permission).await
    }

    pub async fn get_role(&self, id: i32) -> Result<Option<roles::Model>> {
        self.role_repo().get(id).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<roles::Model>> {
        self.role_repo().get_by_name(name).await
    }

    pub async fn list_roles_with_permissions(
        &self,
    ) -> Result<Vec<(roles::Model, Vec<String>)>> {
        self.role_repo().list_with_permissions().await
    }

    pub async fn role_permission_names(&self, role_id: i32) -> Result<Vec<String>> {
        self.role_repo().permission_names(role_id).await
    }

    pub async fn list_permission_rows(&self) -> Result<Vec<permissions::Model>> {
        self.role_repo().list_permission_rows().await
    }

    pub async fn create_role(&self, input: RoleInput) -> Result<roles::Model> {
        self.role_repo().create(input).await
    }

    pub async fn update_role(&self, id: i32, input: RoleInput) -> Result<Option<roles::Model>> {
        self.role_repo().update(id, input).await
    }

    pub async fn delete_role(&self, id: i32) -> Result<()> {
        self.role_repo().delete(id).await
    }

    // ========== Leave requests ==========

    pub async fn create_leave_request(
        &self,
        user_id: i32,
        kind: &str,
        start_date: &str,
        end_date: &str,
        business_days: i32,
        reason: Option<String>,
    ) -> Result<leave_requests::Model> {
        self.leave_repo()
            .create(user_id, kind, start_date, end_date, business_days, reason)
            .await
    }

    pub async fn get_leave_request(&self, id: i32) -> Result<Option<leave_requests::Model>> {
        self.leave_repo().get(id).await
    }

    pub async fn list_leave_requests_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<leave_requests::Model>> {
        self.leave_repo().list_for_user(user_id).await
    }

    pub async fn list_all_leave_requests(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<leave_requests::Model>> {
        self.leave_repo().list_all(status).await
    }

    pub async fn overlapping_leave_requests(
        &self,
        user_id: i32,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<leave_requests::Model>> {
        self.leave_repo()
            .overlapping(user_id, start_date, end_date)
            .await
    }

    pub async fn decide_leave_request(
        &self,
        id: i32,
        status: LeaveStatus,
        decided_by: i32,
        note: Option<String>,
    ) -> Result<Option<leave_requests::Model>> {
        self.leave_repo().decide(id, status, decided_by, note).await
    }

    pub async fn set_leave_request_status(
        &self,
        id: i32,
        status: LeaveStatus,
    ) -> Result<Option<leave_requests::Model>> {
        self.leave_repo().set_status(id, status).await
    }

    pub async fn list_pending_leave_requests_before(
        &self,
        cutoff_rfc3339: &str,
    ) -> Result<Vec<leave_requests::Model>> {
        self.leave_repo().list_pending_before(cutoff_rfc3339).await
    }

    pub async fn count_pending_leave_requests(&self) -> Result<u64> {
        self.leave_repo().count_pending().await
    }

    pub async fn count_pending_leave_requests_for_user(&self, user_id: i32) -> Result<u64> {
        self.leave_repo().count_pending_for_user(user_id).await
    }

    pub async fn next_approved_leave_for_user(
        &self,
        user_id: i32,
        today: &str,
    ) -> Result<Option<leave_requests::Model>> {
        self.leave_repo().next_approved_for_user(user_id, today).await
    }

    // ========== Attendance ==========

    pub async fn get_attendance_for_day(
        &self,
        user_id: i32,
        date: &str,
    ) -> Result<Option<attendance_records::Model>> {
        self.attendance_repo().get_for_day(user_id, date).await
    }

    pub async fn clock_in(
        &self,
        user_id: i32,
        date: &str,
        clock_in: &str,
        note: Option<String>,
    ) -> Result<attendance_records::Model> {
        self.attendance_repo()
            .clock_in(user_id, date, clock_in, note)
            .await
    }

    pub async fn set_clock_out(
        &self,
        id: i32,
        clock_out: &str,
        worked_minutes: i32,
    ) -> Result<Option<attendance_records::Model>> {
        self.attendance_repo()
            .set_clock_out(id, clock_out, worked_minutes)
            .await
    }

    pub async fn list_attendance_for_user(
        &self,
        user_id: i32,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<attendance_records::Model>> {
        self.attendance_repo().list_for_user(user_id, from, to).await
    }

    pub async fn list_attendance_for_day(
        &self,
        date: &str,
    ) -> Result<Vec<attendance_records::Model>> {
        self.attendance_repo().list_for_day(date).await
    }

    pub async fn count_attendance_for_day(&self, date: &str) -> Result<u64> {
        self.attendance_repo().count_for_day(date).await
    }

    // ========== Expense reports ==========

    pub async fn create_expense_report(
        &self,
        user_id: i32,
        description: &str,
        amount_cents: i64,
        currency: &str,
        expense_date: &str,
    ) -> Result<expense_reports::Model> {
        self.expense_repo()
            .create(user_id, description, amount_cents, currency, expense_date)
            .await
    }

    pub async fn get_expense_report(&self, id: i32) -> Result<Option<expense_reports::Model>> {
        self.expense_repo().get(id).await
    }

    pub async fn list_expense_reports_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<expense_reports::Model>> {
        self.expense_repo().list_for_user(user_id).await
    }

    pub async fn list_all_expense_reports(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<expense_reports::Model>> {
        self.expense_repo().list_all(status).await
    }

    pub async fn decide_expense_report(
        &self,
        id: i32,
        status: ExpenseStatus,
        decided_by: i32,
        note: Option<String>,
    ) -> Result<Option<expense_reports::Model>> {
        self.expense_repo().decide(id, status, decided_by, note).await
    }

    pub async fn delete_expense_report(&self, id: i32) -> Result<()> {
        self.expense_repo().delete(id).await
    }

    pub async fn count_pending_expense_reports(&self) -> Result<u64> {
        self.expense_repo().count_pending().await
    }

    // ========== Announcements ==========

    pub async fn create_announcement(
        &self,
        title: &str,
        body: &str,
        pinned: bool,
        author_id: i32,
    ) -> Result<announcements::Model> {
        self.announcement_repo()
            .create(title, body, pinned, author_id)
            .await
    }

    pub async fn get_announcement(&self, id: i32) -> Result<Option<announcements::Model>> {
        self.announcement_repo().get(id).await
    }

    pub async fn list_announcements(&self) -> Result<Vec<announcements::Model>> {
        self.announcement_repo().list().await
    }

    pub async fn update_announcement(
        &self,
        id: i32,
        title: &str,
        body: &str,
        pinned: bool,
    ) -> Result<Option<announcements::Model>> {
        self.announcement_repo().update(id, title, body, pinned).await
    }

    pub async fn delete_announcement(&self, id: i32) -> Result<()> {
        self.announcement_repo().delete(id).await
    }

    // ========== Projects & tasks ==========

    pub async fn create_project(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<projects::Model> {
        self.project_repo().create_project(name, description).await
    }

    pub async fn get_project(&self, id: i32) -> Result<Option<projects::Model>> {
        self.project_repo().get_project(id).await
    }

    pub async fn get_project_by_name(&self, name: &str) -> Result<Option<projects::Model>> {
        self.project_repo().get_project_by_name(name).await
    }

    pub async fn list_projects(&self, include_archived: bool) -> Result<Vec<projects::Model>> {
        self.project_repo().list_projects(include_archived).await
    }

    pub async fn update_project(
        &self,
        id: i32,
        name: &str,
        description: Option<String>,
        archived: bool,
    ) -> Result<Option<projects::Model>> {
        self.project_repo()
            .update_project(id, name, description, archived)
            .await
    }

    pub async fn create_task(&self, new: NewTask) -> Result<tasks::Model> {
        self.project_repo().create_task(new).await
    }

    pub async fn get_task(&self, id: i32) -> Result<Option<tasks::Model>> {
        self.project_repo().get_task(id).await
    }

    pub async fn list_tasks(
        &self,
        project_id: Option<i32>,
        assignee_id: Option<i32>,
        status: Option<&str>,
    ) -> Result<Vec<tasks::Model>> {
        self.project_repo()
            .list_tasks(project_id, assignee_id, status)
            .await
    }

    pub async fn update_task(&self, id: i32, update: TaskUpdate) -> Result<Option<tasks::Model>> {
        self.project_repo().update_task(id, update).await
    }

    pub async fn set_task_status(
        &self,
        id: i32,
        status: TaskStatus,
    ) -> Result<Option<tasks::Model>> {
        self.project_repo().set_task_status(id, status).await
    }

    pub async fn count_open_tasks(&self) -> Result<u64> {
        self.project_repo().count_open_tasks().await
    }

    pub async fn count_open_tasks_for_user(&self, user_id: i32) -> Result<u64> {
        self.project_repo().count_open_for_user(user_id).await
    }

    // ========== Performance reviews ==========

    pub async fn create_review(&self, draft: ReviewDraft) -> Result<performance_reviews::Model> {
        self.review_repo().create(draft).await
    }

    pub async fn get_review(&self, id: i32) -> Result<Option<performance_reviews::Model>> {
        self.review_repo().get(id).await
    }

    pub async fn list_reviews_for_employee(
        &self,
        employee_id: i32,
    ) -> Result<Vec<performance_reviews::Model>> {
        self.review_repo().list_for_employee(employee_id).await
    }

    pub async fn list_all_reviews(&self) -> Result<Vec<performance_reviews::Model>> {
        self.review_repo().list_all().await
    }

    pub async fn update_review_draft(
        &self,
        id: i32,
        draft: ReviewDraft,
    ) -> Result<Option<performance_reviews::Model>> {
        self.review_repo().update_draft(id, draft).await
    }

    pub async fn mark_review_submitted(
        &self,
        id: i32,
    ) -> Result<Option<performance_reviews::Model>> {
        self.review_repo().mark_submitted(id).await
    }

    pub async fn mark_review_acknowledged(
        &self,
        id: i32,
    ) -> Result<Option<performance_reviews::Model>> {
        self.review_repo().mark_acknowledged(id).await
    }

    pub async fn list_submitted_reviews_before(
        &self,
        cutoff_rfc3339: &str,
    ) -> Result<Vec<performance_reviews::Model>> {
        self.review_repo().list_submitted_before(cutoff_rfc3339).await
    }

    // ========== Notifications ==========

    pub async fn add_notification(
        &self,
        user_id: i32,
        kind: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<i32>,
    ) -> Result<notifications::Model> {
        self.notification_repo()
            .add(user_id, kind, message, entity_type, entity_id)
            .await
    }

    pub async fn add_notifications(
        &self,
        user_ids: &[i32],
        kind: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<i32>,
    ) -> Result<()> {
        self.notification_repo()
            .add_many(user_ids, kind, message, entity_type, entity_id)
            .await
    }

    pub async fn list_notifications_for_user(
        &self,
        user_id: i32,
        unread_only: bool,
        limit: u64,
    ) -> Result<Vec<notifications::Model>> {
        self.notification_repo()
            .list_for_user(user_id, unread_only, limit)
            .await
    }

    pub async fn mark_notification_read(&self, id: i32, user_id: i32) -> Result<bool> {
        self.notification_repo().mark_read(id, user_id).await
    }

    pub async fn mark_all_notifications_read(&self, user_id: i32) -> Result<u64> {
        self.notification_repo().mark_all_read(user_id).await
    }

    pub async fn count_unread_notifications(&self, user_id: i32) -> Result<u64> {
        self.notification_repo().count_unread(user_id).await
    }

    pub async fn prune_read_notifications_before(&self, cutoff_rfc3339: &str) -> Result<u64> {
        self.notification_repo().prune_read_before(cutoff_rfc3339).await
    }

    // ========== Audit log ==========

    pub async fn add_audit_entry(
        &self,
        event_type: &str,
        level: &str,
        message: &str,
        details: Option<String>,
    ) -> Result<()> {
        self.audit_repo()
            .add(event_type, level, message, details)
            .await
    }

    pub async fn get_audit_entries(
        &self,
        page: u64,
        page_size: u64,
        level_filter: Option<String>,
        event_type_filter: Option<String>,
    ) -> Result<(Vec<AuditLog>, u64)> {
        self.audit_repo()
            .get_entries(page, page_size, level_filter, event_type_filter)
            .await
    }

    pub async fn clear_audit_entries(&self) -> Result<()> {
        self.audit_repo().clear().await
    }

    pub async fn prune_audit_entries_before(&self, cutoff_rfc3339: &str) -> Result<u64> {
        self.audit_repo().prune_before(cutoff_rfc3339).await
    }
}
