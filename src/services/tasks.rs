//! Domain service for projects and their tasks.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::db::{NewTask, Store, TaskUpdate};
use crate::domain::TaskStatus;
use crate::domain::events::NotificationEvent;
use crate::entities::{projects, tasks};
use crate::services::Notifier;

/// Errors specific to project and task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Project not found")]
    ProjectNotFound,

    #[error("Task not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Store,
    notifier: Notifier,
}

impl TaskService {
    #[must_use]
    pub const fn new(store: Store, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    pub async fn create_project(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<projects::Model, TaskError> {
        if name.trim().is_empty() {
            return Err(TaskError::Validation("Project name is required".to_string()));
        }

        if self.store.get_project_by_name(name.trim()).await?.is_some() {
            return Err(TaskError::Conflict(format!(
                "Project '{}' already exists",
                name.trim()
            )));
        }

        let project = self.store.create_project(name.trim(), description).await?;

        info!(project_id = project.id, name = %project.name, "Project created");

        Ok(project)
    }

    pub async fn update_project(
        &self,
        id: i32,
        name: &str,
        description: Option<String>,
        archived: bool,
    ) -> Result<projects::Model, TaskError> {
        if name.trim().is_empty() {
            return Err(TaskError::Validation("Project name is required".to_string()));
        }

        if let Some(other) = self.store.get_project_by_name(name.trim()).await?
            && other.id != id
        {
            return Err(TaskError::Conflict(format!(
                "Project '{}' already exists",
                name.trim()
            )));
        }

        self.store
            .update_project(id, name.trim(), description, archived)
            .await?
            .ok_or(TaskError::ProjectNotFound)
    }

    pub async fn create_task(&self, new: NewTask) -> Result<tasks::Model, TaskError> {
        self.validate_task_fields(&new.title, new.project_id, new.assignee_id, new.due_date.as_deref())
            .await?;

        let task = self.store.create_task(new).await?;

        info!(task_id = task.id, title = %task.title, "Task created");

        if let Some(assignee_id) = task.assignee_id {
            self.notify_assignee(&task, assignee_id).await?;
        }

        Ok(task)
    }

    pub async fn update_task(&self, id: i32, update: TaskUpdate) -> Result<tasks::Model, TaskError> {
        let existing = self.store.get_task(id).await?.ok_or(TaskError::NotFound)?;

        self.validate_task_fields(
            &update.title,
            update.project_id,
            update.assignee_id,
            update.due_date.as_deref(),
        )
        .await?;

        let new_assignee = update.assignee_id;
        let task = self
            .store
            .update_task(id, update)
            .await?
            .ok_or(TaskError::NotFound)?;

        if let Some(assignee_id) = new_assignee
            && existing.assignee_id != Some(assignee_id)
        {
            self.notify_assignee(&task, assignee_id).await?;
        }

        Ok(task)
    }

    /// Moves a task to a new status. Allowed for the assignee or anyone
    /// holding the task-edit permission.
    pub async fn transition(
        &self,
        id: i32,
        status: &str,
        actor_id: i32,
        actor_can_edit: bool,
    ) -> Result<tasks::Model, TaskError> {
        let status = TaskStatus::parse(status)
            .ok_or_else(|| TaskError::Validation(format!("Unknown task status '{status}'")))?;

        let task = self.store.get_task(id).await?.ok_or(TaskError::NotFound)?;

        if task.assignee_id != Some(actor_id) && !actor_can_edit {
            return Err(TaskError::Forbidden(
                "Only the assignee or a task editor can change the status".to_string(),
            ));
        }

        let task = self
            .store
            .set_task_status(id, status)
            .await?
            .ok_or(TaskError::NotFound)?;

        info!(task_id = id, status = %status, actor_id, "Task status changed");

        if status == TaskStatus::Done {
            self.notifier.broadcast(NotificationEvent::TaskCompleted {
                task_id: task.id,
                title: task.title.clone(),
            });
        }

        Ok(task)
    }

    async fn validate_task_fields(
        &self,
        title: &str,
        project_id: Option<i32>,
        assignee_id: Option<i32>,
        due_date: Option<&str>,
    ) -> Result<(), TaskError> {
        if title.trim().is_empty() {
            return Err(TaskError::Validation("Task title is required".to_string()));
        }

        if let Some(pid) = project_id
            && self.store.get_project(pid).await?.is_none()
        {
            return Err(TaskError::ProjectNotFound);
        }

        if let Some(uid) = assignee_id {
            let assignee = self.store.get_user_by_id(uid).await?;
            if !assignee.is_some_and(|u| u.active) {
                return Err(TaskError::Validation(
                    "Assignee not found or inactive".to_string(),
                ));
            }
        }

        if let Some(date) = due_date
            && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err()
        {
            return Err(TaskError::Validation(format!(
                "'{date}' is not a YYYY-MM-DD date"
            )));
        }

        Ok(())
    }

    async fn notify_assignee(&self, task: &tasks::Model, assignee_id: i32) -> Result<(), TaskError> {
        self.notifier
            .notify_user(
                assignee_id,
                "task_assigned",
                &format!("You were assigned the task '{}'", task.title),
                Some("task"),
                Some(task.id),
            )
            .await?;

        self.notifier.broadcast(NotificationEvent::TaskAssigned {
            task_id: task.id,
            title: task.title.clone(),
            assignee_id,
        });

        Ok(())
    }
}
