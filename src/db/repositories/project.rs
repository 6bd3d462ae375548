use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::TaskStatus;
use crate::entities::{prelude::*, projects, tasks};

/// Fields for a new task. Assignee validation happens in the handler.
pub struct NewTask {
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i32>,
    pub due_date: Option<String>,
    pub created_by: i32,
}

pub struct TaskUpdate {
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i32>,
    pub due_date: Option<String>,
}

pub struct ProjectRepository {
    conn: DatabaseConnection,
}

impl ProjectRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create_project(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<projects::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Projects::insert(projects::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            archived: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = Projects::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created project"))?;

        Ok(model)
    }

    pub async fn get_project(&self, id: i32) -> Result<Option<projects::Model>> {
        Ok(Projects::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_project_by_name(&self, name: &str) -> Result<Option<projects::Model>> {
        Ok(Projects::find()
            .filter(projects::Column::Name.eq(name))
            .one(&self.conn)
            .await?)
    }

    pub async fn list_projects(&self, include_archived: bool) -> Result<Vec<projects::Model>> {
        let mut query = Projects::find().order_by_asc(projects::Column::Name);

        if !include_archived {
            query = query.filter(projects::Column::Archived.eq(false));
        }

        Ok(query.all(&self.conn).await?)
    }

    pub async fn update_project(
        &self,
        id: i32,
        name: &str,
        description: Option<String>,
        archived: bool,
    ) -> Result<Option<projects::Model>> {
        let Some(project) = Projects::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: projects::ActiveModel = project.into();
        active.name = Set(name.to_string());
        active.description = Set(description);
        active.archived = Set(archived);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn create_task(&self, new: NewTask) -> Result<tasks::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let inserted = Tasks::insert(tasks::ActiveModel {
            project_id: Set(new.project_id),
            title: Set(new.title),
            description: Set(new.description),
            assignee_id: Set(new.assignee_id),
            due_date: Set(new.due_date),
            status: Set(TaskStatus::Todo.as_str().to_string()),
            created_by: Set(new.created_by),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let model = Tasks::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created task"))?;

        Ok(model)
    }

    pub async fn get_task(&self, id: i32) -> Result<Option<tasks::Model>> {
        Ok(Tasks::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn list_tasks(
        &self,
        project_id: Option<i32>,
        assignee_id: Option<i32>,
        status: Option<&str>,
    ) -> Result<Vec<tasks::Model>> {
        let mut query = Tasks::find()
            .order_by_asc(tasks::Column::DueDate)
            .order_by_desc(tasks::Column::CreatedAt);

        if let Some(project_id) = project_id {
            query = query.filter(tasks::Column::ProjectId.eq(project_id));
        }
        if let Some(assignee_id) = assignee_id {
            query = query.filter(tasks::Column::AssigneeId.eq(assignee_id));
        }
        if let Some(status) = status {
            query = query.filter(tasks::Column::Status.eq(status));
        }

        Ok(query.all(&self.conn).await?)
    }

    pub async fn update_task(&self, id: i32, update: TaskUpdate) -> Result<Option<tasks::Model>> {
        let Some(task) = Tasks::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: tasks::ActiveModel = task.into();
        active.project_id = Set(update.project_id);
        active.title = Set(update.title);
        active.description = Set(update.description);
        active.assignee_id = Set(update.assignee_id);
        active.due_date = Set(update.due_date);
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn set_task_status(
        &self,
        id: i32,
        status: TaskStatus,
    ) -> Result<Option<tasks::Model>> {
        let Some(task) = Tasks::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: tasks::ActiveModel = task.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(now);
        let model = active.update(&self.conn).await?;

        Ok(Some(model))
    }

    pub async fn count_open_tasks(&self) -> Result<u64> {
        Ok(Tasks::find()
            .filter(tasks::Column::Status.ne(TaskStatus::Done.as_str()))
            .count(&self.conn)
            .await?)
    }

    pub async fn count_open_for_user(&self, user_id: i32) -> Result<u64> {
        Ok(Tasks::find()
            .filter(tasks::Column::AssigneeId.eq(user_id))
            .filter(tasks::Column::Status.ne(TaskStatus::Done.as_str()))
            .count(&self.conn)
            .await?)
    }
}
