//! SurrealDB implementation of [`ProjectRepository`].
//!
//! Projects are keyed by their name (`project:⟨name⟩`) with tasks
//! embedded as an array of objects. Tasks are stored in a normalized
//! shape with every field present, tagged by a `kind` discriminant, so
//! rows stay fixed even though the domain type is a union.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use termtrack_core::error::TermtrackResult;
use termtrack_core::models::project::Project;
use termtrack_core::models::task::{Task, TaskKind};
use termtrack_core::repository::ProjectRepository;

use crate::error::DbError;

/// DB-side task shape embedded in project rows.
#[derive(Debug, SurrealValue)]
struct TaskRow {
    name: String,
    description: Option<String>,
    members: Vec<String>,
    kind: String,
    done: bool,
    milestones: u32,
    completed: u32,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        match task.kind {
            TaskKind::Discrete { completed } => Self {
                name: task.name.clone(),
                description: task.description.clone(),
                members: task.members.clone(),
                kind: "discrete".into(),
                done: completed,
                milestones: 0,
                completed: 0,
            },
            TaskKind::Milestone {
                milestones,
                completed,
            } => Self {
                name: task.name.clone(),
                description: task.description.clone(),
                members: task.members.clone(),
                kind: "milestone".into(),
                done: false,
                milestones,
                completed,
            },
        }
    }

    fn into_task(self) -> Result<Task, DbError> {
        let kind = match self.kind.as_str() {
            "discrete" => TaskKind::Discrete { completed: self.done },
            "milestone" => TaskKind::Milestone {
                milestones: self.milestones,
                completed: self.completed,
            },
            other => return Err(DbError::Query(format!("unknown task kind: {other}"))),
        };
        Ok(Task {
            name: self.name,
            description: self.description,
            members: self.members,
            kind,
        })
    }
}

/// DB-side row struct mirroring the `project` table.
#[derive(Debug, SurrealValue)]
struct ProjectRow {
    name: String,
    description: Option<String>,
    owner: String,
    moderators: Vec<String>,
    members: Vec<String>,
    tasks: Vec<TaskRow>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project, DbError> {
        let tasks = self
            .tasks
            .into_iter()
            .map(TaskRow::into_task)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(Project {
            name: self.name,
            description: self.description,
            owner: self.owner,
            moderators: self.moderators,
            members: self.members,
            tasks,
        })
    }
}

fn task_rows(project: &Project) -> Vec<TaskRow> {
    project.tasks.iter().map(TaskRow::from_task).collect()
}

/// SurrealDB implementation of the Project repository.
#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, project: &Project) -> TermtrackResult<()> {
        let result = self
            .db
            .query(
                "CREATE type::record('project', $name) SET \
                 name = $name, \
                 description = $description, \
                 owner = $owner, \
                 moderators = $moderators, \
                 members = $members, \
                 tasks = $tasks",
            )
            .bind(("name", project.name.clone()))
            .bind(("description", project.description.clone()))
            .bind(("owner", project.owner.clone()))
            .bind(("moderators", project.moderators.clone()))
            .bind(("members", project.members.clone()))
            .bind(("tasks", task_rows(project)))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find(&self, name: &str) -> TermtrackResult<Option<Project>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('project', $name)")
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_project().map_err(DbError::from)?)),
            None => Ok(None),
        }
    }

    async fn get(&self, name: &str) -> TermtrackResult<Project> {
        self.find(name)
            .await?
            .ok_or_else(|| DbError::NotFound {
                entity: "Project".into(),
                id: name.to_string(),
            })
            .map_err(Into::into)
    }

    async fn update(&self, project: &Project) -> TermtrackResult<()> {
        // The name is the record id and the owner never changes.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('project', $name) SET \
                 description = $description, \
                 moderators = $moderators, \
                 members = $members, \
                 tasks = $tasks, \
                 updated_at = time::now()",
            )
            .bind(("name", project.name.clone()))
            .bind(("description", project.description.clone()))
            .bind(("moderators", project.moderators.clone()))
            .bind(("members", project.members.clone()))
            .bind(("tasks", task_rows(project)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "Project".into(),
                id: project.name.clone(),
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, name: &str) -> TermtrackResult<()> {
        self.db
            .query("DELETE type::record('project', $name)")
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_for_member(&self, username: &str) -> TermtrackResult<Vec<Project>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM project WHERE members CONTAINS $username \
                 ORDER BY created_at ASC",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let projects = rows
            .into_iter()
            .map(ProjectRow::into_project)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(projects)
    }
}
