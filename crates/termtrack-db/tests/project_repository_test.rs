//! Integration tests for the Project repository using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use termtrack_core::models::project::Project;
use termtrack_core::models::task::{Completion, Task, TaskKind};
use termtrack_core::repository::ProjectRepository;
use termtrack_db::SurrealProjectRepository;

async fn setup() -> SurrealProjectRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    termtrack_db::run_migrations(&db).await.unwrap();
    SurrealProjectRepository::new(db)
}

fn sample_project() -> Project {
    let mut project = Project::new("orbit", Some("satellite tracker".to_string()), "ada");
    project.add_members(["grace", "linus"]);
    project.add_moderators(["grace"]);
    project.add_task(Task::discrete("write docs", Some("user guide".to_string())));
    project.add_task(Task::milestone("launch", None, 4));
    project
        .task_mut("launch")
        .unwrap()
        .set_completion(Completion::Progress(1))
        .unwrap();
    project.task_mut("launch").unwrap().add_members(["grace"]);
    project
}

#[tokio::test]
async fn create_and_get_project_round_trips_tasks() {
    let repo = setup().await;
    let project = sample_project();

    repo.create(&project).await.unwrap();

    let fetched = repo.get("orbit").await.unwrap();
    assert_eq!(fetched, project);

    let launch = fetched.task("launch").unwrap();
    assert_eq!(
        launch.kind,
        TaskKind::Milestone {
            milestones: 4,
            completed: 1
        }
    );
    assert_eq!(launch.members, vec!["grace"]);

    let docs = fetched.task("write docs").unwrap();
    assert_eq!(docs.kind, TaskKind::Discrete { completed: false });
}

#[tokio::test]
async fn find_missing_project_returns_none() {
    let repo = setup().await;
    assert!(repo.find("nothing").await.unwrap().is_none());

    let err = repo.get("nothing").await.unwrap_err();
    assert!(err.to_string().contains("not found"), "got: {err}");
}

#[tokio::test]
async fn duplicate_project_name_rejected() {
    let repo = setup().await;

    repo.create(&sample_project()).await.unwrap();
    let result = repo.create(&sample_project()).await;

    assert!(result.is_err(), "duplicate project name should be rejected");
}

#[tokio::test]
async fn update_replaces_membership_and_tasks() {
    let repo = setup().await;
    let mut project = sample_project();
    repo.create(&project).await.unwrap();

    project.description = Some("updated".to_string());
    project.remove_members(["linus"]);
    project
        .task_mut("write docs")
        .unwrap()
        .set_completion(Completion::Done(true))
        .unwrap();
    project.remove_tasks(["launch"]);

    repo.update(&project).await.unwrap();

    let fetched = repo.get("orbit").await.unwrap();
    assert_eq!(fetched.description.as_deref(), Some("updated"));
    assert!(!fetched.is_member("linus"));
    assert_eq!(fetched.tasks.len(), 1);
    assert_eq!(fetched.progress(), 100);
}

#[tokio::test]
async fn update_missing_project_fails() {
    let repo = setup().await;

    let result = repo.update(&sample_project()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn delete_removes_project() {
    let repo = setup().await;
    repo.create(&sample_project()).await.unwrap();

    repo.delete("orbit").await.unwrap();

    assert!(repo.find("orbit").await.unwrap().is_none());
}

#[tokio::test]
async fn list_for_member_filters_by_membership() {
    let repo = setup().await;

    repo.create(&Project::new("first", None, "ada")).await.unwrap();

    let mut second = Project::new("second", None, "grace");
    second.add_members(["ada"]);
    repo.create(&second).await.unwrap();

    repo.create(&Project::new("third", None, "grace"))
        .await
        .unwrap();

    let projects = repo.list_for_member("ada").await.unwrap();
    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);

    assert!(repo.list_for_member("nobody").await.unwrap().is_empty());
}
