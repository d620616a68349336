//! Integration tests for the User repository using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use termtrack_core::models::user::{Power, User, UserAccount};
use termtrack_core::repository::UserRepository;
use termtrack_db::SurrealUserRepository;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    termtrack_db::run_migrations(&db).await.unwrap();
    db
}

fn account(username: &str) -> UserAccount {
    UserAccount::new(
        User {
            username: username.to_string(),
            full_name: format!("{username} example"),
            profile_picture: None,
        },
        format!("$argon2id$fake-hash-for-{username}"),
    )
}

#[tokio::test]
async fn create_and_find_user() {
    let repo = SurrealUserRepository::new(setup().await);

    repo.create(account("alice")).await.unwrap();

    let found = repo.find("alice").await.unwrap().unwrap();
    assert_eq!(found.username, "alice");
    assert_eq!(found.full_name, "alice example");
    assert_eq!(found.power, Power::User);
    assert!(found.update_projects.is_empty());

    assert!(repo.find("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn get_missing_user_fails() {
    let repo = SurrealUserRepository::new(setup().await);

    let err = repo.get("ghost").await.unwrap_err();
    assert!(err.to_string().contains("not found"), "got: {err}");
}

#[tokio::test]
async fn duplicate_username_rejected() {
    let repo = SurrealUserRepository::new(setup().await);

    repo.create(account("bob")).await.unwrap();
    let result = repo.create(account("bob")).await;

    assert!(result.is_err(), "duplicate username should be rejected");
}

#[tokio::test]
async fn update_profile_changes_mutable_fields() {
    let repo = SurrealUserRepository::new(setup().await);
    repo.create(account("carol")).await.unwrap();

    repo.update_profile(&User {
        username: "carol".to_string(),
        full_name: "Carol Shaw".to_string(),
        profile_picture: Some("https://example.org/carol.png".to_string()),
    })
    .await
    .unwrap();

    let found = repo.find("carol").await.unwrap().unwrap();
    assert_eq!(found.full_name, "Carol Shaw");
    assert_eq!(
        found.profile_picture.as_deref(),
        Some("https://example.org/carol.png")
    );
    // The password hash is untouched by profile updates.
    assert_eq!(found.password_hash, "$argon2id$fake-hash-for-carol");
}

#[tokio::test]
async fn update_profile_for_missing_user_fails() {
    let repo = SurrealUserRepository::new(setup().await);

    let result = repo
        .update_profile(&User {
            username: "ghost".to_string(),
            full_name: "Ghost".to_string(),
            profile_picture: None,
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn set_power_promotes_to_admin() {
    let repo = SurrealUserRepository::new(setup().await);
    repo.create(account("dave")).await.unwrap();

    repo.set_power("dave", Power::Admin).await.unwrap();

    let found = repo.find("dave").await.unwrap().unwrap();
    assert!(found.is_admin());
}

#[tokio::test]
async fn delete_removes_user() {
    let repo = SurrealUserRepository::new(setup().await);
    repo.create(account("erin")).await.unwrap();

    repo.delete("erin").await.unwrap();

    assert!(repo.find("erin").await.unwrap().is_none());
}

#[tokio::test]
async fn search_matches_username_fragments() {
    let repo = SurrealUserRepository::new(setup().await);
    repo.create(account("ada")).await.unwrap();
    repo.create(account("adam")).await.unwrap();
    repo.create(account("grace")).await.unwrap();

    let hits = repo.search("ada").await.unwrap();
    assert_eq!(hits, vec!["ada", "adam"]);

    // An empty fragment matches everyone.
    let all = repo.search("").await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn update_notifications_accumulate_without_duplicates() {
    let repo = SurrealUserRepository::new(setup().await);
    repo.create(account("frank")).await.unwrap();

    repo.push_project_update("frank", "orbit").await.unwrap();
    repo.push_project_update("frank", "orbit").await.unwrap();
    repo.push_project_update("frank", "lander").await.unwrap();

    let pending = repo.take_project_updates("frank").await.unwrap();
    assert_eq!(pending, vec!["orbit", "lander"]);

    // Taking drains the queue.
    let drained = repo.take_project_updates("frank").await.unwrap();
    assert!(drained.is_empty());
}

#[tokio::test]
async fn push_update_for_missing_user_fails() {
    let repo = SurrealUserRepository::new(setup().await);

    let result = repo.push_project_update("ghost", "orbit").await;
    assert!(result.is_err());
}
