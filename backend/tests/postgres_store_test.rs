//! PostgreSQL adapter tests
//!
//! Run with `TEST_DATABASE_URL` pointing at a scratch database:
//! `cargo test -- --ignored`

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use todo_backend::repositories::{
    NewTask, NewUser, PgTaskRepository, PgUserRepository, StoreError, TaskChanges, TaskStore,
    UserStore,
};
use uuid::Uuid;

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4())
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        phone: "123".to_string(),
        password_hash: "hash".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_email_hits_unique_constraint() {
    let (_app, pool) = TestApp::with_postgres().await;
    let users = PgUserRepository::new(pool);
    let email = unique_email("duplicate");

    users.create(new_user(&email)).await.unwrap();
    let err = users.create(new_user(&email)).await.unwrap_err();

    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_task_update_and_owner_scoped_delete() {
    let (_app, pool) = TestApp::with_postgres().await;
    let users = PgUserRepository::new(pool.clone());
    let tasks = PgTaskRepository::new(pool);

    let owner = users.create(new_user(&unique_email("owner"))).await.unwrap();
    let task = tasks
        .create(NewTask {
            owner_id: owner.id,
            title: "T".to_string(),
            description: "D".to_string(),
        })
        .await
        .unwrap();
    assert!(!task.status);

    let updated = tasks
        .update(
            task.id,
            TaskChanges {
                status: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "T");
    assert!(updated.status);
    assert!(updated.updated_at >= task.updated_at);

    let err = tasks.delete(task.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));

    tasks.delete(task.id, owner.id).await.unwrap();
    assert!(tasks.find_by_id(task.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_http_flow_against_database() {
    let (app, _pool) = TestApp::with_postgres().await;
    let token = app.register_and_login(&unique_email("flow")).await;

    let (status, body) = app
        .post("/api/tasks", Some(&token), json!({ "title": "T", "description": "D" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let path = format!("/api/tasks/{}", body["data"]["id"].as_str().unwrap());
    let (status, _) = app.delete(&path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&path, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
