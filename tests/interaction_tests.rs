// tests/interaction_tests.rs

use skillora_backend::{config::Config, routes, state::AppState};
use sqlx::postgres::PgPoolOptions;

async fn spawn_app() -> Option<String> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        port: 0,
        allowed_origins: vec!["http://localhost:5173".to_string()],
        rust_log: "error".to_string(),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some(address)
}

async fn create_course(client: &reqwest::Client, address: &str) -> serde_json::Value {
    client
        .post(format!("{}/api/courses", address))
        .json(&serde_json::json!({
            "title": "Intro to X",
            "fullDescription": "Everything about X",
            "image": "http://img",
            "createdBy": { "name": "Alice", "id": "u1" }
        }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap()
}

#[tokio::test]
async fn toggle_like_is_an_involution() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let user = uuid::Uuid::new_v4().to_string();

    let course = create_course(&client, &address).await;
    let id = course["_id"].as_str().unwrap();

    // First call likes
    let liked = client
        .post(format!("{}/api/courses/{}/like", address, id))
        .json(&serde_json::json!({ "userId": user }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(liked["likes"], 1);
    assert_eq!(liked["likedBy"], serde_json::json!([user]));

    // Second call with the same identity undoes it
    let unliked = client
        .post(format!("{}/api/courses/{}/like", address, id))
        .json(&serde_json::json!({ "userId": user }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(unliked["likes"], 0);
    assert!(unliked["likedBy"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn toggle_like_counts_each_identity_once() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let user_a = uuid::Uuid::new_v4().to_string();
    let user_b = uuid::Uuid::new_v4().to_string();

    let course = create_course(&client, &address).await;
    let id = course["_id"].as_str().unwrap();

    for user in [&user_a, &user_b] {
        client
            .post(format!("{}/api/courses/{}/like", address, id))
            .json(&serde_json::json!({ "userId": user }))
            .send()
            .await
            .unwrap();
    }

    let course = client
        .post(format!("{}/api/courses/{}/like", address, id))
        .json(&serde_json::json!({ "userId": user_a }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    // A's unlike leaves B's like in place
    assert_eq!(course["likes"], 1);
    assert_eq!(course["likedBy"], serde_json::json!([user_b]));
}

#[tokio::test]
async fn toggle_like_requires_user_id() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();

    let course = create_course(&client, &address).await;
    let id = course["_id"].as_str().unwrap();

    let response = client
        .post(format!("{}/api/courses/{}/like", address, id))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn toggle_like_missing_course_is_not_found() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();

    let response = client
        .post(format!(
            "{}/api/courses/{}/like",
            address,
            uuid::Uuid::new_v4()
        ))
        .json(&serde_json::json!({ "userId": "u1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn favorites_listing_follows_like_state() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();
    let user = uuid::Uuid::new_v4().to_string();

    let course = create_course(&client, &address).await;
    let id = course["_id"].as_str().unwrap();

    client
        .post(format!("{}/api/courses/{}/like", address, id))
        .json(&serde_json::json!({ "userId": user }))
        .send()
        .await
        .unwrap();

    let favorites = client
        .get(format!("{}/api/courses/favorites/{}", address, user))
        .send()
        .await
        .unwrap()
        .json::<Vec<serde_json::Value>>()
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["_id"], id);

    // Unlike empties the favorites view again
    client
        .post(format!("{}/api/courses/{}/like", address, id))
        .json(&serde_json::json!({ "userId": user }))
        .send()
        .await
        .unwrap();

    let favorites = client
        .get(format!("{}/api/courses/favorites/{}", address, user))
        .send()
        .await
        .unwrap()
        .json::<Vec<serde_json::Value>>()
        .await
        .unwrap();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn add_comment_then_delete_restores_sequence() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();

    let course = create_course(&client, &address).await;
    let id = course["_id"].as_str().unwrap();

    let response = client
        .post(format!("{}/api/courses/{}/comment", address, id))
        .json(&serde_json::json!({
            "text": "great!",
            "user": { "name": "Bob", "avatar": "http://a" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["message"], "Comment added successfully");
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], "great!");
    assert!(comments[0]["createdAt"].is_string());

    let comment_id = comments[0]["_id"].as_str().unwrap();
    let response = client
        .delete(format!(
            "{}/api/courses/{}/comment/{}",
            address, id, comment_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["message"], "Comment deleted successfully");
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn add_comment_rejects_incomplete_user() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();

    let course = create_course(&client, &address).await;
    let id = course["_id"].as_str().unwrap();

    // Avatar is required for comments
    let response = client
        .post(format!("{}/api/courses/{}/comment", address, id))
        .json(&serde_json::json!({
            "text": "great!",
            "user": { "name": "Bob" }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn add_comment_missing_course_is_not_found() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();

    let response = client
        .post(format!(
            "{}/api/courses/{}/comment",
            address,
            uuid::Uuid::new_v4()
        ))
        .json(&serde_json::json!({
            "text": "great!",
            "user": { "name": "Bob", "avatar": "http://a" }
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_comment_distinguishes_missing_comment_from_missing_course() {
    let Some(address) = spawn_app().await else { return };
    let client = reqwest::Client::new();

    let course = create_course(&client, &address).await;
    let id = course["_id"].as_str().unwrap();

    client
        .post(format!("{}/api/courses/{}/comment", address, id))
        .json(&serde_json::json!({
            "text": "great!",
            "user": { "name": "Bob", "avatar": "http://a" }
        }))
        .send()
        .await
        .unwrap();

    // Existing course, unknown comment id
    let response = client
        .delete(format!(
            "{}/api/courses/{}/comment/{}",
            address,
            id,
            uuid::Uuid::new_v4()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["error"], "Comment not found");

    // Unknown course
    let response = client
        .delete(format!(
            "{}/api/courses/{}/comment/{}",
            address,
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["error"], "Course not found");
}
