use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use blog_core::ports::{BaseRepository, PostRepository};
use blog_shared::ErrorResponse;
use blog_shared::dto::PostResponse;

use crate::helpers::{SEED_COUNT, TestApp, generate_post_data};

#[tokio::test]
async fn get_returns_all_existing_posts() {
    let app = TestApp::spawn().await;

    let response = app.get_posts().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Vec<Value> = response.json().await.unwrap();
    assert!(body.len() >= SEED_COUNT);

    let count = app.posts.list_all().await.unwrap().len();
    assert!(body.len() >= count);

    app.teardown().await;
}

#[tokio::test]
async fn get_returns_posts_with_right_fields() {
    let app = TestApp::spawn().await;

    let response = app.get_posts().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );

    let body: Vec<Value> = response.json().await.unwrap();
    assert!(!body.is_empty());
    for post in &body {
        let object = post.as_object().expect("each post is an object");
        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["author", "content", "created", "id", "title"]);
    }

    let first: PostResponse = serde_json::from_value(body[0].clone()).unwrap();
    let stored = app
        .posts
        .find_by_id(first.id.parse().unwrap())
        .await
        .unwrap()
        .expect("listed post is stored");
    assert_eq!(first.id, stored.id.to_string());
    assert_eq!(first.title, stored.title);
    assert_eq!(first.content, stored.content);
    assert_eq!(first.author, stored.author.full_name());

    app.teardown().await;
}

#[tokio::test]
async fn get_by_id_returns_the_post() {
    let app = TestApp::spawn().await;
    let stored = app.posts.list_all().await.unwrap().remove(0);

    let response = app.get_post(&stored.id.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: PostResponse = response.json().await.unwrap();
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        serde_json::to_value(stored.serialize()).unwrap()
    );

    app.teardown().await;
}

#[tokio::test]
async fn get_by_id_reports_missing_and_malformed_ids() {
    let app = TestApp::spawn().await;

    let id = Uuid::new_v4().to_string();
    let missing = app.get_post(&id).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let request_id = missing.headers()["x-request-id"].to_str().unwrap().to_owned();
    let problem: ErrorResponse = missing.json().await.unwrap();
    assert_eq!(problem.instance, Some(format!("/posts/{}", id)));
    assert_eq!(problem.request_id, Some(request_id));

    let malformed = app.get_post("not-a-post-id").await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    app.teardown().await;
}

#[tokio::test]
async fn post_adds_a_new_post() {
    let app = TestApp::spawn().await;
    let new_post = generate_post_data();
    let author = new_post.author.clone().unwrap();

    let response = app.post_post(&new_post).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: PostResponse = response.json().await.unwrap();
    assert_eq!(Some(&body.title), new_post.title.as_ref());
    assert_eq!(Some(&body.content), new_post.content.as_ref());
    assert_eq!(
        body.author,
        format!(
            "{} {}",
            author.first_name.as_deref().unwrap(),
            author.last_name.as_deref().unwrap()
        )
    );

    let stored = app
        .posts
        .find_by_id(body.id.parse().unwrap())
        .await
        .unwrap()
        .expect("created post is stored");
    assert_eq!(Some(&stored.title), new_post.title.as_ref());
    assert_eq!(Some(&stored.author.first_name), author.first_name.as_ref());
    assert_eq!(Some(&stored.author.last_name), author.last_name.as_ref());
    assert_eq!(Some(&stored.content), new_post.content.as_ref());

    app.teardown().await;
}

#[tokio::test]
async fn post_returns_the_create_contract() {
    let app = TestApp::spawn().await;

    let response = app
        .post_post(&json!({
            "title": "T",
            "author": {"firstName": "F", "lastName": "L"},
            "content": "C"
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert!(body["id"].is_string());
    assert_eq!(body["title"], "T");
    assert_eq!(body["author"], "F L");
    assert_eq!(body["content"], "C");
    assert!(body["created"].is_string());

    app.teardown().await;
}

#[tokio::test]
async fn post_rejects_missing_required_fields() {
    let app = TestApp::spawn().await;
    let before = app.posts.list_all().await.unwrap().len();

    let cases = [
        json!({"author": {"firstName": "F", "lastName": "L"}, "content": "C"}),
        json!({"title": "T", "content": "C"}),
        json!({"title": "T", "author": {"firstName": "F"}, "content": "C"}),
        json!({"title": "T", "author": {"firstName": "F", "lastName": "L"}}),
    ];
    for body in &cases {
        let response = app.post_post(body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }

    assert_eq!(app.posts.list_all().await.unwrap().len(), before);

    app.teardown().await;
}

#[tokio::test]
async fn put_updates_only_the_fields_sent() {
    let app = TestApp::spawn().await;
    let original = app.posts.list_all().await.unwrap().remove(0);

    let response = app
        .put_post(
            &original.id.to_string(),
            &json!({"id": original.id.to_string(), "title": "new title"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let updated = app.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "new title");
    assert_eq!(updated.content, original.content);
    assert_eq!(updated.author, original.author);
    assert_eq!(updated.created, original.created);

    app.teardown().await;
}

#[tokio::test]
async fn put_rejects_mismatched_ids() {
    let app = TestApp::spawn().await;
    let original = app.posts.list_all().await.unwrap().remove(0);

    let response = app
        .put_post(
            &original.id.to_string(),
            &json!({"id": Uuid::new_v4().to_string(), "title": "new title"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing_id = app
        .put_post(&original.id.to_string(), &json!({"title": "new title"}))
        .await;
    assert_eq!(missing_id.status(), StatusCode::BAD_REQUEST);

    let stored = app.posts.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.title, original.title);

    app.teardown().await;
}

#[tokio::test]
async fn delete_removes_a_post_by_id() {
    let app = TestApp::spawn().await;
    let post = app.posts.list_all().await.unwrap().remove(0);

    let response = app.delete_post(&post.id.to_string()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.posts.find_by_id(post.id).await.unwrap().is_none());

    let again = app.delete_post(&post.id.to_string()).await;
    assert_eq!(again.status(), StatusCode::NO_CONTENT);

    app.teardown().await;
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::spawn().await;

    let response = app.get_posts().await;
    assert!(response.headers().contains_key("x-request-id"));

    app.teardown().await;
}
