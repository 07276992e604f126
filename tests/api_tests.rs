// tests/api_tests.rs

use std::sync::Arc;

use quizdesk::{
    config::Config,
    db::{MemoryRepository, QuizRepository},
    models::user::{NewUser, ROLE_ADMIN},
    routes,
    state::AppState,
    utils::hash::hash_password,
};
use serde_json::{Value, json};

struct TestApp {
    address: String,
    repo: Arc<MemoryRepository>,
    client: reqwest::Client,
}

/// Spawns the app on a random port, backed by a fresh in-memory repository.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::new());

    let config = Config {
        database_url: "memory://".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        server_port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        admin_email: None,
        admin_password: None,
    };

    let state = AppState {
        repo: repo.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        repo,
        client: reqwest::Client::new(),
    }
}

fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .expect("Failed to parse login json");
        body["token"].as_str().expect("Token not found").to_string()
    }

    async fn user_token(&self) -> String {
        let email = unique_email("user");
        self.register(&email, "password123").await;
        self.login(&email, "password123").await
    }

    /// Admins can't self-register; insert one directly and log in.
    async fn admin_token(&self) -> String {
        let email = unique_email("admin");
        self.repo
            .create_user(NewUser {
                email: email.clone(),
                password: hash_password("adminpass".to_string()).await.unwrap(),
                role: ROLE_ADMIN.to_string(),
            })
            .await
            .unwrap();
        self.login(&email, "adminpass").await
    }
}

#[tokio::test]
async fn health_check_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/random_path_that_does_not_exist"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    let app = spawn_app().await;
    let email = unique_email("u");

    let response = app.register(&email, "password123").await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "user");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    let app = spawn_app().await;

    let response = app.register("not-an-email", "password123").await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let app = spawn_app().await;
    let email = unique_email("dup");

    assert_eq!(app.register(&email, "password123").await.status().as_u16(), 201);
    assert_eq!(app.register(&email, "password456").await.status().as_u16(), 409);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = spawn_app().await;
    let email = unique_email("u");
    app.register(&email, "password123").await;

    let response = app
        .client
        .post(app.url("/login"))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn profile_reflects_token() {
    let app = spawn_app().await;
    let email = unique_email("p");
    app.register(&email, "password123").await;
    let token = app.login(&email, "password123").await;

    let profile: Value = app
        .client
        .get(app.url("/api/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(profile["email"], email);
    assert_eq!(profile["role"], "user");
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = spawn_app().await;

    let missing = app.client.get(app.url("/api/tests")).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 401);

    let garbage = app
        .client
        .get(app.url("/api/tests"))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status().as_u16(), 401);
}

#[tokio::test]
async fn plain_users_cannot_author_tests() {
    let app = spawn_app().await;
    let token = app.user_token().await;

    let response = app
        .client
        .post(app.url("/api/admin/tests"))
        .bearer_auth(&token)
        .json(&json!({ "title": "Sneaky" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn create_test_requires_title() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    for body in [json!({ "description": "no title" }), json!({ "title": "" })] {
        let response = app
            .client
            .post(app.url("/api/admin/tests"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "body: {}", body);
    }

    let tests: Value = app
        .client
        .get(app.url("/api/tests"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tests["tests"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_test_sanitizes_description() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/admin/tests"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Rust basics",
            "description": "<b>Ownership</b><script>alert(1)</script>"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let test: Value = response.json().await.unwrap();
    assert_eq!(test["title"], "Rust basics");
    assert_eq!(test["description"], "<b>Ownership</b>");
}

#[tokio::test]
async fn add_question_validates_input() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let test: Value = app
        .client
        .post(app.url("/api/admin/tests"))
        .bearer_auth(&token)
        .json(&json!({ "title": "T1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let test_id = test["id"].as_i64().unwrap();

    let bad_answer = app
        .client
        .post(app.url(&format!("/api/admin/tests/{}/questions", test_id)))
        .bearer_auth(&token)
        .json(&json!({
            "text": "Pick one",
            "optionA": "1", "optionB": "2", "optionC": "3", "optionD": "4",
            "answer": "E"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_answer.status().as_u16(), 400);

    let missing_option = app
        .client
        .post(app.url(&format!("/api/admin/tests/{}/questions", test_id)))
        .bearer_auth(&token)
        .json(&json!({ "text": "Pick one", "optionA": "1", "answer": "A" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_option.status().as_u16(), 400);

    let bad_id = app
        .client
        .post(app.url("/api/admin/tests/abc/questions"))
        .bearer_auth(&token)
        .json(&json!({
            "text": "Pick one",
            "optionA": "1", "optionB": "2", "optionC": "3", "optionD": "4",
            "answer": "A"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_id.status().as_u16(), 400);

    // Nothing was persisted by the failed calls.
    let detail: Value = app
        .client
        .get(app.url(&format!("/api/tests/{}", test_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["questions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn add_question_to_missing_test_is_404() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/admin/tests/999999/questions"))
        .bearer_auth(&token)
        .json(&json!({
            "text": "Orphan?",
            "optionA": "1", "optionB": "2", "optionC": "3", "optionD": "4",
            "answer": "A"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert!(app.repo.list_questions().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_400_with_error_body() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/admin/tests"))
        .bearer_auth(&token)
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
