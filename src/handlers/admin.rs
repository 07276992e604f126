// src/handlers/admin.rs

//! Test authoring. Every handler here takes `AdminUser`, so non-admin callers
//! are rejected with 403 before any work is done.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    db::DynRepository,
    error::AppError,
    models::{question::CreateQuestionRequest, test::CreateTestRequest, test::NewTest},
    utils::{
        extract::{AppJson, AppPath},
        html::clean_rich_text,
        jwt::AdminUser,
    },
};

/// Admin landing endpoint; doubles as a check that a token carries the admin role.
pub async fn dashboard(AdminUser(admin): AdminUser) -> impl IntoResponse {
    Json(json!({ "message": format!("Hello, {}!", admin.email) }))
}

/// Creates a new test owned by the calling admin.
pub async fn create_test(
    State(repo): State<DynRepository>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<CreateTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let test = repo
        .create_test(NewTest {
            title: payload.title.trim().to_string(),
            description: clean_rich_text(&payload.description),
            created_by: admin.id,
        })
        .await?;

    tracing::info!(test_id = test.id, admin_id = admin.id, "Created test");

    Ok((StatusCode::CREATED, Json(test)))
}

/// Attaches a question to an existing test. 404 if the test does not exist.
pub async fn add_question(
    State(repo): State<DynRepository>,
    AdminUser(admin): AdminUser,
    AppPath(test_id): AppPath<i64>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    repo.find_test(test_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test {} not found", test_id)))?;

    let question = repo
        .create_question(payload.into_new_question(test_id))
        .await?;

    tracing::info!(
        test_id,
        question_id = question.id,
        admin_id = admin.id,
        "Added question"
    );

    Ok((StatusCode::CREATED, Json(question)))
}
