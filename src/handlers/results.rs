// src/handlers/results.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    db::DynRepository,
    error::AppError,
    models::exam_record::{TestResultEntry, UserResultEntry},
    utils::{
        extract::AppPath,
        jwt::{AdminUser, AuthUser},
    },
};

/// The caller's own attempts, newest first.
pub async fn my_results(
    State(repo): State<DynRepository>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let results: Vec<UserResultEntry> = repo
        .results_for_user(user.id)
        .await?
        .into_iter()
        .map(UserResultEntry::from)
        .collect();

    Ok(Json(json!({ "results": results })))
}

/// Every attempt at one test, newest first. Admin only.
pub async fn test_results(
    State(repo): State<DynRepository>,
    _admin: AdminUser,
    AppPath(test_id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    repo.find_test(test_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test {} not found", test_id)))?;

    let results: Vec<TestResultEntry> = repo
        .results_for_test(test_id)
        .await?
        .into_iter()
        .map(TestResultEntry::from)
        .collect();

    Ok(Json(json!({ "results": results })))
}
