// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    db::DynRepository,
    error::AppError,
    models::{
        exam_record::{NewExamRecord, SubmissionResponse, SubmitAnswersRequest},
        question::PublicQuestion,
        test::TestWithQuestions,
    },
    scoring::score_submission,
    utils::{
        extract::{AppJson, AppPath},
        jwt::AuthUser,
    },
};

/// Lists every test with its questions.
///
/// Answer keys are only included for admins; everyone else gets the options alone.
pub async fn list_tests(
    State(repo): State<DynRepository>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let reveal_answers = user.is_admin();
    let tests = repo.list_tests().await?;

    let mut by_test: HashMap<i64, Vec<PublicQuestion>> = HashMap::new();
    for q in repo.list_questions().await? {
        by_test
            .entry(q.test_id)
            .or_default()
            .push(PublicQuestion::from_question(q, reveal_answers));
    }

    let tests: Vec<TestWithQuestions> = tests
        .into_iter()
        .map(|test| {
            let questions = by_test.remove(&test.id).unwrap_or_default();
            TestWithQuestions { test, questions }
        })
        .collect();

    Ok(Json(json!({ "tests": tests })))
}

/// Fetches a single test with its questions.
pub async fn get_test(
    State(repo): State<DynRepository>,
    user: AuthUser,
    AppPath(test_id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let test = repo
        .find_test(test_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test {} not found", test_id)))?;

    let reveal_answers = user.is_admin();
    let questions = repo
        .questions_for_test(test_id)
        .await?
        .into_iter()
        .map(|q| PublicQuestion::from_question(q, reveal_answers))
        .collect();

    Ok(Json(TestWithQuestions { test, questions }))
}

/// Scores a submission and records the attempt.
///
/// * Every question of the test counts toward `total`.
/// * Answers for ids outside the test are ignored; missing answers score nothing.
/// * Each call appends a new result row, so retakes are kept side by side.
pub async fn submit_test(
    State(repo): State<DynRepository>,
    user: AuthUser,
    AppPath(test_id): AppPath<i64>,
    AppJson(req): AppJson<SubmitAnswersRequest>,
) -> Result<impl IntoResponse, AppError> {
    repo.find_test(test_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test {} not found", test_id)))?;

    let questions = repo.questions_for_test(test_id).await?;
    let card = score_submission(&questions, &req.answers);

    let record = repo
        .create_result(NewExamRecord {
            user_id: user.id,
            test_id,
            score: card.score,
            total: card.total,
        })
        .await?;

    tracing::info!(
        result_id = record.id,
        user_id = user.id,
        test_id,
        score = card.score,
        total = card.total,
        "Recorded submission"
    );

    let percentage = card.percentage();
    Ok(Json(SubmissionResponse {
        score: card.score,
        total: card.total,
        percentage,
        correct_answers: card.correct_answers,
    }))
}
