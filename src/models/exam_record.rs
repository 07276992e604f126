// src/models/exam_record.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'results' table in the database.
/// One row per submission; rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: i64,
    pub user_id: i64,
    pub test_id: i64,
    pub score: i32,
    /// Question count of the test at submission time.
    pub total: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExamRecord {
    pub user_id: i64,
    pub test_id: i64,
    pub score: i32,
    pub total: i32,
}

/// DTO for submitting answers to a test.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    /// Key: question id as a string. Value: chosen letter.
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub score: i32,
    pub total: i32,
    pub percentage: f64,
    pub correct_answers: BTreeMap<String, String>,
}

/// A result row joined with its test title.
#[derive(Debug, Clone, FromRow)]
pub struct UserResultRow {
    pub id: i64,
    pub test_id: i64,
    pub test_title: String,
    pub score: i32,
    pub total: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A result row joined with its user's email.
#[derive(Debug, Clone, FromRow)]
pub struct TestResultRow {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub score: i32,
    pub total: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Entry of the caller's own result history.
#[derive(Debug, Serialize)]
pub struct UserResultEntry {
    pub test_id: i64,
    pub test_title: String,
    pub score: i32,
    pub total: i32,
    pub percentage: f64,
    pub created: chrono::DateTime<chrono::Utc>,
}

/// Entry of a test's result roster.
#[derive(Debug, Serialize)]
pub struct TestResultEntry {
    pub user_id: i64,
    pub email: String,
    pub score: i32,
    pub total: i32,
    pub percentage: f64,
    pub created: chrono::DateTime<chrono::Utc>,
}
