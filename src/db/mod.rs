// src/db/mod.rs

//! Persistence gateway.
//!
//! Handlers only talk to storage through [`QuizRepository`]. `PgRepository`
//! is the production backend; `MemoryRepository` backs tests and local runs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        exam_record::{ExamRecord, NewExamRecord, TestResultRow, UserResultRow},
        question::{NewQuestion, Question},
        test::{NewTest, Test},
        user::{NewUser, User},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Shared handle injected into the router state.
pub type DynRepository = Arc<dyn QuizRepository>;

#[async_trait]
pub trait QuizRepository: Send + Sync {
    // ==================== Users ====================

    /// Inserts a user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    // ==================== Tests ====================

    async fn create_test(&self, test: NewTest) -> Result<Test, AppError>;

    async fn find_test(&self, id: i64) -> Result<Option<Test>, AppError>;

    /// All tests, ordered by id.
    async fn list_tests(&self) -> Result<Vec<Test>, AppError>;

    // ==================== Questions ====================

    async fn create_question(&self, question: NewQuestion) -> Result<Question, AppError>;

    /// Questions of one test, ordered by id.
    async fn questions_for_test(&self, test_id: i64) -> Result<Vec<Question>, AppError>;

    /// Every question of every test, ordered by test id then id.
    async fn list_questions(&self) -> Result<Vec<Question>, AppError>;

    // ==================== Results ====================

    async fn create_result(&self, record: NewExamRecord) -> Result<ExamRecord, AppError>;

    /// Results of one user joined with the test title, newest first.
    async fn results_for_user(&self, user_id: i64) -> Result<Vec<UserResultRow>, AppError>;

    /// Results of one test joined with the user email, newest first.
    async fn results_for_test(&self, test_id: i64) -> Result<Vec<TestResultRow>, AppError>;
}
