// src/db/memory.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    db::QuizRepository,
    error::AppError,
    models::{
        exam_record::{ExamRecord, NewExamRecord, TestResultRow, UserResultRow},
        question::{NewQuestion, Question},
        test::{NewTest, Test},
        user::{NewUser, User},
    },
};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tests: Vec<Test>,
    questions: Vec<Question>,
    results: Vec<ExamRecord>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process `QuizRepository`. Rows live in insertion order.
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    clock: Clock,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Uses `clock` for every `created_at` instead of the wall clock.
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            tables: RwLock::new(Tables::default()),
            clock: Arc::new(clock),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

/// Newest first; rows with equal timestamps keep insertion order.
fn newest_first<T>(rows: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl QuizRepository for MemoryRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        let row = User {
            id: tables.next_id(),
            email: user.email,
            password: user.password,
            role: user.role,
            created_at: self.now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_test(&self, test: NewTest) -> Result<Test, AppError> {
        let mut tables = self.tables.write().await;
        let row = Test {
            id: tables.next_id(),
            title: test.title,
            description: test.description,
            created_by: test.created_by,
            created_at: self.now(),
        };
        tables.tests.push(row.clone());
        Ok(row)
    }

    async fn find_test(&self, id: i64) -> Result<Option<Test>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tests.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tests(&self) -> Result<Vec<Test>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tests.clone())
    }

    async fn create_question(&self, question: NewQuestion) -> Result<Question, AppError> {
        let mut tables = self.tables.write().await;
        let row = Question {
            id: tables.next_id(),
            test_id: question.test_id,
            text: question.text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            answer: question.answer,
        };
        tables.questions.push(row.clone());
        Ok(row)
    }

    async fn questions_for_test(&self, test_id: i64) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.test_id == test_id)
            .cloned()
            .collect())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        let mut questions = tables.questions.clone();
        questions.sort_by_key(|q| (q.test_id, q.id));
        Ok(questions)
    }

    async fn create_result(&self, record: NewExamRecord) -> Result<ExamRecord, AppError> {
        let mut tables = self.tables.write().await;
        let row = ExamRecord {
            id: tables.next_id(),
            user_id: record.user_id,
            test_id: record.test_id,
            score: record.score,
            total: record.total,
            created_at: self.now(),
        };
        tables.results.push(row.clone());
        Ok(row)
    }

    async fn results_for_user(&self, user_id: i64) -> Result<Vec<UserResultRow>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<UserResultRow> = tables
            .results
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let test = tables.tests.iter().find(|t| t.id == r.test_id)?;
                Some(UserResultRow {
                    id: r.id,
                    test_id: r.test_id,
                    test_title: test.title.clone(),
                    score: r.score,
                    total: r.total,
                    created_at: r.created_at,
                })
            })
            .collect();
        newest_first(&mut rows, |r| r.created_at);
        Ok(rows)
    }

    async fn results_for_test(&self, test_id: i64) -> Result<Vec<TestResultRow>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<TestResultRow> = tables
            .results
            .iter()
            .filter(|r| r.test_id == test_id)
            .filter_map(|r| {
                let user = tables.users.iter().find(|u| u.id == r.user_id)?;
                Some(TestResultRow {
                    id: r.id,
                    user_id: r.user_id,
                    email: user.email.clone(),
                    score: r.score,
                    total: r.total,
                    created_at: r.created_at,
                })
            })
            .collect();
        newest_first(&mut rows, |r| r.created_at);
        Ok(rows)
    }
}
