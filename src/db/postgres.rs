// src/db/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

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

/// `QuizRepository` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizRepository for PgRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password, role, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let is_unique_violation = e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if is_unique_violation {
                AppError::Conflict(format!("Email '{}' is already registered", user.email))
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::from(e)
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_test(&self, test: NewTest) -> Result<Test, AppError> {
        sqlx::query_as::<_, Test>(
            r#"
            INSERT INTO tests (title, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, created_by, created_at
            "#,
        )
        .bind(&test.title)
        .bind(&test.description)
        .bind(test.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create test: {:?}", e);
            AppError::from(e)
        })
    }

    async fn find_test(&self, id: i64) -> Result<Option<Test>, AppError> {
        let test = sqlx::query_as::<_, Test>(
            "SELECT id, title, description, created_by, created_at FROM tests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(test)
    }

    async fn list_tests(&self) -> Result<Vec<Test>, AppError> {
        let tests = sqlx::query_as::<_, Test>(
            "SELECT id, title, description, created_by, created_at FROM tests ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tests)
    }

    async fn create_question(&self, question: NewQuestion) -> Result<Question, AppError> {
        sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (test_id, text, option_a, option_b, option_c, option_d, answer)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, test_id, text, option_a, option_b, option_c, option_d, answer
            "#,
        )
        .bind(question.test_id)
        .bind(&question.text)
        .bind(&question.option_a)
        .bind(&question.option_b)
        .bind(&question.option_c)
        .bind(&question.option_d)
        .bind(&question.answer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::from(e)
        })
    }

    async fn questions_for_test(&self, test_id: i64) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, test_id, text, option_a, option_b, option_c, option_d, answer
            FROM questions
            WHERE test_id = $1
            ORDER BY id
            "#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, test_id, text, option_a, option_b, option_c, option_d, answer
            FROM questions
            ORDER BY test_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn create_result(&self, record: NewExamRecord) -> Result<ExamRecord, AppError> {
        sqlx::query_as::<_, ExamRecord>(
            r#"
            INSERT INTO results (user_id, test_id, score, total)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, test_id, score, total, created_at
            "#,
        )
        .bind(record.user_id)
        .bind(record.test_id)
        .bind(record.score)
        .bind(record.total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save result: {:?}", e);
            AppError::from(e)
        })
    }

    async fn results_for_user(&self, user_id: i64) -> Result<Vec<UserResultRow>, AppError> {
        let rows = sqlx::query_as::<_, UserResultRow>(
            r#"
            SELECT r.id, r.test_id, t.title AS test_title, r.score, r.total, r.created_at
            FROM results r
            JOIN tests t ON r.test_id = t.id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC, r.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn results_for_test(&self, test_id: i64) -> Result<Vec<TestResultRow>, AppError> {
        let rows = sqlx::query_as::<_, TestResultRow>(
            r#"
            SELECT r.id, r.user_id, u.email, r.score, r.total, r.created_at
            FROM results r
            JOIN users u ON r.user_id = u.id
            WHERE r.test_id = $1
            ORDER BY r.created_at DESC, r.id ASC
            "#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
