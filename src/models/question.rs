// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::models::test::validate_not_blank;

/// The four fixed choices a question can be answered with.
pub const ANSWER_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub test_id: i64,

    /// The text content of the question.
    pub text: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// The correct letter, one of `ANSWER_LETTERS`.
    pub answer: String,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub test_id: i64,
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub answer: String,
}

/// DTO for sending a question to a client.
/// `answer` is only present when the caller may see the key.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub test_id: i64,
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl PublicQuestion {
    pub fn from_question(q: Question, reveal_answer: bool) -> Self {
        Self {
            id: q.id,
            test_id: q.test_id,
            text: q.text,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
            answer: reveal_answer.then_some(q.answer),
        }
    }
}

/// DTO for creating a new question.
/// Accepts both `optionA` and `option_a` spellings.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000), custom(function = validate_not_blank))]
    pub text: String,
    #[serde(rename = "optionA", alias = "option_a")]
    #[validate(length(min = 1, max = 500), custom(function = validate_not_blank))]
    pub option_a: String,
    #[serde(rename = "optionB", alias = "option_b")]
    #[validate(length(min = 1, max = 500), custom(function = validate_not_blank))]
    pub option_b: String,
    #[serde(rename = "optionC", alias = "option_c")]
    #[validate(length(min = 1, max = 500), custom(function = validate_not_blank))]
    pub option_c: String,
    #[serde(rename = "optionD", alias = "option_d")]
    #[validate(length(min = 1, max = 500), custom(function = validate_not_blank))]
    pub option_d: String,
    #[validate(custom(function = validate_answer_letter))]
    pub answer: String,
}

impl CreateQuestionRequest {
    pub fn into_new_question(self, test_id: i64) -> NewQuestion {
        NewQuestion {
            test_id,
            text: self.text,
            option_a: self.option_a,
            option_b: self.option_b,
            option_c: self.option_c,
            option_d: self.option_d,
            answer: self.answer,
        }
    }
}

/// Case-sensitive: only the uppercase letters are accepted.
fn validate_answer_letter(answer: &str) -> Result<(), validator::ValidationError> {
    if !ANSWER_LETTERS.contains(&answer) {
        let mut err = validator::ValidationError::new("invalid_answer");
        err.message = Some("answer must be one of A, B, C, D".into());
        return Err(err);
    }
    Ok(())
}
