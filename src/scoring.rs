// src/scoring.rs

//! Scoring of a submission against a test's answer key, and the percentage
//! projection shared by submission responses and result listings.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    exam_record::{TestResultEntry, TestResultRow, UserResultEntry, UserResultRow},
    question::Question,
};

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub score: i32,
    pub total: i32,
    /// Full answer key of the test, question id -> letter.
    pub correct_answers: BTreeMap<String, String>,
}

impl Scorecard {
    pub fn percentage(&self) -> f64 {
        percentage(self.score, self.total)
    }
}

/// Scores `answers` against `questions`.
///
/// Every question counts toward `total`. An answer scores only on an exact,
/// case-sensitive match with the stored letter. Keys that do not name one of
/// `questions` are ignored, as are missing answers.
pub fn score_submission(questions: &[Question], answers: &HashMap<String, String>) -> Scorecard {
    let mut score = 0;
    let mut total = 0;
    let mut correct_answers = BTreeMap::new();

    for q in questions {
        let key = q.id.to_string();
        total += 1;
        if answers.get(&key).is_some_and(|given| *given == q.answer) {
            score += 1;
        }
        correct_answers.insert(key, q.answer.clone());
    }

    Scorecard {
        score,
        total,
        correct_answers,
    }
}

/// `100 * score / total`, or `0.0` for a test without questions.
pub fn percentage(score: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total) * 100.0
}

impl From<UserResultRow> for UserResultEntry {
    fn from(row: UserResultRow) -> Self {
        Self {
            test_id: row.test_id,
            test_title: row.test_title,
            score: row.score,
            total: row.total,
            percentage: percentage(row.score, row.total),
            created: row.created_at,
        }
    }
}

impl From<TestResultRow> for TestResultEntry {
    fn from(row: TestResultRow) -> Self {
        Self {
            user_id: row.user_id,
            email: row.email,
            score: row.score,
            total: row.total,
            percentage: percentage(row.score, row.total),
            created: row.created_at,
        }
    }
}
