// src/models/test.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::grading::{Marks, MatchColumn, QuestionKind};
use crate::models::question::QuestionDetail;

pub const STATUS_DRAFT: &str = "DRAFT";
pub const STATUS_ACTIVE: &str = "ACTIVE";

/// Represents the 'tests' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Test {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub duration_minutes: i32,
    pub instructions: String,
    pub passing_marks: i32,
    /// When set, numerical answers are graded within this epsilon instead of
    /// by exact string comparison.
    pub numeric_tolerance: Option<f64>,
    /// 'DRAFT' or 'ACTIVE'. Only ACTIVE tests are visible to students.
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Summary row for the teacher dashboard.
#[derive(Debug, Serialize, FromRow)]
pub struct TestSummary {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub duration_minutes: i32,
    pub status: String,
    pub question_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A test visible on the student dashboard, joined with its author.
#[derive(Debug, Serialize, FromRow)]
pub struct AvailableTest {
    pub id: i64,
    pub title: String,
    pub subject: String,
    pub duration_minutes: i32,
    pub teacher_name: String,
    pub question_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Full test definition returned to the authoring teacher.
#[derive(Debug, Serialize)]
pub struct TestDetail {
    #[serde(flatten)]
    pub test: Test,
    pub questions: Vec<QuestionDetail>,
}

/// DTO for creating or fully replacing a test, with nested questions.
///
/// A published test is never edited in place: an update atomically deletes
/// and recreates every question and option.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveTestRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: i32,
    #[validate(length(max = 10000))]
    pub instructions: Option<String>,
    #[validate(range(min = 0))]
    pub passing_marks: i32,
    #[validate(range(min = 0.0))]
    pub numeric_tolerance: Option<f64>,
    #[validate(custom(function = validate_status))]
    pub status: String,
    #[validate(length(min = 1, message = "A test needs at least one question."), nested)]
    pub questions: Vec<SaveQuestionRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SaveQuestionRequest {
    #[serde(rename = "type")]
    #[validate(custom(function = validate_question_type))]
    pub question_type: String,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[validate(custom(function = validate_marks))]
    pub marks: Marks,
    /// Reference answer, required for NUMERICAL questions.
    pub correct_answer: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub options: Vec<SaveOptionRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SaveOptionRequest {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    /// Correct column letter, only meaningful for MATRIX_MATCH rows.
    #[validate(custom(function = validate_match_column))]
    pub match_column: Option<String>,
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    if status != STATUS_DRAFT && status != STATUS_ACTIVE {
        return Err(validator::ValidationError::new("invalid_status"));
    }
    Ok(())
}

fn validate_question_type(question_type: &str) -> Result<(), validator::ValidationError> {
    if QuestionKind::parse(question_type).is_none() {
        return Err(validator::ValidationError::new("invalid_question_type"));
    }
    Ok(())
}

fn validate_marks(marks: &Marks) -> Result<(), validator::ValidationError> {
    // Negative marking is expressed as a non-positive incorrect value.
    if marks.incorrect > 0 {
        return Err(validator::ValidationError::new(
            "incorrect_marks_must_not_be_positive",
        ));
    }
    if marks.correct < 0 {
        return Err(validator::ValidationError::new(
            "correct_marks_must_not_be_negative",
        ));
    }
    Ok(())
}

fn validate_match_column(column: &str) -> Result<(), validator::ValidationError> {
    if MatchColumn::parse(column).is_none() {
        return Err(validator::ValidationError::new("invalid_match_column"));
    }
    Ok(())
}
