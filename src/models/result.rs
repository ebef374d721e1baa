// src/models/result.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::prelude::FromRow;
use sqlx::types::Json;

/// Represents the 'test_results' table in the database.
///
/// Created exactly once per (test, student) pair by the submission flow and
/// read-only thereafter; the raw answers are retained so review payloads can
/// be recomputed with the same grading functions that produced the score.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TestResult {
    pub id: i64,
    pub test_id: i64,
    pub student_id: i64,
    pub score: i32,
    pub total_marks: i32,
    /// 'PASSED' or 'FAILED'.
    pub status: String,
    /// Raw submitted answers keyed by question id.
    #[serde(skip)]
    pub answers: Json<HashMap<i64, Value>>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// A completed test on the student dashboard, joined with test metadata.
#[derive(Debug, Serialize, FromRow)]
pub struct CompletedTest {
    pub id: i64,
    pub test_id: i64,
    pub test_title: String,
    pub subject: String,
    pub score: i32,
    pub total_marks: i32,
    pub status: String,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting a test attempt.
///
/// Values are kept as raw JSON: the normalizer decides per question type
/// whether a value is a choice id, a set of ids, a numeric string, or a
/// matrix vector, and malformed entries degrade to "unattempted".
#[derive(Debug, Deserialize)]
pub struct SubmitTestRequest {
    pub answers: HashMap<i64, Value>,
}
