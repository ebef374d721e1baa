// src/handlers/student.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use sqlx::types::Json as SqlJson;

use crate::{
    error::AppError,
    grading::{GradingOptions, QuestionSpec, explain_result, grade_submission},
    handlers::load_questions,
    models::{
        question::PublicQuestion,
        result::{CompletedTest, SubmitTestRequest, TestResult},
        test::{AvailableTest, STATUS_ACTIVE, Test},
    },
    utils::jwt::Claims,
};

/// Student dashboard: active tests from linked teachers plus completed
/// results.
pub async fn dashboard(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id();

    let available = sqlx::query_as::<_, AvailableTest>(
        "SELECT t.id, t.title, t.subject, t.duration_minutes, t.created_at,
                u.name AS teacher_name,
                (SELECT COUNT(*) FROM questions q WHERE q.test_id = t.id) AS question_count
         FROM tests t
         JOIN users u ON u.id = t.teacher_id
         JOIN teacher_students ts ON ts.teacher_id = t.teacher_id
         WHERE ts.student_id = $1 AND t.status = $2
         ORDER BY t.created_at DESC",
    )
    .bind(student_id)
    .bind(STATUS_ACTIVE)
    .fetch_all(&pool)
    .await?;

    let completed = sqlx::query_as::<_, CompletedTest>(
        "SELECT r.id, r.test_id, t.title AS test_title, t.subject,
                r.score, r.total_marks, r.status, r.completed_at
         FROM test_results r
         JOIN tests t ON t.id = r.test_id
         WHERE r.student_id = $1
         ORDER BY r.completed_at DESC",
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(serde_json::json!({
        "available_tests": available,
        "completed_tests": completed,
    })))
}

/// Returns the test a student is about to take: metadata and questions
/// stripped of everything that would reveal the answer key.
///
/// Rejected with 409 when the student has already submitted this test.
pub async fn get_test(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id();
    let test = fetch_accessible_test(&pool, id, student_id).await?;

    ensure_not_taken(&pool, test.id, student_id).await?;

    let questions: Vec<PublicQuestion> = load_questions(&pool, test.id)
        .await?
        .into_iter()
        .map(|(question, options)| PublicQuestion::from_rows(question, options))
        .collect();

    Ok(Json(serde_json::json!({
        "id": test.id,
        "title": test.title,
        "description": test.description,
        "subject": test.subject,
        "duration_minutes": test.duration_minutes,
        "instructions": test.instructions,
        "total_questions": questions.len(),
        "questions": questions,
    })))
}

/// Grades a submission and stores the result.
///
/// Grading is pure and side-effect-free; the at-most-once guarantee lives in
/// the UNIQUE (test_id, student_id) constraint, so a concurrent duplicate
/// submission loses the insert race and gets a 409 instead of double-scoring.
pub async fn submit_test(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<SubmitTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id();
    let test = fetch_accessible_test(&pool, id, student_id).await?;

    let specs = load_specs(&pool, test.id).await?;
    let options = GradingOptions::for_tolerance(test.numeric_tolerance);

    let graded = grade_submission(&specs, &payload.answers, test.passing_marks, &options);

    let inserted: Option<(i64,)> = sqlx::query_as(
        "INSERT INTO test_results (test_id, student_id, score, total_marks, status, answers)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (test_id, student_id) DO NOTHING
         RETURNING id",
    )
    .bind(test.id)
    .bind(student_id)
    .bind(graded.score)
    .bind(graded.total_marks)
    .bind(graded.status.as_str())
    .bind(SqlJson(&payload.answers))
    .fetch_optional(&pool)
    .await?;

    let (result_id,) = inserted.ok_or(AppError::Conflict(
        "You have already taken this test".to_string(),
    ))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "result_id": result_id,
            "score": graded.score,
            "total_marks": graded.total_marks,
            "status": graded.status,
        })),
    ))
}

/// Returns a stored result together with per-question review detail,
/// recomputed from the stored answers by the same grading functions that
/// produced the score.
pub async fn get_result(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id();

    let result = sqlx::query_as::<_, TestResult>(
        "SELECT id, test_id, student_id, score, total_marks, status, answers, completed_at
         FROM test_results
         WHERE id = $1 AND student_id = $2",
    )
    .bind(id)
    .bind(student_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Result not found".to_string()))?;

    let test = sqlx::query_as::<_, Test>(
        "SELECT id, teacher_id, title, description, subject, duration_minutes,
                instructions, passing_marks, numeric_tolerance, status, created_at
         FROM tests
         WHERE id = $1",
    )
    .bind(result.test_id)
    .fetch_one(&pool)
    .await?;

    let specs = load_specs(&pool, test.id).await?;
    let options = GradingOptions::for_tolerance(test.numeric_tolerance);
    let questions = explain_result(&specs, &result.answers.0, &options);

    Ok(Json(serde_json::json!({
        "id": result.id,
        "test_id": result.test_id,
        "test_title": test.title,
        "subject": test.subject,
        "score": result.score,
        "total_marks": result.total_marks,
        "passing_marks": test.passing_marks,
        "status": result.status,
        "completed_at": result.completed_at,
        "questions": questions,
    })))
}

/// Fetches an ACTIVE test authored by one of the student's linked teachers.
async fn fetch_accessible_test(
    pool: &PgPool,
    id: i64,
    student_id: i64,
) -> Result<Test, AppError> {
    sqlx::query_as::<_, Test>(
        "SELECT t.id, t.teacher_id, t.title, t.description, t.subject, t.duration_minutes,
                t.instructions, t.passing_marks, t.numeric_tolerance, t.status, t.created_at
         FROM tests t
         JOIN teacher_students ts ON ts.teacher_id = t.teacher_id
         WHERE t.id = $1 AND ts.student_id = $2 AND t.status = $3",
    )
    .bind(id)
    .bind(student_id)
    .bind(STATUS_ACTIVE)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound(
        "Test not found or not available".to_string(),
    ))
}

async fn ensure_not_taken(pool: &PgPool, test_id: i64, student_id: i64) -> Result<(), AppError> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM test_results WHERE test_id = $1 AND student_id = $2")
            .bind(test_id)
            .bind(student_id)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "You have already taken this test".to_string(),
        ));
    }

    Ok(())
}

async fn load_specs(pool: &PgPool, test_id: i64) -> Result<Vec<QuestionSpec>, AppError> {
    Ok(load_questions(pool, test_id)
        .await?
        .into_iter()
        .filter_map(|(question, options)| question.into_spec(options))
        .collect())
}
