// src/handlers/teacher.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::load_questions,
    models::{
        question::QuestionDetail,
        test::{SaveTestRequest, Test, TestDetail, TestSummary},
        user::{EnrollStudentRequest, EnrolledStudent, ROLE_STUDENT},
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Teacher dashboard: own tests with question counts plus enrolled students.
pub async fn dashboard(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let teacher_id = claims.user_id();

    let tests = sqlx::query_as::<_, TestSummary>(
        "SELECT t.id, t.title, t.subject, t.duration_minutes, t.status, t.created_at,
                (SELECT COUNT(*) FROM questions q WHERE q.test_id = t.id) AS question_count
         FROM tests t
         WHERE t.teacher_id = $1
         ORDER BY t.created_at DESC",
    )
    .bind(teacher_id)
    .fetch_all(&pool)
    .await?;

    let students = sqlx::query_as::<_, EnrolledStudent>(
        "SELECT u.id, u.name, u.email, ts.created_at AS joined_at
         FROM teacher_students ts
         JOIN users u ON u.id = ts.student_id
         WHERE ts.teacher_id = $1
         ORDER BY ts.created_at DESC",
    )
    .bind(teacher_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(serde_json::json!({
        "tests": tests,
        "students": students,
    })))
}

/// Creates a new test with its questions and options in one transaction.
pub async fn create_test(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SaveTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let teacher_id = claims.user_id();
    let mut tx = pool.begin().await?;

    let (test_id,): (i64,) = sqlx::query_as(
        "INSERT INTO tests
            (teacher_id, title, description, subject, duration_minutes,
             instructions, passing_marks, numeric_tolerance, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id",
    )
    .bind(teacher_id)
    .bind(clean_html(&payload.title))
    .bind(clean_html(payload.description.as_deref().unwrap_or("")))
    .bind(&payload.subject)
    .bind(payload.duration_minutes)
    .bind(clean_html(payload.instructions.as_deref().unwrap_or("")))
    .bind(payload.passing_marks)
    .bind(payload.numeric_tolerance)
    .bind(&payload.status)
    .fetch_one(&mut *tx)
    .await?;

    insert_questions(&mut tx, test_id, &payload).await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "test_id": test_id })),
    ))
}

/// Returns the full test definition, including answer keys.
/// Only the authoring teacher can see it.
pub async fn get_test(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let test = fetch_owned_test(&pool, id, claims.user_id()).await?;

    let questions = load_questions(&pool, test.id)
        .await?
        .into_iter()
        .map(|(question, options)| QuestionDetail::from_rows(question, options))
        .collect();

    Ok(Json(TestDetail { test, questions }))
}

/// Fully replaces a test: updates the test row, then atomically deletes and
/// recreates every question and option. Published questions are immutable,
/// so there is no targeted per-question edit.
pub async fn update_test(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<SaveTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let test = fetch_owned_test(&pool, id, claims.user_id()).await?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE tests
         SET title = $1, description = $2, subject = $3, duration_minutes = $4,
             instructions = $5, passing_marks = $6, numeric_tolerance = $7, status = $8
         WHERE id = $9",
    )
    .bind(clean_html(&payload.title))
    .bind(clean_html(payload.description.as_deref().unwrap_or("")))
    .bind(&payload.subject)
    .bind(payload.duration_minutes)
    .bind(clean_html(payload.instructions.as_deref().unwrap_or("")))
    .bind(payload.passing_marks)
    .bind(payload.numeric_tolerance)
    .bind(&payload.status)
    .bind(test.id)
    .execute(&mut *tx)
    .await?;

    // Options go with their questions via ON DELETE CASCADE.
    sqlx::query("DELETE FROM questions WHERE test_id = $1")
        .bind(test.id)
        .execute(&mut *tx)
        .await?;

    insert_questions(&mut tx, test.id, &payload).await?;

    tx.commit().await?;

    Ok(StatusCode::OK)
}

/// Enrolls an existing student (looked up by email) with this teacher.
pub async fn enroll_student(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<EnrollStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let student: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 AND role = $2")
            .bind(&payload.email)
            .bind(ROLE_STUDENT)
            .fetch_optional(&pool)
            .await?;

    let (student_id,) = student.ok_or(AppError::NotFound("Student not found".to_string()))?;

    let result = sqlx::query(
        "INSERT INTO teacher_students (teacher_id, student_id)
         VALUES ($1, $2)
         ON CONFLICT (teacher_id, student_id) DO NOTHING",
    )
    .bind(claims.user_id())
    .bind(student_id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict("Student already enrolled".to_string()));
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "student_id": student_id })),
    ))
}

/// Removes a student from this teacher's roster.
pub async fn unenroll_student(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(student_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result =
        sqlx::query("DELETE FROM teacher_students WHERE teacher_id = $1 AND student_id = $2")
            .bind(claims.user_id())
            .bind(student_id)
            .execute(&pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Student not enrolled".to_string()));
    }

    Ok(StatusCode::OK)
}

async fn fetch_owned_test(pool: &PgPool, id: i64, teacher_id: i64) -> Result<Test, AppError> {
    sqlx::query_as::<_, Test>(
        "SELECT id, teacher_id, title, description, subject, duration_minutes,
                instructions, passing_marks, numeric_tolerance, status, created_at
         FROM tests
         WHERE id = $1 AND teacher_id = $2",
    )
    .bind(id)
    .bind(teacher_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Test not found".to_string()))
}

async fn insert_questions(
    tx: &mut Transaction<'_, Postgres>,
    test_id: i64,
    payload: &SaveTestRequest,
) -> Result<(), AppError> {
    for (position, question) in payload.questions.iter().enumerate() {
        let (question_id,): (i64,) = sqlx::query_as(
            "INSERT INTO questions
                (test_id, type, text, correct_marks, incorrect_marks, correct_answer, position)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(test_id)
        .bind(&question.question_type)
        .bind(clean_html(&question.text))
        .bind(question.marks.correct)
        .bind(question.marks.incorrect)
        .bind(&question.correct_answer)
        .bind(position as i32)
        .fetch_one(&mut **tx)
        .await?;

        for (option_position, option) in question.options.iter().enumerate() {
            sqlx::query(
                "INSERT INTO options (question_id, text, is_correct, match_column, position)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(question_id)
            .bind(clean_html(&option.text))
            .bind(option.is_correct)
            .bind(&option.match_column)
            .bind(option_position as i32)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}
