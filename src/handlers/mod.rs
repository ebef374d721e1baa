// src/handlers/mod.rs

pub mod auth;
pub mod student;
pub mod teacher;

use std::collections::HashMap;

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::question::{OptionRow, QuestionRow};

/// Loads a test's questions with their options, in authored order.
/// Shared by the teacher detail view and both student grading paths.
pub(crate) async fn load_questions(
    pool: &PgPool,
    test_id: i64,
) -> Result<Vec<(QuestionRow, Vec<OptionRow>)>, AppError> {
    let questions = sqlx::query_as::<_, QuestionRow>(
        "SELECT id, test_id, type, text, correct_marks, incorrect_marks, correct_answer, position
         FROM questions
         WHERE test_id = $1
         ORDER BY position",
    )
    .bind(test_id)
    .fetch_all(pool)
    .await?;

    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();

    let options = sqlx::query_as::<_, OptionRow>(
        "SELECT id, question_id, text, is_correct, match_column, position
         FROM options
         WHERE question_id = ANY($1)
         ORDER BY position",
    )
    .bind(&question_ids)
    .fetch_all(pool)
    .await?;

    let mut by_question: HashMap<i64, Vec<OptionRow>> = HashMap::new();
    for option in options {
        by_question.entry(option.question_id).or_default().push(option);
    }

    Ok(questions
        .into_iter()
        .map(|q| {
            let options = by_question.remove(&q.id).unwrap_or_default();
            (q, options)
        })
        .collect())
}
