// src/grading/review.rs

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::answer::Answer;
use super::grader::grade_question;
use super::{AnswerKey, GradingOptions, MatchColumn, QuestionKind, QuestionSpec, normalize_answer};

/// Placeholder summary shown for matrix-match keys, which have no single
/// human-readable correct answer string.
pub const MATRIX_ANSWER_SUMMARY: &str = "Matrix matching";

/// Marks breakdown for one reviewed question. `obtained` is whatever was
/// actually awarded: correct marks, incorrect marks, or 0 when unattempted.
#[derive(Debug, Clone, Serialize)]
pub struct MarksBreakdown {
    pub correct: i32,
    pub incorrect: i32,
    pub obtained: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_column: Option<MatchColumn>,
}

/// Per-question review payload shown to a student after completion.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionReview {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    /// The student's normalized answer, or null when unattempted.
    pub student_answer: Option<Value>,
    /// Human-readable summary of the correct answer.
    pub correct_answer: String,
    pub is_correct: bool,
    pub marks: MarksBreakdown,
    pub options: Vec<ReviewOption>,
}

/// Builds the per-question review detail for a stored result by re-running
/// the grading functions over the stored answers.
///
/// Pure function of its inputs: calling it twice on the same stored answers
/// yields identical output, and because it shares `normalize_answer` and
/// `grade_question` with the submission path, review detail can never
/// disagree with the persisted score.
pub fn explain_result(
    questions: &[QuestionSpec],
    answers: &HashMap<i64, Value>,
    options: &GradingOptions,
) -> Vec<QuestionReview> {
    questions
        .iter()
        .map(|question| {
            let answer = answers
                .get(&question.id)
                .and_then(|raw| normalize_answer(question.kind(), raw));
            let outcome = grade_question(question, answer.as_ref(), options);

            QuestionReview {
                id: question.id,
                kind: question.kind(),
                text: question.text.clone(),
                student_answer: answer.as_ref().map(Answer::to_json),
                correct_answer: correct_answer_summary(&question.key),
                is_correct: outcome.is_correct,
                marks: MarksBreakdown {
                    correct: question.marks.correct,
                    incorrect: question.marks.incorrect,
                    obtained: outcome.marks_awarded,
                },
                options: review_options(&question.key),
            }
        })
        .collect()
}

fn correct_answer_summary(key: &AnswerKey) -> String {
    match key {
        AnswerKey::SingleChoice { options } => options
            .iter()
            .find(|o| o.is_correct)
            .map(|o| o.text.clone())
            .unwrap_or_default(),
        AnswerKey::MultipleChoice { options } => options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        AnswerKey::Numerical { answer } => answer.clone().unwrap_or_default(),
        AnswerKey::MatrixMatch { .. } => MATRIX_ANSWER_SUMMARY.to_string(),
    }
}

fn review_options(key: &AnswerKey) -> Vec<ReviewOption> {
    match key {
        AnswerKey::SingleChoice { options } | AnswerKey::MultipleChoice { options } => options
            .iter()
            .map(|o| ReviewOption {
                id: o.id,
                text: o.text.clone(),
                is_correct: o.is_correct,
                match_column: None,
            })
            .collect(),
        AnswerKey::MatrixMatch { rows } => rows
            .iter()
            .map(|row| ReviewOption {
                id: row.id,
                text: row.text.clone(),
                is_correct: false,
                match_column: Some(row.column),
            })
            .collect(),
        AnswerKey::Numerical { .. } => Vec::new(),
    }
}
