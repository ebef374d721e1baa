// src/models/question.rs

use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::grading::{
    AnswerKey, KeyOption, MATRIX_ROWS, Marks, MatchColumn, MatrixRow, QuestionKind, QuestionSpec,
};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionRow {
    pub id: i64,
    pub test_id: i64,

    /// Question kind as stored ('SINGLE_CHOICE', 'MULTIPLE_CHOICE',
    /// 'NUMERICAL', 'MATRIX_MATCH'). Mapped from the column 'type' since
    /// `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub question_type: String,

    /// The prompt shown to the student.
    pub text: String,

    pub correct_marks: i32,
    pub incorrect_marks: i32,

    /// The reference answer, populated only for NUMERICAL questions.
    pub correct_answer: Option<String>,

    pub position: i32,
}

/// Represents the 'options' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OptionRow {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
    /// Correct column letter for matrix-match rows, NULL for choice options.
    pub match_column: Option<String>,
    pub position: i32,
}

impl QuestionRow {
    /// Builds the typed grading spec for this question from its stored rows.
    ///
    /// Returns `None` for an unknown question type (impossible under the
    /// schema's CHECK constraint, but degraded rather than panicked on).
    /// Matrix rows with a missing or invalid column letter are dropped,
    /// which leaves the key with the wrong arity and makes the question
    /// grade as never-correct instead of blowing up the submission.
    pub fn into_spec(self, options: Vec<OptionRow>) -> Option<QuestionSpec> {
        let kind = QuestionKind::parse(&self.question_type)?;

        let key = match kind {
            QuestionKind::SingleChoice => AnswerKey::SingleChoice {
                options: key_options(options),
            },
            QuestionKind::MultipleChoice => AnswerKey::MultipleChoice {
                options: key_options(options),
            },
            QuestionKind::Numerical => AnswerKey::Numerical {
                answer: self.correct_answer,
            },
            QuestionKind::MatrixMatch => AnswerKey::MatrixMatch {
                rows: options
                    .into_iter()
                    .take(MATRIX_ROWS)
                    .filter_map(|o| {
                        let column = o.match_column.as_deref().and_then(MatchColumn::parse)?;
                        Some(MatrixRow {
                            id: o.id,
                            text: o.text,
                            column,
                        })
                    })
                    .collect(),
            },
        };

        Some(QuestionSpec {
            id: self.id,
            text: self.text,
            marks: Marks {
                correct: self.correct_marks,
                incorrect: self.incorrect_marks,
            },
            key,
        })
    }
}

fn key_options(options: Vec<OptionRow>) -> Vec<KeyOption> {
    options
        .into_iter()
        .map(|o| KeyOption {
            id: o.id,
            text: o.text,
            is_correct: o.is_correct,
        })
        .collect()
}

/// DTO for sending a question to a student taking the test.
/// Excludes everything that would reveal the answer key.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: String,
    pub text: String,
    pub marks: Marks,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Serialize)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

impl PublicQuestion {
    pub fn from_rows(question: QuestionRow, options: Vec<OptionRow>) -> Self {
        Self {
            id: question.id,
            question_type: question.question_type,
            text: question.text,
            marks: Marks {
                correct: question.correct_marks,
                incorrect: question.incorrect_marks,
            },
            options: options
                .into_iter()
                .map(|o| PublicOption {
                    id: o.id,
                    text: o.text,
                })
                .collect(),
        }
    }
}

/// Full question detail for the authoring teacher, including the key.
#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: String,
    pub text: String,
    pub correct_answer: Option<String>,
    pub marks: Marks,
    pub options: Vec<OptionRow>,
}

impl QuestionDetail {
    pub fn from_rows(question: QuestionRow, options: Vec<OptionRow>) -> Self {
        Self {
            id: question.id,
            question_type: question.question_type,
            text: question.text,
            correct_answer: question.correct_answer,
            marks: Marks {
                correct: question.correct_marks,
                incorrect: question.incorrect_marks,
            },
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_row(question_type: &str, correct_answer: Option<&str>) -> QuestionRow {
        QuestionRow {
            id: 1,
            test_id: 1,
            question_type: question_type.to_string(),
            text: "prompt".to_string(),
            correct_marks: 4,
            incorrect_marks: -1,
            correct_answer: correct_answer.map(str::to_string),
            position: 0,
        }
    }

    fn matrix_option(id: i64, column: Option<&str>) -> OptionRow {
        OptionRow {
            id,
            question_id: 1,
            text: format!("row {id}"),
            is_correct: false,
            match_column: column.map(str::to_string),
            position: id as i32,
        }
    }

    #[test]
    fn builds_matrix_key_from_column_letters() {
        let row = question_row("MATRIX_MATCH", None);
        let options = vec![
            matrix_option(1, Some("B")),
            matrix_option(2, Some("A")),
            matrix_option(3, Some("D")),
            matrix_option(4, Some("C")),
        ];

        let spec = row.into_spec(options).unwrap();
        match spec.key {
            AnswerKey::MatrixMatch { rows } => {
                let columns: Vec<MatchColumn> = rows.iter().map(|r| r.column).collect();
                assert_eq!(
                    columns,
                    vec![MatchColumn::B, MatchColumn::A, MatchColumn::D, MatchColumn::C]
                );
            }
            other => panic!("expected matrix key, got {other:?}"),
        }
    }

    #[test]
    fn drops_matrix_rows_without_a_column() {
        let row = question_row("MATRIX_MATCH", None);
        let options = vec![
            matrix_option(1, Some("A")),
            matrix_option(2, None),
            matrix_option(3, Some("X")),
            matrix_option(4, Some("C")),
        ];

        let spec = row.into_spec(options).unwrap();
        match spec.key {
            // Wrong arity: the grader will treat this question as
            // never-correct rather than erroring.
            AnswerKey::MatrixMatch { rows } => assert_eq!(rows.len(), 2),
            other => panic!("expected matrix key, got {other:?}"),
        }
    }

    #[test]
    fn unknown_question_type_yields_no_spec() {
        let row = question_row("ESSAY", None);
        assert!(row.into_spec(Vec::new()).is_none());
    }
}
