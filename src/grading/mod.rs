// src/grading/mod.rs
//
// The auto-grading engine. Pure and stateless: every function here is a
// plain computation over its inputs, so submissions can be graded
// concurrently with no locking, and review payloads can be recomputed from
// stored answers with guaranteed consistency against the original score.

pub mod answer;
pub mod grader;
pub mod review;
pub mod scorer;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use answer::{Answer, MATRIX_ROWS, MatchColumn, normalize_answer};
pub use grader::{GradeOutcome, grade_question};
pub use review::{QuestionReview, explain_result};
pub use scorer::{TestScore, score_outcomes};

/// Declared kind of a question, determining which grading rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    Numerical,
    MatrixMatch,
}

impl QuestionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SINGLE_CHOICE" => Some(Self::SingleChoice),
            "MULTIPLE_CHOICE" => Some(Self::MultipleChoice),
            "NUMERICAL" => Some(Self::Numerical),
            "MATRIX_MATCH" => Some(Self::MatrixMatch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleChoice => "SINGLE_CHOICE",
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::Numerical => "NUMERICAL",
            Self::MatrixMatch => "MATRIX_MATCH",
        }
    }
}

/// Marks awarded for a correct answer and for an attempted-but-wrong answer.
/// `incorrect` is zero or negative (negative marking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    pub correct: i32,
    pub incorrect: i32,
}

/// A choice option together with its correctness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// One row of a matrix-match question and the column it must be matched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub id: i64,
    pub text: String,
    pub column: MatchColumn,
}

/// The grading key for one question. One variant per question kind, so a
/// key can never carry data that is meaningless for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    SingleChoice { options: Vec<KeyOption> },
    MultipleChoice { options: Vec<KeyOption> },
    Numerical { answer: Option<String> },
    MatrixMatch { rows: Vec<MatrixRow> },
}

/// Immutable definition of one question: prompt, marks, and grading key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpec {
    pub id: i64,
    pub text: String,
    pub marks: Marks,
    pub key: AnswerKey,
}

impl QuestionSpec {
    pub fn kind(&self) -> QuestionKind {
        match self.key {
            AnswerKey::SingleChoice { .. } => QuestionKind::SingleChoice,
            AnswerKey::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            AnswerKey::Numerical { .. } => QuestionKind::Numerical,
            AnswerKey::MatrixMatch { .. } => QuestionKind::MatrixMatch,
        }
    }
}

/// Pass/fail verdict of a completed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Passed,
    Failed,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        }
    }
}

/// How numerical answers are compared against the key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NumericComparison {
    /// Exact string equality, case-sensitive, no trimming. "9.80" != "9.8".
    #[default]
    Exact,
    /// Both sides parsed as floats and compared within epsilon. Falls back
    /// to exact string equality when either side fails to parse.
    Tolerance(f64),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GradingOptions {
    pub numeric: NumericComparison,
}

impl GradingOptions {
    /// Options for a test with an optional per-test numeric tolerance.
    pub fn for_tolerance(tolerance: Option<f64>) -> Self {
        Self {
            numeric: match tolerance {
                Some(epsilon) => NumericComparison::Tolerance(epsilon),
                None => NumericComparison::Exact,
            },
        }
    }
}

/// Grading outcome of one question within a submission.
#[derive(Debug, Clone)]
pub struct GradedQuestion {
    pub question_id: i64,
    pub answer: Option<Answer>,
    pub outcome: GradeOutcome,
}

/// The fully graded submission: aggregate score plus per-question outcomes.
#[derive(Debug, Clone)]
pub struct GradedSubmission {
    pub score: i32,
    pub total_marks: i32,
    pub status: ResultStatus,
    pub questions: Vec<GradedQuestion>,
}

/// Grades a whole submission: normalizes each raw answer, grades each
/// question, and folds the outcomes into the aggregate score.
///
/// `answers` holds the raw values as submitted, keyed by question id.
/// Questions with no entry are unattempted. A single malformed or anomalous
/// question degrades its own outcome only, never the aggregate.
pub fn grade_submission(
    questions: &[QuestionSpec],
    answers: &HashMap<i64, Value>,
    passing_marks: i32,
    options: &GradingOptions,
) -> GradedSubmission {
    let graded: Vec<GradedQuestion> = questions
        .iter()
        .map(|question| {
            let answer = answers
                .get(&question.id)
                .and_then(|raw| normalize_answer(question.kind(), raw));
            let outcome = grade_question(question, answer.as_ref(), options);
            GradedQuestion {
                question_id: question.id,
                answer,
                outcome,
            }
        })
        .collect();

    let score = score_outcomes(questions, graded.iter().map(|g| &g.outcome), passing_marks);

    GradedSubmission {
        score: score.score,
        total_marks: score.total_marks,
        status: score.status,
        questions: graded,
    }
}
