// src/grading/grader.rs

use std::collections::BTreeSet;

use super::answer::{Answer, MATRIX_ROWS};
use super::{AnswerKey, GradingOptions, NumericComparison, QuestionSpec};

/// Correctness and marks result for one (question, answer) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeOutcome {
    pub is_correct: bool,
    pub marks_awarded: i32,
}

impl GradeOutcome {
    /// Outcome of a question the student did not attempt: never correct and
    /// never penalized, regardless of the question's negative marking.
    pub const UNATTEMPTED: Self = Self {
        is_correct: false,
        marks_awarded: 0,
    };
}

/// Grades a single question against its key.
///
/// Questions with an inconsistent key (no option flagged correct, missing
/// numerical answer, wrong matrix arity) grade as always-incorrect instead
/// of erroring; authoring-time validation is the real fix for those.
pub fn grade_question(
    question: &QuestionSpec,
    answer: Option<&Answer>,
    options: &GradingOptions,
) -> GradeOutcome {
    let Some(answer) = answer else {
        return GradeOutcome::UNATTEMPTED;
    };

    let is_correct = matches_key(&question.key, answer, options);
    let marks_awarded = if is_correct {
        question.marks.correct
    } else {
        question.marks.incorrect
    };

    GradeOutcome {
        is_correct,
        marks_awarded,
    }
}

fn matches_key(key: &AnswerKey, answer: &Answer, options: &GradingOptions) -> bool {
    match (key, answer) {
        (AnswerKey::SingleChoice { options }, Answer::Choice(chosen)) => options
            .iter()
            .find(|o| o.is_correct)
            .is_some_and(|o| o.id == *chosen),

        (AnswerKey::MultipleChoice { options }, Answer::ChoiceSet(chosen)) => {
            // Exact set equality: no missing members, no extras.
            let correct: BTreeSet<i64> = options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.id)
                .collect();
            !correct.is_empty() && correct == *chosen
        }

        (AnswerKey::Numerical { answer: Some(expected) }, Answer::Text(given)) => {
            numeric_matches(expected, given, options.numeric)
        }

        (AnswerKey::MatrixMatch { rows }, Answer::Matches(picks)) => {
            rows.len() == MATRIX_ROWS
                && picks.len() == rows.len()
                && picks
                    .iter()
                    .zip(rows)
                    .all(|(pick, row)| *pick == Some(row.column))
        }

        // Key/answer kind mismatch or a key with no usable reference answer.
        _ => false,
    }
}

fn numeric_matches(expected: &str, given: &str, mode: NumericComparison) -> bool {
    match mode {
        NumericComparison::Exact => expected == given,
        NumericComparison::Tolerance(epsilon) => {
            match (expected.trim().parse::<f64>(), given.trim().parse::<f64>()) {
                (Ok(e), Ok(g)) => (e - g).abs() <= epsilon,
                _ => expected == given,
            }
        }
    }
}
