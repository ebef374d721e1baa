// src/grading/scorer.rs

use super::grader::GradeOutcome;
use super::{QuestionSpec, ResultStatus};

/// Aggregate score of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestScore {
    /// Sum of awarded marks, clamped to >= 0.
    pub score: i32,
    /// Sum of every question's correct marks, independent of attempts.
    pub total_marks: i32,
    pub status: ResultStatus,
}

/// Folds per-question outcomes into the test score.
///
/// Negative per-question contributions are summed first and the clamp is
/// applied once at the test level, so a badly negative early question can
/// still be offset by later correct answers before the floor kicks in.
/// Equality with `passing_marks` counts as a pass.
pub fn score_outcomes<'a>(
    questions: &[QuestionSpec],
    outcomes: impl IntoIterator<Item = &'a GradeOutcome>,
    passing_marks: i32,
) -> TestScore {
    let total_marks: i32 = questions.iter().map(|q| q.marks.correct).sum();
    let raw: i32 = outcomes.into_iter().map(|o| o.marks_awarded).sum();
    let score = raw.max(0);
    let status = if score >= passing_marks {
        ResultStatus::Passed
    } else {
        ResultStatus::Failed
    };

    TestScore {
        score,
        total_marks,
        status,
    }
}
