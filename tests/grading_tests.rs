// tests/grading_tests.rs
//
// Drives the grading engine through its public API, without a database:
// everything here is a pure computation over in-memory question specs.

use std::collections::HashMap;

use serde_json::{Value, json};
use testroom_backend::grading::{
    AnswerKey, GradingOptions, KeyOption, Marks, MatchColumn, MatrixRow, QuestionSpec,
    ResultStatus, explain_result, grade_submission,
};

fn single_choice(id: i64, correct_id: i64, other_id: i64) -> QuestionSpec {
    QuestionSpec {
        id,
        text: format!("single {id}"),
        marks: Marks { correct: 4, incorrect: -1 },
        key: AnswerKey::SingleChoice {
            options: vec![
                KeyOption { id: correct_id, text: "right".to_string(), is_correct: true },
                KeyOption { id: other_id, text: "wrong".to_string(), is_correct: false },
            ],
        },
    }
}

fn multiple_choice(id: i64, ids: &[i64], correct: &[i64]) -> QuestionSpec {
    QuestionSpec {
        id,
        text: format!("multi {id}"),
        marks: Marks { correct: 4, incorrect: -1 },
        key: AnswerKey::MultipleChoice {
            options: ids
                .iter()
                .map(|option_id| KeyOption {
                    id: *option_id,
                    text: format!("opt {option_id}"),
                    is_correct: correct.contains(option_id),
                })
                .collect(),
        },
    }
}

fn numerical(id: i64, expected: &str) -> QuestionSpec {
    QuestionSpec {
        id,
        text: format!("numerical {id}"),
        marks: Marks { correct: 4, incorrect: -1 },
        key: AnswerKey::Numerical { answer: Some(expected.to_string()) },
    }
}

fn matrix(id: i64, columns: [MatchColumn; 4]) -> QuestionSpec {
    QuestionSpec {
        id,
        text: format!("matrix {id}"),
        marks: Marks { correct: 8, incorrect: -2 },
        key: AnswerKey::MatrixMatch {
            rows: columns
                .iter()
                .enumerate()
                .map(|(i, column)| MatrixRow {
                    id: id * 10 + i as i64,
                    text: format!("row {i}"),
                    column: *column,
                })
                .collect(),
        },
    }
}

fn answers(entries: &[(i64, Value)]) -> HashMap<i64, Value> {
    entries.iter().cloned().collect()
}

#[test]
fn single_choice_scenario() {
    let questions = vec![single_choice(1, 100, 101)];
    let opts = GradingOptions::default();

    let right = grade_submission(&questions, &answers(&[(1, json!(100))]), 0, &opts);
    assert!(right.questions[0].outcome.is_correct);
    assert_eq!(right.questions[0].outcome.marks_awarded, 4);

    let wrong = grade_submission(&questions, &answers(&[(1, json!(101))]), 0, &opts);
    assert!(!wrong.questions[0].outcome.is_correct);
    assert_eq!(wrong.questions[0].outcome.marks_awarded, -1);

    let skipped = grade_submission(&questions, &answers(&[]), 0, &opts);
    assert!(!skipped.questions[0].outcome.is_correct);
    assert_eq!(skipped.questions[0].outcome.marks_awarded, 0);
}

#[test]
fn multiple_choice_set_equality_scenario() {
    let questions = vec![multiple_choice(1, &[1, 2, 3, 4], &[1, 3])];
    let opts = GradingOptions::default();

    // Missing a member.
    let partial = grade_submission(&questions, &answers(&[(1, json!([1]))]), 0, &opts);
    assert!(!partial.questions[0].outcome.is_correct);

    // Exact match, order-free.
    let exact = grade_submission(&questions, &answers(&[(1, json!([3, 1]))]), 0, &opts);
    assert!(exact.questions[0].outcome.is_correct);

    // Extra member.
    let extra = grade_submission(&questions, &answers(&[(1, json!([1, 3, 4]))]), 0, &opts);
    assert!(!extra.questions[0].outcome.is_correct);
}

#[test]
fn negative_total_clamps_to_zero() {
    // Q1 wrong (-1), Q2 unattempted (0): raw -1, clamped to 0, totals intact.
    let questions = vec![single_choice(1, 100, 101), single_choice(2, 200, 201)];
    let graded = grade_submission(
        &questions,
        &answers(&[(1, json!(101))]),
        5,
        &GradingOptions::default(),
    );

    assert_eq!(graded.score, 0);
    assert_eq!(graded.total_marks, 8);
    assert_eq!(graded.status, ResultStatus::Failed);
}

#[test]
fn numerical_is_exact_string_match_by_default() {
    let questions = vec![numerical(1, "9.8")];
    let opts = GradingOptions::default();

    let trailing_zero = grade_submission(&questions, &answers(&[(1, json!("9.80"))]), 0, &opts);
    assert!(!trailing_zero.questions[0].outcome.is_correct);

    let exact = grade_submission(&questions, &answers(&[(1, json!("9.8"))]), 0, &opts);
    assert!(exact.questions[0].outcome.is_correct);
}

#[test]
fn passing_threshold_is_inclusive() {
    let questions = vec![single_choice(1, 100, 101)];
    let submitted = answers(&[(1, json!(100))]);

    let at_threshold = grade_submission(&questions, &submitted, 4, &GradingOptions::default());
    assert_eq!(at_threshold.status, ResultStatus::Passed);

    let above_threshold = grade_submission(&questions, &submitted, 5, &GradingOptions::default());
    assert_eq!(above_threshold.status, ResultStatus::Failed);
}

#[test]
fn matrix_match_grades_against_the_intended_mapping() {
    use MatchColumn::*;
    let questions = vec![matrix(1, [B, A, D, C])];
    let opts = GradingOptions::default();

    let right = grade_submission(
        &questions,
        &answers(&[(1, json!(["B", "A", "D", "C"]))]),
        0,
        &opts,
    );
    assert!(right.questions[0].outcome.is_correct);
    assert_eq!(right.score, 8);

    // Short vectors pad with blanks; a blank row never matches.
    let short = grade_submission(&questions, &answers(&[(1, json!(["B", "A"]))]), 0, &opts);
    assert!(!short.questions[0].outcome.is_correct);
    assert_eq!(short.questions[0].outcome.marks_awarded, -2);
}

#[test]
fn malformed_answers_degrade_that_question_only() {
    let questions = vec![
        single_choice(1, 100, 101),
        multiple_choice(2, &[1, 2], &[1]),
        numerical(3, "42"),
    ];
    // Q1 gets a set where a scalar is expected, Q2 gets an object: both
    // count as unattempted. Q3 is graded normally.
    let submitted = answers(&[
        (1, json!([100, 101])),
        (2, json!({"picked": 1})),
        (3, json!("42")),
    ]);

    let graded = grade_submission(&questions, &submitted, 0, &GradingOptions::default());
    assert_eq!(graded.questions[0].outcome.marks_awarded, 0);
    assert_eq!(graded.questions[1].outcome.marks_awarded, 0);
    assert!(graded.questions[2].outcome.is_correct);
    assert_eq!(graded.score, 4);
}

#[test]
fn review_agrees_with_submission_grading() {
    use MatchColumn::*;
    let questions = vec![
        single_choice(1, 100, 101),
        multiple_choice(2, &[1, 2, 3], &[1, 2]),
        numerical(3, "9.8"),
        matrix(4, [A, B, C, D]),
    ];
    let submitted = answers(&[
        (1, json!(100)),
        (2, json!([1, 3])),
        (4, json!(["A", "B", "C", "D"])),
    ]);
    let opts = GradingOptions::default();

    let graded = grade_submission(&questions, &submitted, 10, &opts);
    let reviews = explain_result(&questions, &submitted, &opts);

    assert_eq!(reviews.len(), graded.questions.len());
    let obtained_sum: i32 = reviews.iter().map(|r| r.marks.obtained).sum();
    let awarded_sum: i32 = graded.questions.iter().map(|q| q.outcome.marks_awarded).sum();
    assert_eq!(obtained_sum, awarded_sum);

    for (review, graded_question) in reviews.iter().zip(&graded.questions) {
        assert_eq!(review.is_correct, graded_question.outcome.is_correct);
    }

    // Unattempted question reviews as null answer with zero obtained marks.
    assert_eq!(reviews[2].student_answer, None);
    assert_eq!(reviews[2].marks.obtained, 0);
}
