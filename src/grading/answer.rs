// src/grading/answer.rs

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::QuestionKind;

/// Number of rows in a matrix-match question.
pub const MATRIX_ROWS: usize = 4;

/// Column a matrix-match row can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchColumn {
    A,
    B,
    C,
    D,
}

impl MatchColumn {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for MatchColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student's normalized response to one question, typed per question kind.
///
/// Absence (question not attempted) is modeled as `Option<Answer>::None` by
/// the callers, never as an empty variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Selected option id for a single-choice question.
    Choice(i64),
    /// Selected option ids for a multiple-choice question. Order-free,
    /// duplicates collapsed.
    ChoiceSet(BTreeSet<i64>),
    /// The literal text entered for a numerical question.
    Text(String),
    /// One selection per matrix row; `None` is a blank cell.
    Matches(Vec<Option<MatchColumn>>),
}

impl Answer {
    /// Renders the answer back into the JSON shape clients submitted it in,
    /// for inclusion in review payloads.
    pub fn to_json(&self) -> Value {
        match self {
            Answer::Choice(id) => Value::from(*id),
            Answer::ChoiceSet(ids) => ids.iter().copied().collect::<Vec<i64>>().into(),
            Answer::Text(text) => Value::from(text.clone()),
            Answer::Matches(picks) => picks
                .iter()
                .map(|pick| pick.map(|c| c.as_str()).unwrap_or(""))
                .collect::<Vec<&str>>()
                .into(),
        }
    }
}

/// Canonicalizes a raw submitted value into an `Answer` matching the
/// question's declared kind.
///
/// Returns `None` when the question counts as unattempted: a missing, null,
/// or empty raw value, or a value whose shape does not fit the declared kind.
/// A malformed answer must degrade to "unattempted" rather than fail the
/// whole submission.
pub fn normalize_answer(kind: QuestionKind, raw: &Value) -> Option<Answer> {
    if is_blank(raw) {
        return None;
    }

    match kind {
        QuestionKind::SingleChoice => option_id(raw).map(Answer::Choice),
        QuestionKind::MultipleChoice => {
            let items = raw.as_array()?;
            let ids: BTreeSet<i64> = items.iter().filter_map(option_id).collect();
            if ids.is_empty() {
                None
            } else {
                Some(Answer::ChoiceSet(ids))
            }
        }
        QuestionKind::Numerical => match raw {
            Value::String(s) => Some(Answer::Text(s.clone())),
            Value::Number(n) => Some(Answer::Text(n.to_string())),
            _ => None,
        },
        QuestionKind::MatrixMatch => {
            let items = raw.as_array()?;
            // Missing trailing rows count as blank cells, not as unattempted.
            let mut picks: Vec<Option<MatchColumn>> = items
                .iter()
                .take(MATRIX_ROWS)
                .map(|v| v.as_str().and_then(MatchColumn::parse))
                .collect();
            picks.resize(MATRIX_ROWS, None);
            Some(Answer::Matches(picks))
        }
    }
}

fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Accepts option ids submitted either as JSON numbers or numeric strings.
fn option_id(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
