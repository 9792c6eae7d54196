use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

/// The input text could not be derived from the statement grammar.
///
/// `position` counts characters (not bytes) from the start of the input and
/// points at the rightmost place where the grammar gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Expected {} at position {position}", describe_expected(.expected))]
pub struct SyntaxError {
    pub position: usize,
    pub expected: Vec<String>,
}

impl SyntaxError {
    /// Renders the input with a caret under the failure position.
    pub fn caret(&self, source: &str) -> String {
        format!("{source}\n{}^", " ".repeat(self.position))
    }
}

fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => "a statement".to_owned(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.iter().join(", ")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("{variables} distinct symbols would need 2^{variables} rows; the limit is {limit} symbols")]
pub struct SizeLimitError {
    pub variables: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    SizeLimit(#[from] SizeLimitError),

    #[error("A joined table needs at least one statement")]
    NothingToJoin,

    #[error("No fragment at path {path:?}")]
    FragmentNotFound { path: Vec<usize> },

    /// A logic defect: a malformed catalogue or an evaluator bug. Never caused by user input.
    #[error("Internal invariant violated: {0}")]
    Internal(String),
}

pub type Result<T, E = LogicError> = std::result::Result<T, E>;
