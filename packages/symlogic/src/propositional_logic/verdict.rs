use serde::Serialize;

use super::truth_table::{TruthTable, TruthValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum StatementKind {
    /// True on every row.
    Tautology,
    /// False on every row.
    Contradiction,
    Contingency,
}

impl StatementKind {
    pub fn classify(values: &[TruthValue]) -> Self {
        if values.iter().all(|value| value.0) {
            StatementKind::Tautology
        } else if values.iter().all(|value| !value.0) {
            StatementKind::Contradiction
        } else {
            StatementKind::Contingency
        }
    }
}

pub fn classify(table: &TruthTable) -> StatementKind {
    StatementKind::classify(table.main_values())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Relation {
    /// Same value on every row.
    Equivalent,
    /// Opposite values on every row (two statements only).
    Contradictory,
    Neither,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub relation: Relation,
    /// Some row makes every statement true.
    pub consistent: bool,
}

pub fn compare(table: &TruthTable<Vec<usize>>) -> Comparison {
    let columns = table.main_values();
    let rows = 0..table.row_count();

    let row = |index: usize| columns.iter().map(move |values| values[index].0);

    let equivalent = rows.clone().all(|index| {
        let mut values = row(index);
        let first = values.next();
        values.all(|value| Some(value) == first)
    });

    let contradictory = !equivalent
        && columns.len() == 2
        && rows
            .clone()
            .all(|index| columns[0][index] != columns[1][index]);

    let consistent = rows.clone().any(|index| row(index).all(|value| value));

    Comparison {
        relation: if equivalent {
            Relation::Equivalent
        } else if contradictory {
            Relation::Contradictory
        } else {
            Relation::Neither
        },
        consistent,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validity {
    pub valid: bool,
    /// Rows where every premise is true and the conclusion is false.
    pub counterexamples: Vec<usize>,
}

/// Checks a joined argument table whose last main column is the conclusion.
pub fn check_argument(table: &TruthTable<Vec<usize>>) -> Validity {
    let columns = table.main_values();

    let Some((conclusion, premises)) = columns.split_last() else {
        return Validity {
            valid: true,
            counterexamples: vec![],
        };
    };

    let counterexamples = (0..table.row_count())
        .filter(|&row| premises.iter().all(|premise| premise[row].0) && !conclusion[row].0)
        .collect::<Vec<_>>();

    Validity {
        valid: counterexamples.is_empty(),
        counterexamples,
    }
}
