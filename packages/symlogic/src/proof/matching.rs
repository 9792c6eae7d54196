use std::fmt::{self, Display};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::propositional_logic::types::{
    stringify, Connective, Node, Statement, Symbol, NEGATION_TOKEN,
};

/// Rendered in place of a pattern variable that no premise bound.
pub const PLACEHOLDER_TOKEN: &str = "%";

/// Pattern variables bound to concrete subtrees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(pub IndexMap<Symbol, Statement>);

impl Bindings {
    pub fn get(&self, variable: &Symbol) -> Option<&Statement> {
        self.0.get(variable)
    }
}

impl Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self
            .0
            .iter()
            .map(|(variable, statement)| format!("{variable}←{statement}"));

        write!(f, "{{{}}}", bindings.format(", "))
    }
}

/// Unifies `pattern` with `input`. A pattern leaf is a variable: unbound, it
/// binds to the whole input subtree; bound, the input must be structurally
/// identical to its binding. Operands are matched in order, never commuted.
pub fn match_pattern(pattern: &Statement, input: &Statement, bindings: Bindings) -> Option<Bindings> {
    match (pattern, input) {
        (Statement::Atomic(variable), _) => match bindings.get(variable) {
            Some(bound) => (bound == input).then_some(bindings),
            None => {
                let mut bindings = bindings;
                bindings.0.insert(variable.clone(), input.clone());
                Some(bindings)
            }
        },
        (Statement::Negation(pattern), Statement::Negation(input)) => {
            match_pattern(pattern, input, bindings)
        }
        (
            Statement::Binary(connective, pattern_left, pattern_right),
            Statement::Binary(input_connective, input_left, input_right),
        ) if connective == input_connective => {
            let bindings = match_pattern(pattern_left, input_left, bindings)?;
            match_pattern(pattern_right, input_right, bindings)
        }
        _ => None,
    }
}

/// Searches for an assignment of `premises` to `statements` under which every
/// pair unifies consistently. The first statement is tried against each
/// remaining premise in turn; the first complete assignment wins.
pub fn match_premises(
    premises: &[&Statement],
    statements: &[Statement],
    bindings: Bindings,
) -> Option<Bindings> {
    let Some((statement, remaining_statements)) = statements.split_first() else {
        return premises.is_empty().then_some(bindings);
    };

    premises.iter().enumerate().find_map(|(index, premise)| {
        let bindings = match_pattern(premise, statement, bindings.clone())?;

        let mut remaining_premises = premises.to_vec();
        remaining_premises.remove(index);

        match_premises(&remaining_premises, remaining_statements, bindings)
    })
}

/// A statement produced by substitution. It may contain placeholders where
/// the conclusion introduced a variable the premises never bound.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
pub enum Derivation {
    Placeholder,
    Atomic(Symbol),
    Negation(Box<Derivation>),
    Binary(Connective, Box<Derivation>, Box<Derivation>),
}

impl From<&Statement> for Derivation {
    fn from(statement: &Statement) -> Self {
        match statement {
            Statement::Atomic(symbol) => Derivation::Atomic(symbol.clone()),
            Statement::Negation(operand) => Derivation::Negation(Box::new(operand.as_ref().into())),
            Statement::Binary(connective, left, right) => Derivation::Binary(
                *connective,
                Box::new(left.as_ref().into()),
                Box::new(right.as_ref().into()),
            ),
        }
    }
}

impl Derivation {
    pub fn has_placeholder(&self) -> bool {
        match self {
            Derivation::Placeholder => true,
            Derivation::Atomic(_) => false,
            Derivation::Negation(operand) => operand.has_placeholder(),
            Derivation::Binary(_, left, right) => left.has_placeholder() || right.has_placeholder(),
        }
    }

    /// The finished statement, if no placeholder remains.
    pub fn to_statement(&self) -> Option<Statement> {
        Some(match self {
            Derivation::Placeholder => return None,
            Derivation::Atomic(symbol) => Statement::Atomic(symbol.clone()),
            Derivation::Negation(operand) => Statement::negation(operand.to_statement()?),
            Derivation::Binary(connective, left, right) => {
                Statement::binary(*connective, left.to_statement()?, right.to_statement()?)
            }
        })
    }

    /// Completes the statement by putting `replacement` at every placeholder.
    pub fn fill(&self, replacement: &Statement) -> Statement {
        match self {
            Derivation::Placeholder => replacement.clone(),
            Derivation::Atomic(symbol) => Statement::Atomic(symbol.clone()),
            Derivation::Negation(operand) => Statement::negation(operand.fill(replacement)),
            Derivation::Binary(connective, left, right) => {
                Statement::binary(*connective, left.fill(replacement), right.fill(replacement))
            }
        }
    }
}

impl Node for Derivation {
    fn token(&self) -> &str {
        match self {
            Derivation::Placeholder => PLACEHOLDER_TOKEN,
            Derivation::Atomic(symbol) => &symbol.0,
            Derivation::Negation(_) => NEGATION_TOKEN,
            Derivation::Binary(connective, _, _) => connective.token(),
        }
    }

    fn children(&self) -> Vec<&Self> {
        match self {
            Derivation::Placeholder | Derivation::Atomic(_) => vec![],
            Derivation::Negation(operand) => vec![operand.as_ref()],
            Derivation::Binary(_, left, right) => vec![left.as_ref(), right.as_ref()],
        }
    }
}

impl Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}

/// Replaces the variables of `pattern` with their bindings; unbound variables
/// become placeholders.
pub fn substitute(pattern: &Statement, bindings: &Bindings) -> Derivation {
    match pattern {
        Statement::Atomic(variable) => bindings
            .get(variable)
            .map_or(Derivation::Placeholder, Derivation::from),
        Statement::Negation(operand) => Derivation::Negation(Box::new(substitute(operand, bindings))),
        Statement::Binary(connective, left, right) => Derivation::Binary(
            *connective,
            Box::new(substitute(left, bindings)),
            Box::new(substitute(right, bindings)),
        ),
    }
}
