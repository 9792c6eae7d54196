use std::sync::OnceLock;

use serde::Serialize;

use crate::{
    error::{LogicError, Result},
    propositional_logic::{parser::parse_statement, types::Statement},
};

/// Catalogue entries as plain source text, before any parsing. Every leaf of a
/// pattern is a variable.
#[derive(Debug, Clone, Copy)]
pub struct RawArgumentForm {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub premises: &'static [&'static str],
    pub conclusions: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct RawReplacementRule {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub equivalences: &'static [(&'static str, &'static str)],
}

pub const ARGUMENT_FORMS: &[RawArgumentForm] = &[
    RawArgumentForm {
        name: "Modus Ponens",
        abbreviation: "MP",
        premises: &["P > Q", "P"],
        conclusions: &["Q"],
    },
    RawArgumentForm {
        name: "Modus Tollens",
        abbreviation: "MT",
        premises: &["P > Q", "~Q"],
        conclusions: &["~P"],
    },
    RawArgumentForm {
        name: "Disjunctive Syllogism",
        abbreviation: "DS",
        premises: &["P v Q", "~P"],
        conclusions: &["Q"],
    },
    RawArgumentForm {
        name: "Disjunctive Syllogism",
        abbreviation: "DS",
        premises: &["P v Q", "~Q"],
        conclusions: &["P"],
    },
    RawArgumentForm {
        name: "Hypothetical Syllogism",
        abbreviation: "HS",
        premises: &["P > Q", "Q > R"],
        conclusions: &["P > R"],
    },
    RawArgumentForm {
        name: "Simplification",
        abbreviation: "Simp",
        premises: &["P & Q"],
        conclusions: &["P", "Q"],
    },
    RawArgumentForm {
        name: "Conjunction",
        abbreviation: "Conj",
        premises: &["P", "Q"],
        conclusions: &["P & Q"],
    },
    RawArgumentForm {
        name: "Addition",
        abbreviation: "Add",
        premises: &["P"],
        conclusions: &["P v Q"],
    },
    RawArgumentForm {
        name: "Constructive Dilemma",
        abbreviation: "CD",
        premises: &["P > Q", "R > S", "P v R"],
        conclusions: &["Q v S"],
    },
];

pub const REPLACEMENT_RULES: &[RawReplacementRule] = &[
    RawReplacementRule {
        name: "Commutation",
        abbreviation: "Com",
        equivalences: &[("P & Q", "Q & P"), ("P v Q", "Q v P")],
    },
    RawReplacementRule {
        name: "Associativity",
        abbreviation: "Assoc",
        equivalences: &[("P & (Q & R)", "(P & Q) & R"), ("P v (Q v R)", "(P v Q) v R")],
    },
    RawReplacementRule {
        name: "Double Negation",
        abbreviation: "DN",
        equivalences: &[("P", "~~P")],
    },
    RawReplacementRule {
        name: "De Morgan's",
        abbreviation: "DM",
        equivalences: &[("~(P & Q)", "~P v ~Q"), ("~(P v Q)", "~P & ~Q")],
    },
    RawReplacementRule {
        name: "Distribution",
        abbreviation: "Dist",
        equivalences: &[
            ("P v (Q & R)", "(P v Q) & (P v R)"),
            ("P & (Q v R)", "(P & Q) v (P & R)"),
        ],
    },
    RawReplacementRule {
        name: "Transposition",
        abbreviation: "Trans",
        equivalences: &[("P > Q", "~Q > ~P"), ("~P > ~Q", "Q > P")],
    },
    RawReplacementRule {
        name: "Implication",
        abbreviation: "Imp",
        equivalences: &[("P > Q", "~P v Q")],
    },
    RawReplacementRule {
        name: "Exportation",
        abbreviation: "Exp",
        equivalences: &[("(P & Q) > R", "P > (Q > R)")],
    },
    RawReplacementRule {
        name: "Tautology",
        abbreviation: "Taut",
        equivalences: &[("P", "P & P"), ("P", "P v P")],
    },
    RawReplacementRule {
        name: "Equivalence",
        abbreviation: "Equiv",
        equivalences: &[("P = Q", "(P > Q) & (Q > P)"), ("P = Q", "(P & Q) v (~P & ~Q)")],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentForm {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub premises: Vec<Statement>,
    /// Every valid reading of the conclusion; Simplification has two.
    pub conclusions: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementRule {
    pub name: &'static str,
    pub abbreviation: &'static str,
    /// Equivalent pattern pairs, usable in either direction.
    pub equivalences: Vec<(Statement, Statement)>,
}

impl ReplacementRule {
    /// Every (from, to) rewrite: each pair forwards, then backwards.
    pub fn directions(&self) -> impl Iterator<Item = (&Statement, &Statement)> {
        self.equivalences
            .iter()
            .flat_map(|(left, right)| [(left, right), (right, left)])
    }
}

/// The parsed, immutable rule catalogue. Only shared references are handed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalogue {
    argument_forms: Vec<ArgumentForm>,
    replacement_rules: Vec<ReplacementRule>,
}

static GLOBAL: OnceLock<Catalogue> = OnceLock::new();

fn parse_pattern(source: &str) -> Result<Statement> {
    parse_statement(source).map_err(|error| {
        LogicError::Internal(format!("catalogue pattern \"{source}\" does not parse: {error}"))
    })
}

impl Catalogue {
    pub fn from_raw(forms: &[RawArgumentForm], rules: &[RawReplacementRule]) -> Result<Self> {
        let argument_forms = forms
            .iter()
            .map(|form| -> Result<ArgumentForm> {
                Ok(ArgumentForm {
                    name: form.name,
                    abbreviation: form.abbreviation,
                    premises: form
                        .premises
                        .iter()
                        .map(|premise| parse_pattern(premise))
                        .collect::<Result<_>>()?,
                    conclusions: form
                        .conclusions
                        .iter()
                        .map(|conclusion| parse_pattern(conclusion))
                        .collect::<Result<_>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let replacement_rules = rules
            .iter()
            .map(|rule| -> Result<ReplacementRule> {
                Ok(ReplacementRule {
                    name: rule.name,
                    abbreviation: rule.abbreviation,
                    equivalences: rule
                        .equivalences
                        .iter()
                        .map(|(left, right)| -> Result<(Statement, Statement)> {
                            Ok((parse_pattern(left)?, parse_pattern(right)?))
                        })
                        .collect::<Result<_>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Catalogue {
            argument_forms,
            replacement_rules,
        })
    }

    /// The built-in catalogue, parsed on first access. A pattern that fails to
    /// parse is a defect in this file, so initialization aborts.
    pub fn global() -> &'static Catalogue {
        GLOBAL.get_or_init(|| {
            let catalogue = Catalogue::from_raw(ARGUMENT_FORMS, REPLACEMENT_RULES)
                .unwrap_or_else(|error| panic!("{error}"));

            tracing::info!(
                argument_forms = catalogue.argument_forms.len(),
                replacement_rules = catalogue.replacement_rules.len(),
                "rule catalogue initialized"
            );

            catalogue
        })
    }

    pub fn argument_forms(&self) -> &[ArgumentForm] {
        &self.argument_forms
    }

    pub fn replacement_rules(&self) -> &[ReplacementRule] {
        &self.replacement_rules
    }

    /// Forms sharing an abbreviation; Disjunctive Syllogism has two entries.
    pub fn argument_forms_named(&self, abbreviation: &str) -> Vec<&ArgumentForm> {
        self.argument_forms
            .iter()
            .filter(|form| form.abbreviation == abbreviation)
            .collect()
    }

    pub fn replacement_rule(&self, abbreviation: &str) -> Option<&ReplacementRule> {
        self.replacement_rules
            .iter()
            .find(|rule| rule.abbreviation == abbreviation)
    }
}
