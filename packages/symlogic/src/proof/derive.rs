use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    error::{LogicError, Result},
    explanation::{Explain, Explanation},
    propositional_logic::{parser::parse_statement, types::Statement},
};

use super::{
    catalogue::{ArgumentForm, Catalogue, ReplacementRule},
    matching::{match_pattern, match_premises, substitute, Bindings, Derivation},
};

/// One derivable statement, keyed by its rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derived {
    pub text: String,
    pub tree: Derivation,
}

/// Collects derivations, keeping the first tree for each distinct text.
#[derive(Debug, Default)]
struct DerivedSet(IndexMap<String, Derivation>);

impl DerivedSet {
    fn insert(&mut self, tree: Derivation) {
        self.0.entry(tree.to_string()).or_insert(tree);
    }

    fn into_vec(self) -> Vec<Derived> {
        self.0
            .into_iter()
            .map(|(text, tree)| Derived { text, tree })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormMatch<'c> {
    pub form: &'c ArgumentForm,
    pub bindings: Vec<(String, String)>,
    pub derived: Vec<Derived>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch<'c> {
    pub rule: &'c ReplacementRule,
    /// Rewrites of the addressed fragment.
    pub derived: Vec<Derived>,
    /// The whole statement with each rewrite spliced back in at the fragment.
    pub spliced: Vec<String>,
}

fn binding_pairs(bindings: &Bindings) -> Vec<(String, String)> {
    bindings
        .0
        .iter()
        .map(|(variable, statement)| (variable.to_string(), statement.to_string()))
        .collect()
}

impl Catalogue {
    /// Every argument form whose premises can be assigned to `statements`,
    /// with its de-duplicated conclusions. Forms of a different arity are skipped.
    pub fn match_argument_forms(
        &self,
        statements: &[Statement],
        explanation: &mut Explanation,
    ) -> Vec<FormMatch<'_>> {
        self.argument_forms()
            .iter()
            .filter(|form| form.premises.len() == statements.len())
            .filter_map(|form| {
                let explanation =
                    explanation.subexplanation(format!("{} ({})", form.name, form.abbreviation));

                let premises = form.premises.iter().collect::<Vec<_>>();

                let Some(bindings) = match_premises(&premises, statements, Bindings::default())
                else {
                    explanation.step("No assignment of premises matches".red().to_string());
                    return None;
                };

                explanation.step(format!("Matched with {}", bindings.to_string().green()));

                let mut derived = DerivedSet::default();
                for conclusion in &form.conclusions {
                    derived.insert(substitute(conclusion, &bindings));
                }
                let derived = derived.into_vec();

                for result in &derived {
                    explanation.step(format!("=> {}", result.text.blue()));
                }

                tracing::debug!(form = form.abbreviation, %bindings, "argument form matched");

                Some(FormMatch {
                    form,
                    bindings: binding_pairs(&bindings),
                    derived,
                })
            })
            .collect()
    }

    /// Every replacement rule that rewrites the fragment of `statement` at
    /// `path`, trying both directions of every equivalence.
    pub fn match_replacement_rules(
        &self,
        statement: &Statement,
        path: &[usize],
        explanation: &mut Explanation,
    ) -> Result<Vec<RuleMatch<'_>>> {
        let fragment = statement
            .fragment(path)
            .ok_or_else(|| LogicError::FragmentNotFound {
                path: path.to_vec(),
            })?;

        Ok(self
            .replacement_rules()
            .iter()
            .filter_map(|rule| {
                let explanation =
                    explanation.subexplanation(format!("{} ({})", rule.name, rule.abbreviation));

                let mut derived = DerivedSet::default();
                for (from, to) in rule.directions() {
                    if let Some(bindings) = match_pattern(from, fragment, Bindings::default()) {
                        let result = substitute(to, &bindings);
                        explanation.step(format!(
                            "{from} ⟹ {to} with {} gives {}",
                            bindings.to_string().green(),
                            result.to_string().blue()
                        ));
                        derived.insert(result);
                    }
                }

                if derived.0.is_empty() {
                    explanation.step("No equivalence matches".red().to_string());
                    return None;
                }

                let derived = derived.into_vec();
                let spliced = derived
                    .iter()
                    .map(|result| match result.tree.to_statement() {
                        Some(replacement) => statement
                            .replace_fragment(path, replacement)
                            .map_or_else(|| result.text.clone(), |whole| whole.to_string()),
                        None => result.text.clone(),
                    })
                    .collect();

                tracing::debug!(rule = rule.abbreviation, results = derived.len(), "replacement rule matched");

                Some(RuleMatch {
                    rule,
                    derived,
                    spliced,
                })
            })
            .collect())
    }
}

/// Parses the selected statements and matches them against the built-in catalogue.
pub fn get_argument_forms(
    statements: &[impl AsRef<str>],
    explanation: &mut Explanation,
) -> Result<Vec<FormMatch<'static>>> {
    let statements = statements
        .iter()
        .map(|statement| parse_statement(statement.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Catalogue::global().match_argument_forms(&statements, explanation))
}

/// Parses `statement` and matches the fragment at `path` (empty for the whole
/// statement) against the built-in replacement rules.
pub fn get_replacement_rules(
    statement: &str,
    path: &[usize],
    explanation: &mut Explanation,
) -> Result<Vec<RuleMatch<'static>>> {
    let statement = parse_statement(statement)?;

    Catalogue::global().match_replacement_rules(&statement, path, explanation)
}

impl Explain for FormMatch<'_> {
    fn explain(&self, explanation: &mut Explanation) {
        explanation.with_subexplanation(
            format!("{} ({})", self.form.name, self.form.abbreviation),
            |explanation| {
                for (variable, statement) in &self.bindings {
                    explanation.step(format!("{variable} ← {statement}"));
                }
                for result in &self.derived {
                    explanation.step(format!("=> {}", result.text));
                }
            },
        );
    }
}

impl Explain for RuleMatch<'_> {
    fn explain(&self, explanation: &mut Explanation) {
        explanation.with_subexplanation(
            format!("{} ({})", self.rule.name, self.rule.abbreviation),
            |explanation| {
                for (result, whole) in self.derived.iter().zip(&self.spliced) {
                    if result.text == *whole {
                        explanation.step(format!("=> {}", result.text));
                    } else {
                        explanation.step(format!("=> {} (in place: {whole})", result.text));
                    }
                }
            },
        );
    }
}
