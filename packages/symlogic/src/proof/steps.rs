use std::fmt::{self, Display};

use serde::Serialize;
use thiserror::Error;

use crate::{
    error::LogicError,
    explanation::{Explain, Explanation},
    propositional_logic::{parser::parse_statement, types::Statement},
};

use super::{
    catalogue::Catalogue,
    derive::{FormMatch, RuleMatch},
    matching::Derivation,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    #[error("There is no line {0}")]
    UnknownStep(usize),

    #[error("Line {step} can only cite earlier lines, not line {cited}")]
    ForwardReference { step: usize, cited: usize },

    #[error("Line {0} is a premise and cannot be removed")]
    PremiseRemoval(usize),

    #[error("Line {step} is cited by line {used_by}")]
    StepInUse { step: usize, used_by: usize },

    #[error("Line {0} still contains a placeholder")]
    UnfilledPlaceholder(usize),

    #[error("Line {0} has no placeholder to fill")]
    NothingToFill(usize),

    #[error(transparent)]
    Logic(#[from] LogicError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Justification {
    Premise,
    Rule {
        abbreviation: String,
        sources: Vec<usize>,
    },
}

impl Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Justification::Premise => write!(f, "Premise"),
            Justification::Rule {
                abbreviation,
                sources,
            } => {
                let sources = sources
                    .iter()
                    .map(|source| (source + 1).to_string())
                    .collect::<Vec<_>>();
                write!(f, "{}, {abbreviation}", sources.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofLine {
    pub statement: Derivation,
    pub justification: Justification,
}

/// A proof under construction: the premises, then derived lines that may only
/// cite lines above them. Lines are addressed by zero-based index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proof {
    lines: Vec<ProofLine>,
    premise_count: usize,
    conclusion: Statement,
}

impl Proof {
    pub fn new(premises: &[impl AsRef<str>], conclusion: &str) -> Result<Self, ProofError> {
        let lines = premises
            .iter()
            .map(|premise| -> Result<ProofLine, LogicError> {
                Ok(ProofLine {
                    statement: Derivation::from(&parse_statement(premise.as_ref())?),
                    justification: Justification::Premise,
                })
            })
            .collect::<Result<Vec<_>, LogicError>>()?;

        Ok(Self {
            premise_count: lines.len(),
            lines,
            conclusion: parse_statement(conclusion).map_err(LogicError::from)?,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn premise_count(&self) -> usize {
        self.premise_count
    }

    pub fn conclusion(&self) -> &Statement {
        &self.conclusion
    }

    pub fn lines(&self) -> &[ProofLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Result<&ProofLine, ProofError> {
        self.lines.get(index).ok_or(ProofError::UnknownStep(index))
    }

    /// The finished statement on a line; placeholders must be filled first.
    pub fn statement(&self, index: usize) -> Result<Statement, ProofError> {
        self.line(index)?
            .statement
            .to_statement()
            .ok_or(ProofError::UnfilledPlaceholder(index))
    }

    /// Appends a derived line and returns its index.
    pub fn push(
        &mut self,
        statement: Derivation,
        abbreviation: impl Into<String>,
        sources: Vec<usize>,
    ) -> Result<usize, ProofError> {
        let step = self.lines.len();

        if let Some(&cited) = sources.iter().find(|&&source| source >= step) {
            return Err(ProofError::ForwardReference { step, cited });
        }

        let abbreviation = abbreviation.into();
        tracing::trace!(step, %statement, rule = abbreviation.as_str(), ?sources, "line added");

        self.lines.push(ProofLine {
            statement,
            justification: Justification::Rule {
                abbreviation,
                sources,
            },
        });

        Ok(step)
    }

    /// Removes a derived line that no later line cites. Citations past the
    /// removed line shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<ProofLine, ProofError> {
        self.line(index)?;

        if index < self.premise_count {
            return Err(ProofError::PremiseRemoval(index));
        }

        let used_by = self.lines.iter().enumerate().skip(index + 1).find(|(_, line)| {
            matches!(&line.justification, Justification::Rule { sources, .. } if sources.contains(&index))
        });
        if let Some((used_by, _)) = used_by {
            return Err(ProofError::StepInUse {
                step: index,
                used_by,
            });
        }

        let removed = self.lines.remove(index);

        for line in &mut self.lines[index..] {
            if let Justification::Rule { sources, .. } = &mut line.justification {
                for source in sources.iter_mut().filter(|source| **source > index) {
                    *source -= 1;
                }
            }
        }

        tracing::trace!(step = index, "line removed");

        Ok(removed)
    }

    /// Puts `replacement` at every placeholder of a line.
    pub fn fill(&mut self, index: usize, replacement: &Statement) -> Result<(), ProofError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(ProofError::UnknownStep(index))?;

        if !line.statement.has_placeholder() {
            return Err(ProofError::NothingToFill(index));
        }

        line.statement = Derivation::from(&line.statement.fill(replacement));
        tracing::trace!(step = index, %replacement, "placeholder filled");

        Ok(())
    }

    /// Argument forms applicable to the selected lines, in selection order.
    pub fn argument_forms(
        &self,
        selected: &[usize],
        explanation: &mut Explanation,
    ) -> Result<Vec<FormMatch<'static>>, ProofError> {
        let statements = selected
            .iter()
            .map(|&index| self.statement(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalogue::global().match_argument_forms(&statements, explanation))
    }

    /// Replacement rules applicable to the fragment at `path` of one line.
    pub fn replacement_rules(
        &self,
        index: usize,
        path: &[usize],
        explanation: &mut Explanation,
    ) -> Result<Vec<RuleMatch<'static>>, ProofError> {
        let statement = self.statement(index)?;

        Ok(Catalogue::global().match_replacement_rules(&statement, path, explanation)?)
    }

    /// The last line is a finished statement structurally identical to the conclusion.
    pub fn is_complete(&self) -> bool {
        self.lines
            .last()
            .and_then(|line| line.statement.to_statement())
            .is_some_and(|statement| statement == self.conclusion)
    }
}

impl Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .lines
            .iter()
            .map(|line| line.statement.to_string().chars().count())
            .max()
            .unwrap_or(0);

        for (index, line) in self.lines.iter().enumerate() {
            writeln!(
                f,
                "{:>3}. {:<width$}    {}",
                index + 1,
                line.statement.to_string(),
                line.justification
            )?;
        }

        write!(f, "  ∴ {}", self.conclusion)
    }
}

impl Explain for Proof {
    fn explain(&self, explanation: &mut Explanation) {
        explanation.with_subexplanation(format!("Proof of {}", self.conclusion), |explanation| {
            for (index, line) in self.lines.iter().enumerate() {
                explanation.step(format!(
                    "{}. {} ({})",
                    index + 1,
                    line.statement,
                    line.justification
                ));
            }

            if self.is_complete() {
                explanation.step("The conclusion has been reached");
            }
        });
    }
}
