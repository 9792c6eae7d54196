use std::fmt::Display;

use enum_as_inner::EnumAsInner;
use termtree::Tree;

#[derive(Debug, Clone, Hash, PartialEq, Eq, EnumAsInner)]
enum ExplanationComponent {
    Step(String),
    Explanation(Explanation),
}

/// A tree of notes describing how the proof engine reached its results.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Default)]
pub struct Explanation {
    description: String,
    components: Vec<ExplanationComponent>,
}

impl Explanation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            components: Vec::new(),
        }
    }

    pub fn step(&mut self, step: impl Into<String>) {
        let step = ExplanationComponent::Step(step.into());

        if self.components.last() != Some(&step) {
            self.components.push(step);
        }
    }

    pub fn subexplanation(&mut self, description: impl Into<String>) -> &mut Self {
        self.components
            .push(ExplanationComponent::Explanation(Explanation::new(description)));

        match self.components.last_mut() {
            Some(ExplanationComponent::Explanation(explanation)) => explanation,
            _ => unreachable!("a subexplanation was just pushed"),
        }
    }

    pub fn with_subexplanation<T>(
        &mut self,
        description: impl Into<String>,
        function: impl FnOnce(&mut Explanation) -> T,
    ) -> T {
        let explanation = self.subexplanation(description);
        function(explanation)
    }

    /// Plain step lines, depth first, without descriptions.
    pub fn steps(&self) -> Vec<&str> {
        self.components
            .iter()
            .flat_map(|component| match component {
                ExplanationComponent::Step(step) => vec![step.as_str()],
                ExplanationComponent::Explanation(explanation) => explanation.steps(),
            })
            .collect()
    }

    pub fn subexplanations(&self) -> impl Iterator<Item = &Explanation> {
        self.components
            .iter()
            .filter_map(ExplanationComponent::as_explanation)
    }

    pub fn get_tree(&self) -> Tree<String> {
        let leaves = self.components.iter().map(|component| match component {
            ExplanationComponent::Step(step) => Tree::new(step.clone()),
            ExplanationComponent::Explanation(explanation) => explanation.get_tree(),
        });

        Tree::new(self.description.clone()).with_leaves(leaves)
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.get_tree())
    }
}

/// Values that can narrate themselves into an [`Explanation`].
pub trait Explain {
    fn explain(&self, explanation: &mut Explanation);
}
