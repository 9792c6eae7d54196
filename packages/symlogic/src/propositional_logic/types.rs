use std::fmt::{self, Display};

use indexmap::IndexSet;
use serde::Serialize;
use strum::EnumIter;
use termtree::Tree;

/// An atomic propositional symbol such as `A` or `Rain`.
#[derive(
    Debug,
    Hash,
    PartialEq,
    Eq,
    Clone,
    PartialOrd,
    Ord,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.to_owned())
    }
}

pub const NEGATION_TOKEN: &str = "~";

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, EnumIter)]
pub enum Connective {
    Conjunction,
    Disjunction,
    Conditional,
    Biconditional,
}

impl Connective {
    /// The glyph used when rendering statements back to text.
    pub fn token(self) -> &'static str {
        match self {
            Connective::Conjunction => "&",
            Connective::Disjunction => "v",
            Connective::Conditional => ">",
            Connective::Biconditional => "=",
        }
    }

    /// Every spelling the parser accepts, longest first.
    pub fn glyphs(self) -> &'static [&'static str] {
        match self {
            Connective::Conjunction => &["&&", "&", "/\\", "∧"],
            Connective::Disjunction => &["||", "\\/", "v", "∨"],
            Connective::Conditional => &[">", "⊃"],
            Connective::Biconditional => &["=", "≡"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Connective::Conjunction => "conjunction",
            Connective::Disjunction => "disjunction",
            Connective::Conditional => "conditional",
            Connective::Biconditional => "biconditional",
        }
    }

    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Connective::Conjunction => left && right,
            Connective::Disjunction => left || right,
            Connective::Conditional => !left || right,
            Connective::Biconditional => left == right,
        }
    }
}

impl Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An expression tree. Grouping brackets are not represented; two statements
/// are equal exactly when they have the same shape, connectives and symbols.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Statement {
    Atomic(Symbol),
    Negation(Box<Statement>),
    Binary(Connective, Box<Statement>, Box<Statement>),
}

impl From<Symbol> for Statement {
    fn from(symbol: Symbol) -> Self {
        Statement::Atomic(symbol)
    }
}

impl Statement {
    pub fn atomic(name: impl Into<String>) -> Self {
        Statement::Atomic(Symbol(name.into()))
    }

    pub fn negation(operand: Statement) -> Self {
        Statement::Negation(Box::new(operand))
    }

    pub fn binary(connective: Connective, left: Statement, right: Statement) -> Self {
        Statement::Binary(connective, Box::new(left), Box::new(right))
    }

    /// Distinct symbols in first-occurrence order of a pre-order traversal.
    pub fn symbols(&self) -> IndexSet<&Symbol> {
        let mut symbols = IndexSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols<'a>(&'a self, symbols: &mut IndexSet<&'a Symbol>) {
        match self {
            Statement::Atomic(symbol) => {
                symbols.insert(symbol);
            }
            Statement::Negation(operand) => operand.collect_symbols(symbols),
            Statement::Binary(_, left, right) => {
                left.collect_symbols(symbols);
                right.collect_symbols(symbols);
            }
        }
    }

    /// Follows a path of child indices from this node.
    pub fn fragment(&self, path: &[usize]) -> Option<&Statement> {
        path.iter()
            .try_fold(self, |node, &index| node.children().get(index).copied())
    }

    /// Rebuilds the statement with the node at `path` swapped for `replacement`.
    pub fn replace_fragment(&self, path: &[usize], replacement: Statement) -> Option<Statement> {
        let Some((&index, rest)) = path.split_first() else {
            return Some(replacement);
        };

        match (self, index) {
            (Statement::Negation(operand), 0) => Some(Statement::negation(
                operand.replace_fragment(rest, replacement)?,
            )),
            (Statement::Binary(connective, left, right), 0) => Some(Statement::binary(
                *connective,
                left.replace_fragment(rest, replacement)?,
                (**right).clone(),
            )),
            (Statement::Binary(connective, left, right), 1) => Some(Statement::binary(
                *connective,
                (**left).clone(),
                right.replace_fragment(rest, replacement)?,
            )),
            _ => None,
        }
    }

    pub fn get_tree(&self) -> Tree<String> {
        Tree::new(self.token().to_owned())
            .with_leaves(self.children().into_iter().map(Statement::get_tree))
    }
}

/// The shape shared by statements and derived statements: a token plus at
/// most two ordered children.
pub trait Node: Sized {
    fn token(&self) -> &str;
    fn children(&self) -> Vec<&Self>;
}

impl Node for Statement {
    fn token(&self) -> &str {
        match self {
            Statement::Atomic(symbol) => &symbol.0,
            Statement::Negation(_) => NEGATION_TOKEN,
            Statement::Binary(connective, _, _) => connective.token(),
        }
    }

    fn children(&self) -> Vec<&Self> {
        match self {
            Statement::Atomic(_) => vec![],
            Statement::Negation(operand) => vec![operand.as_ref()],
            Statement::Binary(_, left, right) => vec![left.as_ref(), right.as_ref()],
        }
    }
}

/// Renders a node as statement text. Children that are themselves binary are
/// parenthesized; atoms and negations are not.
pub fn stringify<N: Node>(node: &N) -> String {
    let child = |operand: &N| {
        let text = stringify(operand);

        if operand.children().len() > 1 {
            format!("({text})")
        } else {
            text
        }
    };

    match node.children().as_slice() {
        [] => node.token().to_owned(),
        [operand] => format!("{}{}", node.token(), child(*operand)),
        [left, right] => format!("{} {} {}", child(*left), node.token(), child(*right)),
        _ => unreachable!("nodes have at most two children"),
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}
