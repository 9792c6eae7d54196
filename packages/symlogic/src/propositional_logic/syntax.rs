use std::fmt::{self, Display};

use indexmap::IndexSet;
use serde::Serialize;

use super::types::{Connective, Statement, Symbol};

/// The concrete syntax tree produced by the parser. Unlike [`Statement`] it
/// remembers the operator glyphs and grouping brackets exactly as written,
/// which the truth-table headers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Syntax {
    Identifier {
        symbol: Symbol,
    },
    Negation {
        glyph: String,
        operand: Box<Syntax>,
    },
    Binary {
        connective: Connective,
        glyph: String,
        left: Box<Syntax>,
        right: Box<Syntax>,
    },
    Grouping {
        open: char,
        inner: Box<Syntax>,
        close: char,
    },
}

impl Syntax {
    pub fn to_statement(&self) -> Statement {
        match self {
            Syntax::Identifier { symbol } => Statement::Atomic(symbol.clone()),
            Syntax::Negation { operand, .. } => Statement::negation(operand.to_statement()),
            Syntax::Binary {
                connective,
                left,
                right,
                ..
            } => Statement::binary(*connective, left.to_statement(), right.to_statement()),
            Syntax::Grouping { inner, .. } => inner.to_statement(),
        }
    }

    /// Distinct symbols in order of first appearance in the source text.
    pub fn symbols(&self) -> IndexSet<&Symbol> {
        let mut symbols = IndexSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols<'a>(&'a self, symbols: &mut IndexSet<&'a Symbol>) {
        match self {
            Syntax::Identifier { symbol } => {
                symbols.insert(symbol);
            }
            Syntax::Negation { operand, .. } => operand.collect_symbols(symbols),
            Syntax::Binary { left, right, .. } => {
                left.collect_symbols(symbols);
                right.collect_symbols(symbols);
            }
            Syntax::Grouping { inner, .. } => inner.collect_symbols(symbols),
        }
    }
}

/// Reconstructs the source text with normalized spacing.
impl Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::Identifier { symbol } => write!(f, "{symbol}"),
            Syntax::Negation { glyph, operand } => write!(f, "{glyph}{operand}"),
            Syntax::Binary {
                glyph, left, right, ..
            } => write!(f, "{left} {glyph} {right}"),
            Syntax::Grouping { open, inner, close } => write!(f, "{open}{inner}{close}"),
        }
    }
}

/// Swaps the ASCII conditional and biconditional glyphs for their typeset forms.
pub fn prettify(input: &str) -> String {
    input.replace('>', "⊃").replace('=', "≡")
}
