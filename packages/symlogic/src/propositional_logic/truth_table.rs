use std::fmt::{self, Display};

use colored::{ColoredString, Colorize};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::{
    config::EngineConfig,
    error::{LogicError, Result},
    markdown::Markdown,
    propositional_logic::{
        syntax::Syntax,
        types::{Statement, Symbol},
    },
};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TruthValue(pub bool);

impl Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.0 { "T" } else { "F" })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Column {
    Values {
        header: String,
        values: Vec<TruthValue>,
    },
    /// Blank column between joined statements, headed `/` or `//`.
    Separator { header: String, height: usize },
}

impl Column {
    pub fn header(&self) -> &str {
        match self {
            Column::Values { header, .. } | Column::Separator { header, .. } => header,
        }
    }

    fn header_mut(&mut self) -> &mut String {
        match self {
            Column::Values { header, .. } | Column::Separator { header, .. } => header,
        }
    }

    pub fn values(&self) -> Option<&[TruthValue]> {
        match self {
            Column::Values { values, .. } => Some(values),
            Column::Separator { .. } => None,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Column::Values { values, .. } => values.len(),
            Column::Separator { height, .. } => *height,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Column::Separator { .. })
    }
}

/// Ordered columns plus the designated main column(s): a single index for one
/// statement, one index per statement for joined tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthTable<M = usize> {
    pub columns: Vec<Column>,
    pub main: M,
}

pub trait MainColumns {
    fn contains(&self, index: usize) -> bool;
}

impl MainColumns for usize {
    fn contains(&self, index: usize) -> bool {
        *self == index
    }
}

impl MainColumns for Vec<usize> {
    fn contains(&self, index: usize) -> bool {
        self.as_slice().contains(&index)
    }
}

impl<M> TruthTable<M> {
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::height)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(Column::header).collect()
    }

    /// Row-major view of the cells; separators yield `None`.
    pub fn rows(&self) -> Vec<Vec<Option<TruthValue>>> {
        (0..self.row_count())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| column.values().map(|values| values[row]))
                    .collect()
            })
            .collect()
    }

    fn column_values(&self, index: usize) -> &[TruthValue] {
        self.columns
            .get(index)
            .and_then(Column::values)
            .unwrap_or_default()
    }
}

impl TruthTable<usize> {
    pub fn main_values(&self) -> &[TruthValue] {
        self.column_values(self.main)
    }
}

impl TruthTable<Vec<usize>> {
    pub fn main_values(&self) -> Vec<&[TruthValue]> {
        self.main
            .iter()
            .map(|&index| self.column_values(index))
            .collect()
    }
}

impl<M: MainColumns> TruthTable<M> {
    fn render(
        &self,
        f: &mut impl fmt::Write,
        style: impl Fn(ColoredString) -> String,
    ) -> fmt::Result {
        let highlight = |index: usize, text: String| {
            if self.main.contains(index) {
                style(text.as_str().blue().bold())
            } else {
                style(text.as_str().normal())
            }
        };

        for (index, column) in self.columns.iter().enumerate() {
            write!(f, "|{}", highlight(index, column.header().to_owned()))?;
        }
        writeln!(f, "|")?;

        for _ in &self.columns {
            write!(f, "|:-:")?;
        }
        writeln!(f, "|")?;

        for row in self.rows() {
            for (index, cell) in row.into_iter().enumerate() {
                let text = cell.map(|value| value.to_string()).unwrap_or_default();
                write!(f, "|{}", highlight(index, text))?;
            }
            writeln!(f, "|")?;
        }

        Ok(())
    }

    /// The table as markdown with the main columns coloured through inline HTML.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let _ = self.render(&mut output, |text| text.markdown());
        output
    }
}

impl<M: MainColumns> Display for TruthTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, |text| text.to_string())
    }
}

/// Both views of one evaluation. `simple` keeps only the constant columns and
/// the final result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthTableData<M = usize> {
    pub detailed: TruthTable<M>,
    pub simple: TruthTable<M>,
    pub constants: Vec<Symbol>,
}

/// An assignment of truth values to symbols, i.e. one row of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpretation(pub IndexMap<Symbol, TruthValue>);

impl Interpretation {
    /// The assignment on `row` under the leftmost-varies-slowest convention.
    pub fn for_row(symbols: &[Symbol], row: usize) -> Self {
        let n = symbols.len();

        Interpretation(
            symbols
                .iter()
                .enumerate()
                .map(|(index, symbol)| {
                    let value = (row >> (n - index - 1)) & 1 == 0;
                    (symbol.clone(), TruthValue(value))
                })
                .collect(),
        )
    }

    pub fn evaluate(&self, statement: &Statement) -> Option<TruthValue> {
        let value = match statement {
            Statement::Atomic(symbol) => self.0.get(symbol)?.0,
            Statement::Negation(operand) => !self.evaluate(operand)?.0,
            Statement::Binary(connective, left, right) => {
                connective.apply(self.evaluate(left)?.0, self.evaluate(right)?.0)
            }
        };

        Some(TruthValue(value))
    }
}

impl Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assignments = self
            .0
            .iter()
            .map(|(symbol, value)| format!("{}{symbol}", if value.0 { "" } else { "¬" }))
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{{{assignments}}}")
    }
}

/// Distinct symbols across `trees` in first-occurrence order, checked against
/// the configured limit before any row is allocated.
pub fn symbols_for<'a>(
    trees: impl IntoIterator<Item = &'a Syntax>,
    config: &EngineConfig,
) -> Result<IndexSet<Symbol>> {
    let symbols = trees
        .into_iter()
        .flat_map(|tree| tree.symbols())
        .cloned()
        .collect::<IndexSet<_>>();

    config.check_size(symbols.len())?;

    Ok(symbols)
}

fn constant_columns(symbols: &IndexSet<Symbol>) -> IndexMap<Symbol, Vec<TruthValue>> {
    let height = 1usize << symbols.len();

    symbols
        .iter()
        .enumerate()
        .map(|(index, symbol)| {
            let run = height >> (index + 1);
            let values = (0..height)
                .map(|row| TruthValue((row / run) % 2 == 0))
                .collect();

            (symbol.clone(), values)
        })
        .collect()
}

struct Evaluation {
    columns: Vec<Column>,
    main: usize,
}

impl Evaluation {
    fn main_values(&self) -> &[TruthValue] {
        self.columns[self.main].values().unwrap_or_default()
    }
}

fn evaluate(syntax: &Syntax, constants: &IndexMap<Symbol, Vec<TruthValue>>) -> Result<Evaluation> {
    match syntax {
        Syntax::Identifier { symbol } => {
            let values = constants.get(symbol).ok_or_else(|| {
                LogicError::Internal(format!("symbol {symbol} has no constant column"))
            })?;

            Ok(Evaluation {
                columns: vec![Column::Values {
                    header: symbol.to_string(),
                    values: values.clone(),
                }],
                main: 0,
            })
        }
        Syntax::Negation { glyph, operand } => {
            let operand = evaluate(operand, constants)?;
            let values = operand
                .main_values()
                .iter()
                .map(|value| TruthValue(!value.0))
                .collect();

            let mut columns = vec![Column::Values {
                header: glyph.clone(),
                values,
            }];
            columns.extend(operand.columns);

            Ok(Evaluation { columns, main: 0 })
        }
        Syntax::Binary {
            connective,
            glyph,
            left,
            right,
        } => {
            let left = evaluate(left, constants)?;
            let right = evaluate(right, constants)?;

            let values = left
                .main_values()
                .iter()
                .zip(right.main_values())
                .map(|(l, r)| TruthValue(connective.apply(l.0, r.0)))
                .collect();

            let main = left.columns.len();
            let mut columns = left.columns;
            columns.push(Column::Values {
                header: glyph.clone(),
                values,
            });
            columns.extend(right.columns);

            Ok(Evaluation { columns, main })
        }
        Syntax::Grouping { open, inner, close } => {
            let mut evaluation = evaluate(inner, constants)?;

            if let Some(first) = evaluation.columns.first_mut() {
                first.header_mut().insert(0, *open);
            }
            if let Some(last) = evaluation.columns.last_mut() {
                last.header_mut().push(*close);
            }

            Ok(evaluation)
        }
    }
}

fn build_with_constants(
    syntax: &Syntax,
    constants: &IndexMap<Symbol, Vec<TruthValue>>,
) -> Result<TruthTableData> {
    let evaluation = evaluate(syntax, constants)?;

    let mut simple_columns = constants
        .iter()
        .map(|(symbol, values)| Column::Values {
            header: symbol.to_string(),
            values: values.clone(),
        })
        .collect::<Vec<_>>();
    simple_columns.push(Column::Values {
        header: syntax.to_string(),
        values: evaluation.main_values().to_vec(),
    });

    Ok(TruthTableData {
        simple: TruthTable {
            main: constants.len(),
            columns: simple_columns,
        },
        detailed: TruthTable {
            main: evaluation.main,
            columns: evaluation.columns,
        },
        constants: constants.keys().cloned().collect(),
    })
}

pub fn build_table(syntax: &Syntax, config: &EngineConfig) -> Result<TruthTableData> {
    let symbols = symbols_for([syntax], config)?;

    tracing::debug!(
        symbols = symbols.len(),
        rows = 1usize << symbols.len(),
        "building truth table"
    );

    build_with_constants(syntax, &constant_columns(&symbols))
}

/// Builds every statement against the shared symbol set and concatenates the
/// tables. With `is_argument` the last separator, before the conclusion, is `//`.
pub fn build_joined_table(
    trees: &[&Syntax],
    is_argument: bool,
    config: &EngineConfig,
) -> Result<TruthTableData<Vec<usize>>> {
    if trees.is_empty() {
        return Err(LogicError::NothingToJoin);
    }

    let symbols = symbols_for(trees.iter().copied(), config)?;
    let constants = constant_columns(&symbols);
    let height = 1usize << symbols.len();

    tracing::debug!(
        statements = trees.len(),
        symbols = symbols.len(),
        rows = height,
        is_argument,
        "building joined truth table"
    );

    let tables = trees
        .iter()
        .map(|tree| build_with_constants(tree, &constants))
        .collect::<Result<Vec<_>>>()?;

    let (detailed, simple): (Vec<_>, Vec<_>) = tables
        .into_iter()
        .map(|table| (table.detailed, table.simple))
        .unzip();

    Ok(TruthTableData {
        detailed: join(detailed, is_argument, height),
        simple: join(simple, is_argument, height),
        constants: symbols.into_iter().collect(),
    })
}

fn join(tables: Vec<TruthTable>, is_argument: bool, height: usize) -> TruthTable<Vec<usize>> {
    let count = tables.len();
    let mut joined = TruthTable {
        columns: Vec::new(),
        main: Vec::new(),
    };

    for (index, table) in tables.into_iter().enumerate() {
        joined.main.push(joined.columns.len() + table.main);
        joined.columns.extend(table.columns);

        if index + 1 < count {
            let header = if is_argument && index + 2 == count {
                "//"
            } else {
                "/"
            };

            joined.columns.push(Column::Separator {
                header: header.to_owned(),
                height,
            });
        }
    }

    joined
}
