use serde::Serialize;
use strum::IntoEnumIterator;
use winnow::{
    ascii::multispace0,
    combinator::{alt, eof, separated_foldr1, terminated},
    error::{ContextError, ErrMode},
    stream::Stream,
    token::{one_of, take_while},
    PResult, Parser, Stateful,
};

use crate::{
    config::EngineConfig,
    error::{Result, SyntaxError},
    propositional_logic::{
        syntax::Syntax,
        truth_table::{build_table, TruthTableData},
        types::{Connective, Statement, Symbol},
    },
};

pub const NEGATION_GLYPHS: [&str; 3] = ["~", "!", "¬"];
pub const OPENING_BRACKETS: [char; 3] = ['(', '[', '{'];
pub const CLOSING_BRACKETS: [char; 3] = [')', ']', '}'];

/// Tracks the rightmost failure seen while parsing, together with everything
/// that would have been accepted there.
#[derive(Debug, Default)]
struct State {
    source_len: usize,
    furthest: usize,
    expected: Vec<&'static str>,
}

impl State {
    fn record(&mut self, offset: usize, what: &'static str) {
        if offset > self.furthest {
            self.furthest = offset;
            self.expected.clear();
        }

        if offset == self.furthest && !self.expected.contains(&what) {
            self.expected.push(what);
        }
    }
}

type Input<'a> = Stateful<&'a str, State>;

/// A successfully parsed statement: the source text, its concrete syntax tree
/// (enough to rebuild a truth table without re-parsing) and its expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedStatement {
    pub source: String,
    pub syntax: Syntax,
    pub statement: Statement,
}

impl ParsedStatement {
    pub fn truth_table(&self, config: &EngineConfig) -> Result<TruthTableData> {
        build_table(&self.syntax, config)
    }
}

pub fn parse(input: &str) -> Result<ParsedStatement, SyntaxError> {
    let mut parser_input = Stateful {
        input,
        state: State {
            source_len: input.len(),
            ..State::default()
        },
    };

    let result = terminated(statement, token(eof, "end of input")).parse_next(&mut parser_input);

    match result {
        Ok(syntax) => Ok(ParsedStatement {
            source: input.to_owned(),
            statement: syntax.to_statement(),
            syntax,
        }),
        Err(_) => {
            let State {
                furthest, expected, ..
            } = parser_input.state;

            let error = SyntaxError {
                position: input[..furthest].chars().count(),
                expected: expected.into_iter().map(str::to_owned).collect(),
            };

            tracing::debug!(input, position = error.position, "{error}");

            Err(error)
        }
    }
}

/// Parses just the expression tree, for callers that never need a table.
pub fn parse_statement(input: &str) -> Result<Statement, SyntaxError> {
    parse(input).map(|parsed| parsed.statement)
}

fn statement(input: &mut Input) -> PResult<Syntax> {
    biconditional.parse_next(input)
}

fn biconditional(input: &mut Input) -> PResult<Syntax> {
    binary_level(Connective::Biconditional, conditional, input)
}

fn conditional(input: &mut Input) -> PResult<Syntax> {
    binary_level(Connective::Conditional, disjunction, input)
}

fn disjunction(input: &mut Input) -> PResult<Syntax> {
    binary_level(Connective::Disjunction, conjunction, input)
}

fn conjunction(input: &mut Input) -> PResult<Syntax> {
    binary_level(Connective::Conjunction, negation, input)
}

/// One precedence level: operands joined by `connective`, folded to the right.
fn binary_level<'a>(
    connective: Connective,
    operand: fn(&mut Input<'a>) -> PResult<Syntax>,
    input: &mut Input<'a>,
) -> PResult<Syntax> {
    separated_foldr1(
        operand,
        token(glyph(connective.glyphs()), connective.name()),
        |left, glyph: &str, right| Syntax::Binary {
            connective,
            glyph: glyph.to_owned(),
            left: Box::new(left),
            right: Box::new(right),
        },
    )
    .parse_next(input)
}

fn negation(input: &mut Input) -> PResult<Syntax> {
    alt((
        (token(glyph(&NEGATION_GLYPHS), "negation"), negation).map(|(glyph, operand)| {
            Syntax::Negation {
                glyph: glyph.to_owned(),
                operand: Box::new(operand),
            }
        }),
        grouping,
        identifier,
    ))
    .parse_next(input)
}

// Bracket families are not paired: any closing bracket ends any group.
fn grouping(input: &mut Input) -> PResult<Syntax> {
    (
        token(one_of(OPENING_BRACKETS), "opening bracket"),
        statement,
        token(one_of(CLOSING_BRACKETS), "closing bracket"),
    )
        .map(|(open, inner, close)| Syntax::Grouping {
            open,
            inner: Box::new(inner),
            close,
        })
        .parse_next(input)
}

fn identifier(input: &mut Input) -> PResult<Syntax> {
    token(take_while(1.., char::is_alphabetic), "identifier")
        .map(|name: &str| Syntax::Identifier {
            symbol: Symbol(name.to_owned()),
        })
        .parse_next(input)
}

/// Matches the first of `glyphs` at the cursor. A glyph ending in a letter
/// (`v`) only counts when no letter follows it, so `vote` stays an identifier.
fn glyph<'a>(glyphs: &'static [&'static str]) -> impl FnMut(&mut Input<'a>) -> PResult<&'a str> {
    move |input| {
        let found = glyphs.iter().find(|glyph| {
            let Some(rest) = input.input.strip_prefix(**glyph) else {
                return false;
            };

            let ends_in_letter = glyph.chars().last().is_some_and(char::is_alphabetic);
            let letter_follows = rest.chars().next().is_some_and(char::is_alphabetic);

            !(ends_in_letter && letter_follows)
        });

        match found {
            Some(glyph) => Ok(input.next_slice(glyph.len())),
            None => Err(ErrMode::Backtrack(ContextError::new())),
        }
    }
}

/// Skips leading whitespace, then runs `parser`, recording `what` as expected
/// at this offset if it fails.
fn token<'a, T>(
    mut parser: impl Parser<Input<'a>, T, ContextError>,
    what: &'static str,
) -> impl FnMut(&mut Input<'a>) -> PResult<T> {
    move |input| {
        multispace0.parse_next(input)?;

        let offset = input.state.source_len - input.input.len();
        let result = parser.parse_next(input);

        if result.is_err() {
            input.state.record(offset, what);
        }

        result
    }
}

/// Every glyph the grammar accepts for each operator, for help texts.
pub fn operator_glyphs() -> Vec<(&'static str, Vec<&'static str>)> {
    let mut operators = vec![("negation", NEGATION_GLYPHS.to_vec())];

    operators.extend(
        Connective::iter().map(|connective| (connective.name(), connective.glyphs().to_vec())),
    );

    operators
}
