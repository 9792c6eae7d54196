use serde::{Deserialize, Serialize};
use symlogic::{
    config::EngineConfig,
    error::LogicError,
    explanation::{Explain, Explanation},
    proof::{
        catalogue::Catalogue,
        derive::{self, FormMatch, RuleMatch},
    },
    propositional_logic::{
        parser::{self, ParsedStatement},
        syntax,
        truth_table::{self, MainColumns, TruthTable},
        verdict::{check_argument, classify, compare, Relation},
    },
};
use tsify::Tsify;
use wasm_bindgen::prelude::*;

#[derive(Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct ExplainedResult<T> {
    pub result: Result<T, String>,
    pub explanation: String,
}

impl<T> ExplainedResult<T> {
    fn new(result: Result<T, String>, explanation: Explanation) -> Self {
        Self {
            result,
            explanation: explanation.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Tsify, Default)]
#[tsify(from_wasm_abi)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub max_variables: Option<usize>,
}

impl Options {
    fn config(&self) -> EngineConfig {
        self.max_variables
            .map_or_else(EngineConfig::default, EngineConfig::with_max_variables)
    }
}

#[derive(Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub headers: Vec<String>,
    /// `None` marks a separator cell.
    pub rows: Vec<Vec<Option<bool>>>,
    pub main: Vec<usize>,
    pub markdown: String,
}

impl Table {
    fn new<M: MainColumns>(table: &TruthTable<M>) -> Self {
        Self {
            headers: table.headers().into_iter().map(str::to_owned).collect(),
            rows: table
                .rows()
                .into_iter()
                .map(|row| row.into_iter().map(|cell| cell.map(|value| value.0)).collect())
                .collect(),
            main: (0..table.columns.len())
                .filter(|&index| table.main.contains(index))
                .collect(),
            markdown: table.to_markdown(),
        }
    }
}

#[derive(Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTable {
    pub statement: String,
    pub prettified: String,
    pub tree: String,
    pub kind: String,
    pub detailed: Table,
    pub simple: Table,
}

#[derive(Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct JoinedTable {
    pub constants: Vec<String>,
    pub verdict: String,
    pub detailed: Table,
    pub simple: Table,
}

#[derive(Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct Derivable {
    pub name: String,
    pub abbreviation: String,
    pub derived: Vec<String>,
    /// The whole statement with the rewrite in place; equals `derived` for argument forms.
    pub spliced: Vec<String>,
}

impl From<&FormMatch<'_>> for Derivable {
    fn from(found: &FormMatch) -> Self {
        let derived = found
            .derived
            .iter()
            .map(|result| result.text.clone())
            .collect::<Vec<_>>();

        Self {
            name: found.form.name.to_owned(),
            abbreviation: found.form.abbreviation.to_owned(),
            spliced: derived.clone(),
            derived,
        }
    }
}

impl From<&RuleMatch<'_>> for Derivable {
    fn from(found: &RuleMatch) -> Self {
        Self {
            name: found.rule.name.to_owned(),
            abbreviation: found.rule.abbreviation.to_owned(),
            derived: found
                .derived
                .iter()
                .map(|result| result.text.clone())
                .collect(),
            spliced: found.spliced.clone(),
        }
    }
}

fn describe(error: &LogicError, source: &str) -> String {
    match error {
        LogicError::Syntax(error) => format!("{error}\n{}", error.caret(source)),
        error => error.to_string(),
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    Catalogue::global();
}

#[wasm_bindgen]
pub fn parse(text: String, options: Options) -> ExplainedResult<ParsedTable> {
    let mut explanation = Explanation::default();

    let parsed = match parser::parse(&text) {
        Ok(parsed) => parsed,
        Err(error) => {
            return ExplainedResult::new(
                Err(describe(&error.into(), &text)),
                explanation,
            )
        }
    };

    let ParsedStatement {
        syntax: tree,
        statement,
        ..
    } = &parsed;

    explanation.with_subexplanation("Parsing", |explanation| {
        explanation.step(format!("Read as {tree}"));
        explanation.step(format!("Normalized to {statement}"));
    });

    let result = parsed
        .truth_table(&options.config())
        .map(|table| ParsedTable {
            statement: statement.to_string(),
            prettified: syntax::prettify(&tree.to_string()),
            tree: statement.get_tree().to_string(),
            kind: classify(&table.detailed).to_string(),
            detailed: Table::new(&table.detailed),
            simple: Table::new(&table.simple),
        })
        .map_err(|error| describe(&error, &text));

    ExplainedResult::new(result, explanation)
}

#[wasm_bindgen]
pub fn build_joined_table(
    texts: Vec<String>,
    is_argument: bool,
    options: Options,
) -> ExplainedResult<JoinedTable> {
    let mut explanation = Explanation::default();

    let parsed = match texts
        .iter()
        .map(|text| parser::parse(text).map_err(|error| describe(&error.into(), text)))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(parsed) => parsed,
        Err(error) => return ExplainedResult::new(Err(error), explanation),
    };

    let trees = parsed.iter().map(|parsed| &parsed.syntax).collect::<Vec<_>>();

    let table = match truth_table::build_joined_table(&trees, is_argument, &options.config()) {
        Ok(table) => table,
        Err(error) => return ExplainedResult::new(Err(error.to_string()), explanation),
    };

    let verdict = explanation.with_subexplanation("Verdict", |explanation| {
        if is_argument {
            let validity = check_argument(&table.detailed);

            for row in &validity.counterexamples {
                explanation.step(format!("Row {} is a counterexample", row + 1));
            }

            let verdict = if validity.valid { "valid" } else { "invalid" };
            verdict.to_owned()
        } else {
            let comparison = compare(&table.detailed);

            explanation.step(format!("Relation: {}", comparison.relation));

            let relation = match comparison.relation {
                Relation::Equivalent => "equivalent",
                Relation::Contradictory => "contradictory",
                Relation::Neither => "neither",
            };
            let consistency = if comparison.consistent {
                "consistent"
            } else {
                "inconsistent"
            };

            format!("{relation}, {consistency}")
        }
    });

    ExplainedResult::new(
        Ok(JoinedTable {
            constants: table.constants.iter().map(ToString::to_string).collect(),
            verdict,
            detailed: Table::new(&table.detailed),
            simple: Table::new(&table.simple),
        }),
        explanation,
    )
}

#[wasm_bindgen]
pub fn get_argument_forms(texts: Vec<String>) -> ExplainedResult<Vec<Derivable>> {
    let mut explanation = Explanation::default();

    let result = explanation
        .with_subexplanation("Argument forms", |explanation| {
            derive::get_argument_forms(&texts[..], explanation)
        })
        .map(|matches| {
            let summary = explanation.subexplanation("Applicable");
            matches.iter().for_each(|found| found.explain(summary));
            matches.iter().map(Derivable::from).collect()
        })
        .map_err(|error| error.to_string());

    ExplainedResult::new(result, explanation)
}

#[wasm_bindgen]
pub fn get_replacement_rules(text: String, path: Vec<u32>) -> ExplainedResult<Vec<Derivable>> {
    let mut explanation = Explanation::default();
    let path = path.into_iter().map(|index| index as usize).collect::<Vec<_>>();

    let result = explanation
        .with_subexplanation("Replacement rules", |explanation| {
            derive::get_replacement_rules(&text, &path, explanation)
        })
        .map(|matches| {
            let summary = explanation.subexplanation("Applicable");
            matches.iter().for_each(|found| found.explain(summary));
            matches.iter().map(Derivable::from).collect()
        })
        .map_err(|error| describe(&error, &text));

    ExplainedResult::new(result, explanation)
}

/// The whole rule catalogue, for listing in the interface.
#[wasm_bindgen]
pub fn get_catalogue() -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(Catalogue::global())?)
}

#[wasm_bindgen]
pub fn prettify(text: String) -> String {
    syntax::prettify(&text)
}
