use proptest::prelude::*;
use strum::IntoEnumIterator;
use symlogic::{
    config::EngineConfig,
    explanation::Explanation,
    proof::{
        catalogue::Catalogue,
        matching::{match_pattern, substitute, Bindings},
    },
    propositional_logic::{
        parser::{parse, parse_statement},
        truth_table::Interpretation,
        types::{Connective, Statement, Symbol},
        verdict::{classify, StatementKind},
    },
};

fn statements() -> impl Strategy<Value = Statement> {
    let leaf = prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(Statement::atomic);
    let connectives = Connective::iter().collect::<Vec<_>>();

    leaf.prop_recursive(5, 32, 2, move |inner| {
        prop_oneof![
            inner.clone().prop_map(Statement::negation),
            (
                prop::sample::select(connectives.clone()),
                inner.clone(),
                inner
            )
                .prop_map(|(connective, left, right)| Statement::binary(connective, left, right)),
        ]
    })
}

/// Truth value of `statement` on every row of a table over `symbols`.
fn evaluate_rows(statement: &Statement, symbols: &[Symbol]) -> Vec<bool> {
    (0..1usize << symbols.len())
        .map(|row| {
            Interpretation::for_row(symbols, row)
                .evaluate(statement)
                .map(|value| value.0)
                .unwrap_or_default()
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rendering_round_trips(statement in statements()) {
        let text = statement.to_string();

        prop_assert_eq!(parse_statement(&text), Ok(statement));
    }

    #[test]
    fn tables_enumerate_every_assignment(statement in statements()) {
        let parsed = parse(&statement.to_string()).unwrap();
        let table = parsed.truth_table(&EngineConfig::default()).unwrap();
        let height = 1usize << table.constants.len();

        prop_assert!(table
            .detailed
            .columns
            .iter()
            .chain(&table.simple.columns)
            .all(|column| column.height() == height));

        for column in &table.simple.columns[..table.constants.len()] {
            let values = column.values().unwrap();
            prop_assert_eq!(values.iter().filter(|value| value.0).count(), height / 2);
        }

        let rows = table.simple.rows();
        for (row, next) in rows.iter().zip(rows.iter().skip(1)) {
            prop_assert_ne!(&row[..table.constants.len()], &next[..table.constants.len()]);
        }
    }

    #[test]
    fn main_column_matches_interpretation(statement in statements()) {
        let parsed = parse(&statement.to_string()).unwrap();
        let table = parsed.truth_table(&EngineConfig::default()).unwrap();

        let expected = evaluate_rows(&statement, &table.constants);
        let detailed = table.detailed.main_values().iter().map(|value| value.0).collect::<Vec<_>>();
        let simple = table.simple.main_values().iter().map(|value| value.0).collect::<Vec<_>>();

        prop_assert_eq!(&detailed, &expected);
        prop_assert_eq!(&simple, &expected);
    }

    #[test]
    fn classification_is_exclusive(statement in statements()) {
        let table = parse(&statement.to_string())
            .unwrap()
            .truth_table(&EngineConfig::default())
            .unwrap();

        let values = table.detailed.main_values();
        let kind = classify(&table.detailed);

        prop_assert_eq!(kind == StatementKind::Tautology, values.iter().all(|value| value.0));
        prop_assert_eq!(kind == StatementKind::Contradiction, values.iter().all(|value| !value.0));
    }

    #[test]
    fn substitution_inverts_matching(statement in statements()) {
        for rule in Catalogue::global().replacement_rules() {
            for (pattern, _) in rule.directions() {
                if let Some(bindings) = match_pattern(pattern, &statement, Bindings::default()) {
                    prop_assert_eq!(substitute(pattern, &bindings).to_statement(), Some(statement.clone()));
                }
            }
        }
    }

    #[test]
    fn replacements_preserve_truth(statement in statements()) {
        let symbols = statement.symbols().into_iter().cloned().collect::<Vec<_>>();
        let expected = evaluate_rows(&statement, &symbols);

        let matches = Catalogue::global()
            .match_replacement_rules(&statement, &[], &mut Explanation::default())
            .unwrap();

        for found in matches {
            for result in &found.derived {
                let derived = result.tree.to_statement().unwrap();
                prop_assert_eq!(
                    evaluate_rows(&derived, &symbols),
                    expected.clone(),
                    "{} turned {} into {}",
                    found.rule.abbreviation,
                    statement,
                    result.text
                );
            }
        }
    }
}
