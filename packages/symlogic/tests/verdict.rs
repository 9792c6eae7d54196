use symlogic::{
    config::EngineConfig,
    propositional_logic::{
        parser::parse,
        syntax::Syntax,
        truth_table::{build_joined_table, TruthTable},
        verdict::{check_argument, classify, compare, Comparison, Relation, StatementKind, Validity},
    },
};

fn joined(inputs: &[&str], is_argument: bool) -> TruthTable<Vec<usize>> {
    let trees = inputs
        .iter()
        .map(|input| parse(input).unwrap().syntax)
        .collect::<Vec<Syntax>>();

    build_joined_table(
        &trees.iter().collect::<Vec<_>>(),
        is_argument,
        &EngineConfig::default(),
    )
    .unwrap()
    .detailed
}

#[test]
fn statement_kinds() {
    let test_cases = [
        ("A v ~A", StatementKind::Tautology),
        ("A > A", StatementKind::Tautology),
        ("(A > B) = (~B > ~A)", StatementKind::Tautology),
        ("A & ~A", StatementKind::Contradiction),
        ("~(A = A)", StatementKind::Contradiction),
        ("A", StatementKind::Contingency),
        ("A > B", StatementKind::Contingency),
    ];

    for (i, (input, expected_result)) in test_cases.into_iter().enumerate() {
        let table = parse(input)
            .unwrap()
            .truth_table(&EngineConfig::default())
            .unwrap();

        assert_eq!(
            (classify(&table.detailed), classify(&table.simple)),
            (expected_result, expected_result),
            "Test case {}; Input: {}",
            i + 1,
            input
        );
    }
}

#[test]
fn comparisons() {
    let test_cases: [(&[&str], Comparison); 6] = [
        (
            &["A > B", "~A v B"],
            Comparison {
                relation: Relation::Equivalent,
                consistent: true,
            },
        ),
        (
            &["A & B", "~A v ~B"],
            Comparison {
                relation: Relation::Contradictory,
                consistent: false,
            },
        ),
        (
            &["A", "B"],
            Comparison {
                relation: Relation::Neither,
                consistent: true,
            },
        ),
        (
            &["A & B", "~A & B"],
            Comparison {
                relation: Relation::Neither,
                consistent: false,
            },
        ),
        (
            &["A", "~A", "A v ~A"],
            Comparison {
                relation: Relation::Neither,
                consistent: false,
            },
        ),
        (
            &["A", "A & A", "A v A"],
            Comparison {
                relation: Relation::Equivalent,
                consistent: true,
            },
        ),
    ];

    for (i, (inputs, expected_result)) in test_cases.into_iter().enumerate() {
        assert_eq!(
            compare(&joined(inputs, false)),
            expected_result,
            "Test case {}; Input: {}",
            i + 1,
            inputs.join(" / ")
        );
    }
}

#[test]
fn arguments() {
    let test_cases: [(&[&str], Validity); 5] = [
        (
            &["A > B", "A", "B"],
            Validity {
                valid: true,
                counterexamples: vec![],
            },
        ),
        (
            &["A > B", "B", "A"],
            Validity {
                valid: false,
                counterexamples: vec![2],
            },
        ),
        (
            &["A v B", "~A", "B"],
            Validity {
                valid: true,
                counterexamples: vec![],
            },
        ),
        (
            &["A > B", "~A", "~B"],
            Validity {
                valid: false,
                counterexamples: vec![2],
            },
        ),
        (
            &["A", "~A", "B"],
            Validity {
                valid: true,
                counterexamples: vec![],
            },
        ),
    ];

    for (i, (inputs, expected_result)) in test_cases.into_iter().enumerate() {
        assert_eq!(
            check_argument(&joined(inputs, true)),
            expected_result,
            "Test case {}; Input: {}",
            i + 1,
            inputs.join(" / ")
        );
    }
}
