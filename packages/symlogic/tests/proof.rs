use indexmap::{indexset, IndexSet};
use symlogic::{
    error::LogicError,
    explanation::{Explain, Explanation},
    proof::{
        catalogue::{Catalogue, RawArgumentForm, RawReplacementRule, ARGUMENT_FORMS, REPLACEMENT_RULES},
        derive::{get_argument_forms, get_replacement_rules, FormMatch, RuleMatch},
        matching::{match_pattern, substitute, Bindings, Derivation},
        steps::{Justification, Proof, ProofError},
    },
    propositional_logic::{parser::parse_statement, types::Symbol},
};

fn form_results(matches: &[FormMatch]) -> Vec<(&'static str, Vec<String>)> {
    matches
        .iter()
        .map(|found| {
            (
                found.form.abbreviation,
                found.derived.iter().map(|result| result.text.clone()).collect(),
            )
        })
        .collect()
}

fn rule_results(matches: &[RuleMatch]) -> Vec<(&'static str, Vec<String>)> {
    matches
        .iter()
        .map(|found| {
            (
                found.rule.abbreviation,
                found.derived.iter().map(|result| result.text.clone()).collect(),
            )
        })
        .collect()
}

fn strings(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

#[test]
fn catalogue_is_complete() {
    let catalogue = Catalogue::global();

    assert_eq!(catalogue.argument_forms().len(), 9);
    assert_eq!(catalogue.replacement_rules().len(), 10);
    assert_eq!(catalogue.argument_forms_named("DS").len(), 2);
    assert!(catalogue.replacement_rule("DM").is_some());
    assert!(catalogue.replacement_rule("Nope").is_none());

    // Only Addition introduces a variable its premises never mention.
    for form in catalogue.argument_forms() {
        let bound = form
            .premises
            .iter()
            .flat_map(|premise| premise.symbols())
            .collect::<Vec<_>>();
        let introduces = form
            .conclusions
            .iter()
            .flat_map(|conclusion| conclusion.symbols())
            .any(|symbol| !bound.contains(&symbol));

        assert_eq!(introduces, form.abbreviation == "Add", "{}", form.name);
    }
}

#[test]
fn malformed_catalogue_is_an_internal_error() {
    let forms = [RawArgumentForm {
        name: "Broken",
        abbreviation: "B",
        premises: &["P >"],
        conclusions: &["P"],
    }];

    assert!(matches!(
        Catalogue::from_raw(&forms, REPLACEMENT_RULES),
        Err(LogicError::Internal(_))
    ));

    let rules = [RawReplacementRule {
        name: "Broken",
        abbreviation: "B",
        equivalences: &[("P", "(P")],
    }];

    assert!(matches!(
        Catalogue::from_raw(ARGUMENT_FORMS, &rules),
        Err(LogicError::Internal(_))
    ));
}

#[test]
fn pattern_matching() {
    let test_cases = [
        ("P > Q", "A > B", Some("{P←A, Q←B}")),
        ("P > Q", "(A & B) > ~C", Some("{P←A & B, Q←~C}")),
        ("P & P", "A & A", Some("{P←A}")),
        ("P & P", "A & B", None),
        ("P v Q", "A & B", None),
        ("~P", "A", None),
        ("P", "~(A v B)", Some("{P←~(A v B)}")),
        ("P & Q", "B & A", Some("{P←B, Q←A}")),
    ];

    for (i, (pattern, input, expected_result)) in test_cases.into_iter().enumerate() {
        let pattern = parse_statement(pattern).unwrap();
        let statement = parse_statement(input).unwrap();

        let result = match_pattern(&pattern, &statement, Bindings::default())
            .map(|bindings| bindings.to_string());

        assert_eq!(
            result,
            expected_result.map(str::to_owned),
            "Test case {}; Input: {}",
            i + 1,
            input
        );
    }
}

#[test]
fn pattern_matching_respects_existing_bindings() {
    let mut bindings = Bindings::default();
    bindings
        .0
        .insert(Symbol::from("P"), parse_statement("C").unwrap());

    let pattern = parse_statement("P > Q").unwrap();

    assert!(match_pattern(&pattern, &parse_statement("A > B").unwrap(), bindings.clone()).is_none());
    assert!(match_pattern(&pattern, &parse_statement("C > B").unwrap(), bindings).is_some());
}

#[test]
fn unbound_variables_become_placeholders() {
    let mut bindings = Bindings::default();
    bindings
        .0
        .insert(Symbol::from("P"), parse_statement("A & B").unwrap());

    let derivation = substitute(&parse_statement("P v Q").unwrap(), &bindings);

    assert!(derivation.has_placeholder());
    assert_eq!(derivation.to_string(), "(A & B) v %");
    assert_eq!(derivation.to_statement(), None);
    assert_eq!(
        derivation.fill(&parse_statement("C > D").unwrap()),
        parse_statement("(A & B) v (C > D)").unwrap()
    );
}

#[test]
fn argument_forms() {
    let test_cases: [(&[&str], Vec<(&str, Vec<String>)>); 7] = [
        (
            &["A > B", "A"],
            vec![("MP", strings(&["B"])), ("Conj", strings(&["(A > B) & A"]))],
        ),
        (
            &["A", "A > B"],
            vec![("MP", strings(&["B"])), ("Conj", strings(&["A & (A > B)"]))],
        ),
        (
            &["A > B", "~B"],
            vec![("MT", strings(&["~A"])), ("Conj", strings(&["(A > B) & ~B"]))],
        ),
        (
            &["A v B", "~B"],
            vec![("DS", strings(&["A"])), ("Conj", strings(&["(A v B) & ~B"]))],
        ),
        (&["A"], vec![("Add", strings(&["A v %"]))]),
        (
            &["A & A"],
            vec![("Simp", strings(&["A"])), ("Add", strings(&["(A & A) v %"]))],
        ),
        (
            &["A > B", "C > D", "A v C"],
            vec![("CD", strings(&["B v D"]))],
        ),
    ];

    for (i, (inputs, expected_result)) in test_cases.into_iter().enumerate() {
        let matches = get_argument_forms(inputs, &mut Explanation::default()).unwrap();

        assert_eq!(
            form_results(&matches),
            expected_result,
            "Test case {}; Input: {}",
            i + 1,
            inputs.join(", ")
        );
    }
}

#[test]
fn argument_forms_explain_every_candidate() {
    let mut explanation = Explanation::default();

    get_argument_forms(&["A > B", "A"], &mut explanation).unwrap();

    // MP, MT, both DS entries, HS and Conj take two premises.
    assert_eq!(explanation.subexplanations().count(), 6);
}

#[test]
fn argument_forms_reject_bad_input() {
    assert!(matches!(
        get_argument_forms(&["A >"], &mut Explanation::default()),
        Err(LogicError::Syntax(_))
    ));
}

#[test]
fn replacement_rules() {
    let test_cases = [
        (
            "A",
            vec![
                ("DN", strings(&["~~A"])),
                ("Taut", strings(&["A & A", "A v A"])),
            ],
        ),
        (
            "A & B",
            vec![
                ("Com", strings(&["B & A"])),
                ("DN", strings(&["~~(A & B)"])),
                ("Taut", strings(&["(A & B) & (A & B)", "(A & B) v (A & B)"])),
            ],
        ),
        (
            "~(A v B)",
            vec![
                ("DN", strings(&["~~~(A v B)"])),
                ("DM", strings(&["~A & ~B"])),
                ("Taut", strings(&["~(A v B) & ~(A v B)", "~(A v B) v ~(A v B)"])),
            ],
        ),
        (
            "A > B",
            vec![
                ("DN", strings(&["~~(A > B)"])),
                ("Trans", strings(&["~B > ~A"])),
                ("Imp", strings(&["~A v B"])),
                ("Taut", strings(&["(A > B) & (A > B)", "(A > B) v (A > B)"])),
            ],
        ),
    ];

    for (i, (input, expected_result)) in test_cases.into_iter().enumerate() {
        let matches = get_replacement_rules(input, &[], &mut Explanation::default()).unwrap();

        assert_eq!(
            rule_results(&matches),
            expected_result,
            "Test case {}; Input: {}",
            i + 1,
            input
        );
    }
}

#[test]
fn tautology_offers_both_connectives() {
    let matches = get_replacement_rules("A", &[], &mut Explanation::default()).unwrap();

    let tautology = matches
        .iter()
        .find(|found| found.rule.abbreviation == "Taut")
        .unwrap();

    assert_eq!(
        tautology
            .derived
            .iter()
            .map(|result| result.text.clone())
            .collect::<IndexSet<_>>(),
        indexset! {"A & A".to_owned(), "A v A".to_owned()}
    );
}

#[test]
fn tautology_runs_in_both_directions() {
    let matches = get_replacement_rules("A & A", &[], &mut Explanation::default()).unwrap();

    let tautology = matches
        .iter()
        .find(|found| found.rule.abbreviation == "Taut")
        .unwrap();

    assert_eq!(
        tautology
            .derived
            .iter()
            .map(|result| result.text.clone())
            .collect::<IndexSet<_>>(),
        indexset! {
            "(A & A) & (A & A)".to_owned(),
            "A".to_owned(),
            "(A & A) v (A & A)".to_owned(),
        }
    );
    assert_eq!(tautology.derived.len(), 3);
}

#[test]
fn replacement_rules_on_fragments() {
    let matches = get_replacement_rules("C & (A > B)", &[1], &mut Explanation::default()).unwrap();

    let implication = matches
        .iter()
        .find(|found| found.rule.abbreviation == "Imp")
        .unwrap();

    assert_eq!(implication.derived[0].text, "~A v B");
    assert_eq!(implication.spliced, strings(&["C & (~A v B)"]));

    let nested = get_replacement_rules("~(A & ~~B)", &[0, 1], &mut Explanation::default()).unwrap();
    let double_negation = nested
        .iter()
        .find(|found| found.rule.abbreviation == "DN")
        .unwrap();

    assert_eq!(
        double_negation.spliced,
        strings(&["~(A & ~~~~B)", "~(A & B)"])
    );
}

#[test]
fn missing_fragment() {
    assert_eq!(
        get_replacement_rules("A & B", &[0, 0], &mut Explanation::default()).unwrap_err(),
        LogicError::FragmentNotFound { path: vec![0, 0] }
    );
    assert_eq!(
        get_replacement_rules("A & B", &[2], &mut Explanation::default()).unwrap_err(),
        LogicError::FragmentNotFound { path: vec![2] }
    );
}

#[test]
fn modus_ponens_proof() {
    let mut proof = Proof::new(&["A > B", "A"], "B").unwrap();
    assert!(!proof.is_complete());

    let matches = proof.argument_forms(&[0, 1], &mut Explanation::default()).unwrap();
    let modus_ponens = &matches[0];
    assert_eq!(modus_ponens.form.abbreviation, "MP");

    let step = proof
        .push(modus_ponens.derived[0].tree.clone(), "MP", vec![0, 1])
        .unwrap();

    assert_eq!(step, 2);
    assert!(proof.is_complete());
    assert_eq!(
        proof.to_string(),
        concat!(
            "  1. A > B    Premise\n",
            "  2. A        Premise\n",
            "  3. B        1, 2, MP\n",
            "  ∴ B",
        )
    );

    let mut explanation = Explanation::default();
    proof.explain(&mut explanation);
    assert_eq!(
        explanation.steps(),
        [
            "1. A > B (Premise)",
            "2. A (Premise)",
            "3. B (1, 2, MP)",
            "The conclusion has been reached"
        ]
    );
}

#[test]
fn placeholders_must_be_filled() {
    let mut proof = Proof::new(&["A"], "A v C").unwrap();

    let matches = proof.argument_forms(&[0], &mut Explanation::default()).unwrap();
    let addition = matches[0].derived[0].tree.clone();
    assert_eq!(addition.to_string(), "A v %");

    let step = proof.push(addition, "Add", vec![0]).unwrap();

    assert_eq!(
        proof.argument_forms(&[step], &mut Explanation::default()),
        Err(ProofError::UnfilledPlaceholder(step))
    );
    assert!(!proof.is_complete());

    proof.fill(step, &parse_statement("C").unwrap()).unwrap();

    assert_eq!(proof.line(step).unwrap().statement.to_string(), "A v C");
    assert!(proof.is_complete());
    assert_eq!(
        proof.fill(step, &parse_statement("C").unwrap()),
        Err(ProofError::NothingToFill(step))
    );
}

#[test]
fn editing_lines() {
    let mut proof = Proof::new(&["A", "B"], "(A & B) v C").unwrap();

    let filler = Derivation::from(&parse_statement("A v B").unwrap());
    let conjunction = Derivation::from(&parse_statement("A & B").unwrap());
    let addition = Derivation::from(&parse_statement("(A & B) v C").unwrap());

    assert_eq!(
        proof.push(filler.clone(), "Add", vec![2]),
        Err(ProofError::ForwardReference { step: 2, cited: 2 })
    );

    proof.push(filler, "Add", vec![0]).unwrap();
    proof.push(conjunction, "Conj", vec![0, 1]).unwrap();
    proof.push(addition, "Add", vec![3]).unwrap();

    assert_eq!(proof.remove(1), Err(ProofError::PremiseRemoval(1)));
    assert_eq!(
        proof.remove(3),
        Err(ProofError::StepInUse {
            step: 3,
            used_by: 4
        })
    );
    assert_eq!(proof.remove(9), Err(ProofError::UnknownStep(9)));

    proof.remove(2).unwrap();

    assert_eq!(proof.len(), 4);
    assert_eq!(
        proof.line(3).unwrap().justification,
        Justification::Rule {
            abbreviation: "Add".to_owned(),
            sources: vec![2]
        }
    );
    assert_eq!(
        proof.line(2).unwrap().justification,
        Justification::Rule {
            abbreviation: "Conj".to_owned(),
            sources: vec![0, 1]
        }
    );
    assert!(proof.is_complete());
}

#[test]
fn replacement_rules_on_proof_lines() {
    let proof = Proof::new(&["~(A & B)"], "~A v ~B").unwrap();

    let matches = proof
        .replacement_rules(0, &[], &mut Explanation::default())
        .unwrap();

    let de_morgan = matches
        .iter()
        .find(|found| found.rule.abbreviation == "DM")
        .unwrap();

    assert_eq!(de_morgan.spliced, strings(&["~A v ~B"]));
    assert_eq!(
        proof.replacement_rules(0, &[3], &mut Explanation::default()),
        Err(ProofError::Logic(LogicError::FragmentNotFound { path: vec![3] }))
    );
}
