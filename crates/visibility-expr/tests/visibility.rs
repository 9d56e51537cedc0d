//! Integration tests for parsing, normalising and evaluating labels.
#![expect(clippy::expect_used, reason = "tests assert construction outcomes")]

use rstest::rstest;

use visibility_expr::{
    Authorisations, Node, NodeType, ParserOptions, SyntaxErrorKind, Visibility,
    VisibilityError, VisibilityEvaluator, quote,
};

fn parse(expression: &str) -> Visibility {
    Visibility::new(expression).expect("expression should parse")
}

fn parse_err(expression: &str) -> VisibilityError {
    let Err(err) = Visibility::new(expression) else {
        panic!("expression {expression:?} should be rejected");
    };
    err
}

#[rstest]
#[case("")]
#[case("A")]
#[case("(A&B)|C")]
#[case(r#""x y"&z"#)]
fn raw_bytes_round_trip(#[case] expression: &str) {
    assert_eq!(parse(expression).expression(), expression.as_bytes());
}

#[test]
fn equivalent_spellings_are_distinct_values() {
    let plain = parse("A&B");
    let grouped = parse("(A&B)");
    assert_ne!(plain, grouped);
    assert_eq!(plain.parse_tree().node_type(), grouped.parse_tree().node_type());
}

#[test]
fn repeated_operator_flattens_into_one_node() {
    let vis = parse("A&B&C");
    assert_eq!(vis.parse_tree().node_type(), NodeType::And);
    assert_eq!(vis.parse_tree().children().len(), 3);
}

#[test]
fn mixed_operators_require_grouping() {
    assert_eq!(parse_err("A&B|C").kind(), SyntaxErrorKind::MixedOperators);

    let vis = parse("(A&B)|C");
    let Node::Or(children) = vis.parse_tree() else {
        panic!("expected a disjunction, got {:?}", vis.parse_tree());
    };
    assert!(matches!(
        children.as_slice(),
        [Node::And(inner), Node::Term { .. }] if inner.len() == 2
    ));
    let terms: Vec<_> = vis.terms().map(|t| t.into_owned()).collect();
    assert_eq!(terms, vec![b"A".to_vec(), b"B".to_vec(), b"C".to_vec()]);
}

#[test]
fn empty_label_admits_everyone() {
    let vis = parse("");
    assert_eq!(vis.parse_tree(), &Node::EMPTY);
    let nobody = Authorisations::default();
    assert!(VisibilityEvaluator::new(&nobody).evaluate(&vis));
}

#[test]
fn single_group_collapses_to_a_term() {
    assert_eq!(parse("(A)").parse_tree().node_type(), NodeType::Term);
    assert_eq!(parse("A").parse_tree().node_type(), NodeType::Term);
}

#[rstest]
#[case(r#""A&B""#, b"A&B")]
#[case(r#""A\"B""#, b"A\"B")]
#[case(r#""A\\B""#, b"A\\B")]
fn quoted_terms_yield_unescaped_values(#[case] expression: &str, #[case] expected: &[u8]) {
    let vis = parse(expression);
    let term = vis.parse_tree().term(vis.expression());
    assert_eq!(term.as_deref(), Some(expected));
}

#[rstest]
#[case("A&&B", SyntaxErrorKind::EmptyTerm, 2)]
#[case("(A&B", SyntaxErrorKind::MismatchedParenthesis, 0)]
#[case(r#""ABC"#, SyntaxErrorKind::UnclosedQuote, 0)]
#[case("A!B", SyntaxErrorKind::InvalidCharacter, 1)]
fn errors_point_at_the_offending_byte(
    #[case] expression: &str,
    #[case] kind: SyntaxErrorKind,
    #[case] position: usize,
) {
    let err = parse_err(expression);
    assert_eq!(err.kind(), kind);
    assert_eq!(err.position(), position);
    let VisibilityError::Syntax(info) = err;
    assert_eq!(info.expression, expression.as_bytes());
}

#[rstest]
#[case(&["C"], true)]
#[case(&["A"], false)]
#[case(&["A", "B"], true)]
fn evaluates_grouped_label(#[case] tokens: &[&str], #[case] expected: bool) {
    let auths = Authorisations::new(tokens).expect("tokens should be valid");
    let vis = parse("(A&B)|C");
    assert_eq!(VisibilityEvaluator::new(&auths).evaluate(&vis), expected);
}

#[test]
fn quoted_tokens_survive_normalisation() {
    let token = b"team lead";
    let mut expression = quote(token).into_owned();
    expression.push(b'|');
    expression.extend_from_slice(&quote(b"admin"));
    let vis = Visibility::new(expression).expect("quoted expression should parse");
    let normal = vis.normalised().expect("normalised form should parse");
    assert_eq!(normal.expression(), br#"admin|"team lead""#);

    let auths = Authorisations::new([&token[..]]).expect("token should be valid");
    assert!(VisibilityEvaluator::new(&auths).evaluate(&normal));
}

#[test]
fn normalisation_under_custom_charset_preserves_admission() {
    let options = ParserOptions::new().with_charset(|b| b != b' ');
    let vis = Visibility::with_options(r#""A&B""#, &options).expect("quoted term parses");
    let normal = vis
        .normalised_with(&options)
        .expect("normalised form should parse");
    assert_eq!(normal.parse_tree().node_type(), NodeType::Term);

    let holder = Authorisations::new(["A&B"]).expect("token should be valid");
    let split = Authorisations::new(["A", "B"]).expect("tokens should be valid");
    for label in [&vis, &normal] {
        assert!(VisibilityEvaluator::new(&holder).evaluate(label));
        assert!(!VisibilityEvaluator::new(&split).evaluate(label));
    }
}

#[test]
fn labels_are_shareable_across_threads() {
    let vis = std::sync::Arc::new(parse("A|B"));
    let auths = std::sync::Arc::new(Authorisations::new(["B"]).expect("tokens should be valid"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let vis = std::sync::Arc::clone(&vis);
            let auths = std::sync::Arc::clone(&auths);
            std::thread::spawn(move || VisibilityEvaluator::new(&auths).evaluate(&vis))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("evaluator thread should not panic"));
    }
}
