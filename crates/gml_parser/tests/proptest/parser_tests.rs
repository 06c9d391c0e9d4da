//! Property-based tests for the GML parser using proptest.

use gml_ast::{Node, NodeKind, visit};
use gml_parser::ParseOptions;
use proptest::prelude::*;

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}".prop_filter("keywords are not identifiers", |s| {
        gml_syntax::SyntaxKind::from_keyword(s).is_none()
    })
}

fn literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0..10_000u32).prop_map(|n| n.to_string()),
        (0..1000u32, 0..100u32).prop_map(|(a, b)| format!("{a}.{b}")),
        Just("true".to_string()),
        Just("undefined".to_string()),
        "[a-z ]{0,8}".prop_map(|s| format!("\"{s}\"")),
    ]
}

fn operand_strategy() -> impl Strategy<Value = String> {
    prop_oneof![identifier_strategy(), literal_strategy()]
}

fn expression_strategy() -> impl Strategy<Value = String> {
    let op = prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("div"),
        Just("mod"),
        Just("&&"),
        Just("||"),
        Just("??"),
        Just("=="),
        Just("<"),
    ];
    prop_oneof![
        operand_strategy(),
        (operand_strategy(), op, operand_strategy())
            .prop_map(|(a, op, b)| format!("{a} {op} {b}")),
        (identifier_strategy(), operand_strategy())
            .prop_map(|(f, a)| format!("{f}({a})")),
        (identifier_strategy(), operand_strategy())
            .prop_map(|(a, i)| format!("{a}[{i}]")),
    ]
}

fn statement_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (identifier_strategy(), expression_strategy())
            .prop_map(|(name, expr)| format!("var {name} = {expr};")),
        (identifier_strategy(), expression_strategy())
            .prop_map(|(name, expr)| format!("{name} = {expr};")),
        (expression_strategy(), expression_strategy())
            .prop_map(|(test, value)| format!("if ({test}) {{ x = {value}; }}")),
        (identifier_strategy(), expression_strategy())
            .prop_map(|(name, expr)| format!("function {name}() {{ return {expr}; }}")),
        expression_strategy().prop_map(|test| format!("while ({test}) {{ exit; }}")),
        Just("// a comment".to_string()),
    ]
}

fn program_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(statement_strategy(), 0..8).prop_map(|stmts| stmts.join("\n"))
}

fn parse_program(source: &str) -> Node {
    gml_parser::parse(source, &ParseOptions::default())
        .unwrap_or_else(|err| panic!("failed to parse {source:?}: {err}"))
}

proptest! {
    /// Generated programs parse cleanly.
    #[test]
    fn generated_programs_parse(source in program_strategy()) {
        parse_program(&source);
    }

    /// Every node's range is ordered and inside the source.
    #[test]
    fn locations_are_ordered(source in program_strategy()) {
        let program = parse_program(&source);
        visit::walk(&program, &mut |node| {
            if let (Some(start), Some(end)) = (node.start, node.end) {
                assert!(start.index() <= end.index());
                assert!(source.is_empty() || end.index() < source.len());
            }
        });
    }

    /// Comments come back sorted by start offset and non-overlapping.
    #[test]
    fn comments_are_sorted(source in program_strategy()) {
        let outcome =
            gml_parser::parse_with_trivia(&source, &ParseOptions::default()).unwrap();
        let mut previous_end = None;
        for comment in &outcome.comments {
            let start = comment.start.unwrap().index();
            let end = comment.end.unwrap().index();
            if let Some(prev) = previous_end {
                assert!(prev < start, "overlapping comments in {source:?}");
            }
            previous_end = Some(end);
        }
    }

    /// At most one top and one bottom comment, in the right places.
    #[test]
    fn top_and_bottom_comments_are_unique(source in program_strategy()) {
        let outcome =
            gml_parser::parse_with_trivia(&source, &ParseOptions::default()).unwrap();
        let tops = outcome.comments.iter().filter(|c| c.is_top_comment).count();
        let bottoms = outcome.comments.iter().filter(|c| c.is_bottom_comment).count();
        assert!(tops <= 1);
        assert!(bottoms <= 1);
    }

    /// Arbitrary input never panics; it parses or reports a structured error.
    #[test]
    fn arbitrary_input_never_panics(source in "[ -~\n]{0,60}") {
        let _ = gml_parser::parse(&source, &ParseOptions::default());
    }

    /// Disabling locations after simplification is indistinguishable from
    /// disabling them outright.
    #[test]
    fn location_options_are_idempotent(source in program_strategy()) {
        let without = ParseOptions::default().without_locations();
        let program_a = gml_parser::parse(&source, &without).unwrap();

        let mut both_off = ParseOptions::default().without_locations();
        both_off.simplify_locations = true;
        let program_b = gml_parser::parse(&source, &both_off).unwrap();

        assert_eq!(program_a, program_b);
    }
}

proptest! {
    /// The effective evaluation order of a parsed binary chain matches the
    /// operator table: the parenthesization delegate never fires for source
    /// the grammar itself shaped.
    #[test]
    fn no_synthetic_parens_for_plain_chains(
        a in identifier_strategy(),
        b in identifier_strategy(),
        c in identifier_strategy(),
        op1 in prop_oneof![Just("+"), Just("*"), Just("&&"), Just("||"), Just("??")],
        op2 in prop_oneof![Just("+"), Just("*"), Just("&&"), Just("||"), Just("??")],
    ) {
        let source = format!("x = {a} {op1} {b} {op2} {c};");
        let program = parse_program(&source);
        visit::walk(&program, &mut |node| {
            if let NodeKind::ParenthesizedExpression { synthetic, .. } = &node.kind {
                assert_eq!(*synthetic, None, "unexpected synthetic paren in {source:?}");
            }
        });
    }
}
