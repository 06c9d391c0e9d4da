//! Property-based tests for the conditional-assignment sanitizer.

use gml_parser::sanitize;
use proptest::prelude::*;

proptest! {
    /// Total over arbitrary input.
    #[test]
    fn sanitize_never_panics(source in "[ -~\n\"'`=()]{0,80}") {
        let _ = sanitize(&source);
    }

    /// Without `if` there is nothing to rewrite.
    #[test]
    fn no_if_no_rewrite(source in "[a-z0-9 =+();]{0,60}") {
        prop_assume!(!source.contains("if"));
        let result = sanitize(&source);
        assert_eq!(result.text, source);
        assert_eq!(result.insert_positions, None);
    }

    /// Every non-inserted index maps back to the identical character in the
    /// original text.
    #[test]
    fn map_index_is_a_bijection_off_insertions(
        cond in "[a-z]{1,6}",
        rhs in "[a-z]{1,6}",
        tail in "[a-z =;()]{0,20}",
    ) {
        let source = format!("if ({cond} = {rhs}) {tail}");
        let result = sanitize(&source);
        let inserted = result.insert_positions.clone().unwrap_or_default();
        let sanitized = result.text.as_bytes();
        let original = source.as_bytes();
        for i in 0..sanitized.len() {
            if inserted.contains(&i) {
                continue;
            }
            let mapped = result.map_index(i);
            assert_eq!(
                sanitized[i], original[mapped],
                "index {i} diverged for {source:?} -> {:?}",
                result.text
            );
        }
    }

    /// Insertion positions are strictly increasing.
    #[test]
    fn insert_positions_increase(
        a in "[a-z]{1,4}",
        b in "[a-z]{1,4}",
        c in "[a-z]{1,4}",
    ) {
        let source = format!("if ({a} = {b}) x = 1; if ({c} = {a}) y = 2;");
        let result = sanitize(&source);
        if let Some(positions) = &result.insert_positions {
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// Sanitized output parses to a `==` comparison in the condition.
    #[test]
    fn rewritten_condition_parses(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
        prop_assume!(gml_syntax::SyntaxKind::from_keyword(&a).is_none());
        prop_assume!(gml_syntax::SyntaxKind::from_keyword(&b).is_none());
        let source = format!("if ({a} = {b}) exit;");
        let program = gml_parser::parse(&source, &gml_parser::ParseOptions::default()).unwrap();
        let json = serde_json::to_value(&program).unwrap();
        assert_eq!(json["body"][0]["test"]["operator"], "==");
    }
}
