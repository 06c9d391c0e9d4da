//! Synthetic parenthesization for binary expressions.
//!
//! The grammar already parses with the documented precedence, so a freshly
//! built tree usually round-trips as written. The delegate is the safety
//! net: whenever a binary node ends up under a parent it would not rebind to
//! on re-parse, it gets wrapped in a parenthesized node marked `synthetic`.

use gml_syntax::operators;

/// Which operand slot of the parent the current expression occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryPosition {
    Left,
    Right,
}

impl BinaryPosition {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BinaryPosition::Left => "left",
            BinaryPosition::Right => "right",
        }
    }
}

/// Context handed to a binary operand while it is being lowered.
#[derive(Debug, Clone)]
pub(crate) struct ParentBinary {
    pub(crate) operator: String,
    pub(crate) position: BinaryPosition,
}

/// Whether `current_op` under `parent` must be wrapped to preserve
/// evaluation order:
///
/// 1. either operator unknown → no
/// 2. lower precedence than the parent → yes
/// 3. higher precedence → no
/// 4. equal precedence → only when the associativities differ, and the
///    parent's associativity pulls away from this operand's side
pub(crate) fn needs_parentheses(current_op: &str, parent: &ParentBinary) -> bool {
    let (Some(current), Some(parent_info)) =
        (operators::for_text(current_op), operators::for_text(&parent.operator))
    else {
        return false;
    };

    if current.precedence < parent_info.precedence {
        return true;
    }
    if current.precedence > parent_info.precedence {
        return false;
    }
    if current.assoc == parent_info.assoc {
        return false;
    }
    match parent.position {
        BinaryPosition::Left => parent_info.assoc == operators::Assoc::Right,
        BinaryPosition::Right => parent_info.assoc == operators::Assoc::Left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(op: &str, position: BinaryPosition) -> ParentBinary {
        ParentBinary { operator: op.to_string(), position }
    }

    #[test]
    fn lower_precedence_child_needs_parens() {
        // (a + b) * c
        assert!(needs_parentheses("+", &parent("*", BinaryPosition::Left)));
        // (a || b) && c
        assert!(needs_parentheses("||", &parent("&&", BinaryPosition::Left)));
    }

    #[test]
    fn higher_precedence_child_never_wraps() {
        assert!(!needs_parentheses("*", &parent("+", BinaryPosition::Right)));
        assert!(!needs_parentheses("&&", &parent("||", BinaryPosition::Left)));
    }

    #[test]
    fn equal_precedence_same_associativity_stays_flat() {
        assert!(!needs_parentheses("+", &parent("-", BinaryPosition::Left)));
        assert!(!needs_parentheses("*", &parent("div", BinaryPosition::Right)));
    }

    #[test]
    fn unknown_operators_never_wrap() {
        assert!(!needs_parentheses("<=>", &parent("*", BinaryPosition::Left)));
        assert!(!needs_parentheses("+", &parent("**", BinaryPosition::Right)));
    }
}
