//! Typed access to the concrete syntax tree.
//!
//! This module provides the [`AstNode`] trait plus small helpers the node
//! wrappers in [`crate::nodes`] are built from. Wrappers are thin views: they
//! borrow nothing beyond the node they wrap and never copy the tree.

use cstree::util::NodeOrToken;

use crate::{ResolvedNode, ResolvedToken, SyntaxKind};

/// Trait for all typed CST node wrappers.
pub trait AstNode {
    /// Checks if the given node can be cast to this type
    fn can_cast(node: &ResolvedNode) -> bool;

    /// Attempts to cast the node to this type
    fn cast(node: ResolvedNode) -> Option<Self>
    where
        Self: Sized;

    /// Returns the underlying syntax node
    fn syntax(&self) -> &ResolvedNode;
}

/// First direct child node satisfying `pred`.
pub(crate) fn child_node<'n>(
    node: &'n ResolvedNode,
    pred: impl Fn(SyntaxKind) -> bool,
) -> Option<&'n ResolvedNode> {
    node.children().find(|child| pred(child.kind()))
}

/// `n`th direct child node satisfying `pred`.
pub(crate) fn nth_child_node<'n>(
    node: &'n ResolvedNode,
    pred: impl Fn(SyntaxKind) -> bool,
    n: usize,
) -> Option<&'n ResolvedNode> {
    node.children().filter(|child| pred(child.kind())).nth(n)
}

/// First direct child token of the given kind.
pub(crate) fn child_token<'n>(
    node: &'n ResolvedNode,
    kind: SyntaxKind,
) -> Option<&'n ResolvedToken> {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .find(|token| token.kind() == kind)
}

/// Whether a direct child token of the given kind exists.
pub(crate) fn has_child_token(node: &ResolvedNode, kind: SyntaxKind) -> bool {
    child_token(node, kind).is_some()
}

/// Implements [`AstNode`] plus the tuple-struct boilerplate for a wrapper
/// over one syntax kind.
macro_rules! ast_node {
    ($(#[$docs:meta])* $name:ident, $kind:ident) => {
        $(#[$docs])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) crate::ResolvedNode);

        impl $crate::ast::AstNode for $name {
            fn can_cast(node: &crate::ResolvedNode) -> bool {
                node.kind() == crate::SyntaxKind::$kind
            }

            fn cast(node: crate::ResolvedNode) -> Option<Self> {
                if Self::can_cast(&node) { Some(Self(node)) } else { None }
            }

            fn syntax(&self) -> &crate::ResolvedNode {
                &self.0
            }
        }
    };
}

pub(crate) use ast_node;
