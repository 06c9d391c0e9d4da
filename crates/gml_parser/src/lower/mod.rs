//! Lowers the concrete syntax tree into the owned AST.
//!
//! One builder function per grammar production, dispatched on
//! [`SyntaxKind`]. Each lowered node is stamped with the source range of its
//! significant tokens; hidden-channel tokens inside a node never widen it.

mod binary;
mod expressions;
mod statements;

use cstree::util::NodeOrToken;
use gml_ast::{Location, Node, NodeKind};
use gml_syntax::{ResolvedNode, ResolvedToken, SyntaxKind};

use crate::identifiers::IdentifierMetadata;
use crate::line_index::LineIndex;

pub(crate) use expressions::lower_expr;
pub(crate) use statements::lower_stmt;

pub(crate) struct LowerCtx<'a> {
    pub(crate) source: &'a str,
    pub(crate) line_index: &'a LineIndex,
    pub(crate) ids: IdentifierMetadata,
}

impl<'a> LowerCtx<'a> {
    pub(crate) fn new(
        source: &'a str,
        line_index: &'a LineIndex,
        ids: IdentifierMetadata,
    ) -> Self {
        Self { source, line_index, ids }
    }

    /// Runs `f` inside a scope of `kind`; the scope is released on every
    /// exit path out of `f`.
    pub(crate) fn with_scope<T>(
        &mut self,
        kind: &'static str,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let scope = self.ids.enter_scope(kind);
        let result = f(self);
        self.ids.exit_scope(scope);
        result
    }

    /// Runs `f` with `role` as the active identifier role.
    pub(crate) fn with_role<T>(
        &mut self,
        role: crate::identifiers::IdentifierRole,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.ids.push_role(role);
        let result = f(self);
        self.ids.pop_role();
        result
    }

    /// Inclusive start/end locations of a token.
    pub(crate) fn token_range(&self, token: &ResolvedToken) -> (Location, Location) {
        let start: usize = token.text_range().start().into();
        let end_exclusive: usize = token.text_range().end().into();
        let end = end_exclusive.saturating_sub(1).max(start);
        (
            Location::detailed(self.line_index.line(start), start),
            Location::detailed(self.line_index.line(end), end),
        )
    }

    /// Locations spanning a node's significant tokens.
    pub(crate) fn node_range(&self, node: &ResolvedNode) -> (Location, Location) {
        match (first_significant_token(node), last_significant_token(node)) {
            (Some(first), Some(last)) => {
                let (start, _) = self.token_range(first);
                let (_, end) = self.token_range(last);
                (start, end)
            }
            _ => {
                let offset: usize = node.text_range().start().into();
                let loc = Location::detailed(self.line_index.line(offset), offset);
                (loc, loc)
            }
        }
    }

    /// Builds a node stamped with `syntax`'s range.
    pub(crate) fn make(&self, kind: NodeKind, syntax: &ResolvedNode) -> Node {
        let (start, end) = self.node_range(syntax);
        Node::with_range(kind, start, end)
    }
}

/// First non-trivia token in the subtree.
pub(crate) fn first_significant_token(node: &ResolvedNode) -> Option<&ResolvedToken> {
    for element in node.children_with_tokens() {
        match element {
            NodeOrToken::Token(token) if !token.kind().is_trivia() => return Some(token),
            NodeOrToken::Token(_) => {}
            NodeOrToken::Node(child) => {
                if let Some(token) = first_significant_token(child) {
                    return Some(token);
                }
            }
        }
    }
    None
}

/// Last non-trivia token in the subtree.
pub(crate) fn last_significant_token(node: &ResolvedNode) -> Option<&ResolvedToken> {
    let elements: Vec<_> = node.children_with_tokens().collect();
    for element in elements.into_iter().rev() {
        match element {
            NodeOrToken::Token(token) if !token.kind().is_trivia() => return Some(token),
            NodeOrToken::Token(_) => {}
            NodeOrToken::Node(child) => {
                if let Some(token) = last_significant_token(child) {
                    return Some(token);
                }
            }
        }
    }
    None
}

/// Direct child nodes, in order.
pub(crate) fn child_nodes(node: &ResolvedNode) -> Vec<&ResolvedNode> {
    node.children().collect()
}

/// First direct child node with one of the wanted kinds. This is the
/// "first available child" helper: optional grammar branches come through
/// here so null-tolerance lives in one place.
pub(crate) fn first_child_in<'n>(
    node: &'n ResolvedNode,
    kinds: &[SyntaxKind],
) -> Option<&'n ResolvedNode> {
    node.children().find(|child| kinds.contains(&child.kind()))
}

/// First direct child token of the given kind.
pub(crate) fn find_token<'n>(node: &'n ResolvedNode, kind: SyntaxKind) -> Option<&'n ResolvedToken> {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .find(|token| token.kind() == kind)
}

/// First direct child token matching a predicate.
pub(crate) fn find_token_by<'n>(
    node: &'n ResolvedNode,
    pred: impl Fn(SyntaxKind) -> bool,
) -> Option<&'n ResolvedToken> {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .find(|token| pred(token.kind()))
}

/// Does a comma sit directly before the closing delimiter?
pub(crate) fn has_trailing_comma(node: &ResolvedNode, close: SyntaxKind) -> bool {
    let mut previous = None;
    for element in node.children_with_tokens() {
        match element {
            NodeOrToken::Token(token) if token.kind().is_trivia() => {}
            NodeOrToken::Token(token) if token.kind() == close => {
                return previous == Some(SyntaxKind::COMMA);
            }
            NodeOrToken::Token(token) => previous = Some(token.kind()),
            NodeOrToken::Node(_) => previous = None,
        }
    }
    false
}

/// Lowers the root into a `Program`.
pub(crate) fn lower_program(ctx: &mut LowerCtx<'_>, root: &ResolvedNode) -> Node {
    use gml_syntax::AstNode;
    debug_assert_eq!(root.kind(), SyntaxKind::ROOT);
    let program = gml_syntax::nodes::Program::cast(root.clone())
        .expect("parser always produces a ROOT node");
    let body: Vec<Node> =
        program.statements().filter_map(|stmt| lower_stmt(ctx, stmt)).collect();
    ctx.make(NodeKind::Program { body, comments: None }, root)
}
