//! This module provides a way to construct a syntax tree.
//! It is intended to be completely decoupled from the
//! parser, so as to allow to evolve the tree representation
//! without affecting the parser.

use std::ops::Range;

use gml_syntax::SyntaxKind;

/// [`crate::parser::Parser`] produces a flat list of [`Event`]s.
/// They are converted to a tree-structure in
/// a separate pass, via `TreeBuilder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start of a node. `kind` is written in when the marker completes;
    /// `forward_parent` chains to a later placeholder that must open
    /// *before* this one (how `precede` wraps an already-built node).
    Placeholder { kind: SyntaxKind, forward_parent: Option<usize> },

    /// Add a token with the specified kind, text, and span.
    AddToken { kind: SyntaxKind, text: String, span: Range<usize> },

    /// Finish the current node.
    FinishNode,

    /// Special marker for nodes that have been abandoned.
    Tombstone,
}
