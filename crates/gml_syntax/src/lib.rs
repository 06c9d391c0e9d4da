//! Syntax kinds and typed tree access for the GML concrete syntax tree.
//!
//! The tree itself is built with [`cstree`]; this crate owns the shared
//! [`SyntaxKind`] vocabulary, the type aliases for nodes/tokens over it, the
//! operator precedence table both the grammar and the lowering consult, and
//! the typed node wrappers in [`nodes`].

pub mod ast;
pub mod nodes;
pub mod operators;
mod syntax_kind;

pub use ast::AstNode;
pub use syntax_kind::{
    Gml, ResolvedElement, ResolvedNode, ResolvedToken, SyntaxElement, SyntaxKind, SyntaxNode,
    SyntaxToken,
};
