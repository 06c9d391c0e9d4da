//! Owned abstract syntax tree for GML.
//!
//! This crate is the stable surface between the parser and downstream tools
//! (formatters, linters): the serialized `type` tags of [`NodeKind`] are the
//! wire format. The tree owns all subtrees by value; the only back-reference
//! is [`DeclarationRef`], which is a copy, not a pointer.

mod location;
mod node;
mod trivia;
pub mod visit;

pub use location::{Location, LocationRange};
pub use node::{DeclarationRef, Node, NodeKind, ScopeId};
pub use trivia::{Comment, CommentKind, Whitespace};
