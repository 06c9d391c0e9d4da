//! This is the actual grammar of GML.
//!
//! Each function in this module and its children corresponds to a production
//! of the formal grammar. Submodules roughly correspond to different *areas*
//! of the grammar. By convention, each submodule starts with `use super::*`
//! and exports "public" productions via `pub(super)` or `pub(crate)`.
//!
//! See docs for [`Parser`](super::parser::Parser) to learn about the API
//! available to the grammar, and docs for [`Event`](super::event::Event) to
//! learn how this actually manages to produce parse trees.
//!
//! There is no recovery: the first unexpected token poisons the parser, every
//! loop checks [`Parser::ok`], and the facade raises the structured error.

mod expressions;
mod statements;

use gml_syntax::SyntaxKind::*;

use crate::parser::Parser;

pub(crate) use expressions::{expr_or_assignment, expression};
pub(crate) use statements::statement;

/// Parses a complete source file into a `ROOT` node.
pub(crate) fn program(p: &mut Parser<'_>) {
    let m = p.start();
    p.with_rule("program", |p| {
        while !p.at(EOF) && p.ok() {
            statement(p);
        }
    });
    // Trailing hidden-channel tokens belong to the root node.
    p.flush_trivia();
    m.complete(p, ROOT);
}
