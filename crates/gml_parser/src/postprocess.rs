//! Post-parse fixups: index remapping, literal restoration, and location
//! shaping per the parse options.
//!
//! Order matters. Locations are first projected back through the sanitizer's
//! insertion table so every index points into the original text; literal
//! values are then restored by slicing that text; only afterwards are
//! locations simplified or stripped.

use gml_ast::{Comment, CommentKind, Location, Node, NodeKind, Whitespace, visit};

use crate::sanitizer::Sanitized;

fn fix_location(loc: &mut Option<Location>, f: &impl Fn(Location) -> Option<Location>) {
    *loc = loc.and_then(f);
}

/// Applies `f` to every location slot of one node, nested slots included
/// (`idLocation`, the `declaration` back-reference).
fn fix_node(node: &mut Node, f: &impl Fn(Location) -> Option<Location>) {
    fix_location(&mut node.start, f);
    fix_location(&mut node.end, f);
    match &mut node.kind {
        NodeKind::FunctionDeclaration { id_location, .. }
        | NodeKind::ConstructorDeclaration { id_location, .. } => {
            if let Some(range) = id_location {
                fix_location(&mut range.start, f);
                fix_location(&mut range.end, f);
            }
        }
        NodeKind::Identifier { declaration, .. } => {
            if let Some(decl) = declaration {
                fix_location(&mut decl.start, f);
                fix_location(&mut decl.end, f);
            }
        }
        _ => {}
    }
}

fn fix_tree(program: &mut Node, f: &impl Fn(Location) -> Option<Location>) {
    visit::walk_mut(program, &mut |node| fix_node(node, f));
}

fn fix_comments(comments: &mut [Comment], f: &impl Fn(Location) -> Option<Location>) {
    for comment in comments {
        fix_location(&mut comment.start, f);
        fix_location(&mut comment.end, f);
    }
}

fn fix_whitespaces(whitespaces: &mut [Whitespace], f: &impl Fn(Location) -> Option<Location>) {
    for ws in whitespaces {
        fix_location(&mut ws.start, f);
        fix_location(&mut ws.end, f);
    }
}

/// Projects every index back into the original source.
pub(crate) fn remap_indices(
    program: &mut Node,
    comments: &mut [Comment],
    whitespaces: &mut [Whitespace],
    sanitized: &Sanitized,
) {
    let f = |loc: Location| Some(loc.map_index(|i| sanitized.map_index(i)));
    fix_tree(program, &f);
    fix_comments(comments, &f);
    fix_whitespaces(whitespaces, &f);
}

/// Collapses `{line, index}` pairs to their bare index.
pub(crate) fn simplify_locations(
    program: &mut Node,
    comments: &mut [Comment],
    whitespaces: &mut [Whitespace],
) {
    let f = |loc: Location| Some(loc.simplified());
    fix_tree(program, &f);
    fix_comments(comments, &f);
    fix_whitespaces(whitespaces, &f);
}

/// Removes every location field.
pub(crate) fn strip_locations(
    program: &mut Node,
    comments: &mut [Comment],
    whitespaces: &mut [Whitespace],
) {
    let f = |_: Location| None;
    fix_tree(program, &f);
    fix_comments(comments, &f);
    fix_whitespaces(whitespaces, &f);
}

fn slice(source: &str, start: &Option<Location>, end: &Option<Location>) -> Option<String> {
    let from = start.as_ref().map(|l| l.index())?;
    let to = end.as_ref().map(|l| l.index())? + 1;
    source.get(from..to).map(str::to_string)
}

/// Restores string-literal and template-text values from the original
/// source, so escape casing and rewritten conditions read as authored.
/// Indices must already be remapped when this runs.
pub(crate) fn restore_literals(program: &mut Node, original: &str) {
    visit::walk_mut(program, &mut |node| {
        let restored = match &node.kind {
            NodeKind::Literal { value }
                if value.starts_with('"') || value.starts_with('\'') || value.starts_with('`') =>
            {
                slice(original, &node.start, &node.end)
            }
            NodeKind::TemplateStringText { .. } => slice(original, &node.start, &node.end),
            _ => None,
        };
        if let Some(text) = restored {
            match &mut node.kind {
                NodeKind::Literal { value } | NodeKind::TemplateStringText { value } => {
                    *value = text;
                }
                _ => {}
            }
        }
    });
}

/// Same restoration for comment bodies; the escape normalization pass is
/// blind to comments, so their text can differ from the original too.
pub(crate) fn restore_comments(comments: &mut [Comment], original: &str) {
    for comment in comments.iter_mut() {
        let Some(text) = slice(original, &comment.start, &comment.end) else { continue };
        comment.value = match comment.kind {
            CommentKind::CommentLine => text.strip_prefix("//").unwrap_or(&text).to_string(),
            CommentKind::CommentBlock => {
                let inner = text.strip_prefix("/*").unwrap_or(&text);
                inner.strip_suffix("*/").unwrap_or(inner).to_string()
            }
        };
    }
}
