//! GML parser front-end.
//!
//! Pipeline: source text → conditional-assignment sanitizer → lexer →
//! event parser → concrete syntax tree (cstree) → trivia collector and AST
//! lowering → owned [`gml_ast`] tree with comments and, on request,
//! identifier metadata. Errors surface as the structured types in
//! [`gml_error`]; the first unrecovered error aborts the parse.
//!
//! ```
//! let program = gml_parser::parse("var x = 1;", &gml_parser::ParseOptions::default()).unwrap();
//! assert_eq!(program.type_name(), "Program");
//! ```

mod diagnostic;
mod event;
mod grammar;
mod identifiers;
mod lexer;
mod line_index;
mod lower;
mod options;
mod parser;
mod postprocess;
pub mod refactor;
mod sanitizer;
mod tree_builder;
mod trivia;

#[cfg(test)]
mod tests;

use gml_ast::{Comment, Node, NodeKind, Whitespace};
use gml_error::{InvalidArgument, ParseFailure};
use gml_syntax::{SyntaxKind, SyntaxNode};

use crate::diagnostic::PositionMapper;
use crate::identifiers::IdentifierMetadata;
use crate::line_index::LineIndex;
use crate::lower::LowerCtx;
use crate::parser::Parser;

pub use event::Event;
pub use identifiers::{IdentifierRole, RoleType, ScopeOverride, ScopeTracker};
pub use lexer::{Token, tokenize};
pub use options::{ParseOptions, ScopeTrackerFactory};
pub use sanitizer::{Sanitized, sanitize};
pub use tree_builder::{TreeBuilder, build_tree};

/// Result of [`parse_with_trivia`]: the program plus the full hidden
/// channel.
#[derive(Debug)]
pub struct ParseOutcome {
    pub program: Node,
    pub comments: Vec<Comment>,
    pub whitespaces: Vec<Whitespace>,
}

/// Parses GML source into a `Program` node.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node, ParseFailure> {
    parse_with_trivia(source, options).map(|outcome| outcome.program)
}

/// Parses GML source, returning the program together with the comment and
/// whitespace lists.
pub fn parse_with_trivia(
    source: &str,
    options: &ParseOptions,
) -> Result<ParseOutcome, ParseFailure> {
    if options.create_scope_tracker.is_some() && !options.get_identifier_metadata {
        return Err(InvalidArgument {
            message: "a scope tracker requires get_identifier_metadata".to_string(),
        }
        .into());
    }

    let sanitized = sanitizer::sanitize(source);
    let was_sanitized = sanitized.insert_positions.is_some();
    let text = normalize_escapes(&sanitized.text);
    let text_changed = was_sanitized || text != sanitized.text;
    tracing::debug!(len = source.len(), sanitized = was_sanitized, "parsing");

    let original_index = LineIndex::new(source);
    let working_index = LineIndex::new(&text);
    let tokens = lexer::tokenize(&text);

    let positions = PositionMapper {
        line_index: &original_index,
        sanitized: was_sanitized.then_some(&sanitized),
    };

    if let Some(bad) = tokens.iter().find(|t| t.kind == SyntaxKind::ERROR_TOKEN) {
        return Err(diagnostic::token_recognition_error(bad, &positions).into());
    }

    let mut p = Parser::new(&tokens, &text, positions);
    grammar::program(&mut p);
    let (events, error) = p.finish();
    if let Some(err) = error {
        return Err(err.into());
    }
    tracing::debug!(events = events.len(), "building syntax tree");

    let (green, interner) = tree_builder::build_tree(events);
    let root = SyntaxNode::new_root_with_resolver(green, interner);

    let (mut comments, mut whitespaces) = trivia::collect(&tokens, &working_index);

    let tracker = options.create_scope_tracker.as_ref().map(|factory| factory());
    let ids = IdentifierMetadata::new(options.get_identifier_metadata, tracker);
    let mut ctx = LowerCtx::new(&text, &working_index, ids);
    let mut program = lower::lower_program(&mut ctx, &root);

    // Project indices back to the author's text, then restore literal text
    // from it, then shape locations per the options.
    if was_sanitized {
        postprocess::remap_indices(&mut program, &mut comments, &mut whitespaces, &sanitized);
    }
    if text_changed {
        postprocess::restore_literals(&mut program, source);
        postprocess::restore_comments(&mut comments, source);
    }
    if !options.get_locations {
        postprocess::strip_locations(&mut program, &mut comments, &mut whitespaces);
    } else if options.simplify_locations {
        postprocess::simplify_locations(&mut program, &mut comments, &mut whitespaces);
    }

    if options.get_comments {
        if let NodeKind::Program { comments: slot, .. } = &mut program.kind {
            *slot = Some(comments.clone());
        }
    }

    Ok(ParseOutcome { program, comments, whitespaces })
}

/// Lowercases the escape letter of uppercase backslash escapes (`\B` → `\b`)
/// so the lexer sees one spelling. Literal values are restored from the
/// original source after parsing.
fn normalize_escapes(text: &str) -> String {
    let mut bytes = text.as_bytes().to_vec();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'\\' {
            if matches!(bytes[i + 1], b'B' | b'F' | b'N' | b'R' | b'T' | b'V') {
                bytes[i + 1] = bytes[i + 1].to_ascii_lowercase();
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    String::from_utf8(bytes).expect("escape normalization preserves UTF-8")
}
