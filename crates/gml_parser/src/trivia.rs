//! Second pass over the token stream that assembles the trivia lists.
//!
//! Comments keep enough of their surroundings for a printer to reproduce the
//! author's layout: the whitespace run on each side, the nearest significant
//! characters, and flags for the file-leading and file-trailing positions.
//!
//! Whitespace runs are assigned without overlap: a run between two comments
//! belongs to the second one's `leading_ws`; a run between a comment and
//! code belongs to the comment's `trailing_ws`. The slice of source between
//! two comments is therefore exactly
//! `c1.trailing_ws + code + c2.leading_ws`.

use gml_ast::{Comment, CommentKind, Location, Whitespace};
use gml_syntax::SyntaxKind;

use crate::lexer::Token;
use crate::line_index::LineIndex;

fn range_locations(token: &Token, line_index: &LineIndex) -> (Location, Location) {
    let start_line = line_index.line(token.span.start);
    let end_index = token.span.end.saturating_sub(1).max(token.span.start);
    let end_line = line_index.line(end_index);
    (
        Location::detailed(start_line, token.span.start),
        Location::detailed(end_line, end_index),
    )
}

fn strip_line_comment(text: &str) -> &str {
    text.strip_prefix("//").unwrap_or(text)
}

fn strip_block_comment(text: &str) -> &str {
    let text = text.strip_prefix("/*").unwrap_or(text);
    text.strip_suffix("*/").unwrap_or(text)
}

/// Walks the full token stream and returns comments and whitespace in
/// source order.
pub(crate) fn collect(tokens: &[Token], line_index: &LineIndex) -> (Vec<Comment>, Vec<Whitespace>) {
    let mut comments: Vec<Comment> = Vec::new();
    let mut whitespaces: Vec<Whitespace> = Vec::new();

    // Whitespace seen since the last comment or significant token.
    let mut prev_ws = String::new();
    // Last character of the most recent significant token.
    let mut prev_significant_char = String::new();
    let mut found_first_significant_token = false;
    // Indices into `comments` still waiting for their trailing context.
    let mut pending: Vec<usize> = Vec::new();

    for token in tokens {
        match token.kind {
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_TERMINATOR => {
                prev_ws.push_str(&token.text);
                let (start, end) = range_locations(token, line_index);
                whitespaces.push(Whitespace {
                    value: token.text.clone(),
                    is_newline: token.kind == SyntaxKind::LINE_TERMINATOR,
                    start: Some(start),
                    end: Some(end),
                });
            }
            SyntaxKind::SINGLE_LINE_COMMENT | SyntaxKind::MULTI_LINE_COMMENT => {
                let (start, end) = range_locations(token, line_index);
                let (kind, value, line_count) =
                    if token.kind == SyntaxKind::SINGLE_LINE_COMMENT {
                        (CommentKind::CommentLine, strip_line_comment(&token.text).to_string(), None)
                    } else {
                        let count = token.text.lines().count().max(1);
                        (
                            CommentKind::CommentBlock,
                            strip_block_comment(&token.text).to_string(),
                            Some(count),
                        )
                    };
                let is_top_comment = !found_first_significant_token && comments.is_empty();
                comments.push(Comment {
                    kind,
                    value,
                    line_count,
                    start: Some(start),
                    end: Some(end),
                    leading_ws: std::mem::take(&mut prev_ws),
                    trailing_ws: String::new(),
                    leading_char: prev_significant_char.clone(),
                    trailing_char: String::new(),
                    is_top_comment,
                    is_bottom_comment: false,
                });
                pending.push(comments.len() - 1);
            }
            _ => {
                // A significant token closes out every pending comment.
                if let Some(&last) = pending.last() {
                    comments[last].trailing_ws = std::mem::take(&mut prev_ws);
                }
                if !pending.is_empty() {
                    let first_char =
                        token.text.chars().next().map(String::from).unwrap_or_default();
                    for idx in pending.drain(..) {
                        comments[idx].trailing_char = first_char.clone();
                    }
                }
                prev_ws.clear();
                prev_significant_char =
                    token.text.chars().next_back().map(String::from).unwrap_or_default();
                found_first_significant_token = true;
            }
        }
    }

    // Whatever is still pending at EOF trails the whole file.
    if let Some(&last) = pending.last() {
        comments[last].trailing_ws = std::mem::take(&mut prev_ws);
        comments[last].is_bottom_comment = true;
    }

    (comments, whitespaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn collect_from(source: &str) -> (Vec<Comment>, Vec<Whitespace>) {
        let tokens = lexer::tokenize(source);
        let index = LineIndex::new(source);
        collect(&tokens, &index)
    }

    #[test]
    fn strips_comment_markers() {
        let (comments, _) = collect_from("// note\n/* block */");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].value, " note");
        assert_eq!(comments[0].kind, CommentKind::CommentLine);
        assert_eq!(comments[1].value, " block ");
        assert_eq!(comments[1].kind, CommentKind::CommentBlock);
        assert_eq!(comments[1].line_count, Some(1));
    }

    #[test]
    fn block_comments_count_their_lines() {
        let (comments, _) = collect_from("/* a\n   b\n   c */");
        assert_eq!(comments[0].line_count, Some(3));
    }

    #[test]
    fn captures_adjacent_characters() {
        let (comments, _) = collect_from("x = 1; // one\ny = 2;");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].leading_char, ";");
        assert_eq!(comments[0].trailing_char, "y");
        assert_eq!(comments[0].leading_ws, " ");
        assert_eq!(comments[0].trailing_ws, "\n");
    }

    #[test]
    fn first_comment_before_code_is_the_top_comment() {
        let (comments, _) = collect_from("// header\n// more\nx = 1;");
        assert!(comments[0].is_top_comment);
        assert!(!comments[1].is_top_comment);
        assert!(!comments.iter().any(|c| c.is_bottom_comment));
    }

    #[test]
    fn trailing_comment_is_the_bottom_comment() {
        let (comments, _) = collect_from("x = 1;\n// done\n");
        assert!(comments[0].is_bottom_comment);
        assert_eq!(comments[0].trailing_char, "");
        assert_eq!(comments[0].trailing_ws, "\n");
    }

    #[test]
    fn whitespace_between_comments_is_not_double_counted() {
        let source = "// a\n\n// b\nx;";
        let (comments, _) = collect_from(source);
        let c1 = &comments[0];
        let c2 = &comments[1];
        let between =
            &source[c1.end.unwrap().index() + 1..c2.start.unwrap().index()];
        assert_eq!(format!("{}{}", c1.trailing_ws, c2.leading_ws), between);
    }

    #[test]
    fn comments_are_emitted_in_source_order() {
        let (comments, _) = collect_from("// a\nx; // b\n/* c */ y;");
        let starts: Vec<_> =
            comments.iter().map(|c| c.start.unwrap().index()).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn newline_tokens_are_flagged() {
        let (_, whitespaces) = collect_from("x;\ny;");
        assert_eq!(whitespaces.len(), 1);
        assert!(whitespaces[0].is_newline);
        assert_eq!(whitespaces[0].value, "\n");
    }
}
