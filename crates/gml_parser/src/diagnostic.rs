//! Shapes parser failures into structured, rule-sensitive syntax errors.
//!
//! The grammar keeps a stack of rule names while it runs; when something
//! unexpected shows up, the innermost rules pick the message. Hosts display
//! `message` as-is, so it carries the full `Syntax Error (line L, column C):`
//! prefix.

use gml_error::{LexerError, SyntaxError};
use miette::SourceSpan;

use crate::lexer::Token;
use crate::line_index::LineIndex;
use crate::sanitizer::Sanitized;

/// Resolves sanitized-text offsets into positions in the text the author
/// wrote. Lines are unaffected by sanitization (it never inserts line
/// breaks); columns and offsets shift by the insertions before them.
pub(crate) struct PositionMapper<'a> {
    /// Line index over the *original* source.
    pub(crate) line_index: &'a LineIndex,
    pub(crate) sanitized: Option<&'a Sanitized>,
}

impl PositionMapper<'_> {
    fn resolve(&self, offset: usize) -> (usize, usize, usize) {
        let mapped = self.sanitized.map_or(offset, |s| s.map_index(offset));
        let (line, column) = self.line_index.line_col(mapped);
        (line, column, mapped)
    }
}

/// Quoted token text for messages; EOF and unprintable tokens get the two
/// fixed spellings.
fn wrong_symbol_of(token: Option<&Token>) -> String {
    match token {
        None => "end of file".to_string(),
        Some(token) if token.text.is_empty() => "unknown symbol".to_string(),
        Some(token) => format!("'{}'", token.text),
    }
}

/// `parameterList` → `parameter-list`.
fn kebab(rule: &str) -> String {
    let mut out = String::with_capacity(rule.len() + 4);
    for c in rule.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn contains_pair(rules: &[&str], inner: &str, outer: &str) -> bool {
    rules.last() == Some(&inner) && rules.iter().any(|r| *r == outer)
}

/// Builds the error for an unexpected token (or EOF) at the current
/// position, consulting the rule-invocation stack.
pub(crate) fn unexpected_symbol(
    token: Option<&Token>,
    rules: &[&str],
    positions: &PositionMapper<'_>,
    source_len: usize,
) -> SyntaxError {
    let offset = token.map_or(source_len, |t| t.span.start);
    let (line, column, mapped) = positions.resolve(offset);
    let wrong_symbol = wrong_symbol_of(token);
    let rule = rules.last().copied().unwrap_or("program").to_string();

    let detail = if contains_pair(rules, "lValueExpression", "incDecStatement") {
        "++, -- can only be used on a variable-addressing expression".to_string()
    } else if rule == "expression" {
        format!("unexpected {wrong_symbol} in expression")
    } else if rule == "statement" || rule == "program" {
        format!("unexpected {wrong_symbol}")
    } else if rule == "parameterList" {
        format!("unexpected {wrong_symbol} in function parameters, expected an identifier")
    } else {
        format!("unexpected {wrong_symbol} while matching rule {}", kebab(&rule))
    };

    let span = token.map(|t| SourceSpan::new(mapped.into(), t.span.len()));

    SyntaxError {
        message: format!("Syntax Error (line {line}, column {column}): {detail}"),
        line,
        column,
        wrong_symbol,
        rule,
        offending_text: token.map_or(String::new(), |t| t.text.clone()),
        span,
    }
}

/// Builds the unmatched-brace error, reported at the *opening* brace rather
/// than wherever the parser ran aground.
pub(crate) fn missing_close_brace(
    open_span: std::ops::Range<usize>,
    positions: &PositionMapper<'_>,
) -> SyntaxError {
    let (line, column, mapped) = positions.resolve(open_span.start);
    SyntaxError {
        message: format!(
            "Syntax Error (line {line}, column {column}): missing associated closing brace for this block"
        ),
        line,
        column,
        wrong_symbol: "end of file".to_string(),
        rule: "closeBlock".to_string(),
        offending_text: String::new(),
        span: Some(SourceSpan::new(mapped.into(), open_span.len())),
    }
}

/// Surfaces a token recognition failure from the lexer.
pub(crate) fn token_recognition_error(
    token: &Token,
    positions: &PositionMapper<'_>,
) -> LexerError {
    let (line, column, mapped) = positions.resolve(token.span.start);
    let wrong_symbol = if token.text.is_empty() {
        "unknown symbol".to_string()
    } else {
        format!("'{}'", token.text)
    };
    LexerError {
        message: format!("Syntax Error (line {line}, column {column}): unexpected {wrong_symbol}"),
        line,
        column,
        wrong_symbol,
        offending_text: token.text.clone(),
        span: Some(SourceSpan::new(mapped.into(), token.span.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gml_syntax::SyntaxKind;

    fn token(text: &str, at: usize) -> Token {
        Token { kind: SyntaxKind::ERROR_TOKEN, text: text.to_string(), span: at..at + text.len() }
    }

    #[test]
    fn message_carries_line_and_column() {
        let index = LineIndex::new("var\n  ]");
        let positions = PositionMapper { line_index: &index, sanitized: None };
        let err = unexpected_symbol(Some(&token("]", 6)), &["statement"], &positions, 7);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 2);
        assert_eq!(err.message, "Syntax Error (line 2, column 2): unexpected ']'");
    }

    #[test]
    fn eof_reads_as_end_of_file() {
        let index = LineIndex::new("if (x");
        let positions = PositionMapper { line_index: &index, sanitized: None };
        let err = unexpected_symbol(None, &["expression"], &positions, 5);
        assert_eq!(err.wrong_symbol, "end of file");
        assert!(err.message.contains("unexpected end of file in expression"));
    }

    #[test]
    fn inc_dec_lvalue_gets_its_own_message() {
        let index = LineIndex::new("++1;");
        let positions = PositionMapper { line_index: &index, sanitized: None };
        let err = unexpected_symbol(
            Some(&token("1", 2)),
            &["statement", "incDecStatement", "lValueExpression"],
            &positions,
            4,
        );
        assert!(err.message.ends_with("++, -- can only be used on a variable-addressing expression"));
        assert_eq!(err.rule, "lValueExpression");
    }

    #[test]
    fn unknown_rules_fall_back_to_kebab_case() {
        let index = LineIndex::new("enum {}");
        let positions = PositionMapper { line_index: &index, sanitized: None };
        let err = unexpected_symbol(Some(&token("{", 5)), &["enumDeclaration"], &positions, 7);
        assert!(err.message.ends_with("while matching rule enum-declaration"));
    }

    #[test]
    fn sanitized_offsets_map_back_to_the_original_text() {
        // In `if (x = y) ]` the insertion sits before the bad bracket.
        let original = "if (x = y) ]";
        let sanitized = crate::sanitizer::sanitize(original);
        let index = LineIndex::new(original);
        let positions = PositionMapper { line_index: &index, sanitized: Some(&sanitized) };
        // In the sanitized text the `]` moved one column right.
        let err = unexpected_symbol(Some(&token("]", 12)), &["statement"], &positions, 13);
        assert_eq!(err.column, 11);
    }
}
