//! Structured errors raised by the GML parser front-end.
//!
//! Hosts (editors, CLIs) format these; the `message` field is the single
//! source of truth for user-facing diagnostics. Positions use 1-based lines
//! and 0-based columns, matching the lexer's conventions.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A parse failure with a rule-sensitive message.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
#[diagnostic(code(gml::syntax_error))]
pub struct SyntaxError {
    /// Full message, prefixed `Syntax Error (line L, column C): …`.
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// The quoted offending text, `end of file`, or `unknown symbol`.
    pub wrong_symbol: String,
    /// Innermost grammar rule active at the error site.
    pub rule: String,
    pub offending_text: String,
    #[label("unexpected {wrong_symbol}")]
    pub span: Option<SourceSpan>,
}

/// A token recognition failure. Same shape as [`SyntaxError`] minus the rule.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
#[diagnostic(code(gml::lexer_error))]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub wrong_symbol: String,
    pub offending_text: String,
    #[label("unexpected {wrong_symbol}")]
    pub span: Option<SourceSpan>,
}

/// Host contract violation on the entry point (not a source error).
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("invalid argument: {message}")]
#[diagnostic(code(gml::invalid_argument))]
pub struct InvalidArgument {
    pub message: String,
}

/// Any failure the parse entry points can raise.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}

impl ParseFailure {
    /// The syntax error, if that is what this failure is.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseFailure::Syntax(err) => Some(err),
            _ => None,
        }
    }
}
