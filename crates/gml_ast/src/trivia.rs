//! Comments and whitespace retained alongside the tree.
//!
//! Trivia never participates in the grammar; it exists so printers can put
//! comments back where the author left them. Each comment remembers the
//! whitespace and the nearest significant characters around it.

use serde_derive::Serialize;

use crate::location::Location;

fn is_false(flag: &bool) -> bool {
    !*flag
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommentKind {
    CommentLine,
    CommentBlock,
}

/// A single comment in source order.
///
/// `value` is the comment body with the `//` or `/* */` markers stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    pub value: String,
    /// Number of lines a block comment spans. Absent on line comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Location>,
    /// Whitespace run immediately before the comment.
    pub leading_ws: String,
    /// Whitespace run immediately after the comment.
    pub trailing_ws: String,
    /// Last significant character before the comment, empty if none.
    pub leading_char: String,
    /// First significant character after the comment, empty if none.
    pub trailing_char: String,
    /// Set on the one comment that precedes all significant tokens.
    #[serde(skip_serializing_if = "is_false")]
    pub is_top_comment: bool,
    /// Set on the last comment of the file.
    #[serde(skip_serializing_if = "is_false")]
    pub is_bottom_comment: bool,
}

/// A whitespace or line-terminator token, for callers that ask for the full
/// hidden channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Whitespace {
    pub value: String,
    pub is_newline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Location>,
}
