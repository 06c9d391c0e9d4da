//! Source locations attached to AST nodes.

use serde_derive::Serialize;

/// One end of a node's source range.
///
/// Freshly built trees always carry the detailed form; callers that ask for
/// simplified locations get the bare character index instead. `line` is
/// 1-based, `index` is a 0-based absolute character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Location {
    Detailed { line: usize, index: usize },
    Index(usize),
}

impl Location {
    pub fn detailed(line: usize, index: usize) -> Self {
        Location::Detailed { line, index }
    }

    /// The absolute character offset, whatever the representation.
    pub fn index(self) -> usize {
        match self {
            Location::Detailed { index, .. } | Location::Index(index) => index,
        }
    }

    pub fn line(self) -> Option<usize> {
        match self {
            Location::Detailed { line, .. } => Some(line),
            Location::Index(_) => None,
        }
    }

    /// Collapses the detailed form to its bare index.
    pub fn simplified(self) -> Self {
        Location::Index(self.index())
    }

    /// Rewrites the offset, keeping the representation.
    pub fn map_index(self, f: impl FnOnce(usize) -> usize) -> Self {
        match self {
            Location::Detailed { line, index } => Location::Detailed { line, index: f(index) },
            Location::Index(index) => Location::Index(f(index)),
        }
    }
}

/// A nested `start`/`end` pair that is not itself a node, such as a function
/// name's location or a declaration back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct LocationRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Location>,
}

impl LocationRange {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start: Some(start), end: Some(end) }
    }
}
