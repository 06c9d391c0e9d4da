//! Parse options and their defaults.

use crate::identifiers::ScopeTracker;

/// Factory for host-supplied scope trackers, one per parse.
pub type ScopeTrackerFactory = Box<dyn Fn() -> Box<dyn ScopeTracker>>;

/// Options for [`crate::parse`] and [`crate::parse_with_trivia`].
pub struct ParseOptions {
    /// Populate `Program.comments`. Default `true`.
    pub get_comments: bool,
    /// Retain `start`/`end` on every node. Default `true`.
    pub get_locations: bool,
    /// Collapse `{line, index}` locations to the bare index. Default `true`;
    /// a no-op when locations are off.
    pub simplify_locations: bool,
    /// Activate the role tracker and scope coordinator. Default `false`.
    pub get_identifier_metadata: bool,
    /// Optional factory for a host scope tracker, driven alongside the
    /// built-in coordinator. Requires `get_identifier_metadata`.
    pub create_scope_tracker: Option<ScopeTrackerFactory>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            get_comments: true,
            get_locations: true,
            simplify_locations: true,
            get_identifier_metadata: false,
            create_scope_tracker: None,
        }
    }
}

impl std::fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("get_comments", &self.get_comments)
            .field("get_locations", &self.get_locations)
            .field("simplify_locations", &self.simplify_locations)
            .field("get_identifier_metadata", &self.get_identifier_metadata)
            .field("create_scope_tracker", &self.create_scope_tracker.is_some())
            .finish()
    }
}

impl ParseOptions {
    pub fn with_identifier_metadata(mut self) -> Self {
        self.get_identifier_metadata = true;
        self
    }

    pub fn without_comments(mut self) -> Self {
        self.get_comments = false;
        self
    }

    pub fn without_locations(mut self) -> Self {
        self.get_locations = false;
        self
    }

    pub fn with_full_locations(mut self) -> Self {
        self.get_locations = true;
        self.simplify_locations = false;
        self
    }
}
