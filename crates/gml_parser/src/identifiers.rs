//! Identifier roles, scopes and the global registry.
//!
//! The lowering pushes a role before visiting the identifiers of a
//! construct (declaration vs. reference, plus a kind such as `variable` or
//! `parameter`) and opens scopes around bodies. Visiting an identifier then
//! stamps it with its scope id, classification tags and, for references, a
//! value copy of the resolved declaration's whereabouts.
//!
//! The role tracker and scope coordinator are inert unless identifier
//! metadata was requested. The global registry runs unconditionally: names
//! introduced by `globalvar`, `#macro`, or `global.x` flag every later
//! occurrence as `isGlobalIdentifier`.

use gml_ast::{DeclarationRef, Location, ScopeId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Host extension point mirroring the built-in scope coordinator. A factory
/// for these can be supplied through the parse options; the coordinator
/// forwards every scope and identifier event to it.
pub trait ScopeTracker {
    fn is_enabled(&self) -> bool;
    fn enter_scope(&mut self, kind: &str);
    fn exit_scope(&mut self, kind: &str);
    fn declare(&mut self, name: &str, kind: &str);
    fn reference(&mut self, name: &str, kind: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleType {
    Declaration,
    Reference,
}

impl RoleType {
    fn classification(self) -> &'static str {
        match self {
            RoleType::Declaration => "declaration",
            RoleType::Reference => "reference",
        }
    }
}

/// Where a declaration lands, when not simply the current scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeOverride {
    /// Hoist to the root (program) scope; how macros and `globalvar` become
    /// visible everywhere.
    Global,
    /// A specific scope that must be on the active stack.
    Scope(ScopeId),
}

/// One entry of the role stack.
#[derive(Debug, Clone)]
pub struct IdentifierRole {
    pub role_type: RoleType,
    pub kind: String,
    pub tags: Vec<String>,
    pub scope_override: Option<ScopeOverride>,
}

impl IdentifierRole {
    pub fn declaration(kind: impl Into<String>) -> Self {
        Self { role_type: RoleType::Declaration, kind: kind.into(), tags: Vec::new(), scope_override: None }
    }

    pub fn reference(kind: impl Into<String>) -> Self {
        Self { role_type: RoleType::Reference, kind: kind.into(), tags: Vec::new(), scope_override: None }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub fn global(mut self) -> Self {
        self.scope_override = Some(ScopeOverride::Global);
        self
    }

    /// A detached copy, for callers that stash roles across visits.
    pub fn clone_role(&self) -> Self {
        self.clone()
    }
}

#[derive(Debug, Clone)]
struct DeclarationInfo {
    start: Option<Location>,
    end: Option<Location>,
    scope_id: ScopeId,
    tags: Vec<String>,
}

#[derive(Debug)]
struct Scope {
    kind: &'static str,
    declarations: FxHashMap<String, DeclarationInfo>,
}

/// Metadata stamped on one identifier node by [`IdentifierMetadata::apply_current_role`].
#[derive(Debug, Clone)]
pub(crate) struct IdentifierAnnotations {
    pub(crate) scope_id: ScopeId,
    pub(crate) classifications: Vec<String>,
    pub(crate) declaration: Option<DeclarationRef>,
}

/// The three cooperating pieces: role stack, scope tree, global registry.
pub(crate) struct IdentifierMetadata {
    enabled: bool,
    scopes: Vec<Scope>,
    scope_stack: Vec<ScopeId>,
    role_stack: Vec<IdentifierRole>,
    globals: FxHashSet<String>,
    tracker: Option<Box<dyn ScopeTracker>>,
}

impl IdentifierMetadata {
    pub(crate) fn new(enabled: bool, tracker: Option<Box<dyn ScopeTracker>>) -> Self {
        let mut this = Self {
            enabled,
            scopes: Vec::new(),
            scope_stack: Vec::new(),
            role_stack: Vec::new(),
            globals: FxHashSet::default(),
            tracker,
        };
        if this.enabled {
            // Root scope; scope id 0 is always "program".
            this.push_scope("program");
        }
        this
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    fn push_scope(&mut self, kind: &'static str) -> ScopeId {
        let id = ScopeId::try_from(self.scopes.len()).unwrap_or(ScopeId::MAX);
        self.scopes.push(Scope { kind, declarations: FxHashMap::default() });
        self.scope_stack.push(id);
        id
    }

    /// Opens a scope of `kind`; returns the id the matching
    /// [`Self::exit_scope`] must hand back.
    pub(crate) fn enter_scope(&mut self, kind: &'static str) -> Option<ScopeId> {
        if !self.enabled {
            return None;
        }
        if let Some(tracker) = &mut self.tracker {
            if tracker.is_enabled() {
                tracker.enter_scope(kind);
            }
        }
        Some(self.push_scope(kind))
    }

    pub(crate) fn exit_scope(&mut self, id: Option<ScopeId>) {
        let Some(id) = id else { return };
        let popped = self.scope_stack.pop();
        debug_assert_eq!(popped, Some(id));
        if let Some(tracker) = &mut self.tracker {
            if tracker.is_enabled() {
                let kind = self.scopes.get(id as usize).map_or("", |s| s.kind);
                tracker.exit_scope(kind);
            }
        }
    }

    pub(crate) fn push_role(&mut self, role: IdentifierRole) {
        if self.enabled {
            self.role_stack.push(role);
        }
    }

    pub(crate) fn pop_role(&mut self) {
        if self.enabled {
            self.role_stack.pop();
        }
    }

    fn current_scope(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(0)
    }

    /// Resolves the scope a declaration should land in, honoring the role's
    /// override: `Global` targets the root, a literal id is used when it is
    /// on the active stack, anything else falls back to the current scope.
    fn declaration_scope(&self, role: &IdentifierRole) -> ScopeId {
        match &role.scope_override {
            Some(ScopeOverride::Global) => 0,
            Some(ScopeOverride::Scope(id)) if self.scope_stack.contains(id) => *id,
            _ => self.current_scope(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&DeclarationInfo> {
        self.scope_stack
            .iter()
            .rev()
            .find_map(|&id| self.scopes[id as usize].declarations.get(name))
    }

    /// Records the identifier under the current role and returns what should
    /// be stamped on its node. `None` when metadata is disabled.
    pub(crate) fn apply_current_role(
        &mut self,
        name: &str,
        start: Option<Location>,
        end: Option<Location>,
    ) -> Option<IdentifierAnnotations> {
        if !self.enabled {
            return None;
        }

        let role = self
            .role_stack
            .last()
            .cloned()
            .unwrap_or_else(|| IdentifierRole::reference("variable"));

        let mut classifications = vec!["identifier".to_string(), role.role_type.classification().to_string()];
        push_unique(&mut classifications, &role.kind);
        for tag in &role.tags {
            push_unique(&mut classifications, tag);
        }

        match role.role_type {
            RoleType::Declaration => {
                let scope_id = self.declaration_scope(&role);
                self.scopes[scope_id as usize].declarations.insert(
                    name.to_string(),
                    DeclarationInfo { start, end, scope_id, tags: role.tags.clone() },
                );
                if matches!(role.scope_override, Some(ScopeOverride::Global)) {
                    self.globals.insert(name.to_string());
                }
                if let Some(tracker) = &mut self.tracker {
                    if tracker.is_enabled() {
                        tracker.declare(name, &role.kind);
                    }
                }
                Some(IdentifierAnnotations { scope_id, classifications, declaration: None })
            }
            RoleType::Reference => {
                let declaration = self.lookup(name).map(|info| {
                    for tag in &info.tags {
                        push_unique(&mut classifications, tag);
                    }
                    DeclarationRef { start: info.start, end: info.end, scope_id: info.scope_id }
                });
                if let Some(tracker) = &mut self.tracker {
                    if tracker.is_enabled() {
                        tracker.reference(name, &role.kind);
                    }
                }
                Some(IdentifierAnnotations {
                    scope_id: self.current_scope(),
                    classifications,
                    declaration,
                })
            }
        }
    }

    /// Adds `name` to the global registry. Active regardless of the metadata
    /// flag; `isGlobalIdentifier` is part of the compact schema.
    pub(crate) fn mark_global(&mut self, name: &str) {
        self.globals.insert(name.to_string());
    }

    /// Whether `name` was globally introduced earlier in source order.
    pub(crate) fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> IdentifierMetadata {
        IdentifierMetadata::new(true, None)
    }

    #[test]
    fn declaration_then_reference_links_back() {
        let mut m = meta();
        let start = Some(Location::detailed(1, 4));
        let end = Some(Location::detailed(1, 4));
        m.push_role(IdentifierRole::declaration("variable"));
        let decl = m.apply_current_role("x", start, end).unwrap();
        m.pop_role();
        assert_eq!(decl.scope_id, 0);
        assert!(decl.declaration.is_none());

        let reference = m.apply_current_role("x", None, None).unwrap();
        let link = reference.declaration.unwrap();
        assert_eq!(link.scope_id, 0);
        assert_eq!(link.start, start);
    }

    #[test]
    fn inner_scopes_see_outer_declarations() {
        let mut m = meta();
        m.push_role(IdentifierRole::declaration("variable"));
        m.apply_current_role("outer", None, None);
        m.pop_role();

        let scope = m.enter_scope("function");
        let reference = m.apply_current_role("outer", None, None).unwrap();
        assert!(reference.declaration.is_some());
        assert_eq!(reference.scope_id, 1);
        m.exit_scope(scope);
    }

    #[test]
    fn global_override_hoists_to_the_root_scope() {
        let mut m = meta();
        let scope = m.enter_scope("function");
        m.push_role(IdentifierRole::declaration("macro").global());
        let decl = m.apply_current_role("PI", None, None).unwrap();
        m.pop_role();
        m.exit_scope(scope);

        assert_eq!(decl.scope_id, 0);
        assert!(m.is_global("PI"));
        // Still resolvable after the function scope closed.
        assert!(m.apply_current_role("PI", None, None).unwrap().declaration.is_some());
    }

    #[test]
    fn classifications_union_role_parts() {
        let mut m = meta();
        m.push_role(IdentifierRole::declaration("variable").with_tags(&["local"]));
        let decl = m.apply_current_role("x", None, None).unwrap();
        assert_eq!(decl.classifications, ["identifier", "declaration", "variable", "local"]);
    }

    #[test]
    fn disabled_metadata_is_inert_but_registry_works() {
        let mut m = IdentifierMetadata::new(false, None);
        assert!(m.apply_current_role("x", None, None).is_none());
        m.mark_global("g");
        assert!(m.is_global("g"));
        assert!(!m.is_global("h"));
    }
}
