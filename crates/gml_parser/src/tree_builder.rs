//! Builds the concrete syntax tree from parser events.
//!
//! The event stream is flat; placeholders may chain to later placeholders
//! through `forward_parent`, which is how nodes started with `precede` end up
//! opening before the node they wrap. A single pass resolves the chains and
//! feeds a cstree [`GreenNodeBuilder`].

use cstree::interning::Interner;
use cstree::prelude::*;

use gml_syntax::{Gml, SyntaxKind};

use crate::event::Event;

/// A builder for creating syntax trees from parser events.
pub struct TreeBuilder {
    events: Vec<Event>,
    builder: GreenNodeBuilder<'static, 'static, Gml>,
}

impl TreeBuilder {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events, builder: GreenNodeBuilder::new() }
    }

    /// Build the tree from the events.
    pub fn build(mut self) -> (GreenNode, impl Interner) {
        if self.events.is_empty() {
            self.builder.start_node(SyntaxKind::ROOT);
            self.builder.finish_node();
        } else {
            self.process_events();
        }

        let (tree, cache) = self.builder.finish();
        (tree, cache.unwrap().into_interner().unwrap())
    }

    fn process_events(&mut self) {
        let mut kinds: Vec<SyntaxKind> = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Tombstone) {
                Event::Placeholder { kind, forward_parent } => {
                    // Collect the forward chain; the furthest placeholder is
                    // the outermost node and must open first.
                    kinds.clear();
                    kinds.push(kind);
                    let mut fp = forward_parent;
                    while let Some(idx) = fp {
                        match std::mem::replace(&mut self.events[idx], Event::Tombstone) {
                            Event::Placeholder { kind, forward_parent } => {
                                kinds.push(kind);
                                fp = forward_parent;
                            }
                            _ => fp = None,
                        }
                    }
                    for kind in kinds.drain(..).rev() {
                        self.builder.start_node(kind);
                    }
                }
                Event::AddToken { kind, text, span: _ } => {
                    self.builder.token(kind, &text);
                }
                Event::FinishNode => {
                    self.builder.finish_node();
                }
                Event::Tombstone => {}
            }
        }
    }
}

/// Builds a green tree from a list of events.
///
/// **NOTE:** This is a convenience function
pub fn build_tree(events: Vec<Event>) -> (GreenNode, impl Interner) {
    TreeBuilder::new(events).build()
}
