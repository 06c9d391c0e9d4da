//! Token-stream parser infrastructure.
//!
//! The grammar drives a [`Parser`] that produces a flat [`Event`] stream;
//! the tree builder turns events into the concrete syntax tree. Markers work
//! the way they do in rust-analyzer: `start` leaves a placeholder, `complete`
//! writes the node kind into it, and `precede` wraps an already-completed
//! node by chaining placeholders.
//!
//! There is no recovery: the first error poisons the parser and every
//! production backs out. The sanitizer is the only pre-parse repair this
//! front-end performs.

use gml_error::SyntaxError;
use gml_syntax::SyntaxKind;

use crate::diagnostic::{self, PositionMapper};
use crate::event::Event;
use crate::lexer::Token;

/// A bit set of [`SyntaxKind`]s, usable in `const` position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TokenSet([u64; 4]);

impl TokenSet {
    pub(crate) const fn new(kinds: &[SyntaxKind]) -> TokenSet {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < kinds.len() {
            let discriminant = kinds[i] as usize;
            bits[discriminant / 64] |= 1 << (discriminant % 64);
            i += 1;
        }
        TokenSet(bits)
    }

    pub(crate) const fn contains(&self, kind: SyntaxKind) -> bool {
        let discriminant = kind as usize;
        self.0[discriminant / 64] & (1 << (discriminant % 64)) != 0
    }
}

/// See [`Marker::complete`].
pub(crate) struct CompletedMarker {
    start_pos: usize,
}

impl CompletedMarker {
    /// Starts a new node that will wrap this completed one.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new = p.start();
        if let Event::Placeholder { forward_parent, .. } = &mut p.events[self.start_pos] {
            *forward_parent = Some(new.pos);
        }
        new
    }
}

/// An open node. Must be completed or abandoned before the parser finishes.
pub(crate) struct Marker {
    pos: usize,
}

impl Marker {
    pub(crate) fn complete(self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        if let Event::Placeholder { kind: slot, .. } = &mut p.events[self.pos] {
            *slot = kind;
        }
        p.events.push(Event::FinishNode);
        CompletedMarker { start_pos: self.pos }
    }

    pub(crate) fn abandon(self, p: &mut Parser<'_>) {
        p.events[self.pos] = Event::Tombstone;
    }
}

/// Parser over the lexer's token stream.
///
/// Navigation (`current`, `nth`, `at`) sees only significant tokens; hidden
/// channel tokens are flushed into the event stream as they are passed.
pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    source: &'t str,
    positions: PositionMapper<'t>,
    /// Cursor into `tokens`, including trivia not yet flushed.
    pos: usize,
    events: Vec<Event>,
    error: Option<SyntaxError>,
    /// Innermost grammar rule last; read by the error reporter.
    rules: Vec<&'static str>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token], source: &'t str, positions: PositionMapper<'t>) -> Self {
        Self { tokens, source, positions, pos: 0, events: Vec::new(), error: None, rules: Vec::new() }
    }

    /// No error so far. Loops in the grammar check this to unwind after the
    /// first failure.
    pub(crate) fn ok(&self) -> bool {
        self.error.is_none()
    }

    fn significant_from(&self, mut idx: usize) -> usize {
        while let Some(token) = self.tokens.get(idx) {
            if token.kind.is_trivia() {
                idx += 1;
            } else {
                break;
            }
        }
        idx
    }

    fn current_idx(&self) -> usize {
        self.significant_from(self.pos)
    }

    pub(crate) fn current(&self) -> SyntaxKind {
        self.tokens.get(self.current_idx()).map_or(SyntaxKind::EOF, |t| t.kind)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_ts(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub(crate) fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current_idx())
    }

    pub(crate) fn current_span(&self) -> std::ops::Range<usize> {
        self.current_token().map_or(self.source.len()..self.source.len(), |t| t.span.clone())
    }

    /// Is there a hidden-channel line terminator before the current token?
    /// The macro grammar cares; nothing else does.
    pub(crate) fn line_break_before_current(&self) -> bool {
        self.tokens[self.pos..self.current_idx()]
            .iter()
            .any(|t| t.kind == SyntaxKind::LINE_TERMINATOR)
    }

    /// Flushes pending hidden-channel tokens into the event stream.
    pub(crate) fn flush_trivia(&mut self) {
        let until = self.current_idx();
        while self.pos < until {
            let token = &self.tokens[self.pos];
            self.events.push(Event::AddToken {
                kind: token.kind,
                text: token.text.clone(),
                span: token.span.clone(),
            });
            self.pos += 1;
        }
    }

    /// Adds the current token to the event stream and advances.
    pub(crate) fn bump_any(&mut self) {
        self.flush_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.events.push(Event::AddToken {
                kind: token.kind,
                text: token.text.clone(),
                span: token.span.clone(),
            });
            self.pos += 1;
        }
    }

    /// Consumes the current token, asserting its kind.
    pub(crate) fn bump(&mut self, kind: SyntaxKind) {
        debug_assert_eq!(self.current(), kind);
        self.bump_any();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump_any();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it matches, errors otherwise.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_unexpected();
            false
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder { kind: SyntaxKind::ERROR, forward_parent: None });
        Marker { pos }
    }

    /// Runs `f` with `rule` on the rule stack. The stack only feeds error
    /// messages; it has no effect on parsing.
    pub(crate) fn with_rule<T>(
        &mut self,
        rule: &'static str,
        f: impl FnOnce(&mut Parser<'t>) -> T,
    ) -> T {
        self.rules.push(rule);
        let result = f(self);
        self.rules.pop();
        result
    }

    pub(crate) fn rule_stack(&self) -> &[&'static str] {
        &self.rules
    }

    /// Reports the current token as unexpected, using the rule stack for a
    /// context-sensitive message. First error wins; later ones are dropped.
    pub(crate) fn error_unexpected(&mut self) {
        if self.error.is_some() {
            return;
        }
        let error = diagnostic::unexpected_symbol(
            self.current_token(),
            self.rule_stack(),
            &self.positions,
            self.source.len(),
        );
        self.error = Some(error);
    }

    /// Reports an unmatched opening brace, located at the brace itself.
    pub(crate) fn error_missing_close_brace(&mut self, open_span: std::ops::Range<usize>) {
        if self.error.is_some() {
            return;
        }
        let error = diagnostic::missing_close_brace(open_span, &self.positions);
        self.error = Some(error);
    }

    pub(crate) fn finish(self) -> (Vec<Event>, Option<SyntaxError>) {
        (self.events, self.error)
    }
}
