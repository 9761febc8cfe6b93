//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure.
//!
//! ```text
//! Start(ASSIGN_STMT)
//!   Start(NAME_EXPR)
//!     Token(NAME)      ← "d"
//!   Finish
//!   Token(EQ)          ← "=" (the sink inserts the surrounding whitespace)
//!   Start(NUMBER_LIT)
//!     Token(NUMBER)    ← "5"
//!   Finish
//! Finish
//! ```
//!
//! Trivia never appears as an event: the parser only sees significant tokens
//! and the [`Sink`](super::sink::Sink) threads whitespace and comments back in.
//!
//! ## Forward Parent Links
//!
//! The `forward_parent` field in `Start` handles cases where we need to wrap
//! an already-parsed node (`1 + 2` is only known to be a `BIN_EXPR` after the
//! `1` has been parsed). The Sink resolves these links by following the chain
//! and opening nodes in the correct (outermost-first) order.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// If `forward_parent` is set, it points to another `Start` event that
    /// should become this node's parent.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add the next significant token to the current node.
    ///
    /// The `kind` is usually the lexer's kind but may be remapped by the grammar.
    Token { kind: SyntaxKind },

    /// Finish the current node.
    Finish,

    /// A placeholder that will be replaced.
    ///
    /// When `parser.start()` is called, a `Placeholder` is pushed. Later,
    /// `marker.complete()` replaces it with a real `Start`, or
    /// `marker.abandon()` leaves it (the Sink ignores placeholders).
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
