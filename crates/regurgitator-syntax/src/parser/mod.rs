//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! ## The Event Model
//!
//! Grammar rules emit a flat list of [`Event`]s (Start, Token, Finish) and the
//! [`Sink`] builds the Rowan tree from them. Parsing `1 + 2` produces:
//!
//! ```text
//! Start(BIN_EXPR)      ← linked in later via a forward parent
//! Start(NUMBER_LIT)
//! Token(NUMBER)
//! Finish
//! Token(PLUS)
//! Start(NUMBER_LIT)
//! Token(NUMBER)
//! Finish
//! Finish
//! ```
//!
//! ## Significant Tokens
//!
//! The parser never sees trivia. [`Parser::new`] keeps an index of the
//! significant tokens and the sink re-inserts whitespace, comments, bracketed
//! line endings and backslash continuations around them.
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. This marker **must**
//! be either completed with `marker.complete(parser, KIND)` or abandoned with
//! `marker.abandon(parser)`. Dropping a marker without doing either panics.
//!
//! ```ignore
//! let m = p.start();
//! p.bump();
//! m.complete(p, SyntaxKind::PASS_STMT);
//! ```
//!
//! ## Forward Parent Links
//!
//! Left-recursive constructs (binary operators, calls, attribute access) are
//! parsed with `CompletedMarker::precede()`, which wraps an already-parsed
//! node in a new parent through a **forward parent link** resolved by the Sink.
//!
//! ## Errors
//!
//! The parser is error tolerant: unexpected tokens are wrapped in `ERROR`
//! nodes and reported as [`ParseError`]s, and the resulting tree still holds
//! every byte of the input.
//!
//! ## Nesting Limit
//!
//! Expressions may nest at most [`MAX_DEPTH`] levels, counting brackets,
//! prefix operators and every operator or trailer applied to a left operand.
//! Past the limit the rest of the logical line becomes one ERROR node, so no
//! later pass ever sees a tree deeper than that.

pub mod event;
pub mod sink;

mod grammar;

use rowan::GreenNode;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{CstNode, SyntaxKind};
use event::Event;
use sink::Sink;

/// Deepest expression nesting the parser accepts.
pub const MAX_DEPTH: usize = 200;

/// A syntax error recorded while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset of the token where the error was detected.
    pub offset: usize,
}

/// The result of parsing: a lossless green tree plus any errors.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// The root of the concrete syntax tree.
    pub fn syntax(&self) -> CstNode {
        CstNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`, `expect()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    /// Indices into `tokens` of every non-trivia token
    significant: Vec<usize>,
    pos: usize,
    events: Vec<Event>,
    errors: Vec<ParseError>,
    /// Expression nesting levels currently open
    depth: usize,
    /// Set once the nesting limit is hit, until the expression unwinds
    too_deep: bool,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            significant,
            pos: 0,
            events: Vec::new(),
            errors: Vec::new(),
            depth: 0,
            too_deep: false,
        }
    }

    /// Parse the tokens and return the tree with its errors.
    pub fn parse(mut self) -> Parse {
        grammar::module(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        Parse {
            green: sink.finish(),
            errors: self.errors,
        }
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n significant tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.significant
            .get(self.pos + n)
            .map(|&i| self.tokens[i].kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.significant.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Consume a token of the given kind or record an error.
    pub fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {what}"));
            false
        }
    }

    /// Record an error at the current token.
    ///
    /// While unwinding from a nesting overflow, follow-on errors from the
    /// enclosing rules are not recorded.
    pub fn error(&mut self, message: impl Into<String>) {
        if self.too_deep {
            return;
        }
        self.errors.push(ParseError {
            message: message.into(),
            offset: self.current_offset(),
        });
    }

    /// Record an error and wrap the current token in an ERROR node.
    pub fn err_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        let m = self.start();
        self.bump();
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Open one level of expression nesting.
    ///
    /// At [`MAX_DEPTH`] this records an error, wraps the rest of the logical
    /// line in an ERROR node and returns false; the caller must then stop
    /// descending.
    pub fn enter(&mut self) -> bool {
        if self.depth < MAX_DEPTH {
            self.depth += 1;
            return true;
        }

        self.error(format!("expression nested more than {MAX_DEPTH} levels deep"));
        self.too_deep = true;
        if !self.at_end() && !self.at(SyntaxKind::NEWLINE) {
            let m = self.start();
            while !self.at_end() && !self.at(SyntaxKind::NEWLINE) {
                self.bump();
            }
            m.complete(self, SyntaxKind::ERROR);
        }
        false
    }

    /// Close `levels` levels opened with [`Parser::enter`].
    pub fn leave(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
        if self.depth == 0 {
            self.too_deep = false;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.significant
            .get(self.pos)
            .map(|&i| self.tokens[i].text)
            .unwrap_or("")
    }

    /// Byte offset of the current token, or the input length at the end.
    pub fn current_offset(&self) -> usize {
        match self.significant.get(self.pos) {
            Some(&i) => self.tokens[i].offset,
            None => self
                .tokens
                .last()
                .map(|t| t.offset + t.text.len())
                .unwrap_or(0),
        }
    }
}

/// A marker for a node being constructed.
///
/// The `#[must_use]` attribute and the `Drop` impl together enforce that
/// every marker is either completed or abandoned.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// If other events were pushed after `start()`, the placeholder becomes
    /// inert and is ignored by the Sink.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// The only thing you can do with a `CompletedMarker` is call `precede()`
/// to wrap the completed node in a new parent.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse Python source into a concrete syntax tree.
pub fn parse(source: &str) -> Parse {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    parser.parse()
}
