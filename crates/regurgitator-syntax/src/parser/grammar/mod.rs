//! # Grammar Rules
//!
//! This module contains the grammar rules that drive parsing. Each function
//! takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`, `p.expect()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//!
//! ## Module Structure
//!
//! - [`statements`] - Simple statements and their separators
//! - [`expressions`] - Expression precedence levels, trailers and displays
//!
//! ## Error Recovery
//!
//! Grammar functions should be lenient - produce a tree even for invalid input.
//! Unexpected tokens are reported and wrapped in ERROR nodes; a broken
//! statement is skipped up to the end of its logical line.

mod expressions;
mod statements;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root module.
///
/// Logical line endings and `;` separators stay directly under MODULE, so the
/// text between statements (blank lines, comment lines) is never part of a
/// statement node.
pub fn module(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        if p.eat(SyntaxKind::NEWLINE) || p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }

        statements::statement(p);

        if !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::SEMICOLON) {
            p.error("expected end of statement");
            recover_to_line_end(p);
        }
    }

    m.complete(p, SyntaxKind::MODULE);
}

/// Wrap everything up to the next logical line ending in one ERROR node.
fn recover_to_line_end(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        p.bump();
    }
    m.complete(p, SyntaxKind::ERROR);
}
