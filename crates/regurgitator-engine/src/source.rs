//! The immutable source buffer and a forward-only cursor over it.

use regurgitator_syntax::Span;
use thiserror::Error;

/// Why the cursor refused to move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("cursor would move backward from {from} to {to}")]
    Backward { from: usize, to: usize },

    #[error("offset {to} is past the end of the source ({len} bytes)")]
    PastEnd { to: usize, len: usize },

    #[error("offset {at} is not on a character boundary")]
    CharBoundary { at: usize },
}

/// The original text every span points into.
#[derive(Debug, Clone, Copy)]
pub struct SourceText<'a> {
    text: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// The whole text as a span.
    pub fn span(&self) -> Span {
        Span::new(0, self.text.len())
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor::new(self.text)
    }
}

/// A position in the source that only ever moves forward.
///
/// Each advance hands back the slice it stepped over, so every byte of the
/// source is handed out exactly once over the life of the cursor.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Move to `to`, returning the text passed over.
    pub fn advance_to(&mut self, to: usize) -> Result<&'a str, CursorError> {
        if to < self.pos {
            return Err(CursorError::Backward { from: self.pos, to });
        }
        if to > self.text.len() {
            return Err(CursorError::PastEnd {
                to,
                len: self.text.len(),
            });
        }
        let slice = self
            .text
            .get(self.pos..to)
            .ok_or(CursorError::CharBoundary { at: to })?;
        self.pos = to;
        Ok(slice)
    }
}
