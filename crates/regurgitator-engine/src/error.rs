use std::fmt;

use regurgitator_syntax::{Span, SyntaxError};
use thiserror::Error;

use crate::source::CursorError;

/// The tree handed to the renderer does not fit its source text.
///
/// Every variant names the offending node and where it claims to be.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("root {kind} spans {span} but the source is 0..{len}")]
    RootSpan {
        kind: &'static str,
        span: Span,
        len: usize,
    },

    #[error("root {kind} has no span of its own")]
    SynthesizedRoot { kind: &'static str },

    #[error("{kind} at {span} has its end before its start")]
    Inverted { kind: &'static str, span: Span },

    #[error("{kind} at {span} is not contained in {parent} at {parent_span}")]
    OutOfBounds {
        kind: &'static str,
        span: Span,
        parent: &'static str,
        parent_span: Span,
    },

    #[error("{kind} at {span} starts before its previous sibling ends at {previous_end}")]
    Overlap {
        kind: &'static str,
        span: Span,
        previous_end: usize,
    },

    #[error("synthesized {kind} in {parent} at {parent_span} has a synthesized neighbour")]
    AdjacentSynthesized {
        kind: &'static str,
        parent: &'static str,
        parent_span: Span,
    },

    #[error("{kind} at {span}: {source}")]
    Cursor {
        kind: &'static str,
        span: Span,
        #[source]
        source: CursorError,
    },

    #[error("failed to write markup")]
    Write(#[from] fmt::Error),
}

/// Markup text that cannot be read back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unrecognized markup at byte {offset}")]
    Unrecognized { offset: usize },

    #[error("malformed tag at byte {offset}: {message}")]
    MalformedTag { offset: usize, message: &'static str },

    #[error("unexpected end tag </{name}> at byte {offset}")]
    UnexpectedClose { name: String, offset: usize },

    #[error("end tag </{found}> at byte {offset} does not match <{expected}> opened at byte {opened}")]
    Mismatched {
        expected: String,
        found: String,
        opened: usize,
        offset: usize,
    },

    #[error("element <{name}> opened at byte {offset} is never closed")]
    Unclosed { name: String, offset: usize },
}

impl MarkupError {
    /// Byte offset of the failure in the markup text.
    pub fn offset(&self) -> usize {
        match self {
            MarkupError::Unrecognized { offset }
            | MarkupError::MalformedTag { offset, .. }
            | MarkupError::UnexpectedClose { offset, .. }
            | MarkupError::Mismatched { offset, .. }
            | MarkupError::Unclosed { offset, .. } => *offset,
        }
    }
}

/// Failure anywhere in source → markup conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
