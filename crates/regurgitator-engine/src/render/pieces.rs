//! Literals written as several adjacent pieces.
//!
//! Each piece becomes its own leaf element; whatever separates two pieces
//! (spaces, a backslash-newline) stays as text between them.

use regurgitator_syntax::{NodeKind, Span};

use super::Renderer;
use crate::error::RenderError;
use crate::mapper::PIECE_ELEMENT;
use crate::markup::{MarkupEvent, MarkupSink};

pub(super) fn render<'a, S: MarkupSink<'a>>(
    renderer: &mut Renderer<'a, '_, S>,
    parent: &NodeKind,
    parent_span: Span,
    pieces: &[Span],
) -> Result<(), RenderError> {
    let mut previous_end = parent_span.start;

    for &piece in pieces {
        if piece.start > piece.end {
            return Err(RenderError::Inverted {
                kind: PIECE_ELEMENT,
                span: piece,
            });
        }
        if !parent_span.contains(piece) {
            return Err(RenderError::OutOfBounds {
                kind: PIECE_ELEMENT,
                span: piece,
                parent: parent.label(),
                parent_span,
            });
        }
        if piece.start < previous_end {
            return Err(RenderError::Overlap {
                kind: PIECE_ELEMENT,
                span: piece,
                previous_end,
            });
        }
        previous_end = piece.end;

        renderer.gap_to(piece.start, parent, parent_span)?;
        renderer.sink.event(MarkupEvent::Open {
            name: PIECE_ELEMENT,
            attributes: Vec::new(),
        })?;
        let text = renderer.advance(piece.end, parent, piece)?;
        if !text.is_empty() {
            renderer.sink.event(MarkupEvent::Text(text))?;
        }
        renderer.sink.event(MarkupEvent::Close {
            name: PIECE_ELEMENT,
        })?;
    }

    Ok(())
}
