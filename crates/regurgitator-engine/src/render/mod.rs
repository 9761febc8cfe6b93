//! # Span-filling renderer
//!
//! Walks the AST and the source text in lockstep. A single forward-only
//! cursor hands out source text; every node is rendered as
//!
//! ```text
//! <open> gap child gap child ... gap </close>
//! ```
//!
//! where each gap is the text from the cursor up to the next child's span
//! start (or the node's span end). Because the cursor only moves forward and
//! every node ends with a gap up to its own span end, each byte of the source
//! is emitted exactly once, in order.
//!
//! ## Synthesized children
//!
//! Operators and separators have no span of their own. A synthesized child
//! spans from the outer end of its previous sibling (or the parent's start)
//! to the outer start of its next sibling (or the parent's end), so
//! `1 + 2` gives the `Add` element the text `" + "`. Parentheses around a
//! sibling are part of that sibling's outer extent and stay as gap text.
//!
//! Whether a synthesized child becomes an element at all is decided by the
//! [`SeparatorTable`]; a skipped child's text simply stays in the gap.
//!
//! The walk keeps its own stack of open nodes, so nesting depth is bounded by
//! memory rather than by the thread's stack.

mod pieces;

use log::{debug, trace};
use regurgitator_syntax::{Content, NodeKind, NodeSpan, Span, SyntaxNode};

use crate::error::RenderError;
use crate::mapper;
use crate::markup::{MarkupEvent, MarkupSink};
use crate::separators::{Placement, SeparatorTable};
use crate::source::{Cursor, SourceText};

/// A node whose start has been emitted but whose children are not all done.
struct Frame<'a> {
    node: &'a SyntaxNode,
    span: Span,
    pending: std::vec::IntoIter<(&'a SyntaxNode, Span)>,
    wrapped: bool,
}

pub struct Renderer<'a, 's, S> {
    source: SourceText<'a>,
    cursor: Cursor<'a>,
    separators: &'s SeparatorTable,
    sink: &'s mut S,
}

impl<'a, 's, S: MarkupSink<'a>> Renderer<'a, 's, S> {
    pub fn new(source: &'a str, separators: &'s SeparatorTable, sink: &'s mut S) -> Self {
        let source = SourceText::new(source);
        Self {
            source,
            cursor: source.cursor(),
            separators,
            sink,
        }
    }

    /// Render a whole tree. The root must span the entire source.
    ///
    /// With `wrap_root` unset the root's own tags are left out and the output
    /// is a sequence of top-level elements and text.
    pub fn render_root(mut self, root: &'a SyntaxNode, wrap_root: bool) -> Result<(), RenderError> {
        let kind = root.kind.label();
        let NodeSpan::Parsed { span, .. } = root.span else {
            return Err(RenderError::SynthesizedRoot { kind });
        };
        if span != self.source.span() {
            return Err(RenderError::RootSpan {
                kind,
                span,
                len: self.source.len(),
            });
        }

        debug!("rendering {kind} over {} bytes", self.source.len());
        let mut stack = vec![self.enter(root, span, wrap_root)?];
        while let Some(frame) = stack.last_mut() {
            match frame.pending.next() {
                Some((child, child_span)) => {
                    if child.is_synthesized()
                        && self.separators.placement(&child.kind) == Placement::Gap
                    {
                        continue;
                    }
                    self.gap_to(child_span.start, &child.kind, child_span)?;
                    let child_frame = self.enter(child, child_span, true)?;
                    stack.push(child_frame);
                }
                None => {
                    if let Some(done) = stack.pop() {
                        self.leave(done)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Open a node: its start tag (when `wrapped`), then its pieces or the
    /// laid-out children still to visit.
    fn enter(
        &mut self,
        node: &'a SyntaxNode,
        span: Span,
        wrapped: bool,
    ) -> Result<Frame<'a>, RenderError> {
        if wrapped {
            trace!("{} at {span}", node.kind);
            self.sink.event(MarkupEvent::Open {
                name: mapper::element_name(&node.kind),
                attributes: mapper::attributes(&node.kind),
            })?;
        }
        let pending = match &node.content {
            Content::Pieces(pieces) => {
                pieces::render(self, &node.kind, span, pieces)?;
                Vec::new()
            }
            Content::Children(children) => layout(&node.kind, span, children)?,
        };
        Ok(Frame {
            node,
            span,
            pending: pending.into_iter(),
            wrapped,
        })
    }

    /// The trailing gap up to the node's span end, then its end tag.
    fn leave(&mut self, frame: Frame<'a>) -> Result<(), RenderError> {
        self.gap_to(frame.span.end, &frame.node.kind, frame.span)?;
        if frame.wrapped {
            self.sink.event(MarkupEvent::Close {
                name: mapper::element_name(&frame.node.kind),
            })?;
        }
        Ok(())
    }

    /// Emit source text from the cursor up to `end`.
    fn gap_to(&mut self, end: usize, kind: &NodeKind, span: Span) -> Result<(), RenderError> {
        let text = self.advance(end, kind, span)?;
        if !text.is_empty() {
            self.sink.event(MarkupEvent::Text(text))?;
        }
        Ok(())
    }

    fn advance(&mut self, end: usize, kind: &NodeKind, span: Span) -> Result<&'a str, RenderError> {
        self.cursor
            .advance_to(end)
            .map_err(|source| RenderError::Cursor {
                kind: kind.label(),
                span,
                source,
            })
    }
}

/// Resolve every child's span and check that the children fit their parent:
/// inside its span, in order and without overlapping.
fn layout<'n>(
    parent: &NodeKind,
    parent_span: Span,
    children: &'n [SyntaxNode],
) -> Result<Vec<(&'n SyntaxNode, Span)>, RenderError> {
    let mut placed = Vec::with_capacity(children.len());
    let mut previous_end = parent_span.start;

    for (i, child) in children.iter().enumerate() {
        let kind = child.kind.label();
        let (span, outer) = match child.span {
            NodeSpan::Parsed { span, outer } => (span, outer),
            NodeSpan::Synthesized => {
                let adjacent = || RenderError::AdjacentSynthesized {
                    kind,
                    parent: parent.label(),
                    parent_span,
                };
                let start = match i.checked_sub(1).map(|j| &children[j]) {
                    None => parent_span.start,
                    Some(previous) => previous.outer().ok_or_else(adjacent)?.end,
                };
                let end = match children.get(i + 1) {
                    None => parent_span.end,
                    Some(next) => next.outer().ok_or_else(adjacent)?.start,
                };
                let span = Span::new(start, end);
                (span, span)
            }
        };

        if span.start > span.end || outer.start > outer.end {
            return Err(RenderError::Inverted { kind, span });
        }
        if !outer.contains(span) || !parent_span.contains(outer) {
            return Err(RenderError::OutOfBounds {
                kind,
                span: outer,
                parent: parent.label(),
                parent_span,
            });
        }
        if outer.start < previous_end {
            return Err(RenderError::Overlap {
                kind,
                span: outer,
                previous_end,
            });
        }

        previous_end = outer.end;
        placed.push((child, span));
    }

    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupDocument;
    use crate::source::CursorError;
    use pretty_assertions::assert_eq;
    use regurgitator_syntax::{Operator, Separator};

    fn num(start: usize, end: usize) -> SyntaxNode {
        SyntaxNode::leaf(NodeKind::Num, Span::new(start, end))
    }

    fn op() -> SyntaxNode {
        SyntaxNode::synthesized(NodeKind::Operator(Operator::Add))
    }

    fn module(source: &str, children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::parsed(NodeKind::Module, Span::new(0, source.len()), children)
    }

    fn render_with(
        source: &str,
        tree: &SyntaxNode,
        table: &SeparatorTable,
    ) -> Result<String, RenderError> {
        let mut doc = MarkupDocument::new();
        Renderer::new(source, table, &mut doc).render_root(tree, true)?;
        Ok(doc.to_markup()?)
    }

    fn render(source: &str, tree: &SyntaxNode) -> Result<String, RenderError> {
        render_with(source, tree, &SeparatorTable::default())
    }

    #[test]
    fn operator_absorbs_surrounding_whitespace() {
        let source = "1 + 2";
        let tree = module(
            source,
            vec![SyntaxNode::parsed(
                NodeKind::BinOp,
                Span::new(0, 5),
                vec![num(0, 1), op(), num(4, 5)],
            )],
        );
        assert_eq!(
            render(source, &tree).unwrap(),
            "<Module><BinOp><Num>1</Num><Add> + </Add><Num>2</Num></BinOp></Module>"
        );
    }

    #[test]
    fn gap_placement_leaves_text_in_parent() {
        let source = "(1,2)";
        let tuple = SyntaxNode::parsed(
            NodeKind::Tuple {
                ctx: regurgitator_syntax::ExprContext::Load,
            },
            Span::new(0, 5),
            vec![
                num(1, 2),
                SyntaxNode::synthesized(NodeKind::Separator(Separator::Comma)),
                num(3, 4),
            ],
        );
        let tree = module(source, vec![tuple]);

        assert_eq!(
            render(source, &tree).unwrap(),
            r#"<Module><Tuple ctx="Load">(<Num>1</Num>,<Num>2</Num>)</Tuple></Module>"#
        );
        assert_eq!(
            render_with(source, &tree, &SeparatorTable::uniform(Placement::Wrap)).unwrap(),
            r#"<Module><Tuple ctx="Load">(<Num>1</Num><comma>,</comma><Num>2</Num>)</Tuple></Module>"#
        );
    }

    #[test]
    fn root_may_be_left_unwrapped() {
        let source = "6\n7";
        let tree = module(
            source,
            vec![
                SyntaxNode::parsed(NodeKind::Expr, Span::new(0, 1), vec![num(0, 1)]),
                SyntaxNode::parsed(NodeKind::Expr, Span::new(2, 3), vec![num(2, 3)]),
            ],
        );
        let mut doc = MarkupDocument::new();
        Renderer::new(source, &SeparatorTable::default(), &mut doc)
            .render_root(&tree, false)
            .unwrap();
        assert_eq!(
            doc.to_markup().unwrap(),
            "<Expr><Num>6</Num></Expr>\n<Expr><Num>7</Num></Expr>"
        );
    }

    #[test]
    fn child_outside_parent_is_fatal() {
        let source = "1 + 2";
        let tree = module(
            source,
            vec![SyntaxNode::parsed(
                NodeKind::Expr,
                Span::new(0, 3),
                vec![num(2, 5)],
            )],
        );
        assert_eq!(
            render(source, &tree),
            Err(RenderError::OutOfBounds {
                kind: "Num",
                span: Span::new(2, 5),
                parent: "Expr",
                parent_span: Span::new(0, 3),
            })
        );
    }

    #[test]
    fn overlapping_children_are_fatal() {
        let source = "12345";
        let tree = module(source, vec![num(0, 3), num(2, 5)]);
        assert_eq!(
            render(source, &tree),
            Err(RenderError::Overlap {
                kind: "Num",
                span: Span::new(2, 5),
                previous_end: 3,
            })
        );
    }

    #[test]
    fn unordered_children_are_fatal() {
        let source = "1 2";
        let tree = module(source, vec![num(2, 3), num(0, 1)]);
        assert!(matches!(
            render(source, &tree),
            Err(RenderError::Overlap { previous_end: 3, .. })
        ));
    }

    #[test]
    fn inverted_span_is_fatal() {
        let source = "123";
        let tree = module(source, vec![num(2, 1)]);
        assert_eq!(
            render(source, &tree),
            Err(RenderError::Inverted {
                kind: "Num",
                span: Span::new(2, 1),
            })
        );
    }

    #[test]
    fn adjacent_synthesized_children_are_fatal() {
        let source = "1 2";
        let tree = module(
            source,
            vec![SyntaxNode::parsed(
                NodeKind::BinOp,
                Span::new(0, 3),
                vec![num(0, 1), op(), op(), num(2, 3)],
            )],
        );
        assert!(matches!(
            render(source, &tree),
            Err(RenderError::AdjacentSynthesized { kind: "Add", .. })
        ));
    }

    #[test]
    fn root_must_cover_the_source() {
        let tree = SyntaxNode::leaf(NodeKind::Module, Span::new(0, 2));
        assert_eq!(
            render("abc", &tree),
            Err(RenderError::RootSpan {
                kind: "Module",
                span: Span::new(0, 2),
                len: 3,
            })
        );
    }

    #[test]
    fn synthesized_root_is_fatal() {
        let tree = op();
        assert_eq!(
            render("", &tree),
            Err(RenderError::SynthesizedRoot { kind: "Add" })
        );
    }

    #[test]
    fn span_inside_a_character_is_fatal() {
        let source = "é";
        let tree = module(source, vec![num(0, 1)]);
        assert_eq!(
            render(source, &tree),
            Err(RenderError::Cursor {
                kind: "Num",
                span: Span::new(0, 1),
                source: CursorError::CharBoundary { at: 1 },
            })
        );
    }
}
