use crate::ast::{ExprContext, NodeKind, SyntaxNode};
use crate::error::SyntaxError;
use crate::span::Span;

/// What a target is being bound by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Binding {
    Assign,
    AugAssign,
    Delete,
}

impl Binding {
    fn context(self) -> ExprContext {
        match self {
            Binding::Assign | Binding::AugAssign => ExprContext::Store,
            Binding::Delete => ExprContext::Del,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Binding::Assign => "assign to",
            Binding::AugAssign => "augmented-assign to",
            Binding::Delete => "delete",
        }
    }
}

/// Check that `node` may be bound and switch it (and any nested targets) to
/// the binding's context.
pub(super) fn bind(mut node: SyntaxNode, binding: Binding) -> Result<SyntaxNode, SyntaxError> {
    bind_in_place(&mut node, binding)?;
    Ok(node)
}

fn bind_in_place(node: &mut SyntaxNode, binding: Binding) -> Result<(), SyntaxError> {
    let nested = match node.kind {
        NodeKind::Name { .. } | NodeKind::Attribute { .. } | NodeKind::Subscript { .. } => false,
        NodeKind::Tuple { .. } | NodeKind::List { .. } if binding != Binding::AugAssign => true,
        NodeKind::Starred { .. } if binding == Binding::Assign => true,
        _ => {
            return Err(SyntaxError::InvalidTarget {
                action: binding.verb(),
                what: node.kind.label(),
                span: node.outer().unwrap_or(Span::new(0, 0)),
            });
        }
    };

    node.kind.set_context(binding.context());
    if nested {
        for child in node.children_mut() {
            if !matches!(child.kind, NodeKind::Separator(_)) {
                bind_in_place(child, binding)?;
            }
        }
    }
    Ok(())
}
