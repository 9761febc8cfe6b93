use thiserror::Error;

use crate::span::Span;

/// Why source text could not be turned into a [`SyntaxNode`](crate::SyntaxNode) tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("syntax error at byte {offset}: {message}")]
    Parse { message: String, offset: usize },

    #[error("cannot {action} {what} at {span}")]
    InvalidTarget {
        action: &'static str,
        what: &'static str,
        span: Span,
    },

    #[error("cannot mix bytes and non-bytes literals at {span}")]
    MixedLiterals { span: Span },

    /// A tree shape the lowering pass does not recognise. Only reachable when
    /// the parser and the lowering disagree.
    #[error("unexpected {kind} at {span}")]
    Unexpected { kind: String, span: Span },
}
