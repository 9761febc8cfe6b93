//! # Lowering - CST to span-carrying AST
//!
//! The Rowan tree knows every token; the [`SyntaxNode`] tree knows only what
//! the language's AST knows, plus spans. Lowering drops tokens, unwraps
//! grouping parentheses into each node's *outer* extent and inserts
//! synthesized operator and separator nodes where the AST has a field but the
//! CST has only a token:
//!
//! ```text
//! BIN_EXPR "1 + 2"            BinOp 0..5
//!   NUMBER_LIT "1"      →       Num 0..1
//!   PLUS "+"                    Add (synthesized)
//!   NUMBER_LIT "2"              Num 4..5
//! ```

mod expressions;
mod targets;

use crate::ast::{NodeKind, Separator, SyntaxNode};
use crate::error::SyntaxError;
use crate::span::Span;
use crate::syntax_kind::{CstNode, CstToken, SyntaxKind};

use targets::Binding;

/// Lower a parsed MODULE into the AST. The tree must be free of parse errors.
pub fn module(root: &CstNode) -> Result<SyntaxNode, SyntaxError> {
    let statements = root
        .children()
        .map(|stmt| statement(&stmt))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SyntaxNode::parsed(NodeKind::Module, span_of(root), statements))
}

fn statement(node: &CstNode) -> Result<SyntaxNode, SyntaxError> {
    let span = span_of(node);
    match node.kind() {
        SyntaxKind::EXPR_STMT => {
            let value = expressions::expr(&first_child(node)?)?;
            Ok(SyntaxNode::parsed(NodeKind::Expr, span, vec![value]))
        }
        SyntaxKind::ASSIGN_STMT => assignment(node),
        SyntaxKind::AUG_ASSIGN_STMT => augmented_assignment(node),
        SyntaxKind::PASS_STMT => Ok(SyntaxNode::leaf(NodeKind::Pass, span)),
        SyntaxKind::BREAK_STMT => Ok(SyntaxNode::leaf(NodeKind::Break, span)),
        SyntaxKind::CONTINUE_STMT => Ok(SyntaxNode::leaf(NodeKind::Continue, span)),
        SyntaxKind::DEL_STMT => deletion(node),
        SyntaxKind::RETURN_STMT => {
            let value = node
                .children()
                .next()
                .map(|value| expressions::expr(&value))
                .transpose()?;
            Ok(SyntaxNode::parsed(
                NodeKind::Return,
                span,
                value.into_iter().collect(),
            ))
        }
        _ => Err(unexpected(node)),
    }
}

/// `t1 = t2 = value` lowers to `Assign[targets[t1, =, t2], =, value]`.
fn assignment(node: &CstNode) -> Result<SyntaxNode, SyntaxError> {
    let parts: Vec<CstNode> = node.children().collect();
    let Some((value, written_targets)) = parts.split_last() else {
        return Err(unexpected(node));
    };

    let mut targets = Vec::with_capacity(written_targets.len() * 2);
    for (i, target) in written_targets.iter().enumerate() {
        if i > 0 {
            targets.push(SyntaxNode::synthesized(NodeKind::Separator(
                Separator::Equals,
            )));
        }
        targets.push(targets::bind(
            expressions::expr(target)?,
            Binding::Assign,
        )?);
    }

    let targets_span = extent(&targets).ok_or_else(|| unexpected(node))?;
    Ok(SyntaxNode::parsed(
        NodeKind::Assign,
        span_of(node),
        vec![
            SyntaxNode::parsed(NodeKind::Targets, targets_span, targets),
            SyntaxNode::synthesized(NodeKind::Separator(Separator::Equals)),
            expressions::expr(value)?,
        ],
    ))
}

fn augmented_assignment(node: &CstNode) -> Result<SyntaxNode, SyntaxError> {
    let mut parts = node.children();
    let (Some(target), Some(value)) = (parts.next(), parts.next()) else {
        return Err(unexpected(node));
    };
    let op = significant_tokens(node)
        .find_map(|t| expressions::binary_operator(t.kind()))
        .ok_or_else(|| unexpected(node))?;

    Ok(SyntaxNode::parsed(
        NodeKind::AugAssign,
        span_of(node),
        vec![
            targets::bind(expressions::expr(&target)?, Binding::AugAssign)?,
            SyntaxNode::synthesized(NodeKind::Operator(op)),
            expressions::expr(&value)?,
        ],
    ))
}

/// `del a, b` lists its targets directly rather than deleting a tuple.
fn deletion(node: &CstNode) -> Result<SyntaxNode, SyntaxError> {
    let written = first_child(node)?;
    let items: Vec<CstNode> = if is_bare_tuple(&written) {
        written.children().collect()
    } else {
        vec![written.clone()]
    };

    let lowered = items
        .iter()
        .map(|item| targets::bind(expressions::expr(item)?, Binding::Delete))
        .collect::<Result<Vec<_>, _>>()?;
    let targets = separated(lowered, Separator::Comma);

    Ok(SyntaxNode::parsed(
        NodeKind::Delete,
        span_of(node),
        vec![SyntaxNode::parsed(
            NodeKind::Targets,
            span_of(&written),
            targets,
        )],
    ))
}

/// Interleave synthesized separators between consecutive nodes.
fn separated(nodes: Vec<SyntaxNode>, separator: Separator) -> Vec<SyntaxNode> {
    let mut out = Vec::with_capacity(nodes.len() * 2);
    for (i, node) in nodes.into_iter().enumerate() {
        if i > 0 {
            out.push(SyntaxNode::synthesized(NodeKind::Separator(separator)));
        }
        out.push(node);
    }
    out
}

/// The span covering the outer extents of all parsed nodes.
fn extent(nodes: &[SyntaxNode]) -> Option<Span> {
    nodes
        .iter()
        .filter_map(SyntaxNode::outer)
        .reduce(Span::cover)
}

fn is_bare_tuple(node: &CstNode) -> bool {
    node.kind() == SyntaxKind::TUPLE_EXPR
        && significant_tokens(node)
            .next()
            .is_none_or(|t| t.kind() != SyntaxKind::LPAREN)
}

fn span_of(node: &CstNode) -> Span {
    node.text_range().into()
}

fn first_child(node: &CstNode) -> Result<CstNode, SyntaxError> {
    node.children().next().ok_or_else(|| unexpected(node))
}

/// Direct child tokens of a node, trivia excluded.
fn significant_tokens(node: &CstNode) -> impl Iterator<Item = CstToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
}

fn unexpected(node: &CstNode) -> SyntaxError {
    SyntaxError::Unexpected {
        kind: format!("{:?}", node.kind()),
        span: span_of(node),
    }
}
