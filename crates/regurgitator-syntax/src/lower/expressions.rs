use rowan::SyntaxNodeChildren;

use crate::ast::{Constant, ExprContext, NodeKind, Operator, Separator, SyntaxNode};
use crate::error::SyntaxError;
use crate::span::Span;
use crate::syntax_kind::{CstNode, PythonLang, SyntaxKind};

use super::{separated, significant_tokens, span_of, unexpected};

/// A CST node whose child expressions are still being lowered.
struct Pending {
    node: CstNode,
    children: SyntaxNodeChildren<PythonLang>,
    lowered: Vec<SyntaxNode>,
}

impl Pending {
    fn new(node: CstNode) -> Self {
        Self {
            children: node.children(),
            node,
            lowered: Vec::new(),
        }
    }
}

/// Lower one expression node. Names and other target kinds come out in
/// `Load` context; assignment lowering rebinds them.
///
/// Children are lowered before their parent using an explicit stack, so a
/// long operator chain costs heap rather than call depth.
pub(super) fn expr(root: &CstNode) -> Result<SyntaxNode, SyntaxError> {
    let mut stack = vec![Pending::new(root.clone())];
    while let Some(top) = stack.last_mut() {
        if let Some(child) = top.children.next() {
            stack.push(Pending::new(child));
            continue;
        }
        let Some(done) = stack.pop() else { break };
        let lowered = build(&done.node, done.lowered)?;
        match stack.last_mut() {
            Some(parent) => parent.lowered.push(lowered),
            None => return Ok(lowered),
        }
    }
    Err(unexpected(root))
}

/// Build the AST node for `node` from its already lowered child expressions,
/// given in written order.
fn build(node: &CstNode, children: Vec<SyntaxNode>) -> Result<SyntaxNode, SyntaxError> {
    let span = span_of(node);
    let load = ExprContext::Load;

    let lowered = match node.kind() {
        SyntaxKind::NAME_EXPR => {
            let id = token_text(node, SyntaxKind::NAME)?;
            SyntaxNode::leaf(NodeKind::Name { id, ctx: load }, span)
        }
        SyntaxKind::NUMBER_LIT => SyntaxNode::leaf(NodeKind::Num, span),
        SyntaxKind::CONST_EXPR => {
            let constant = match significant_tokens(node).next().map(|t| t.kind()) {
                Some(SyntaxKind::NONE_KW) => Constant::None,
                Some(SyntaxKind::TRUE_KW) => Constant::True,
                Some(SyntaxKind::FALSE_KW) => Constant::False,
                _ => return Err(unexpected(node)),
            };
            SyntaxNode::leaf(NodeKind::NameConstant(constant), span)
        }
        SyntaxKind::ELLIPSIS_EXPR => SyntaxNode::leaf(NodeKind::Ellipsis, span),
        SyntaxKind::STRING_LIT => string(node)?,
        SyntaxKind::PAREN_EXPR => {
            let mut inner = single(node, children)?;
            inner.widen(span);
            inner
        }
        SyntaxKind::TUPLE_EXPR => SyntaxNode::parsed(
            NodeKind::Tuple { ctx: load },
            span,
            separated(children, Separator::Comma),
        ),
        SyntaxKind::LIST_EXPR => SyntaxNode::parsed(
            NodeKind::List { ctx: load },
            span,
            separated(children, Separator::Comma),
        ),
        SyntaxKind::SET_EXPR => {
            SyntaxNode::parsed(NodeKind::Set, span, separated(children, Separator::Comma))
        }
        SyntaxKind::DICT_EXPR => {
            SyntaxNode::parsed(NodeKind::Dict, span, dict_entries(node, children)?)
        }
        SyntaxKind::BIN_EXPR => binary(node, children)?,
        SyntaxKind::UNARY_EXPR => unary(node, children)?,
        SyntaxKind::BOOL_EXPR | SyntaxKind::COMPARE_EXPR => chain(node, children)?,
        // body, test, orelse - in written order
        SyntaxKind::IF_EXPR => SyntaxNode::parsed(NodeKind::IfExp, span, children),
        SyntaxKind::CALL_EXPR => {
            let mut parts = children.into_iter();
            let func = parts.next().ok_or_else(|| unexpected(node))?;
            let mut lowered = vec![func];
            lowered.extend(separated(parts.collect(), Separator::Comma));
            SyntaxNode::parsed(NodeKind::Call, span, lowered)
        }
        SyntaxKind::KEYWORD_ARG => {
            let arg = significant_tokens(node)
                .find(|t| t.kind() == SyntaxKind::NAME)
                .map(|t| t.text().to_string());
            let value = single(node, children)?;
            SyntaxNode::parsed(NodeKind::Keyword { arg }, span, vec![value])
        }
        SyntaxKind::STARRED_EXPR => {
            let value = single(node, children)?;
            SyntaxNode::parsed(NodeKind::Starred { ctx: load }, span, vec![value])
        }
        SyntaxKind::ATTRIBUTE_EXPR => {
            let attr = token_text(node, SyntaxKind::NAME)?;
            let value = single(node, children)?;
            SyntaxNode::parsed(NodeKind::Attribute { attr, ctx: load }, span, vec![value])
        }
        SyntaxKind::SUBSCRIPT_EXPR => {
            SyntaxNode::parsed(NodeKind::Subscript { ctx: load }, span, children)
        }
        SyntaxKind::SLICE_EXPR => SyntaxNode::parsed(NodeKind::Slice, span, children),
        _ => return Err(unexpected(node)),
    };

    Ok(lowered)
}

/// The one child expression of a wrapper node.
fn single(node: &CstNode, children: Vec<SyntaxNode>) -> Result<SyntaxNode, SyntaxError> {
    children.into_iter().next().ok_or_else(|| unexpected(node))
}

/// `k: v, k: v` as `k : v , k : v` with synthesized separators.
fn dict_entries(node: &CstNode, parts: Vec<SyntaxNode>) -> Result<Vec<SyntaxNode>, SyntaxError> {
    if parts.len() % 2 != 0 {
        return Err(unexpected(node));
    }

    let mut out = Vec::with_capacity(parts.len() * 2);
    let mut parts = parts.into_iter();
    while let (Some(key), Some(value)) = (parts.next(), parts.next()) {
        if !out.is_empty() {
            out.push(SyntaxNode::synthesized(NodeKind::Separator(Separator::Comma)));
        }
        out.push(key);
        out.push(SyntaxNode::synthesized(NodeKind::Separator(Separator::Colon)));
        out.push(value);
    }
    Ok(out)
}

fn binary(node: &CstNode, operands: Vec<SyntaxNode>) -> Result<SyntaxNode, SyntaxError> {
    let mut operands = operands.into_iter();
    let (Some(left), Some(right)) = (operands.next(), operands.next()) else {
        return Err(unexpected(node));
    };
    let op = significant_tokens(node)
        .find_map(|t| binary_operator(t.kind()))
        .ok_or_else(|| unexpected(node))?;

    Ok(SyntaxNode::parsed(
        NodeKind::BinOp,
        span_of(node),
        vec![left, SyntaxNode::synthesized(NodeKind::Operator(op)), right],
    ))
}

fn unary(node: &CstNode, operands: Vec<SyntaxNode>) -> Result<SyntaxNode, SyntaxError> {
    let op = match significant_tokens(node).next().map(|t| t.kind()) {
        Some(SyntaxKind::PLUS) => Operator::UAdd,
        Some(SyntaxKind::MINUS) => Operator::USub,
        Some(SyntaxKind::TILDE) => Operator::Invert,
        Some(SyntaxKind::NOT_KW) => Operator::Not,
        _ => return Err(unexpected(node)),
    };
    let operand = single(node, operands)?;

    Ok(SyntaxNode::parsed(
        NodeKind::UnaryOp,
        span_of(node),
        vec![SyntaxNode::synthesized(NodeKind::Operator(op)), operand],
    ))
}

/// `BoolOp` and `Compare`: operands with an operator between each pair.
fn chain(node: &CstNode, operands: Vec<SyntaxNode>) -> Result<SyntaxNode, SyntaxError> {
    let kind = match node.kind() {
        SyntaxKind::BOOL_EXPR => NodeKind::BoolOp,
        _ => NodeKind::Compare,
    };

    let mut ops = Vec::new();
    let mut tokens = significant_tokens(node).map(|t| t.kind()).peekable();
    while let Some(token) = tokens.next() {
        let op = match token {
            SyntaxKind::AND_KW => Operator::And,
            SyntaxKind::OR_KW => Operator::Or,
            SyntaxKind::EQ_EQ => Operator::Eq,
            SyntaxKind::NOT_EQ => Operator::NotEq,
            SyntaxKind::LT => Operator::Lt,
            SyntaxKind::LT_EQ => Operator::LtE,
            SyntaxKind::GT => Operator::Gt,
            SyntaxKind::GT_EQ => Operator::GtE,
            SyntaxKind::IN_KW => Operator::In,
            SyntaxKind::NOT_KW => {
                tokens.next_if_eq(&SyntaxKind::IN_KW);
                Operator::NotIn
            }
            SyntaxKind::IS_KW => {
                if tokens.next_if_eq(&SyntaxKind::NOT_KW).is_some() {
                    Operator::IsNot
                } else {
                    Operator::Is
                }
            }
            _ => return Err(unexpected(node)),
        };
        ops.push(op);
    }

    if operands.len() != ops.len() + 1 {
        return Err(unexpected(node));
    }

    let mut children = Vec::with_capacity(operands.len() * 2);
    let mut ops = ops.into_iter();
    for operand in operands {
        if !children.is_empty()
            && let Some(op) = ops.next()
        {
            children.push(SyntaxNode::synthesized(NodeKind::Operator(op)));
        }
        children.push(operand);
    }

    Ok(SyntaxNode::parsed(kind, span_of(node), children))
}

/// The operator category of a binary or augmented-assignment token.
pub(super) fn binary_operator(kind: SyntaxKind) -> Option<Operator> {
    let op = match kind {
        SyntaxKind::PLUS | SyntaxKind::PLUS_EQ => Operator::Add,
        SyntaxKind::MINUS | SyntaxKind::MINUS_EQ => Operator::Sub,
        SyntaxKind::STAR | SyntaxKind::STAR_EQ => Operator::Mult,
        SyntaxKind::AT | SyntaxKind::AT_EQ => Operator::MatMult,
        SyntaxKind::SLASH | SyntaxKind::SLASH_EQ => Operator::Div,
        SyntaxKind::DOUBLE_SLASH | SyntaxKind::DOUBLE_SLASH_EQ => Operator::FloorDiv,
        SyntaxKind::PERCENT | SyntaxKind::PERCENT_EQ => Operator::Mod,
        SyntaxKind::DOUBLE_STAR | SyntaxKind::DOUBLE_STAR_EQ => Operator::Pow,
        SyntaxKind::LSHIFT | SyntaxKind::LSHIFT_EQ => Operator::LShift,
        SyntaxKind::RSHIFT | SyntaxKind::RSHIFT_EQ => Operator::RShift,
        SyntaxKind::AMP | SyntaxKind::AMP_EQ => Operator::BitAnd,
        SyntaxKind::PIPE | SyntaxKind::PIPE_EQ => Operator::BitOr,
        SyntaxKind::CARET | SyntaxKind::CARET_EQ => Operator::BitXor,
        _ => return None,
    };
    Some(op)
}

/// Implicitly concatenated string pieces.
///
/// Any `f` prefix makes the whole literal a `JoinedStr`; bytes pieces may only
/// be concatenated with other bytes pieces.
fn string(node: &CstNode) -> Result<SyntaxNode, SyntaxError> {
    let span = span_of(node);
    let mut pieces = Vec::new();
    let (mut bytes, mut text, mut formatted) = (false, false, false);

    for token in significant_tokens(node) {
        let prefix = string_prefix(token.text());
        if prefix.contains(['b', 'B']) {
            bytes = true;
        } else {
            text = true;
        }
        formatted |= prefix.contains(['f', 'F']);
        pieces.push(Span::from(token.text_range()));
    }

    let kind = match (bytes, text) {
        (true, true) => return Err(SyntaxError::MixedLiterals { span }),
        (true, false) => NodeKind::Bytes,
        _ if formatted => NodeKind::JoinedStr,
        _ => NodeKind::Str,
    };
    Ok(SyntaxNode::literal(kind, span, pieces))
}

fn string_prefix(piece: &str) -> &str {
    let quote = piece.find(['\'', '"']).unwrap_or(0);
    &piece[..quote]
}

fn token_text(node: &CstNode, kind: SyntaxKind) -> Result<String, SyntaxError> {
    significant_tokens(node)
        .filter(|t| t.kind() == kind)
        .last()
        .map(|t| t.text().to_string())
        .ok_or_else(|| unexpected(node))
}
