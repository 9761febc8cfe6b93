//! The span-carrying abstract syntax tree handed to the renderer.
//!
//! Every node records *where* it was written rather than *what* was written:
//! names, operators and contexts are semantic fields on [`NodeKind`], while the
//! exact text (spacing, comments, parentheses, punctuation) is recovered from
//! the source through [`Span`]s.

use std::fmt;

use crate::span::Span;

/// Binding context of a name-like expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprContext {
    Load,
    Store,
    Del,
}

impl ExprContext {
    pub fn as_str(self) -> &'static str {
        match self {
            ExprContext::Load => "Load",
            ExprContext::Store => "Store",
            ExprContext::Del => "Del",
        }
    }
}

/// The three singleton constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    None,
    True,
    False,
}

impl Constant {
    pub fn as_str(self) -> &'static str {
        match self {
            Constant::None => "None",
            Constant::True => "True",
            Constant::False => "False",
        }
    }
}

/// Operator categories, named after the language's own AST classes.
///
/// The category is independent of spelling and spacing: `+`, `+=` and
/// `  +  ` are all [`Operator::Add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // binary
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
    // unary
    Invert,
    Not,
    UAdd,
    USub,
    // boolean
    And,
    Or,
    // comparison
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "Add",
            Operator::Sub => "Sub",
            Operator::Mult => "Mult",
            Operator::MatMult => "MatMult",
            Operator::Div => "Div",
            Operator::Mod => "Mod",
            Operator::Pow => "Pow",
            Operator::LShift => "LShift",
            Operator::RShift => "RShift",
            Operator::BitOr => "BitOr",
            Operator::BitXor => "BitXor",
            Operator::BitAnd => "BitAnd",
            Operator::FloorDiv => "FloorDiv",
            Operator::Invert => "Invert",
            Operator::Not => "Not",
            Operator::UAdd => "UAdd",
            Operator::USub => "USub",
            Operator::And => "And",
            Operator::Or => "Or",
            Operator::Eq => "Eq",
            Operator::NotEq => "NotEq",
            Operator::Lt => "Lt",
            Operator::LtE => "LtE",
            Operator::Gt => "Gt",
            Operator::GtE => "GtE",
            Operator::Is => "Is",
            Operator::IsNot => "IsNot",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
        }
    }
}

/// Punctuation that separates siblings but has no node of its own in the
/// language's AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `=` between assignment targets and before the value
    Equals,
    /// `,` between elements and arguments
    Comma,
    /// `:` between a dict key and its value
    Colon,
}

/// What a node is, together with its semantic fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module,

    // statements
    Expr,
    Assign,
    AugAssign,
    Pass,
    Break,
    Continue,
    Delete,
    Return,
    /// Field wrapper around the targets of `Assign` and `Delete`
    Targets,

    // literals
    Num,
    Str,
    Bytes,
    JoinedStr,
    NameConstant(Constant),
    Ellipsis,

    // expressions
    Name { id: String, ctx: ExprContext },
    Tuple { ctx: ExprContext },
    List { ctx: ExprContext },
    Set,
    Dict,
    Starred { ctx: ExprContext },
    BinOp,
    UnaryOp,
    BoolOp,
    Compare,
    IfExp,
    Call,
    Keyword { arg: Option<String> },
    Attribute { attr: String, ctx: ExprContext },
    Subscript { ctx: ExprContext },
    Slice,

    // synthesized
    Operator(Operator),
    Separator(Separator),
}

impl NodeKind {
    /// Short name used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::Expr => "Expr",
            NodeKind::Assign => "Assign",
            NodeKind::AugAssign => "AugAssign",
            NodeKind::Pass => "Pass",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::Delete => "Delete",
            NodeKind::Return => "Return",
            NodeKind::Targets => "targets",
            NodeKind::Num => "Num",
            NodeKind::Str => "Str",
            NodeKind::Bytes => "Bytes",
            NodeKind::JoinedStr => "JoinedStr",
            NodeKind::NameConstant(_) => "NameConstant",
            NodeKind::Ellipsis => "Ellipsis",
            NodeKind::Name { .. } => "Name",
            NodeKind::Tuple { .. } => "Tuple",
            NodeKind::List { .. } => "List",
            NodeKind::Set => "Set",
            NodeKind::Dict => "Dict",
            NodeKind::Starred { .. } => "Starred",
            NodeKind::BinOp => "BinOp",
            NodeKind::UnaryOp => "UnaryOp",
            NodeKind::BoolOp => "BoolOp",
            NodeKind::Compare => "Compare",
            NodeKind::IfExp => "IfExp",
            NodeKind::Call => "Call",
            NodeKind::Keyword { .. } => "keyword",
            NodeKind::Attribute { .. } => "Attribute",
            NodeKind::Subscript { .. } => "Subscript",
            NodeKind::Slice => "Slice",
            NodeKind::Operator(op) => op.name(),
            NodeKind::Separator(Separator::Equals) => "=",
            NodeKind::Separator(Separator::Comma) => ",",
            NodeKind::Separator(Separator::Colon) => ":",
        }
    }

    /// Binding context, for the kinds that carry one.
    pub fn context(&self) -> Option<ExprContext> {
        match self {
            NodeKind::Name { ctx, .. }
            | NodeKind::Tuple { ctx }
            | NodeKind::List { ctx }
            | NodeKind::Starred { ctx }
            | NodeKind::Attribute { ctx, .. }
            | NodeKind::Subscript { ctx } => Some(*ctx),
            _ => None,
        }
    }

    /// Replace the binding context. Returns false for kinds without one.
    pub fn set_context(&mut self, new: ExprContext) -> bool {
        match self {
            NodeKind::Name { ctx, .. }
            | NodeKind::Tuple { ctx }
            | NodeKind::List { ctx }
            | NodeKind::Starred { ctx }
            | NodeKind::Attribute { ctx, .. }
            | NodeKind::Subscript { ctx } => {
                *ctx = new;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a node sits in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSpan {
    /// Position taken from the parse tree.
    ///
    /// `outer` is `span` widened by any redundant grouping parentheses written
    /// around the node; sibling gaps are measured against it.
    Parsed { span: Span, outer: Span },
    /// No token position of its own; derived from the neighbouring siblings
    /// while rendering.
    Synthesized,
}

/// A node's children, or the pieces of a multi-piece literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Children(Vec<SyntaxNode>),
    /// Sub-spans of each implicitly concatenated literal piece, in order.
    Pieces(Vec<Span>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: NodeSpan,
    pub content: Content,
}

impl SyntaxNode {
    /// A parsed node whose outer extent equals its span.
    pub fn parsed(kind: NodeKind, span: Span, children: Vec<SyntaxNode>) -> Self {
        SyntaxNode {
            kind,
            span: NodeSpan::Parsed { span, outer: span },
            content: Content::Children(children),
        }
    }

    pub fn literal(kind: NodeKind, span: Span, pieces: Vec<Span>) -> Self {
        SyntaxNode {
            kind,
            span: NodeSpan::Parsed { span, outer: span },
            content: Content::Pieces(pieces),
        }
    }

    pub fn leaf(kind: NodeKind, span: Span) -> Self {
        Self::parsed(kind, span, Vec::new())
    }

    pub fn synthesized(kind: NodeKind) -> Self {
        SyntaxNode {
            kind,
            span: NodeSpan::Synthesized,
            content: Content::Children(Vec::new()),
        }
    }

    /// The node's own span, if it was parsed.
    pub fn span(&self) -> Option<Span> {
        match self.span {
            NodeSpan::Parsed { span, .. } => Some(span),
            NodeSpan::Synthesized => None,
        }
    }

    /// The span including grouping parentheses, if it was parsed.
    pub fn outer(&self) -> Option<Span> {
        match self.span {
            NodeSpan::Parsed { outer, .. } => Some(outer),
            NodeSpan::Synthesized => None,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self.span, NodeSpan::Synthesized)
    }

    /// Record grouping parentheses around this node.
    pub fn widen(&mut self, parens: Span) {
        if let NodeSpan::Parsed { outer, .. } = &mut self.span {
            *outer = outer.cover(parens);
        }
    }

    pub fn children(&self) -> &[SyntaxNode] {
        match &self.content {
            Content::Children(children) => children,
            Content::Pieces(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [SyntaxNode] {
        match &mut self.content {
            Content::Children(children) => children,
            Content::Pieces(_) => &mut [],
        }
    }

    pub fn pieces(&self) -> &[Span] {
        match &self.content {
            Content::Pieces(pieces) => pieces,
            Content::Children(_) => &[],
        }
    }

    /// Pre-order walk over this node and all its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &SyntaxNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}
