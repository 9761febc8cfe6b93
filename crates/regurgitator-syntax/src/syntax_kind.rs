//! SyntaxKind enum for all tokens and nodes in the Python CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the Python CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Trivia ===
    /// Horizontal whitespace (spaces, tabs, form feeds)
    WHITESPACE,
    /// Line ending inside brackets (implicit line joining)
    NL,
    /// `# ...` up to the end of the line
    COMMENT,
    /// Backslash followed by a line ending (explicit line joining)
    LINE_CONTINUATION,

    // === Tokens (lexer output) ===
    /// Logical line ending
    NEWLINE,
    /// Identifier
    NAME,
    /// Numeric literal of any base or form
    NUMBER,
    /// One string literal piece, prefix and quotes included
    STRING,

    AND_KW,
    OR_KW,
    NOT_KW,
    IN_KW,
    IS_KW,
    IF_KW,
    ELSE_KW,
    NONE_KW,
    TRUE_KW,
    FALSE_KW,
    PASS_KW,
    BREAK_KW,
    CONTINUE_KW,
    DEL_KW,
    RETURN_KW,
    /// Any other reserved word; none of them starts supported syntax
    RESERVED_KW,

    PLUS,
    MINUS,
    STAR,
    DOUBLE_STAR,
    SLASH,
    DOUBLE_SLASH,
    PERCENT,
    AT,
    LSHIFT,
    RSHIFT,
    AMP,
    PIPE,
    CARET,
    TILDE,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    EQ_EQ,
    NOT_EQ,
    EQ,

    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    AT_EQ,
    SLASH_EQ,
    DOUBLE_SLASH_EQ,
    PERCENT_EQ,
    DOUBLE_STAR_EQ,
    RSHIFT_EQ,
    LSHIFT_EQ,
    AMP_EQ,
    CARET_EQ,
    PIPE_EQ,

    LPAREN,
    RPAREN,
    LBRACKET,
    RBRACKET,
    LBRACE,
    RBRACE,
    COMMA,
    COLON,
    SEMICOLON,
    DOT,
    ELLIPSIS,

    /// Bytes the lexer could not classify
    ERROR_TOKEN,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root node
    MODULE,
    EXPR_STMT,
    ASSIGN_STMT,
    AUG_ASSIGN_STMT,
    PASS_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    DEL_STMT,
    RETURN_STMT,

    NAME_EXPR,
    NUMBER_LIT,
    /// One or more adjacent STRING tokens
    STRING_LIT,
    /// `None`, `True` or `False`
    CONST_EXPR,
    ELLIPSIS_EXPR,
    /// Redundant grouping parentheses around a single expression
    PAREN_EXPR,
    TUPLE_EXPR,
    LIST_EXPR,
    SET_EXPR,
    DICT_EXPR,
    BIN_EXPR,
    UNARY_EXPR,
    BOOL_EXPR,
    COMPARE_EXPR,
    IF_EXPR,
    CALL_EXPR,
    /// `name=value` or `**value` inside a call
    KEYWORD_ARG,
    STARRED_EXPR,
    ATTRIBUTE_EXPR,
    SUBSCRIPT_EXPR,
    SLICE_EXPR,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia the parser never sees.
    pub fn is_trivia(self) -> bool {
        (self as u16) <= (Self::LINE_CONTINUATION as u16)
    }

    /// Returns true for the augmented assignment operators (`+=`, `|=`, ...).
    pub fn is_aug_assign(self) -> bool {
        (Self::PLUS_EQ as u16..=Self::PIPE_EQ as u16).contains(&(self as u16))
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PythonLang {}

impl rowan::Language for PythonLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for concrete syntax tree nodes.
pub type CstNode = rowan::SyntaxNode<PythonLang>;
/// Type alias for concrete syntax tree tokens.
pub type CstToken = rowan::SyntaxToken<PythonLang>;
/// Type alias for concrete syntax tree elements (node or token).
pub type CstElement = rowan::SyntaxElement<PythonLang>;
