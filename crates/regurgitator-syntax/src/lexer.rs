//! # Lexer - Tokenizing Python Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token**. Whitespace,
//! comments and backslash continuations are kept as trivia tokens and bytes
//! the lexer cannot classify become `ERROR_TOKEN`:
//!
//! ```
//! use regurgitator_syntax::lexer::lex;
//!
//! let input = "x = (1,  # one\n     2)\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Logical and Physical Lines
//!
//! Python ends a statement at a line ending unless the line ending sits inside
//! brackets. Logos has no notion of nesting, so [`lex`] runs a second pass that
//! tracks bracket depth and turns every nested `NEWLINE` into `NL` trivia.
//!
//! A line may end in LF, CRLF or a lone CR. A byte order mark is trivia at the
//! very start of the input and an error anywhere else.
//!
//! ## Strings
//!
//! String literals (with any `r`/`b`/`u`/`f` prefix, single or triple quoted)
//! are recognised by their opening quote and finished by [`string_body`],
//! which scans for the matching close while honouring backslash escapes.
//! An unterminated string is a lexing error for its opening quote only.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace, or the byte order mark (only valid at offset 0)
    #[regex(r"[ \t\x0C]+")]
    #[token("\u{feff}")]
    Whitespace,

    /// Line ending (LF, CRLF or a lone CR)
    #[regex(r"\r\n|\r|\n")]
    Newline,

    /// Comment up to the end of the line
    #[regex(r"#[^\r\n]*")]
    Comment,

    /// Backslash line continuation
    #[regex(r"\\(\r\n|\r|\n)")]
    LineContinuation,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Name,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9][0-9_]*)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?[jJ]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Number,

    /// String piece; the regex matches prefix and opening quote only
    #[regex(r#"[rRbBuUfF]?['"]"#, string_body)]
    #[regex(r#"([bB][rR]|[rR][bB]|[fF][rR]|[rR][fF])['"]"#, string_body)]
    String,

    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("None")]
    None,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("pass")]
    Pass,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("del")]
    Del,
    #[token("return")]
    Return,
    #[token("yield")]
    #[token("lambda")]
    #[token("class")]
    #[token("def")]
    #[token("import")]
    #[token("from")]
    #[token("await")]
    #[token("async")]
    #[token("global")]
    #[token("nonlocal")]
    #[token("assert")]
    #[token("raise")]
    #[token("try")]
    #[token("while")]
    #[token("for")]
    #[token("with")]
    #[token("as")]
    #[token("except")]
    #[token("finally")]
    #[token("elif")]
    Reserved,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("@")]
    At,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("=")]
    Eq,

    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("@=")]
    AtEq,
    #[token("/=")]
    SlashEq,
    #[token("//=")]
    DoubleSlashEq,
    #[token("%=")]
    PercentEq,
    #[token("**=")]
    DoubleStarEq,
    #[token(">>=")]
    RShiftEq,
    #[token("<<=")]
    LShiftEq,
    #[token("&=")]
    AmpEq,
    #[token("^=")]
    CaretEq,
    #[token("|=")]
    PipeEq,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
}

/// Finishes a string piece after its prefix and opening quote.
///
/// Returns false (a lexing error) when the closing quote is missing.
fn string_body(lex: &mut logos::Lexer<'_, TokenKind>) -> bool {
    let slice = lex.slice().as_bytes();
    let quote = slice[slice.len() - 1];

    let rest = lex.remainder().as_bytes();
    let triple = rest.len() >= 2 && rest[0] == quote && rest[1] == quote;
    let body_start = if triple { 2 } else { 0 };

    let mut i = body_start;
    while i < rest.len() {
        match rest[i] {
            b'\\' => {
                // An escaped CRLF must not leave the LF behind.
                i += if rest[i + 1..].starts_with(b"\r\n") { 3 } else { 2 };
                continue;
            }
            b'\r' | b'\n' if !triple => return false,
            b if b == quote => {
                if !triple {
                    lex.bump(i + 1);
                    return true;
                }
                if rest[i..].starts_with(&[quote; 3]) {
                    lex.bump(i + 3);
                    return true;
                }
            }
            _ => {}
        }
        i += 1;
    }

    false
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::LineContinuation => SyntaxKind::LINE_CONTINUATION,
            TokenKind::Name => SyntaxKind::NAME,
            TokenKind::Number => SyntaxKind::NUMBER,
            TokenKind::String => SyntaxKind::STRING,
            TokenKind::And => SyntaxKind::AND_KW,
            TokenKind::Or => SyntaxKind::OR_KW,
            TokenKind::Not => SyntaxKind::NOT_KW,
            TokenKind::In => SyntaxKind::IN_KW,
            TokenKind::Is => SyntaxKind::IS_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::None => SyntaxKind::NONE_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::Pass => SyntaxKind::PASS_KW,
            TokenKind::Break => SyntaxKind::BREAK_KW,
            TokenKind::Continue => SyntaxKind::CONTINUE_KW,
            TokenKind::Del => SyntaxKind::DEL_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::Reserved => SyntaxKind::RESERVED_KW,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::DoubleStar => SyntaxKind::DOUBLE_STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::DoubleSlash => SyntaxKind::DOUBLE_SLASH,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::At => SyntaxKind::AT,
            TokenKind::LShift => SyntaxKind::LSHIFT,
            TokenKind::RShift => SyntaxKind::RSHIFT,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            TokenKind::EqEq => SyntaxKind::EQ_EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::PlusEq => SyntaxKind::PLUS_EQ,
            TokenKind::MinusEq => SyntaxKind::MINUS_EQ,
            TokenKind::StarEq => SyntaxKind::STAR_EQ,
            TokenKind::AtEq => SyntaxKind::AT_EQ,
            TokenKind::SlashEq => SyntaxKind::SLASH_EQ,
            TokenKind::DoubleSlashEq => SyntaxKind::DOUBLE_SLASH_EQ,
            TokenKind::PercentEq => SyntaxKind::PERCENT_EQ,
            TokenKind::DoubleStarEq => SyntaxKind::DOUBLE_STAR_EQ,
            TokenKind::RShiftEq => SyntaxKind::RSHIFT_EQ,
            TokenKind::LShiftEq => SyntaxKind::LSHIFT_EQ,
            TokenKind::AmpEq => SyntaxKind::AMP_EQ,
            TokenKind::CaretEq => SyntaxKind::CARET_EQ,
            TokenKind::PipeEq => SyntaxKind::PIPE_EQ,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LBrace => SyntaxKind::LBRACE,
            TokenKind::RBrace => SyntaxKind::RBRACE,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Ellipsis => SyntaxKind::ELLIPSIS,
        }
    }
}

const BOM: &str = "\u{feff}";

/// A lexed token with its kind, text slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens, and
/// that line endings nested inside brackets are reported as `NL` trivia.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);
    let mut depth = 0usize;

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let offset = lexer.span().start;
        let mut kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => SyntaxKind::ERROR_TOKEN,
        };

        match kind {
            SyntaxKind::LPAREN | SyntaxKind::LBRACKET | SyntaxKind::LBRACE => depth += 1,
            SyntaxKind::RPAREN | SyntaxKind::RBRACKET | SyntaxKind::RBRACE => {
                depth = depth.saturating_sub(1)
            }
            SyntaxKind::NEWLINE if depth > 0 => kind = SyntaxKind::NL,
            SyntaxKind::WHITESPACE if offset > 0 && text == BOM => kind = SyntaxKind::ERROR_TOKEN,
            _ => {}
        }

        tokens.push(Token { kind, text, offset });
    }

    tokens
}
