//! Expression grammar rules.
//!
//! Precedence, loosest first:
//!
//! ```text
//! conditional   a if c else b
//! or / and      flat BOOL_EXPR per operator run
//! not           UNARY_EXPR
//! comparison    flat COMPARE_EXPR for chains like a < b <= c
//! | ^ & << >> + - * / // % @   binding powers, left associative
//! unary + - ~
//! **            right associative, right operand may be unary
//! trailers      .name  (args)  [subscript]
//! atoms
//! ```

use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind::{self, *};

type Rule = fn(&mut Parser<'_, '_>) -> Option<CompletedMarker>;

/// Can the current token begin an expression?
pub(super) fn at_expr_start(p: &Parser<'_, '_>) -> bool {
    matches!(
        p.current(),
        NAME | NUMBER
            | STRING
            | NONE_KW
            | TRUE_KW
            | FALSE_KW
            | ELLIPSIS
            | LPAREN
            | LBRACKET
            | LBRACE
            | MINUS
            | PLUS
            | TILDE
            | NOT_KW
            // rejected by `atom` with a clearer message than "expected ..."
            | RESERVED_KW
    )
}

/// Can the current token begin an expression or a starred item?
pub(super) fn at_item_start(p: &Parser<'_, '_>) -> bool {
    at_expr_start(p) || p.at(STAR)
}

/// `expr (, expr)* [,]` - a bare TUPLE_EXPR when a comma is present.
pub(super) fn expr_list(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    list_of(p, expr, at_expr_start)
}

/// Like [`expr_list`], but items may be starred.
pub(super) fn star_expr_list(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    list_of(p, star_item, at_item_start)
}

fn list_of(
    p: &mut Parser<'_, '_>,
    item: Rule,
    at_item: fn(&Parser<'_, '_>) -> bool,
) -> Option<CompletedMarker> {
    let first = item(p)?;
    if !p.at(COMMA) {
        return Some(first);
    }

    let m = first.precede(p);
    while p.eat(COMMA) {
        if !at_item(p) {
            break;
        }
        item(p);
    }
    Some(m.complete(p, TUPLE_EXPR))
}

fn star_item(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    if !p.at(STAR) {
        return expr(p);
    }
    let m = p.start();
    p.bump();
    binary(p, 1);
    Some(m.complete(p, STARRED_EXPR))
}

/// A full expression, including the conditional form.
pub(super) fn expr(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let body = or_test(p)?;
    if !p.at(IF_KW) {
        return Some(body);
    }

    let m = body.precede(p);
    p.bump();
    or_test(p);
    p.expect(ELSE_KW, "`else`");
    expr(p);
    Some(m.complete(p, IF_EXPR))
}

fn or_test(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    bool_chain(p, OR_KW, and_test)
}

fn and_test(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    bool_chain(p, AND_KW, not_test)
}

fn bool_chain(p: &mut Parser<'_, '_>, op: SyntaxKind, operand: Rule) -> Option<CompletedMarker> {
    let first = operand(p)?;
    if !p.at(op) {
        return Some(first);
    }

    let m = first.precede(p);
    while p.eat(op) {
        operand(p);
    }
    Some(m.complete(p, BOOL_EXPR))
}

fn not_test(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    if !p.at(NOT_KW) {
        return comparison(p);
    }
    if !p.enter() {
        return None;
    }
    let m = p.start();
    p.bump();
    not_test(p);
    p.leave(1);
    Some(m.complete(p, UNARY_EXPR))
}

fn comparison(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let first = binary(p, 1)?;
    if !at_comparison_op(p) {
        return Some(first);
    }

    let m = first.precede(p);
    while at_comparison_op(p) {
        match p.current() {
            // `not in`
            NOT_KW => {
                p.bump();
                p.bump();
            }
            // `is` or `is not`
            IS_KW => {
                p.bump();
                p.eat(NOT_KW);
            }
            _ => p.bump(),
        }
        binary(p, 1);
    }
    Some(m.complete(p, COMPARE_EXPR))
}

fn at_comparison_op(p: &Parser<'_, '_>) -> bool {
    match p.current() {
        LT | GT | LT_EQ | GT_EQ | EQ_EQ | NOT_EQ | IN_KW | IS_KW => true,
        NOT_KW => p.nth(1) == IN_KW,
        _ => false,
    }
}

fn infix_binding_power(kind: SyntaxKind) -> Option<u8> {
    let bp = match kind {
        PIPE => 1,
        CARET => 2,
        AMP => 3,
        LSHIFT | RSHIFT => 4,
        PLUS | MINUS => 5,
        STAR | SLASH | DOUBLE_SLASH | PERCENT | AT => 6,
        _ => return None,
    };
    Some(bp)
}

fn binary(p: &mut Parser<'_, '_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = unary(p)?;

    // Each operator nests everything to its left one level deeper.
    let mut wraps = 0;
    while let Some(bp) = infix_binding_power(p.current()) {
        if bp < min_bp || !p.enter() {
            break;
        }
        wraps += 1;
        let m = lhs.precede(p);
        p.bump();
        binary(p, bp + 1);
        lhs = m.complete(p, BIN_EXPR);
    }
    p.leave(wraps);

    Some(lhs)
}

/// Every operand passes through here, so this is where bracket and prefix
/// nesting is counted.
fn unary(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    if !p.enter() {
        return None;
    }
    let operand = if matches!(p.current(), PLUS | MINUS | TILDE) {
        let m = p.start();
        p.bump();
        unary(p);
        Some(m.complete(p, UNARY_EXPR))
    } else {
        power(p)
    };
    p.leave(1);
    operand
}

fn power(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let base = primary(p)?;
    if !p.at(DOUBLE_STAR) {
        return Some(base);
    }
    let m = base.precede(p);
    p.bump();
    unary(p);
    Some(m.complete(p, BIN_EXPR))
}

fn primary(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let mut lhs = atom(p)?;

    let mut wraps = 0;
    loop {
        if !matches!(p.current(), DOT | LPAREN | LBRACKET) || !p.enter() {
            break;
        }
        wraps += 1;
        lhs = match p.current() {
            DOT => {
                let m = lhs.precede(p);
                p.bump();
                p.expect(NAME, "attribute name");
                m.complete(p, ATTRIBUTE_EXPR)
            }
            LPAREN => {
                let m = lhs.precede(p);
                call_arguments(p);
                m.complete(p, CALL_EXPR)
            }
            _ => {
                let m = lhs.precede(p);
                subscript(p);
                m.complete(p, SUBSCRIPT_EXPR)
            }
        };
    }
    p.leave(wraps);

    Some(lhs)
}

fn atom(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let kind = match p.current() {
        NAME => NAME_EXPR,
        NUMBER => NUMBER_LIT,
        NONE_KW | TRUE_KW | FALSE_KW => CONST_EXPR,
        ELLIPSIS => ELLIPSIS_EXPR,
        STRING => return Some(strings(p)),
        LPAREN => return Some(parenthesized(p)),
        LBRACKET => return Some(list_display(p)),
        LBRACE => return Some(brace_display(p)),
        RESERVED_KW => {
            let message = format!("`{}` is not supported", p.current_text());
            p.error(message);
            return None;
        }
        _ => {
            p.error("expected expression");
            return None;
        }
    };
    let m = p.start();
    p.bump();
    Some(m.complete(p, kind))
}

/// Adjacent string pieces form one literal.
fn strings(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    while p.at(STRING) {
        p.bump();
    }
    m.complete(p, STRING_LIT)
}

/// `()`, `(x)`, `(x,)` or `(x, y)`. The parentheses belong to a tuple but
/// are merely grouping for a single expression.
fn parenthesized(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.eat(RPAREN) {
        return m.complete(p, TUPLE_EXPR);
    }

    star_item(p);
    if p.at(COMMA) {
        while p.eat(COMMA) {
            if !at_item_start(p) {
                break;
            }
            star_item(p);
        }
        p.expect(RPAREN, "`)`");
        return m.complete(p, TUPLE_EXPR);
    }

    p.expect(RPAREN, "`)`");
    m.complete(p, PAREN_EXPR)
}

fn list_display(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    while at_item_start(p) {
        star_item(p);
        if !p.eat(COMMA) {
            break;
        }
    }
    p.expect(RBRACKET, "`]`");
    m.complete(p, LIST_EXPR)
}

/// `{}` and `{k: v, ...}` are dicts, `{a, b}` is a set.
fn brace_display(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.eat(RBRACE) {
        return m.complete(p, DICT_EXPR);
    }

    let starred = p.at(STAR);
    star_item(p);

    if !starred && p.eat(COLON) {
        expr(p);
        while p.eat(COMMA) {
            if !at_expr_start(p) {
                break;
            }
            expr(p);
            p.expect(COLON, "`:`");
            expr(p);
        }
        p.expect(RBRACE, "`}`");
        return m.complete(p, DICT_EXPR);
    }

    while p.eat(COMMA) {
        if !at_item_start(p) {
            break;
        }
        star_item(p);
    }
    p.expect(RBRACE, "`}`");
    m.complete(p, SET_EXPR)
}

fn call_arguments(p: &mut Parser<'_, '_>) {
    p.bump();
    while !p.at(RPAREN) && !p.at_end() {
        if !argument(p) || !p.eat(COMMA) {
            break;
        }
    }
    p.expect(RPAREN, "`)`");
}

fn argument(p: &mut Parser<'_, '_>) -> bool {
    match p.current() {
        NAME if p.nth(1) == EQ => {
            let m = p.start();
            p.bump();
            p.bump();
            expr(p);
            m.complete(p, KEYWORD_ARG);
        }
        DOUBLE_STAR => {
            let m = p.start();
            p.bump();
            expr(p);
            m.complete(p, KEYWORD_ARG);
        }
        STAR => {
            star_item(p);
        }
        _ if at_expr_start(p) => {
            expr(p);
        }
        _ => {
            p.error("expected argument");
            return false;
        }
    }
    true
}

/// `[index]`, `[lower:upper:step]` or a tuple of those.
fn subscript(p: &mut Parser<'_, '_>) {
    p.bump();
    if let Some(first) = slice_item(p)
        && p.at(COMMA)
    {
        let m = first.precede(p);
        while p.eat(COMMA) {
            if !at_expr_start(p) && !p.at(COLON) {
                break;
            }
            slice_item(p);
        }
        m.complete(p, TUPLE_EXPR);
    }
    p.expect(RBRACKET, "`]`");
}

fn slice_item(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let m = p.start();
    let lower = if p.at(COLON) { None } else { expr(p) };
    if !p.at(COLON) {
        m.abandon(p);
        return lower;
    }

    p.bump();
    if at_expr_start(p) {
        expr(p);
    }
    if p.eat(COLON) && at_expr_start(p) {
        expr(p);
    }
    Some(m.complete(p, SLICE_EXPR))
}
