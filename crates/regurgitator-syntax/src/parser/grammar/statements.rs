//! Simple statement grammar rules.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind::{self, *};

use super::expressions;

/// Parse one simple statement.
///
/// The statement node ends at its last significant token; the line ending or
/// `;` that terminates it belongs to the module.
pub(super) fn statement(p: &mut Parser<'_, '_>) {
    match p.current() {
        PASS_KW => keyword_statement(p, PASS_STMT),
        BREAK_KW => keyword_statement(p, BREAK_STMT),
        CONTINUE_KW => keyword_statement(p, CONTINUE_STMT),
        DEL_KW => {
            let m = p.start();
            p.bump();
            expressions::star_expr_list(p);
            m.complete(p, DEL_STMT);
        }
        RETURN_KW => {
            let m = p.start();
            p.bump();
            if expressions::at_item_start(p) {
                expressions::star_expr_list(p);
            }
            m.complete(p, RETURN_STMT);
        }
        RESERVED_KW => {
            let message = format!("`{}` is not supported", p.current_text());
            p.err_and_bump(message);
        }
        _ if expressions::at_item_start(p) => expression_statement(p),
        _ => p.err_and_bump("expected statement"),
    }
}

fn keyword_statement(p: &mut Parser<'_, '_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump();
    m.complete(p, kind);
}

/// Expression statement, chained assignment or augmented assignment.
///
/// The left-hand side is parsed first and wrapped once the token after it
/// tells us which statement this is.
fn expression_statement(p: &mut Parser<'_, '_>) {
    let Some(lhs) = expressions::star_expr_list(p) else {
        return;
    };

    if p.at(EQ) {
        let m = lhs.precede(p);
        while p.eat(EQ) {
            if expressions::star_expr_list(p).is_none() {
                break;
            }
        }
        m.complete(p, ASSIGN_STMT);
    } else if p.current().is_aug_assign() {
        let m = lhs.precede(p);
        p.bump();
        expressions::expr_list(p);
        m.complete(p, AUG_ASSIGN_STMT);
    } else {
        lhs.precede(p).complete(p, EXPR_STMT);
    }
}
