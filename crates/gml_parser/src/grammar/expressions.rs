//! Expression productions.
//!
//! Binary expressions are parsed by precedence climbing over the shared
//! operator table, wrapping the left side with `precede` as operators of
//! sufficient binding power show up.

use gml_syntax::SyntaxKind::*;
use gml_syntax::operators::{self, Assoc};

use super::*;
use crate::parser::{CompletedMarker, Parser};

/// A full expression: precedence-climbed binary operands plus the ternary.
pub(crate) fn expression(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    p.with_rule("expression", cond_expr)
}

/// An expression, or an assignment if an assignment operator follows it.
/// GML keeps assignment out of expression position, so this only appears at
/// statement level and inside `for` headers.
pub(crate) fn expr_or_assignment(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let lhs = expression(p)?;
    if !p.current().is_assignment_op() {
        return Some(lhs);
    }
    let m = lhs.precede(p);
    p.bump_any(); // the operator
    // Chained `a = b = c` nests to the right.
    expr_or_assignment(p);
    Some(m.complete(p, ASSIGNMENT_EXPR))
}

fn cond_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let lhs = expr_bp(p, 0)?;
    if !p.at(QUESTION) {
        return Some(lhs);
    }
    let m = lhs.precede(p);
    p.bump(QUESTION);
    cond_expr(p);
    p.with_rule("ternaryExpression", |p| {
        p.expect(COLON);
    });
    cond_expr(p);
    Some(m.complete(p, TERNARY_EXPR))
}

fn expr_bp(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = unary_expr(p)?;

    while p.ok() {
        let Some((prec, assoc)) = operators::binary_binding(p.current()) else {
            break;
        };
        if prec < min_bp {
            break;
        }
        let m = lhs.precede(p);
        p.bump_any(); // the operator
        let next_min = match assoc {
            Assoc::Left => prec + 1,
            Assoc::Right => prec,
        };
        expr_bp(p, next_min);
        lhs = m.complete(p, BINARY_EXPR);
    }

    Some(lhs)
}

/// Prefix operators, then a postfix chain.
pub(super) fn unary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.current() {
        PLUS2 | MINUS2 => {
            let m = p.start();
            p.bump_any();
            unary_expr(p);
            Some(m.complete(p, INC_DEC_EXPR))
        }
        BANG | TILDE | PLUS | MINUS | NOT_KW => {
            let m = p.start();
            p.bump_any();
            unary_expr(p);
            Some(m.complete(p, UNARY_EXPR))
        }
        _ => postfix_expr(p),
    }
}

fn postfix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;

    while p.ok() {
        match p.current() {
            LPAREN => {
                let m = lhs.precede(p);
                arg_list(p);
                lhs = m.complete(p, CALL_EXPR);
            }
            DOT => {
                let m = lhs.precede(p);
                p.bump(DOT);
                p.with_rule("memberDotExpression", |p| {
                    if p.current().is_any_identifier() {
                        name(p);
                    } else {
                        p.error_unexpected();
                    }
                });
                lhs = m.complete(p, MEMBER_DOT_EXPR);
            }
            kind if kind.is_accessor_open() => {
                let m = lhs.precede(p);
                p.bump_any(); // `[`, `[@`, `[#`, `[|`, `[?` or `[$`
                p.with_rule("memberIndexExpression", |p| {
                    expression(p);
                    while p.eat(COMMA) && p.ok() {
                        expression(p);
                    }
                    p.expect(RBRACKET);
                });
                lhs = m.complete(p, MEMBER_INDEX_EXPR);
            }
            PLUS2 | MINUS2 => {
                let m = lhs.precede(p);
                p.bump_any();
                lhs = m.complete(p, INC_DEC_EXPR);
            }
            _ => break,
        }
    }

    Some(lhs)
}

/// Wraps the current identifier-like token in a `NAME_EXPR` node.
pub(super) fn name(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump_any();
    m.complete(p, NAME_EXPR)
}

fn primary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let kind = p.current();

    if kind.is_literal_token() {
        let m = p.start();
        p.bump_any();
        return Some(m.complete(p, LITERAL));
    }
    if kind.is_any_identifier() {
        return Some(name(p));
    }

    match kind {
        LPAREN => {
            let m = p.start();
            p.bump(LPAREN);
            expression(p);
            p.expect(RPAREN);
            Some(m.complete(p, PAREN_EXPR))
        }
        LBRACKET => Some(array_expr(p)),
        LBRACE => Some(struct_expr(p)),
        FUNCTION_KW => function_decl(p),
        NEW_KW => {
            let m = p.start();
            p.bump(NEW_KW);
            // `new Foo(a, b)`: the callee parse picks up the arguments.
            postfix_expr(p);
            Some(m.complete(p, NEW_EXPR))
        }
        TEMPLATE_START => Some(template_string(p)),
        _ => {
            p.error_unexpected();
            None
        }
    }
}

/// `[a, b, c]`, possibly with a trailing comma.
fn array_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(LBRACKET);
    p.with_rule("arrayLiteral", |p| {
        while !p.at(RBRACKET) && !p.at(EOF) && p.ok() {
            if expression(p).is_none() {
                break;
            }
            if !p.eat(COMMA) {
                break;
            }
        }
        p.expect(RBRACKET);
    });
    m.complete(p, ARRAY_EXPR)
}

/// `{ name: value, "quoted": value }`.
fn struct_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(LBRACE);
    p.with_rule("structLiteral", |p| {
        while !p.at(RBRACE) && !p.at(EOF) && p.ok() {
            let prop = p.start();
            if p.current().is_any_identifier() {
                name(p);
            } else if p.at(STRING) {
                let lit = p.start();
                p.bump(STRING);
                lit.complete(p, LITERAL);
            } else {
                prop.abandon(p);
                p.error_unexpected();
                break;
            }
            p.expect(COLON);
            expression(p);
            prop.complete(p, PROPERTY);
            if !p.eat(COMMA) {
                break;
            }
        }
        p.expect(RBRACE);
    });
    m.complete(p, STRUCT_EXPR)
}

/// `$"text {expr} text"`.
fn template_string(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(TEMPLATE_START);
    p.with_rule("templateString", |p| {
        loop {
            match p.current() {
                TEMPLATE_TEXT => p.bump(TEMPLATE_TEXT),
                LBRACE => {
                    p.bump(LBRACE);
                    expression(p);
                    p.expect(RBRACE);
                }
                TEMPLATE_END => {
                    p.bump(TEMPLATE_END);
                    break;
                }
                _ => {
                    p.error_unexpected();
                    break;
                }
            }
            if !p.ok() {
                break;
            }
        }
    });
    m.complete(p, TEMPLATE_STRING)
}

/// Call arguments. Adjacent, leading and trailing commas imply omitted
/// optional arguments; the lowering derives those from comma placement.
fn arg_list(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(LPAREN);
    p.with_rule("arguments", |p| {
        loop {
            match p.current() {
                RPAREN | EOF => break,
                COMMA => p.bump(COMMA),
                _ => {
                    if expression(p).is_none() {
                        break;
                    }
                    if !p.at(COMMA) && !p.at(RPAREN) {
                        p.error_unexpected();
                        break;
                    }
                }
            }
            if !p.ok() {
                break;
            }
        }
        p.expect(RPAREN);
    });
    m.complete(p, ARG_LIST)
}

/// `function name?(params) (: Parent(args))? constructor? { … }`
///
/// Declaration and expression positions share this production; the lowering
/// separates plain functions from constructors.
pub(super) fn function_decl(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    p.bump(FUNCTION_KW);
    if p.at(IDENTIFIER) {
        name(p);
    }
    param_list(p);
    if p.at(COLON) {
        let parent = p.start();
        p.bump(COLON);
        p.with_rule("constructorParent", |p| {
            if p.at(IDENTIFIER) {
                name(p);
            } else {
                p.error_unexpected();
            }
            if p.at(LPAREN) {
                arg_list(p);
            }
        });
        parent.complete(p, CONSTRUCTOR_PARENT);
    }
    p.eat(CONSTRUCTOR_KW);
    if p.at(LBRACE) || p.at(BEGIN_KW) {
        statements::block(p);
    } else {
        p.error_unexpected();
    }
    Some(m.complete(p, FUNCTION_DECL))
}

/// Parameters: identifiers, defaulted identifiers, and omitted slots implied
/// by comma placement, exactly like call arguments.
fn param_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.with_rule("parameterList", |p| {
        if !p.expect(LPAREN) {
            return;
        }
        loop {
            match p.current() {
                RPAREN | EOF => break,
                COMMA => p.bump(COMMA),
                IDENTIFIER => {
                    let item = p.start();
                    name(p);
                    if p.eat(EQ) {
                        expression(p);
                        item.complete(p, DEFAULT_PARAM);
                    } else {
                        item.abandon(p);
                    }
                    if !p.at(COMMA) && !p.at(RPAREN) {
                        p.error_unexpected();
                        break;
                    }
                }
                _ => {
                    p.error_unexpected();
                    break;
                }
            }
            if !p.ok() {
                break;
            }
        }
        p.expect(RPAREN);
    });
    m.complete(p, PARAM_LIST);
}
