//! Statement-level productions.

use gml_syntax::SyntaxKind::{self, *};

use super::*;
use crate::parser::{CompletedMarker, Parser, TokenSet};

/// Tokens that may close a `{` / `begin` block. The two delimiter styles are
/// interchangeable in GML.
const BLOCK_CLOSERS: TokenSet = TokenSet::new(&[RBRACE, END_KW]);

/// Tokens that can open an expression statement. Anything else at statement
/// position is reported right here rather than deep inside the expression
/// grammar.
const EXPR_FIRST: TokenSet = TokenSet::new(&[
    IDENTIFIER, GLOBAL_KW, SELF_KW, OTHER_KW, ALL_KW, INTEGER, DECIMAL, HEX, BINARY_LIT, STRING,
    UNDEFINED_KW, TRUE_KW, FALSE_KW, NOONE_KW, LPAREN, LBRACKET, BANG, TILDE, PLUS, MINUS, NOT_KW,
    NEW_KW, TEMPLATE_START,
]);

pub(crate) fn statement(p: &mut Parser<'_>) {
    p.with_rule("statement", statement_inner);
}

fn statement_inner(p: &mut Parser<'_>) {
    match p.current() {
        LBRACE | BEGIN_KW => {
            block(p);
        }
        IF_KW => if_stmt(p),
        WHILE_KW => while_stmt(p),
        DO_KW => do_until_stmt(p),
        FOR_KW => for_stmt(p),
        REPEAT_KW => repeat_stmt(p),
        WITH_KW => with_stmt(p),
        SWITCH_KW => switch_stmt(p),
        CONTINUE_KW => keyword_stmt(p, CONTINUE_STMT),
        BREAK_KW => keyword_stmt(p, BREAK_STMT),
        EXIT_KW => keyword_stmt(p, EXIT_STMT),
        RETURN_KW => argument_stmt(p, RETURN_STMT),
        THROW_KW => argument_stmt(p, THROW_STMT),
        TRY_KW => try_stmt(p),
        DELETE_KW => delete_stmt(p),
        VAR_KW | STATIC_KW => {
            var_decl(p, true);
        }
        GLOBALVAR_KW => global_var_stmt(p),
        ENUM_KW => enum_decl(p),
        FUNCTION_KW => {
            expressions::function_decl(p);
            p.eat(SEMICOLON);
        }
        MACRO_DIRECTIVE => macro_decl(p),
        REGION_DIRECTIVE => directive_stmt(p, REGION_STMT),
        END_REGION_DIRECTIVE => directive_stmt(p, END_REGION_STMT),
        DEFINE_DIRECTIVE => directive_stmt(p, DEFINE_STMT),
        EVENT_DIRECTIVE | TARGET_DIRECTIVE | INCLUDE_DIRECTIVE => {
            directive_stmt(p, RAW_DIRECTIVE);
        }
        // Stray semicolons separate statements; they carry no node.
        SEMICOLON => p.bump(SEMICOLON),
        PLUS2 | MINUS2 => inc_dec_stmt(p),
        _ if p.at_ts(EXPR_FIRST) => expr_stmt(p),
        _ => p.error_unexpected(),
    }
}

/// `{ … }` or `begin … end`. A missing closer is reported at the opener.
pub(super) fn block(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    p.with_rule("block", |p| {
        let m = p.start();
        let open_span = p.current_span();
        p.bump_any(); // `{` or `begin`

        while !p.at_ts(BLOCK_CLOSERS) && !p.at(EOF) && p.ok() {
            statement(p);
        }

        if p.at_ts(BLOCK_CLOSERS) {
            p.bump_any();
        } else if p.ok() {
            p.error_missing_close_brace(open_span);
        }
        Some(m.complete(p, BLOCK))
    })
}

fn if_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(IF_KW);
    expression(p);
    statement(p);
    if p.eat(ELSE_KW) {
        statement(p);
    }
    m.complete(p, IF_STMT);
}

fn while_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(WHILE_KW);
    expression(p);
    statement(p);
    m.complete(p, WHILE_STMT);
}

fn do_until_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(DO_KW);
    statement(p);
    p.with_rule("doUntilStatement", |p| {
        p.expect(UNTIL_KW);
    });
    expression(p);
    p.eat(SEMICOLON);
    m.complete(p, DO_UNTIL_STMT);
}

fn for_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(FOR_KW);
    p.with_rule("forStatement", |p| {
        p.expect(LPAREN);

        // init
        if !p.at(SEMICOLON) && p.ok() {
            if p.at(VAR_KW) || p.at(STATIC_KW) {
                var_decl(p, false);
            } else {
                expr_or_assignment(p);
            }
        }
        p.expect(SEMICOLON);

        // test
        if !p.at(SEMICOLON) && p.ok() {
            expression(p);
        }
        p.expect(SEMICOLON);

        // update
        if !p.at(RPAREN) && p.ok() {
            expr_or_assignment(p);
        }
        p.expect(RPAREN);
    });
    statement(p);
    m.complete(p, FOR_STMT);
}

fn repeat_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(REPEAT_KW);
    expression(p);
    statement(p);
    m.complete(p, REPEAT_STMT);
}

fn with_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(WITH_KW);
    expression(p);
    statement(p);
    m.complete(p, WITH_STMT);
}

fn switch_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(SWITCH_KW);
    expression(p);
    p.with_rule("switchStatement", |p| {
        let open_span = p.current_span();
        if p.at(LBRACE) || p.at(BEGIN_KW) {
            p.bump_any();
        } else {
            p.error_unexpected();
        }

        while (p.at(CASE_KW) || p.at(DEFAULT_KW)) && p.ok() {
            switch_case(p);
        }

        if p.at_ts(BLOCK_CLOSERS) {
            p.bump_any();
        } else if p.ok() {
            p.error_missing_close_brace(open_span);
        }
    });
    m.complete(p, SWITCH_STMT);
}

fn switch_case(p: &mut Parser<'_>) {
    let m = p.start();
    if p.eat(CASE_KW) {
        expression(p);
    } else {
        p.bump(DEFAULT_KW);
    }
    p.with_rule("caseBody", |p| {
        p.expect(COLON);
        while !p.at(CASE_KW)
            && !p.at(DEFAULT_KW)
            && !p.at_ts(BLOCK_CLOSERS)
            && !p.at(EOF)
            && p.ok()
        {
            statement(p);
        }
    });
    m.complete(p, SWITCH_CASE);
}

/// `continue;`, `break;`, `exit;`
fn keyword_stmt(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump_any();
    p.eat(SEMICOLON);
    m.complete(p, kind);
}

/// `return expr?;`, `throw expr?;`
fn argument_stmt(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump_any();
    if !p.at(SEMICOLON) && !at_statement_boundary(p) && p.ok() {
        expression(p);
    }
    p.eat(SEMICOLON);
    m.complete(p, kind);
}

/// A return/throw argument is absent when the next token can only start a
/// different statement or close a block.
fn at_statement_boundary(p: &Parser<'_>) -> bool {
    matches!(
        p.current(),
        RBRACE | END_KW | CASE_KW | DEFAULT_KW | EOF | ELSE_KW | UNTIL_KW
    )
}

fn try_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(TRY_KW);
    statement(p);
    if p.at(CATCH_KW) {
        let c = p.start();
        p.bump(CATCH_KW);
        p.with_rule("catchClause", |p| {
            if p.eat(LPAREN) {
                if p.at(IDENTIFIER) {
                    expressions::name(p);
                }
                p.expect(RPAREN);
            }
        });
        statement(p);
        c.complete(p, CATCH_CLAUSE);
    }
    if p.at(FINALLY_KW) {
        let f = p.start();
        p.bump(FINALLY_KW);
        statement(p);
        f.complete(p, FINALIZER);
    }
    m.complete(p, TRY_STMT);
}

fn delete_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(DELETE_KW);
    expression(p);
    p.eat(SEMICOLON);
    m.complete(p, DELETE_STMT);
}

/// `var a = 1, b;` / `static c = 2;`. In `for` headers the semicolon is the
/// header separator, so `eat_semi` is off there.
pub(super) fn var_decl(p: &mut Parser<'_>, eat_semi: bool) -> CompletedMarker {
    let m = p.start();
    p.bump_any(); // `var` or `static`
    p.with_rule("variableDeclarationList", |p| {
        loop {
            var_declarator(p);
            if !p.eat(COMMA) || !p.ok() {
                break;
            }
        }
    });
    if eat_semi {
        p.eat(SEMICOLON);
    }
    m.complete(p, VAR_DECL)
}

fn var_declarator(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(IDENTIFIER) {
        expressions::name(p);
        if p.eat(EQ) {
            expression(p);
        }
    } else {
        p.error_unexpected();
    }
    m.complete(p, VAR_DECLARATOR);
}

/// `globalvar g1, g2;`: plain names only, no initializers.
fn global_var_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(GLOBALVAR_KW);
    p.with_rule("globalVarStatement", |p| {
        loop {
            let d = p.start();
            if p.at(IDENTIFIER) {
                expressions::name(p);
            } else {
                p.error_unexpected();
            }
            d.complete(p, VAR_DECLARATOR);
            if !p.eat(COMMA) || !p.ok() {
                break;
            }
        }
    });
    p.eat(SEMICOLON);
    m.complete(p, GLOBAL_VAR_STMT);
}

fn enum_decl(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(ENUM_KW);
    p.with_rule("enumDeclaration", |p| {
        if p.at(IDENTIFIER) {
            expressions::name(p);
        } else {
            p.error_unexpected();
        }
        let open_span = p.current_span();
        if !p.expect(LBRACE) {
            return;
        }
        while !p.at(RBRACE) && !p.at(EOF) && p.ok() {
            let member = p.start();
            if p.at(IDENTIFIER) {
                expressions::name(p);
                if p.eat(EQ) {
                    expression(p);
                }
                member.complete(p, ENUM_MEMBER);
            } else {
                member.abandon(p);
                p.error_unexpected();
                break;
            }
            if !p.eat(COMMA) {
                break;
            }
        }
        if p.at(RBRACE) {
            p.bump(RBRACE);
        } else if p.ok() {
            p.error_missing_close_brace(open_span);
        }
    });
    p.eat(SEMICOLON);
    m.complete(p, ENUM_DECL);
}

/// `#macro NAME tokens…`. The body is whatever sits on the rest of the
/// line, with `\` continuing onto the next one.
fn macro_decl(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(MACRO_DIRECTIVE);
    p.with_rule("macroDeclaration", |p| {
        if p.at(IDENTIFIER) {
            expressions::name(p);
        } else {
            p.error_unexpected();
            return;
        }
        let mut continued = false;
        while !p.at(EOF) && p.ok() {
            if !continued && p.line_break_before_current() {
                break;
            }
            continued = p.at(BACKSLASH);
            p.bump_any();
        }
    });
    m.complete(p, MACRO_DECL);
}

/// `#region name?`, `#endregion`, `#define payload`, and the raw
/// `#event`/`#target`/`#include` lines. The payload is one opaque token.
fn directive_stmt(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump_any();
    if p.at(DIRECTIVE_BODY) {
        p.bump(DIRECTIVE_BODY);
    }
    m.complete(p, kind);
}

/// `++x;` / `--x;` at statement position. The operand must address a
/// variable; anything else is the dedicated inc/dec error.
fn inc_dec_stmt(p: &mut Parser<'_>) {
    p.with_rule("incDecStatement", |p| {
        let m = p.start();
        let inner = p.start();
        p.bump_any(); // `++` or `--`
        p.with_rule("lValueExpression", |p| {
            if p.current().is_any_identifier() || p.at(LPAREN) {
                expressions::unary_expr(p);
            } else {
                p.error_unexpected();
            }
        });
        inner.complete(p, INC_DEC_EXPR);
        p.eat(SEMICOLON);
        m.complete(p, EXPR_STMT);
    });
}

/// Everything else: assignments, calls, postfix inc/dec, bare identifiers.
fn expr_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    if expr_or_assignment(p).is_none() {
        // The expression already reported; drop the wrapper.
        m.abandon(p);
        return;
    }
    p.eat(SEMICOLON);
    m.complete(p, EXPR_STMT);
}
