//! Statement lowering.

use gml_ast::{Node, NodeKind};
use gml_syntax::nodes::{
    Block, CatchClause, DoUntilStmt, EnumDecl, ForStmt, GlobalVarStmt, IfStmt, MacroDecl,
    RepeatStmt, SwitchCase, SwitchStmt, TryStmt, VarDecl, VarDeclarator, WhileStmt, WithStmt,
};
use gml_syntax::{AstNode, ResolvedNode};
use gml_syntax::SyntaxKind::*;

use super::expressions::{self, lower_expr};
use super::*;
use crate::identifiers::IdentifierRole;

/// Lowers one statement-level CST node. `None` elides the statement, which
/// happens for raw directives and empty `#define` payloads.
pub(crate) fn lower_stmt(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Option<Node> {
    let lowered = match node.kind() {
        BLOCK => block(ctx, &Block::cast(node.clone())?),
        IF_STMT => if_stmt(ctx, &IfStmt::cast(node.clone())?),
        WHILE_STMT => while_stmt(ctx, &WhileStmt::cast(node.clone())?),
        REPEAT_STMT => repeat_stmt(ctx, &RepeatStmt::cast(node.clone())?),
        WITH_STMT => with_stmt(ctx, &WithStmt::cast(node.clone())?),
        DO_UNTIL_STMT => do_until_stmt(ctx, &DoUntilStmt::cast(node.clone())?),
        FOR_STMT => for_stmt(ctx, &ForStmt::cast(node.clone())?),
        SWITCH_STMT => switch_stmt(ctx, &SwitchStmt::cast(node.clone())?),
        SWITCH_CASE => switch_case(ctx, &SwitchCase::cast(node.clone())?),
        CONTINUE_STMT => ctx.make(NodeKind::ContinueStatement {}, node),
        BREAK_STMT => ctx.make(NodeKind::BreakStatement {}, node),
        EXIT_STMT => ctx.make(NodeKind::ExitStatement {}, node),
        RETURN_STMT => argument_stmt(ctx, node, true),
        THROW_STMT => argument_stmt(ctx, node, false),
        TRY_STMT => try_stmt(ctx, &TryStmt::cast(node.clone())?),
        DELETE_STMT => delete_stmt(ctx, node),
        EXPR_STMT => expr_stmt(ctx, node)?,
        VAR_DECL => var_decl(ctx, &VarDecl::cast(node.clone())?),
        GLOBAL_VAR_STMT => global_var_stmt(ctx, &GlobalVarStmt::cast(node.clone())?),
        ENUM_DECL => enum_decl(ctx, &EnumDecl::cast(node.clone())?),
        FUNCTION_DECL => expressions::lower_function(ctx, node),
        MACRO_DECL => macro_decl(ctx, &MacroDecl::cast(node.clone())?),
        REGION_STMT => region_stmt(ctx, node, true),
        END_REGION_STMT => region_stmt(ctx, node, false),
        DEFINE_STMT => define_stmt(ctx, node)?,
        RAW_DIRECTIVE => return None,
        _ => return None,
    };
    Some(lowered)
}

fn block(ctx: &mut LowerCtx<'_>, block: &Block) -> Node {
    let body = block.statements().filter_map(|n| lower_stmt(ctx, n)).collect();
    ctx.make(NodeKind::BlockStatement { body }, block.syntax())
}

/// Condition slots shed one level of user parentheses: `if (x == y)` tests
/// the comparison itself, and printers re-add the parens. Written parens
/// elsewhere stay in the tree.
fn unwrap_condition(node: Node) -> Node {
    match node.kind {
        NodeKind::ParenthesizedExpression { expression, synthetic: None, .. } => *expression,
        _ => node,
    }
}

fn condition(ctx: &mut LowerCtx<'_>, node: Option<&ResolvedNode>) -> Node {
    unwrap_condition(lower_expr_or_missing(ctx, node))
}

fn if_stmt(ctx: &mut LowerCtx<'_>, stmt: &IfStmt) -> Node {
    let test = condition(ctx, stmt.condition());
    let consequent = lower_stmt_or_empty(ctx, stmt.consequent(), stmt.syntax());
    let alternate = stmt.alternate().and_then(|n| lower_stmt(ctx, n)).map(Box::new);
    ctx.make(
        NodeKind::IfStatement { test: Box::new(test), consequent: Box::new(consequent), alternate },
        stmt.syntax(),
    )
}

fn while_stmt(ctx: &mut LowerCtx<'_>, stmt: &WhileStmt) -> Node {
    let test = Box::new(condition(ctx, stmt.condition()));
    let body = Box::new(lower_stmt_or_empty(ctx, stmt.body(), stmt.syntax()));
    ctx.make(NodeKind::WhileStatement { test, body }, stmt.syntax())
}

fn repeat_stmt(ctx: &mut LowerCtx<'_>, stmt: &RepeatStmt) -> Node {
    let test = Box::new(condition(ctx, stmt.count()));
    let body = Box::new(lower_stmt_or_empty(ctx, stmt.body(), stmt.syntax()));
    ctx.make(NodeKind::RepeatStatement { test, body }, stmt.syntax())
}

fn with_stmt(ctx: &mut LowerCtx<'_>, stmt: &WithStmt) -> Node {
    let object = Box::new(condition(ctx, stmt.object()));
    let body = ctx.with_scope("with", |ctx| {
        Box::new(lower_stmt_or_empty(ctx, stmt.body(), stmt.syntax()))
    });
    ctx.make(NodeKind::WithStatement { object, body }, stmt.syntax())
}

fn do_until_stmt(ctx: &mut LowerCtx<'_>, stmt: &DoUntilStmt) -> Node {
    let body = Box::new(lower_stmt_or_empty(ctx, stmt.body(), stmt.syntax()));
    let test = Box::new(condition(ctx, stmt.condition()));
    ctx.make(NodeKind::DoUntilStatement { body, test }, stmt.syntax())
}

fn for_stmt(ctx: &mut LowerCtx<'_>, stmt: &ForStmt) -> Node {
    let init = stmt.init().and_then(|n| {
        if n.kind() == VAR_DECL {
            VarDecl::cast(n.clone()).map(|decl| var_decl(ctx, &decl))
        } else {
            lower_expr(ctx, n, None)
        }
    });
    let test = stmt.condition().and_then(|n| lower_expr(ctx, n, None));
    let update = stmt.update().and_then(|n| lower_expr(ctx, n, None));
    let body = Box::new(lower_stmt_or_empty(ctx, stmt.body(), stmt.syntax()));
    ctx.make(
        NodeKind::ForStatement {
            init: init.map(Box::new),
            test: test.map(Box::new),
            update: update.map(Box::new),
            body,
        },
        stmt.syntax(),
    )
}

fn switch_stmt(ctx: &mut LowerCtx<'_>, stmt: &SwitchStmt) -> Node {
    let discriminant = Box::new(condition(ctx, stmt.discriminant()));
    let cases = stmt.cases().collect::<Vec<_>>();
    let cases = cases.iter().map(|case| switch_case(ctx, case)).collect();
    ctx.make(NodeKind::SwitchStatement { discriminant, cases }, stmt.syntax())
}

fn switch_case(ctx: &mut LowerCtx<'_>, case: &SwitchCase) -> Node {
    let test = case.test().and_then(|n| lower_expr(ctx, n, None)).map(Box::new);
    let body_nodes = case.body().collect::<Vec<_>>();
    let body = body_nodes.into_iter().filter_map(|n| lower_stmt(ctx, n)).collect();
    ctx.make(NodeKind::SwitchCase { test, body }, case.syntax())
}

fn argument_stmt(ctx: &mut LowerCtx<'_>, node: &ResolvedNode, is_return: bool) -> Node {
    let argument =
        node.children().next().and_then(|n| lower_expr(ctx, n, None)).map(Box::new);
    let kind = if is_return {
        NodeKind::ReturnStatement { argument }
    } else {
        NodeKind::ThrowStatement { argument }
    };
    ctx.make(kind, node)
}

fn try_stmt(ctx: &mut LowerCtx<'_>, stmt: &TryStmt) -> Node {
    let block = Box::new(lower_stmt_or_empty(ctx, stmt.block(), stmt.syntax()));
    let handler = stmt.handler().map(|clause| Box::new(catch_clause(ctx, &clause)));
    let finalizer = stmt.finalizer().map(|fin| {
        let body = Box::new(lower_stmt_or_empty(ctx, fin.body(), fin.syntax()));
        Box::new(ctx.make(NodeKind::Finalizer { body }, fin.syntax()))
    });
    ctx.make(NodeKind::TryStatement { block, handler, finalizer }, stmt.syntax())
}

fn catch_clause(ctx: &mut LowerCtx<'_>, clause: &CatchClause) -> Node {
    ctx.with_scope("catch", |ctx| {
        let param = clause.param().map(|n| {
            ctx.with_role(IdentifierRole::declaration("variable"), |ctx| {
                expressions::visit_identifier(ctx, n)
            })
        });
        let body = Box::new(lower_stmt_or_empty(ctx, clause.body(), clause.syntax()));
        ctx.make(NodeKind::CatchClause { param: param.map(Box::new), body }, clause.syntax())
    })
}

fn delete_stmt(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let argument = Box::new(lower_expr_or_missing(ctx, node.children().next()));
    ctx.make(NodeKind::DeleteStatement { argument }, node)
}

/// Expression statements re-tag by payload: inc/dec becomes a statement
/// variant, a bare identifier keeps its own statement form.
fn expr_stmt(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Option<Node> {
    let child = node.children().next()?;
    let expression = lower_expr(ctx, child, None)?;
    let lowered = match expression.kind {
        NodeKind::IncDecExpression { operator, prefix, argument } => {
            ctx.make(NodeKind::IncDecStatement { operator, prefix, argument }, node)
        }
        NodeKind::Identifier { .. } => {
            ctx.make(NodeKind::IdentifierStatement { name: Box::new(expression) }, node)
        }
        _ => ctx.make(NodeKind::ExpressionStatement { expression: Box::new(expression) }, node),
    };
    Some(lowered)
}

fn var_decl(ctx: &mut LowerCtx<'_>, decl: &VarDecl) -> Node {
    let kind_text = decl.kind_text().unwrap_or("var").to_string();
    let declarators = decl.declarators().collect::<Vec<_>>();
    let declarations = declarators
        .iter()
        .map(|d| var_declarator(ctx, d, IdentifierRole::declaration("variable")))
        .collect();
    ctx.make(NodeKind::VariableDeclaration { declarations, kind: kind_text }, decl.syntax())
}

fn var_declarator(ctx: &mut LowerCtx<'_>, decl: &VarDeclarator, role: IdentifierRole) -> Node {
    let id = decl
        .name_node()
        .map(|name| ctx.with_role(role, |ctx| expressions::visit_identifier(ctx, name)))
        .unwrap_or_else(|| missing_identifier(ctx, decl.syntax()));
    let init = decl.initializer().and_then(|n| lower_expr(ctx, n, None)).map(Box::new);
    ctx.make(NodeKind::VariableDeclarator { id: Box::new(id), init }, decl.syntax())
}

fn global_var_stmt(ctx: &mut LowerCtx<'_>, stmt: &GlobalVarStmt) -> Node {
    let declarators = stmt.declarators().collect::<Vec<_>>();
    let declarations = declarators
        .iter()
        .map(|d| {
            // Register the name first so this very occurrence is flagged.
            if let Some(name) = first_significant_token(d.syntax()) {
                ctx.ids.mark_global(name.text());
            }
            var_declarator(ctx, d, IdentifierRole::declaration("variable").global())
        })
        .collect();
    ctx.make(
        NodeKind::GlobalVarStatement { declarations, kind: "globalvar".to_string() },
        stmt.syntax(),
    )
}

fn enum_decl(ctx: &mut LowerCtx<'_>, decl: &EnumDecl) -> Node {
    if let Some(name) = decl.name_node().and_then(first_significant_token) {
        ctx.ids.mark_global(name.text());
    }
    let name = decl
        .name_node()
        .map(|n| {
            ctx.with_role(IdentifierRole::declaration("enum").global(), |ctx| {
                expressions::visit_identifier(ctx, n)
            })
        })
        .unwrap_or_else(|| missing_identifier(ctx, decl.syntax()));

    let member_views = decl.members().collect::<Vec<_>>();
    let members = ctx.with_scope("struct", |ctx| {
        member_views
            .iter()
            .map(|member| {
                let member_name = member
                    .name_node()
                    .map(|n| {
                        ctx.with_role(IdentifierRole::declaration("enum-member"), |ctx| {
                            expressions::visit_identifier(ctx, n)
                        })
                    })
                    .unwrap_or_else(|| missing_identifier(ctx, member.syntax()));
                let initializer =
                    member.initializer().and_then(|n| lower_expr(ctx, n, None)).map(Box::new);
                ctx.make(
                    NodeKind::EnumMember { name: Box::new(member_name), initializer },
                    member.syntax(),
                )
            })
            .collect()
    });

    let trailing = has_trailing_comma(decl.syntax(), RBRACE);
    ctx.make(
        NodeKind::EnumDeclaration { name: Box::new(name), members, has_trailing_comma: trailing },
        decl.syntax(),
    )
}

fn macro_decl(ctx: &mut LowerCtx<'_>, decl: &MacroDecl) -> Node {
    if let Some(token) = decl.name_node().and_then(first_significant_token) {
        ctx.ids.mark_global(token.text());
    }
    let name = decl
        .name_node()
        .map(|n| {
            ctx.with_role(IdentifierRole::declaration("macro").global(), |ctx| {
                expressions::visit_identifier(ctx, n)
            })
        })
        .unwrap_or_else(|| missing_identifier(ctx, decl.syntax()));

    // The macro body is the raw source between the name and the end of the
    // node, continuation backslashes included.
    let name_end = decl.name_node().and_then(last_significant_token);
    let tokens = match (name_end, last_significant_token(decl.syntax())) {
        (Some(name_end), Some(node_end)) => {
            let from: usize = name_end.text_range().end().into();
            let to: usize = node_end.text_range().end().into();
            ctx.source.get(from..to).unwrap_or("").trim().to_string()
        }
        _ => String::new(),
    };

    ctx.make(NodeKind::MacroDeclaration { name: Box::new(name), tokens }, decl.syntax())
}

fn region_stmt(ctx: &mut LowerCtx<'_>, node: &ResolvedNode, is_open: bool) -> Node {
    let name = find_token(node, DIRECTIVE_BODY)
        .map(|t| t.text().trim().to_string())
        .filter(|t| !t.is_empty());
    let kind = if is_open {
        NodeKind::RegionStatement { name }
    } else {
        NodeKind::EndRegionStatement { name }
    };
    ctx.make(kind, node)
}

/// `#define` payload classification. The legacy directive either renames a
/// region marker or introduces a macro-style name; anything else is elided.
fn define_stmt(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Option<Node> {
    let payload = find_token(node, DIRECTIVE_BODY).map(|t| t.text().to_string())?;
    let trimmed = payload.trim_start();

    let (replacement, rest) = if let Some(rest) = strip_keyword_ci(trimmed, "endregion")
        .or_else(|| strip_end_region_spaced(trimmed))
    {
        ("#endregion", rest)
    } else if let Some(rest) = strip_keyword_ci(trimmed, "region") {
        ("#region", rest)
    } else if starts_with_identifier(trimmed) {
        ("#macro", trimmed)
    } else {
        return None;
    };

    Some(ctx.make(
        NodeKind::DefineStatement {
            replacement_directive: replacement.to_string(),
            name: rest.trim().to_string(),
        },
        node,
    ))
}

/// Case-insensitive keyword at the start, bounded by a non-word character.
fn strip_keyword_ci<'s>(text: &'s str, keyword: &str) -> Option<&'s str> {
    if text.len() < keyword.len() || !text[..keyword.len()].eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    match rest.bytes().next() {
        Some(b) if b.is_ascii_alphanumeric() || b == b'_' => None,
        _ => Some(rest),
    }
}

/// `end region`, with any spacing between the words.
fn strip_end_region_spaced(text: &str) -> Option<&str> {
    let rest = strip_keyword_ci(text, "end")?;
    let rest = rest.trim_start();
    strip_keyword_ci(rest, "region")
}

fn starts_with_identifier(text: &str) -> bool {
    text.bytes().next().is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
}

fn empty_block(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    ctx.make(NodeKind::BlockStatement { body: Vec::new() }, node)
}

fn missing_identifier(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    ctx.make(NodeKind::identifier(""), node)
}

fn lower_stmt_or_empty(
    ctx: &mut LowerCtx<'_>,
    node: Option<&ResolvedNode>,
    fallback: &ResolvedNode,
) -> Node {
    node.and_then(|n| lower_stmt(ctx, n)).unwrap_or_else(|| empty_block(ctx, fallback))
}

fn lower_expr_or_missing(ctx: &mut LowerCtx<'_>, node: Option<&ResolvedNode>) -> Node {
    node.and_then(|n| lower_expr(ctx, n, None))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")))
}
