//! Expression lowering.

use cstree::util::NodeOrToken;
use gml_ast::{Location, LocationRange, Node, NodeKind};
use gml_syntax::SyntaxKind::*;
use gml_syntax::nodes::{ConstructorParent, FunctionDecl};
use gml_syntax::{AstNode, ResolvedNode};

use super::binary::{BinaryPosition, ParentBinary, needs_parentheses};
use super::*;
use crate::identifiers::IdentifierRole;

/// Lowers one expression-level CST node.
///
/// `parent_binary` is set only while lowering the operand of a binary
/// expression; it feeds the synthetic-parenthesization delegate.
pub(crate) fn lower_expr(
    ctx: &mut LowerCtx<'_>,
    node: &ResolvedNode,
    parent_binary: Option<&ParentBinary>,
) -> Option<Node> {
    let lowered = match node.kind() {
        NAME_EXPR => visit_identifier(ctx, node),
        LITERAL => literal(ctx, node),
        PAREN_EXPR => paren_expr(ctx, node),
        UNARY_EXPR => unary_expr(ctx, node),
        INC_DEC_EXPR => inc_dec_expr(ctx, node),
        BINARY_EXPR => return Some(binary_expr(ctx, node, parent_binary)),
        ASSIGNMENT_EXPR => assignment_expr(ctx, node),
        TERNARY_EXPR => ternary_expr(ctx, node),
        CALL_EXPR => call_expr(ctx, node),
        NEW_EXPR => new_expr(ctx, node),
        MEMBER_DOT_EXPR => member_dot_expr(ctx, node),
        MEMBER_INDEX_EXPR => member_index_expr(ctx, node),
        ARRAY_EXPR => array_expr(ctx, node),
        STRUCT_EXPR => struct_expr(ctx, node),
        TEMPLATE_STRING => template_string(ctx, node),
        FUNCTION_DECL => lower_function(ctx, node),
        _ => return None,
    };
    Some(lowered)
}

/// Builds an `Identifier` node: name, global-registry flag, and, when
/// metadata is on, the stamp of the active role.
pub(crate) fn visit_identifier(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let token = first_significant_token(node);
    let name = token.map_or(String::new(), |t| t.text().to_string());
    let (start, end) = ctx.node_range(node);

    let annotations = ctx.ids.apply_current_role(&name, Some(start), Some(end));
    let is_global_identifier = ctx.ids.is_global(&name).then_some(true);

    let (scope_id, declaration, classifications) = match annotations {
        Some(a) => (Some(a.scope_id), a.declaration, Some(a.classifications)),
        None => (None, None, None),
    };

    Node::with_range(
        NodeKind::Identifier { name, is_global_identifier, scope_id, declaration, classifications },
        start,
        end,
    )
}

fn literal(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let value = first_significant_token(node).map_or(String::new(), |t| t.text().to_string());
    ctx.make(NodeKind::Literal { value }, node)
}

fn paren_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let expression = Box::new(first_expr(ctx, node));
    ctx.make(
        NodeKind::ParenthesizedExpression { expression, synthetic: None, position: None },
        node,
    )
}

fn unary_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let operator = find_token_by(node, |k| matches!(k, BANG | TILDE | PLUS | MINUS | NOT_KW))
        .map_or(String::new(), |t| {
            // `not` is an alias; the node's operator set stays closed.
            if t.kind() == NOT_KW { "!".to_string() } else { t.text().to_string() }
        });
    let argument = Box::new(first_expr(ctx, node));
    ctx.make(NodeKind::UnaryExpression { operator, prefix: true, argument }, node)
}

fn inc_dec_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let operator = find_token_by(node, |k| matches!(k, PLUS2 | MINUS2))
        .map_or(String::new(), |t| t.text().to_string());
    // Prefix form leads with the operator token.
    let prefix = node
        .children_with_tokens()
        .find(|el| match el {
            NodeOrToken::Token(t) => !t.kind().is_trivia(),
            NodeOrToken::Node(_) => true,
        })
        .is_some_and(|el| matches!(el, NodeOrToken::Token(_)));
    let argument = Box::new(first_expr(ctx, node));
    ctx.make(NodeKind::IncDecExpression { operator, prefix, argument }, node)
}

fn binary_expr(
    ctx: &mut LowerCtx<'_>,
    node: &ResolvedNode,
    parent_binary: Option<&ParentBinary>,
) -> Node {
    let operator = find_token_by(node, |k| gml_syntax::operators::binary_binding(k).is_some())
        .map_or(String::new(), |t| t.text().to_string());
    let children = child_nodes(node);

    let left_ctx = ParentBinary { operator: operator.clone(), position: BinaryPosition::Left };
    let right_ctx = ParentBinary { operator: operator.clone(), position: BinaryPosition::Right };
    let left = children
        .first()
        .and_then(|n| lower_expr(ctx, n, Some(&left_ctx)))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    let right = children
        .get(1)
        .and_then(|n| lower_expr(ctx, n, Some(&right_ctx)))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));

    let built = ctx.make(
        NodeKind::BinaryExpression { operator: operator.clone(), left: Box::new(left), right: Box::new(right) },
        node,
    );

    match parent_binary {
        Some(parent) if needs_parentheses(&operator, parent) => {
            let (start, end) = (built.start, built.end);
            Node {
                kind: NodeKind::ParenthesizedExpression {
                    expression: Box::new(built),
                    synthetic: Some(true),
                    position: Some(parent.position.as_str().to_string()),
                },
                start,
                end,
            }
        }
        _ => built,
    }
}

fn assignment_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let operator = find_token_by(node, |k| k.is_assignment_op()).map_or(String::new(), |t| {
        // `:=` is the Pascal-flavored spelling of plain assignment.
        if t.kind() == COLON_EQ { "=".to_string() } else { t.text().to_string() }
    });
    let children = child_nodes(node);
    let left = children
        .first()
        .and_then(|n| lower_expr(ctx, n, None))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    let right = children
        .get(1)
        .and_then(|n| lower_expr(ctx, n, None))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    ctx.make(
        NodeKind::AssignmentExpression { operator, left: Box::new(left), right: Box::new(right) },
        node,
    )
}

fn ternary_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let children = child_nodes(node);
    let test = expr_slot(ctx, children.first().copied());
    let consequent = expr_slot(ctx, children.get(1).copied());
    let alternate = expr_slot(ctx, children.get(2).copied());
    ctx.make(NodeKind::TernaryExpression { test, consequent, alternate }, node)
}

fn expr_slot(ctx: &mut LowerCtx<'_>, node: Option<&ResolvedNode>) -> Box<Node> {
    Box::new(
        node.and_then(|n| lower_expr(ctx, n, None))
            .unwrap_or_else(|| Node::new(NodeKind::identifier(""))),
    )
}

fn call_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let children = child_nodes(node);
    let callee = children.first().copied();
    let object = callee
        .map(|n| {
            if n.kind() == NAME_EXPR {
                ctx.with_role(IdentifierRole::reference("function"), |ctx| {
                    visit_identifier(ctx, n)
                })
            } else {
                lower_expr(ctx, n, None).unwrap_or_else(|| Node::new(NodeKind::identifier("")))
            }
        })
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    let arguments = first_child_in(node, &[ARG_LIST])
        .map(|args| lower_argument_list(ctx, args).0)
        .unwrap_or_default();
    ctx.make(NodeKind::CallExpression { object: Box::new(object), arguments }, node)
}

fn new_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let inner = child_nodes(node)
        .first()
        .and_then(|n| lower_expr(ctx, n, None))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    // `new Foo(a)` parses as a call; the constructed form keeps the callee
    // and the arguments side by side.
    let kind = match inner.kind {
        NodeKind::CallExpression { object, arguments } => {
            NodeKind::NewExpression { expression: object, arguments }
        }
        _ => NodeKind::NewExpression { expression: Box::new(inner), arguments: Vec::new() },
    };
    ctx.make(kind, node)
}

fn member_dot_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let children = child_nodes(node);
    let object_node = children.first().copied();
    let property_node = children.get(1).copied();

    // `global.x` introduces `x` into the global registry before the
    // property is visited, so this very occurrence is already flagged.
    let object_is_global = object_node
        .and_then(first_significant_token)
        .is_some_and(|t| t.kind() == GLOBAL_KW);
    if object_is_global {
        if let Some(token) = property_node.and_then(first_significant_token) {
            ctx.ids.mark_global(token.text());
        }
    }

    let object = object_node
        .and_then(|n| lower_expr(ctx, n, None))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    let property = property_node
        .map(|n| {
            ctx.with_role(IdentifierRole::reference("property"), |ctx| visit_identifier(ctx, n))
        })
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));

    // The dotted chain spans the full receiver, so the node starts where
    // the object starts.
    ctx.make(
        NodeKind::MemberDotExpression { object: Box::new(object), property: Box::new(property) },
        node,
    )
}

fn member_index_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let accessor = find_token_by(node, |k| k.is_accessor_open())
        .map_or("[".to_string(), |t| t.text().to_string());
    let children = child_nodes(node);
    let object = children
        .first()
        .and_then(|n| lower_expr(ctx, n, None))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    let property = children
        .iter()
        .skip(1)
        .filter_map(|n| lower_expr(ctx, n, None))
        .collect();
    ctx.make(
        NodeKind::MemberIndexExpression { object: Box::new(object), property, accessor },
        node,
    )
}

fn array_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let elements = child_nodes(node)
        .into_iter()
        .filter_map(|n| lower_expr(ctx, n, None))
        .collect();
    let trailing = has_trailing_comma(node, RBRACKET);
    ctx.make(NodeKind::ArrayExpression { elements, has_trailing_comma: trailing }, node)
}

fn struct_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let properties = ctx.with_scope("struct", |ctx| {
        child_nodes(node)
            .into_iter()
            .filter(|c| c.kind() == PROPERTY)
            .map(|prop| {
                let parts = child_nodes(prop);
                let name = parts
                    .first()
                    .map(|n| {
                        if n.kind() == NAME_EXPR {
                            ctx.with_role(IdentifierRole::declaration("property"), |ctx| {
                                visit_identifier(ctx, n)
                            })
                        } else {
                            literal(ctx, n)
                        }
                    })
                    .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
                let value = parts
                    .get(1)
                    .and_then(|n| lower_expr(ctx, n, None))
                    .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
                ctx.make(
                    NodeKind::Property { name: Box::new(name), value: Box::new(value) },
                    prop,
                )
            })
            .collect()
    });
    let trailing = has_trailing_comma(node, RBRACE);
    ctx.make(NodeKind::StructExpression { properties, has_trailing_comma: trailing }, node)
}

fn template_string(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let mut atoms = Vec::new();
    for element in node.children_with_tokens() {
        match element {
            NodeOrToken::Token(token) if token.kind() == TEMPLATE_TEXT => {
                let (start, end) = ctx.token_range(token);
                atoms.push(Node::with_range(
                    NodeKind::TemplateStringText { value: token.text().to_string() },
                    start,
                    end,
                ));
            }
            NodeOrToken::Token(_) => {}
            NodeOrToken::Node(child) => {
                if let Some(expr) = lower_expr(ctx, child, None) {
                    atoms.push(expr);
                }
            }
        }
    }
    ctx.make(NodeKind::TemplateStringExpression { atoms }, node)
}

/// Lowers an argument list, materializing `MissingOptionalArgument` slots
/// from comma placement. Returns the list and whether a trailing comma was
/// present.
fn lower_argument_list(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> (Vec<Node>, bool) {
    let mut out = Vec::new();
    let mut have_expr = false;
    let mut comma_count = 0usize;
    let mut last_comma: Option<(Location, Location)> = None;

    for element in node.children_with_tokens() {
        match element {
            NodeOrToken::Token(token) if token.kind() == COMMA => {
                comma_count += 1;
                let range = ctx.token_range(token);
                if !have_expr {
                    out.push(missing_argument(range));
                }
                last_comma = Some(range);
                have_expr = false;
            }
            NodeOrToken::Token(_) => {}
            NodeOrToken::Node(child) => {
                if let Some(expr) = lower_expr(ctx, child, None) {
                    out.push(expr);
                    have_expr = true;
                }
            }
        }
    }

    let trailing = comma_count > 0 && !have_expr;
    if trailing {
        if let Some(range) = last_comma {
            out.push(missing_argument(range));
        }
    }
    (out, trailing)
}

fn missing_argument((start, end): (Location, Location)) -> Node {
    Node::with_range(NodeKind::MissingOptionalArgument {}, start, end)
}

/// Lowers a parameter list: identifiers, defaults, and omitted slots, with
/// the same comma rules as call arguments.
fn lower_param_list(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> (Vec<Node>, bool) {
    let mut out = Vec::new();
    let mut have_item = false;
    let mut comma_count = 0usize;
    let mut last_comma: Option<(Location, Location)> = None;

    for element in node.children_with_tokens() {
        match element {
            NodeOrToken::Token(token) if token.kind() == COMMA => {
                comma_count += 1;
                let range = ctx.token_range(token);
                if !have_item {
                    out.push(missing_argument(range));
                }
                last_comma = Some(range);
                have_item = false;
            }
            NodeOrToken::Token(_) => {}
            NodeOrToken::Node(child) => {
                let param = match child.kind() {
                    NAME_EXPR => ctx.with_role(IdentifierRole::declaration("parameter"), |ctx| {
                        visit_identifier(ctx, child)
                    }),
                    DEFAULT_PARAM => {
                        let parts = child_nodes(child);
                        let left = parts
                            .first()
                            .map(|n| {
                                ctx.with_role(
                                    IdentifierRole::declaration("parameter"),
                                    |ctx| visit_identifier(ctx, n),
                                )
                            })
                            .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
                        let right = parts
                            .get(1)
                            .and_then(|n| lower_expr(ctx, n, None))
                            .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
                        ctx.make(
                            NodeKind::DefaultParameter {
                                left: Box::new(left),
                                right: Box::new(right),
                            },
                            child,
                        )
                    }
                    _ => continue,
                };
                out.push(param);
                have_item = true;
            }
        }
    }

    let trailing = comma_count > 0 && !have_item;
    if trailing {
        if let Some(range) = last_comma {
            out.push(missing_argument(range));
        }
    }
    (out, trailing)
}

/// Functions and constructors share one CST shape; the `constructor`
/// keyword (or a parent clause) selects the constructed form.
pub(crate) fn lower_function(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    let Some(decl) = FunctionDecl::cast(node.clone()) else {
        return Node::new(NodeKind::identifier(""));
    };
    let is_constructor = decl.is_constructor();

    let id_location = decl.name_node().map(|n| {
        let (start, end) = ctx.node_range(n);
        LocationRange::new(start, end)
    });
    let id = decl.name_node().map(|n| {
        let role = if is_constructor {
            IdentifierRole::declaration("constructor")
        } else {
            IdentifierRole::declaration("function")
        };
        Box::new(ctx.with_role(role, |ctx| visit_identifier(ctx, n)))
    });

    let scope_kind = if is_constructor { "struct" } else { "function" };
    let parent_clause = decl.parent_clause();
    let (params, has_trailing, body, parent) = ctx.with_scope(scope_kind, |ctx| {
        let (params, has_trailing) = decl
            .param_list()
            .map(|list| lower_param_list(ctx, list))
            .unwrap_or_default();
        let parent =
            parent_clause.as_ref().map(|clause| Box::new(constructor_parent(ctx, clause)));
        let body = decl
            .body()
            .and_then(|b| super::lower_stmt(ctx, b))
            .unwrap_or_else(|| Node::new(NodeKind::BlockStatement { body: Vec::new() }));
        (params, has_trailing, Box::new(body), parent)
    });

    let kind = if is_constructor {
        NodeKind::ConstructorDeclaration {
            id,
            id_location,
            params,
            body,
            parent,
            has_trailing_comma: has_trailing,
        }
    } else {
        NodeKind::FunctionDeclaration { id, id_location, params, body, has_trailing_comma: has_trailing }
    };
    ctx.make(kind, node)
}

fn constructor_parent(ctx: &mut LowerCtx<'_>, clause: &ConstructorParent) -> Node {
    let id = clause
        .name_node()
        .map(|n| {
            ctx.with_role(IdentifierRole::reference("constructor"), |ctx| {
                visit_identifier(ctx, n)
            })
        })
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")));
    let (params, has_trailing) = clause
        .arg_list()
        .map(|args| lower_argument_list(ctx, args))
        .unwrap_or_default();
    ctx.make(
        NodeKind::ConstructorParentClause {
            id: Box::new(id),
            params,
            has_trailing_comma: has_trailing,
        },
        clause.syntax(),
    )
}

/// First lowerable child expression, or an empty placeholder.
fn first_expr(ctx: &mut LowerCtx<'_>, node: &ResolvedNode) -> Node {
    child_nodes(node)
        .into_iter()
        .find_map(|n| lower_expr(ctx, n, None))
        .unwrap_or_else(|| Node::new(NodeKind::identifier("")))
}
